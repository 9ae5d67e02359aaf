use nestattr_core_types::schema::{EVENT_ENTRY, OP_COLLECTION};

use crate::association::{AddMode, CollectionAssociation};
use crate::errors::{NestedAttributesError, Result};
use crate::model::{AttributeMap, Entity, EntryOutcome, ReconciliationReport};
use crate::request::{Declaration, ReconciliationRequest};

use super::destruction::{assign_to_or_mark_for_destruction, reject_new_record};
use super::limit::check_record_limit;
use super::normalize::normalize_collection;
use super::rejection::call_reject_if;

/// Reconcile a one-to-many association against a collection of attribute maps
///
/// The input is normalized and checked against the limit before anything is
/// built or updated. The pool of existing entities is the materialized
/// target when loaded, otherwise exactly the entities referenced by id
/// (fetched once). Entries are then processed in order:
///
/// - blank id: build and append, unless rejected or destroyed on arrival
/// - id in the pool: assign to the live entity in the target (re-attached
///   without callbacks if it is not there), unless rejected. The pool copy
///   follows every assignment, so a re-attached entity keeps the edits of
///   earlier entries
/// - id not in the pool: error, aborting the remaining entries
///
/// Pool entities that no entry references are left untouched.
///
/// # Errors
///
/// - `InvalidInputShape` if the input is neither a map nor a list of maps
/// - `TooManyRecords` if the entry count exceeds the limit
/// - `RecordNotFound` for an id missing from the pool
pub fn reconcile_collection<E: Entity + Clone>(
    request: &ReconciliationRequest<'_>,
    decl: &Declaration<'_>,
    association: &mut dyn CollectionAssociation<Entity = E>,
) -> Result<ReconciliationReport> {
    let entries = normalize_collection(request.association, request.attributes, decl.keys)?;
    check_record_limit(
        request.association,
        decl.options.limit(),
        association.owner(),
        entries.len(),
    )?;

    let mut pool = existing_pool(decl, &entries, association);

    let mut report = ReconciliationReport::new(request.association);
    for (index, attrs) in entries.iter().enumerate() {
        let outcome = match attrs.id(decl.keys) {
            None => {
                if reject_new_record(decl, attrs, association.owner()) {
                    EntryOutcome::Skipped
                } else {
                    association.build(attrs.assignable(decl.keys));
                    EntryOutcome::Built
                }
            }
            Some(id) => {
                let Some(slot) = pool.iter().position(|e| has_id(e, &id)) else {
                    return Err(NestedAttributesError::RecordNotFound {
                        association: request.association.to_string(),
                        primary_key: association.primary_key_name().to_string(),
                        id,
                    });
                };

                if call_reject_if(decl, attrs) {
                    EntryOutcome::Skipped
                } else {
                    let live = live_entity(association, &id, &pool[slot]);
                    let marked = assign_to_or_mark_for_destruction(decl, live, attrs);
                    pool[slot] = live.clone();
                    EntryOutcome::after_assign(marked)
                }
            }
        };

        tracing::debug!(
            op = OP_COLLECTION,
            event = EVENT_ENTRY,
            association = request.association,
            entry_index = index,
            outcome = outcome.as_str(),
        );
        report.push(outcome);
    }

    Ok(report)
}

fn has_id<E: Entity>(entity: &E, id: &str) -> bool {
    entity.id().as_deref() == Some(id)
}

fn existing_pool<E: Entity + Clone>(
    decl: &Declaration<'_>,
    entries: &[AttributeMap],
    association: &dyn CollectionAssociation<Entity = E>,
) -> Vec<E> {
    if association.is_loaded() {
        return association.target().to_vec();
    }

    let ids: Vec<String> = entries.iter().filter_map(|a| a.id(decl.keys)).collect();
    if ids.is_empty() {
        Vec::new()
    } else {
        association.query_by_ids(&ids)
    }
}

/// The object actually held in the target for `id`
///
/// Callbacks fired by earlier entries may have changed the target, so it is
/// searched afresh; a pool entity missing from it is attached without
/// callbacks.
fn live_entity<'a, E: Entity + Clone>(
    association: &'a mut dyn CollectionAssociation<Entity = E>,
    id: &str,
    matched: &E,
) -> &'a mut E {
    let position = association.target().iter().position(|e| has_id(e, id));
    match position {
        Some(i) => &mut association.target_mut()[i],
        None => association.add_to_target(matched.clone(), AddMode::SkipCallbacks),
    }
}
