use nestattr_core_types::schema::OP_ONE_TO_ONE;

use crate::association::SingularAssociation;
use crate::errors::{NestedAttributesError, Result};
use crate::model::{Entity, EntryOutcome};
use crate::request::{Declaration, ReconciliationRequest};

use super::destruction::{assign_to_or_mark_for_destruction, reject_new_record};
use super::normalize::normalize_single;
use super::rejection::call_reject_if;

/// Reconcile a one-to-one association against one attribute map
///
/// 1. With `update_only`, or an identifier equal to the current entity's,
///    the current entity is updated (unless the entry is rejected).
/// 2. Any other non-blank identifier is an error.
/// 3. Otherwise, unless the entry is rejected or would be destroyed right
///    away, the fields go into a still-transient current entity, or into a
///    freshly built one.
///
/// # Errors
///
/// - `InvalidInputShape` if the input is not a map
/// - `RecordNotFound` for an identifier that is not the current entity's
/// - `BuildUnsupported` if a new target is needed but cannot be built
pub fn reconcile_one_to_one<E: Entity>(
    request: &ReconciliationRequest<'_>,
    decl: &Declaration<'_>,
    association: &mut dyn SingularAssociation<Entity = E>,
) -> Result<EntryOutcome> {
    let attrs = normalize_single(request.association, request.attributes)?;
    let id = attrs.id(decl.keys);
    let update_only = decl.options.update_only();

    if update_only || id.is_some() {
        if let Some(existing) = association.current_mut() {
            if update_only || existing.id() == id {
                if call_reject_if(decl, &attrs) {
                    return Ok(EntryOutcome::Skipped);
                }
                let marked = assign_to_or_mark_for_destruction(decl, existing, &attrs);
                return Ok(EntryOutcome::after_assign(marked));
            }
        }
    }

    if let Some(id) = id {
        return Err(NestedAttributesError::RecordNotFound {
            association: request.association.to_string(),
            primary_key: association.primary_key_name().to_string(),
            id,
        });
    }

    if reject_new_record(decl, &attrs, association.owner()) {
        tracing::debug!(
            op = OP_ONE_TO_ONE,
            association = request.association,
            "new target rejected"
        );
        return Ok(EntryOutcome::Skipped);
    }

    let assignable = attrs.assignable(decl.keys);

    // A pending, unsaved target absorbs the fields instead of being replaced
    if let Some(existing) = association.current_mut() {
        if !existing.is_persisted() {
            existing.assign_attributes(&assignable);
            return Ok(EntryOutcome::Built);
        }
    }

    if !association.can_build() {
        return Err(NestedAttributesError::BuildUnsupported {
            association: request.association.to_string(),
        });
    }

    association.build(assignable);
    Ok(EntryOutcome::Built)
}
