//! One-to-one reconciliation through the in-memory `HasOne` view

mod common;

use common::*;
use nestattr_core::memory::{HasOne, MemoryStore};
use nestattr_core::{
    assign_nested_attributes, AssociationOptions, AssociationRef, AttributeMap, EntryOutcome,
    NestedAttributesError, NestedAttributesRegistry, Record, ReconciliationRequest,
    SingularAssociation,
};
use serde_json::{json, Value};

const AVATAR: &str = "avatar";

fn avatar_registry(options: AssociationOptions) -> NestedAttributesRegistry {
    NestedAttributesRegistry::builder()
        .accepts_nested_attributes_for(&[AVATAR], options)
        .build()
}

/// A persisted parent with a stored avatar (id=1, name=m)
fn parent_with_avatar(store: &mut MemoryStore) -> Record {
    let mut parent = Record::default();
    let parent_id = store.persist_owner(&mut parent);
    store.seed(AVATAR, &parent_id, vec![named("1", "m")]);
    parent
}

fn assign(
    registry: &NestedAttributesRegistry,
    avatar: &mut HasOne<'_>,
    input: Value,
) -> Result<EntryOutcome, NestedAttributesError> {
    let request = ReconciliationRequest::new(AVATAR, &input);
    let report = assign_nested_attributes(registry, &request, AssociationRef::One(avatar))?;
    assert_eq!(report.outcomes.len(), 1);
    Ok(report.outcomes[0])
}

fn current_name(avatar: &HasOne<'_>) -> Option<String> {
    avatar
        .current()
        .and_then(|r| r.get_str("name"))
        .map(str::to_string)
}

#[test]
fn test_builds_when_no_current() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let outcome = assign(&registry, &mut avatar, json!({"name": "a"})).unwrap();

    assert_eq!(outcome, EntryOutcome::Built);
    assert_eq!(current_name(&avatar).as_deref(), Some("a"));
}

#[test]
fn test_matching_id_updates_in_place() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let outcome = assign(&registry, &mut avatar, json!({"id": "1", "name": "x"})).unwrap();

    assert_eq!(outcome, EntryOutcome::Updated);
    assert_eq!(avatar.current().and_then(|r| r.id.as_deref()), Some("1"));
    assert_eq!(current_name(&avatar).as_deref(), Some("x"));
}

#[test]
fn test_mismatched_id_is_not_found() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let err = assign(&registry, &mut avatar, json!({"id": "2", "name": "x"})).unwrap_err();

    assert_eq!(err.to_string(), "Couldn't find avatar with id=2");
    assert_eq!(current_name(&avatar).as_deref(), Some("m"));
}

#[test]
fn test_no_id_replaces_persisted_current() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let outcome = assign(&registry, &mut avatar, json!({"name": "fresh"})).unwrap();

    assert_eq!(outcome, EntryOutcome::Built);
    assert!(avatar.current().is_some_and(|r| r.id.is_none()));
    assert_eq!(current_name(&avatar).as_deref(), Some("fresh"));
}

#[test]
fn test_update_only_ignores_id_matching() {
    let registry = avatar_registry(AssociationOptions::builder().update_only(true).build());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    assert_eq!(
        assign(&registry, &mut avatar, json!({"name": "x"})).unwrap(),
        EntryOutcome::Updated
    );
    assert_eq!(
        assign(&registry, &mut avatar, json!({"id": "other", "name": "y"})).unwrap(),
        EntryOutcome::Updated
    );
    assert_eq!(avatar.current().and_then(|r| r.id.as_deref()), Some("1"));
    assert_eq!(current_name(&avatar).as_deref(), Some("y"));
}

#[test]
fn test_update_only_builds_when_nothing_current() {
    let registry = avatar_registry(AssociationOptions::builder().update_only(true).build());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    assert_eq!(
        assign(&registry, &mut avatar, json!({"name": "x"})).unwrap(),
        EntryOutcome::Built
    );
}

#[test]
fn test_transient_current_absorbs_fields() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);
    avatar.build(AttributeMap::from_iter([("name", json!("pending")), ("size", json!(3))]));

    let outcome = assign(&registry, &mut avatar, json!({"name": "merged"})).unwrap();

    assert_eq!(outcome, EntryOutcome::Built);
    let current = avatar.current().unwrap();
    assert_eq!(current.get_str("name"), Some("merged"));
    assert_eq!(current.get("size"), Some(&json!(3)));
}

#[test]
fn test_polymorphic_cannot_build() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR).polymorphic(true);

    let err = assign(&registry, &mut avatar, json!({"name": "a"})).unwrap_err();

    assert_eq!(
        err,
        NestedAttributesError::BuildUnsupported {
            association: AVATAR.to_string()
        }
    );
    assert!(avatar.current().is_none());
}

#[test]
fn test_polymorphic_can_still_update() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR).polymorphic(true);

    assert_eq!(
        assign(&registry, &mut avatar, json!({"id": "1", "name": "x"})).unwrap(),
        EntryOutcome::Updated
    );
}

#[test]
fn test_rejected_new_entry_is_skipped() {
    let registry = avatar_registry(AssociationOptions::builder().reject_all_blank().build());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR).polymorphic(true);

    // Skipped before the build capability is consulted
    let outcome = assign(&registry, &mut avatar, json!({"name": ""})).unwrap();

    assert_eq!(outcome, EntryOutcome::Skipped);
    assert!(avatar.current().is_none());
}

#[test]
fn test_destroy_then_save_removes_row() {
    let registry = avatar_registry(AssociationOptions::builder().allow_destroy(true).build());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    {
        let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);
        let outcome = assign(&registry, &mut avatar, json!({"id": "1", "_destroy": "1"})).unwrap();
        assert_eq!(outcome, EntryOutcome::UpdatedAndMarkedForDestruction);
        assert_eq!(avatar.save().deleted, 1);
    }

    let parent_id = parent.id.clone().unwrap();
    assert!(store.rows(AVATAR, &parent_id).is_empty());
}

#[test]
fn test_non_map_input_rejected() {
    let registry = avatar_registry(AssociationOptions::default());
    let mut store = MemoryStore::new();
    let mut parent = Record::default();
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let err = assign(&registry, &mut avatar, json!([{"name": "a"}])).unwrap_err();

    assert!(matches!(err, NestedAttributesError::InvalidInputShape { .. }));
}

fn archived_owner(archived: bool) -> Record {
    Record::new(AttributeMap::from_iter([("archived", json!(archived))]))
}

fn destroy_if_archived() -> AssociationOptions {
    AssociationOptions::builder()
        .destroy_if_entity(|e| e.read_attribute("archived") == Some(json!(true)))
        .build()
}

#[test]
fn test_entity_destroy_if_on_owner_skips_new_target() {
    let registry = avatar_registry(destroy_if_archived());
    let mut store = MemoryStore::new();
    let mut parent = archived_owner(true);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let outcome = assign(&registry, &mut avatar, json!({"name": "a"})).unwrap();

    assert_eq!(outcome, EntryOutcome::Skipped);
    assert!(avatar.current().is_none());
}

#[test]
fn test_entity_destroy_if_marks_matching_current() {
    let registry = avatar_registry(destroy_if_archived());
    let mut store = MemoryStore::new();
    let mut parent = parent_with_avatar(&mut store);
    let mut avatar = HasOne::new(&mut store, &mut parent, AVATAR);

    let outcome = assign(&registry, &mut avatar, json!({"id": "1", "archived": true})).unwrap();

    assert_eq!(outcome, EntryOutcome::UpdatedAndMarkedForDestruction);
    assert!(avatar.current().is_some_and(|r| r.marked_for_destruction));
}
