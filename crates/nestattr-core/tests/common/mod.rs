use nestattr_core::memory::MemoryStore;
use nestattr_core::{AssociationOptions, AttributeMap, NestedAttributesRegistry, Record};
use serde_json::{json, Value};

/// Association name used throughout the tests
#[allow(dead_code)]
pub const CHILDREN: &str = "children";

/// Predicate: the entry's `name` is absent or blank
#[allow(dead_code)]
pub fn name_is_blank(attrs: &AttributeMap) -> bool {
    attrs
        .get("name")
        .map_or(true, nestattr_core::model::attributes::is_blank)
}

/// Registry declaring `children` with `destroy_if` on a blank name
#[allow(dead_code)]
pub fn destroy_if_blank_name_registry() -> NestedAttributesRegistry {
    registry_with(
        AssociationOptions::builder()
            .destroy_if_attrs(name_is_blank)
            .build(),
    )
}

/// Registry declaring `children` with the given options
#[allow(dead_code)]
pub fn registry_with(options: AssociationOptions) -> NestedAttributesRegistry {
    NestedAttributesRegistry::builder()
        .accepts_nested_attributes_for(&[CHILDREN], options)
        .build()
}

/// Persisted record with a `name` field
#[allow(dead_code)]
pub fn named(id: &str, name: &str) -> Record {
    Record::persisted(id, AttributeMap::from_iter([("name", json!(name))]))
}

/// A persisted parent whose `children` rows are stored in `store`
#[allow(dead_code)]
pub fn existing_parent(store: &mut MemoryStore, children: Vec<Record>) -> Record {
    let mut parent = Record::default();
    let parent_id = store.persist_owner(&mut parent);
    store.seed(CHILDREN, &parent_id, children);
    parent
}

/// Names of the given records, in order
#[allow(dead_code)]
pub fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get_str("name"))
        .map(str::to_string)
        .collect()
}

/// Names of the rows stored for a parent
#[allow(dead_code)]
pub fn stored_names(store: &MemoryStore, parent: &Record) -> Vec<String> {
    match parent.id.as_deref() {
        Some(id) => names(store.rows(CHILDREN, id)),
        None => Vec::new(),
    }
}

/// Index-keyed nested input, as a form would submit it
#[allow(dead_code)]
pub fn indexed(entries: Vec<Value>) -> Value {
    let map = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| (i.to_string(), entry))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(map)
}
