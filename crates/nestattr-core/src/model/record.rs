use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attributes::AttributeMap;
use super::entity::Entity;

/// Schemaless in-memory entity
///
/// Used by the in-memory collaborator and the CLI. A record with no id is
/// transient until its association is saved. Serializes flat:
/// `{"id": "1", "name": "m"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Primary key, `None` while transient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Field values in assignment order
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Destruction intent, consumed by the owning save
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub marked_for_destruction: bool,
}

impl Record {
    /// A transient record with the given fields
    pub fn new(fields: AttributeMap) -> Self {
        Self {
            id: None,
            fields: fields.into_inner(),
            marked_for_destruction: false,
        }
    }

    /// A record that already has a primary key
    pub fn persisted(id: impl Into<String>, fields: AttributeMap) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(fields)
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String field shortcut for assertions and rendering
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

impl Entity for Record {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn read_attribute(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn assign_attributes(&mut self, attributes: &AttributeMap) {
        for (key, value) in attributes.iter() {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    fn mark_for_destruction(&mut self) {
        self.marked_for_destruction = true;
    }

    fn is_marked_for_destruction(&self) -> bool {
        self.marked_for_destruction
    }
}
