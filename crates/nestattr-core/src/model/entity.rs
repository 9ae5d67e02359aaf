use serde_json::Value;

use super::attributes::AttributeMap;

/// An addressable child (or parent) object owned by the host framework
///
/// The reconcilers only read identity, assign fields and raise the
/// destruction flag. Persisting or deleting is the host's business.
pub trait Entity {
    /// Identifier rendered as a string; `None` while the entity is transient
    fn id(&self) -> Option<String>;

    /// Whether the entity has been persisted
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    /// Read one field, used by predicates bound to the entity
    fn read_attribute(&self, name: &str) -> Option<Value>;

    /// Assign every field in `attributes` (control keys are already stripped)
    fn assign_attributes(&mut self, attributes: &AttributeMap);

    /// Flag the entity for deletion at the next owning save
    fn mark_for_destruction(&mut self);

    fn is_marked_for_destruction(&self) -> bool;
}
