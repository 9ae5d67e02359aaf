//! Association resolver interface consumed by the reconcilers
//!
//! The host framework implements these traits for each association view of a
//! parent. The reconcilers never cache the materialized target across
//! entries: building or attaching an entity may fire host callbacks that
//! change it, so every lookup goes back to the resolver.

use crate::model::{AttributeMap, Entity};

/// Whether attaching an entity should fire the host's add callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    WithCallbacks,
    SkipCallbacks,
}

/// Capabilities shared by singular and collection associations
pub trait AssociationResolver {
    type Entity: Entity;

    /// The parent entity the association belongs to
    fn owner(&self) -> &dyn Entity;

    /// Name of the child primary key, used in not-found errors
    fn primary_key_name(&self) -> &str {
        "id"
    }
}

/// One-to-one association
pub trait SingularAssociation: AssociationResolver {
    /// The currently associated entity, if any
    fn current_mut(&mut self) -> Option<&mut Self::Entity>;

    /// Whether `build` can create a target (false for ambiguous polymorphic targets)
    fn can_build(&self) -> bool;

    /// Build a new target from assignable fields and associate it
    ///
    /// Only called after `can_build` returned true.
    fn build(&mut self, fields: AttributeMap) -> &mut Self::Entity;
}

/// One-to-many association
pub trait CollectionAssociation: AssociationResolver {
    /// Whether the target list is already materialized
    fn is_loaded(&self) -> bool;

    /// The current materialized list
    fn target(&self) -> &[Self::Entity];

    fn target_mut(&mut self) -> &mut [Self::Entity];

    /// Fetch exactly the entities with the given identifiers
    fn query_by_ids(&self, ids: &[String]) -> Vec<Self::Entity>;

    /// Build a new entity from assignable fields and append it to the target
    fn build(&mut self, fields: AttributeMap) -> &mut Self::Entity;

    /// Attach an existing entity to the materialized list
    fn add_to_target(&mut self, entity: Self::Entity, mode: AddMode) -> &mut Self::Entity;
}

/// An association handed to the top-level dispatcher
pub enum AssociationRef<'a, E: Entity> {
    One(&'a mut dyn SingularAssociation<Entity = E>),
    Many(&'a mut dyn CollectionAssociation<Entity = E>),
}

impl<E: Entity> AssociationRef<'_, E> {
    pub fn is_collection(&self) -> bool {
        matches!(self, AssociationRef::Many(_))
    }
}
