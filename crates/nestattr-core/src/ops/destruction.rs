use crate::model::{AttributeMap, Entity};
use crate::options::DestroyIf;
use crate::request::Declaration;

use super::rejection::call_reject_if;

/// Explicit destroy flag on the entry, honoured only with `allow_destroy`
pub fn will_be_destroyed(decl: &Declaration<'_>, attrs: &AttributeMap) -> bool {
    decl.options.allow_destroy() && attrs.has_destroy_flag(decl.keys)
}

/// Evaluate the configured `destroy_if` predicate
///
/// Short-circuits to `false` when the explicit flag already decided the
/// entry. An entity-bound predicate is invoked on `bound`.
pub fn evaluate_destroy_if(
    decl: &Declaration<'_>,
    attrs: &AttributeMap,
    bound: &dyn Entity,
) -> bool {
    if will_be_destroyed(decl, attrs) {
        return false;
    }

    match decl.options.destroy_if() {
        None => false,
        Some(DestroyIf::Attrs(predicate)) => predicate(attrs),
        Some(DestroyIf::Entity(predicate)) => predicate(bound),
    }
}

/// Whether a new entity for this entry should never be built
///
/// No child exists yet, so an entity-bound predicate runs against `owner`.
pub fn reject_new_record(decl: &Declaration<'_>, attrs: &AttributeMap, owner: &dyn Entity) -> bool {
    will_be_destroyed(decl, attrs)
        || call_reject_if(decl, attrs)
        || evaluate_destroy_if(decl, attrs, owner)
}

/// Assign the non-reserved fields, then flag the entity if it should go
///
/// Never deletes. Returns whether the entity was flagged by this call.
pub fn assign_to_or_mark_for_destruction<E: Entity>(
    decl: &Declaration<'_>,
    entity: &mut E,
    attrs: &AttributeMap,
) -> bool {
    entity.assign_attributes(&attrs.assignable(decl.keys));

    let bound: &dyn Entity = &*entity;
    let should_destroy = will_be_destroyed(decl, attrs) || evaluate_destroy_if(decl, attrs, bound);
    if should_destroy {
        entity.mark_for_destruction();
    }

    should_destroy
}
