//! Nested attributes reconciliation kernel
//!
//! Reconciles a user-supplied description of child entities against the
//! children a parent already has:
//! - builds new children for entries without an identifier
//! - updates children matched by identifier, in place
//! - flags children for deferred destruction (`allow_destroy`, `destroy_if`)
//! - skips rejected entries (`reject_if`) and enforces `limit`
//!
//! Persistence is external. The crate talks to it through the resolver traits
//! in [`association`]; [`memory`] provides an in-memory implementation.

pub mod apply;
pub mod association;
pub mod errors;
pub mod logging_facility;
pub mod memory;
pub mod model;
pub mod ops;
pub mod options;
pub mod registry;
pub mod request;

pub use nestattr_core_types::schema;

// Re-export commonly used types
pub use apply::assign_nested_attributes;
pub use association::{
    AddMode, AssociationRef, AssociationResolver, CollectionAssociation, SingularAssociation,
};
pub use errors::{ExError, ExErrorKind, NestedAttributesError, Result};
pub use model::{AttributeMap, Entity, EntryOutcome, ReconciliationReport, Record, ReservedKeys};
pub use options::{AssociationOptions, DestroyIf, Limit, RejectIf};
pub use registry::NestedAttributesRegistry;
pub use request::{Declaration, ReconciliationRequest};
