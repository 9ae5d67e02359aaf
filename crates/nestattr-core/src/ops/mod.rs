//! Reconciliation operations
//!
//! Leaves first: normalization and the three policies, then the singular and
//! collection reconcilers built on them. These functions only emit
//! `tracing::debug!`; lifecycle logging belongs to [`crate::apply`].

pub mod collection;
pub mod destruction;
pub mod limit;
pub mod normalize;
pub mod one_to_one;
pub mod rejection;

pub use collection::reconcile_collection;
pub use destruction::{
    assign_to_or_mark_for_destruction, evaluate_destroy_if, reject_new_record, will_be_destroyed,
};
pub use limit::check_record_limit;
pub use normalize::{normalize_collection, normalize_single};
pub use one_to_one::reconcile_one_to_one;
pub use rejection::call_reject_if;
