//! Top-level entry point for nested attribute assignment
//!
//! `assign_nested_attributes` resolves the association's declaration and
//! routes to the singular or collection reconciler.
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The reconcilers in [`crate::ops`] only use `tracing::debug!`.
//!
//! ## Example
//!
//! ```
//! use nestattr_core::memory::{HasMany, MemoryStore};
//! use nestattr_core::{
//!     assign_nested_attributes, AssociationOptions, AssociationRef, NestedAttributesRegistry,
//!     Record, ReconciliationRequest,
//! };
//! use serde_json::json;
//!
//! let registry = NestedAttributesRegistry::builder()
//!     .accepts_nested_attributes_for(&["children"], AssociationOptions::default())
//!     .build();
//!
//! let mut store = MemoryStore::new();
//! let mut parent = Record::default();
//! let mut children = HasMany::new(&mut store, &mut parent, "children");
//!
//! let input = json!({"0": {"name": "a@x.com"}});
//! let request = ReconciliationRequest::new("children", &input);
//! let report =
//!     assign_nested_attributes(&registry, &request, AssociationRef::Many(&mut children)).unwrap();
//!
//! assert_eq!(report.built(), 1);
//! ```

use std::time::Instant;

use nestattr_core_types::schema::{OP_COLLECTION, OP_ONE_TO_ONE};

use crate::association::AssociationRef;
use crate::errors::Result;
use crate::model::{Entity, ReconciliationReport};
use crate::ops::{reconcile_collection, reconcile_one_to_one};
use crate::registry::NestedAttributesRegistry;
use crate::request::{Declaration, ReconciliationRequest};
use crate::{log_op_end, log_op_error, log_op_start};

/// Reconcile one association of a parent against nested input
///
/// The report has one outcome per normalized entry; a singular association
/// always yields exactly one.
///
/// # Errors
///
/// `UnknownAssociation` if nothing was declared for the request's
/// association, otherwise whatever the reconciler raises. Errors abort the
/// call; assignments already made on other entities are left in place.
pub fn assign_nested_attributes<E: Entity + Clone>(
    registry: &NestedAttributesRegistry,
    request: &ReconciliationRequest<'_>,
    association: AssociationRef<'_, E>,
) -> Result<ReconciliationReport> {
    let op = if association.is_collection() {
        OP_COLLECTION
    } else {
        OP_ONE_TO_ONE
    };
    let request_id = request.context.request_id.as_str();
    let trace_id = request.context.trace_id.as_ref().map(|t| t.as_str());

    log_op_start!(
        op,
        association = request.association,
        request_id = request_id,
        trace_id = trace_id
    );
    let start = Instant::now();

    let report = assign_impl(registry, request, association).map_err(|e| {
        log_op_error!(
            op,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            association = request.association,
            request_id = request_id,
            trace_id = trace_id
        );
        e
    })?;

    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        association = request.association,
        request_id = request_id,
        trace_id = trace_id,
        entry_count = report.outcomes.len() as u64,
        built = report.built() as u64,
        updated = report.updated() as u64,
        marked_for_destruction = report.marked_for_destruction() as u64,
        skipped = report.skipped() as u64
    );

    Ok(report)
}

fn assign_impl<E: Entity + Clone>(
    registry: &NestedAttributesRegistry,
    request: &ReconciliationRequest<'_>,
    association: AssociationRef<'_, E>,
) -> Result<ReconciliationReport> {
    let decl = Declaration::lookup(registry, request.association)?;

    match association {
        AssociationRef::Many(collection) => reconcile_collection(request, &decl, collection),
        AssociationRef::One(singular) => {
            let outcome = reconcile_one_to_one(request, &decl, singular)?;
            let mut report = ReconciliationReport::new(request.association);
            report.push(outcome);
            Ok(report)
        }
    }
}
