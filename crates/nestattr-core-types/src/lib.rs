//! Core types shared by the nested-attributes crates
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
