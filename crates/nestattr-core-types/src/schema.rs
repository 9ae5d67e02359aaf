//! Canonical schema constants for structured logging
//!
//! Every reconciliation event uses these keys so log consumers can filter on
//! them without knowing which reconciler emitted the event.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Reconciliation context
pub const FIELD_ASSOCIATION: &str = "association";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_ENTRY_INDEX: &str = "entry_index";
pub const FIELD_OUTCOME: &str = "outcome";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ENTRY: &str = "entry";

// Operation names
pub const OP_COLLECTION: &str = "nested_attributes.collection";
pub const OP_ONE_TO_ONE: &str = "nested_attributes.one_to_one";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_ASSOCIATION.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        let events = [EVENT_START, EVENT_END, EVENT_END_ERROR, EVENT_ENTRY];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_op_names_share_prefix() {
        assert!(OP_COLLECTION.starts_with("nested_attributes."));
        assert!(OP_ONE_TO_ONE.starts_with("nested_attributes."));
        assert_ne!(OP_COLLECTION, OP_ONE_TO_ONE);
    }
}
