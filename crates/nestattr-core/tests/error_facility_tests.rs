use nestattr_core::errors::{ExError, ExErrorKind, NestedAttributesError};
use nestattr_core_types::{RequestId, TraceId};

#[test]
fn test_not_found_verifiable_by_kind() {
    let err = NestedAttributesError::RecordNotFound {
        association: "children".to_string(),
        primary_key: "id".to_string(),
        id: "9".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.association(), Some("children"));
    assert_eq!(ex_err.entity_id(), Some("9"));
    assert!(ex_err.message().contains("Couldn't find children with id=9"));
}

#[test]
fn test_too_many_records_structured_fields() {
    let err = NestedAttributesError::TooManyRecords {
        association: "children".to_string(),
        limit: 2,
        count: 3,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::TooManyRecords);
    assert_eq!(ex_err.code(), "ERR_TOO_MANY_RECORDS");
    assert_eq!(ex_err.association(), Some("children"));
    assert!(ex_err.entity_id().is_none());
}

#[test]
fn test_configuration_variants_share_kind() {
    let errors = vec![
        NestedAttributesError::UnknownOption {
            association: "children".to_string(),
            key: "reject".to_string(),
        },
        NestedAttributesError::InvalidOption {
            association: "children".to_string(),
            key: "limit".to_string(),
            reason: "expected an integer".to_string(),
        },
        NestedAttributesError::ConfigParse {
            message: "expected `]`".to_string(),
        },
        NestedAttributesError::UnknownAssociation {
            association: "pets".to_string(),
        },
    ];

    for err in errors {
        assert!(err.is_configuration());
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), ExErrorKind::Configuration);
    }
}

#[test]
fn test_runtime_variants_are_not_configuration() {
    let errors = vec![
        NestedAttributesError::InvalidInputShape {
            association: "children".to_string(),
            actual_type: "string".to_string(),
            actual: "\"x\"".to_string(),
        },
        NestedAttributesError::BuildUnsupported {
            association: "avatar".to_string(),
        },
    ];

    for err in errors {
        assert!(!err.is_configuration());
    }
}

#[test]
fn test_error_kind_code_mapping() {
    // Test that each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
        (ExErrorKind::InvalidInputShape, "ERR_INVALID_INPUT_SHAPE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::TooManyRecords, "ERR_TOO_MANY_RECORDS"),
        (ExErrorKind::BuildUnsupported, "ERR_BUILD_UNSUPPORTED"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_builder_carries_correlation() {
    let request_id = RequestId::from_string("req-1".to_string());
    let trace_id = TraceId::from_string("trace-1".to_string());

    let ex_err = ExError::new(ExErrorKind::Io)
        .with_op("nestattr.apply")
        .with_request_id(request_id.clone())
        .with_trace_id(trace_id.clone())
        .with_message("fixture unreadable");

    assert_eq!(ex_err.op(), Some("nestattr.apply"));
    assert_eq!(ex_err.request_id(), Some(&request_id));
    assert_eq!(ex_err.trace_id(), Some(&trace_id));
    assert_eq!(ex_err.message(), "fixture unreadable");
}

#[test]
fn test_display_includes_code_and_context() {
    let ex_err: ExError = NestedAttributesError::BuildUnsupported {
        association: "avatar".to_string(),
    }
    .into();

    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_BUILD_UNSUPPORTED]"));
    assert!(rendered.contains("(association: avatar)"));
}
