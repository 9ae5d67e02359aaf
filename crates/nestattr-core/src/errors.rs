use nestattr_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using NestedAttributesError
pub type Result<T> = std::result::Result<T, NestedAttributesError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error the reconcilers raise is a caller or configuration error.
/// None of them are transient, so no kind carries retry semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Unknown or malformed association option (raised at setup time)
    Configuration,
    /// Nested input is neither a map nor a list of maps
    InvalidInputShape,
    /// Non-blank identifier with no matching entity
    NotFound,
    /// More entries than the configured limit
    TooManyRecords,
    /// Singular association cannot build a new target
    BuildUnsupported,

    // Integration (CLI surface)
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::InvalidInputShape => "ERR_INVALID_INPUT_SHAPE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::TooManyRecords => "ERR_TOO_MANY_RECORDS",
            ExErrorKind::BuildUnsupported => "ERR_BUILD_UNSUPPORTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable classification plus whatever context the failing
/// operation had at hand (association, offending id, correlation ids).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    association: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            association: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_association(mut self, association: impl Into<String>) -> Self {
        self.association = Some(association.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn association(&self) -> Option<&str> {
        self.association.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(association) = &self.association {
            write!(f, " (association: {})", association)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for nested-attribute reconciliation
///
/// All variants abort the current call immediately. Field assignments that
/// already happened on other entities in the same call are not rolled back;
/// the persistence layer decides what to keep.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestedAttributesError {
    // ===== Configuration Errors =====
    /// Option key outside the recognized set
    #[error("Unknown key `{key}` in nested attributes options for `{association}`. Valid keys are: allow_destroy, reject_if, destroy_if, limit, update_only")]
    UnknownOption { association: String, key: String },

    /// Recognized option key with a value of the wrong shape
    #[error("Invalid value for `{key}` in nested attributes options for `{association}`: {reason}")]
    InvalidOption {
        association: String,
        key: String,
        reason: String,
    },

    /// Declaration source could not be parsed at all
    #[error("Nested attributes configuration could not be parsed: {message}")]
    ConfigParse { message: String },

    /// No options were declared for the association
    #[error("No nested attributes declared for association `{association}`. Has it been declared yet?")]
    UnknownAssociation { association: String },

    // ===== Input Errors =====
    /// Nested input for a collection is neither a map nor a list
    #[error("Hash or Array expected for attribute `{association}`, got {actual_type} ({actual})")]
    InvalidInputShape {
        association: String,
        actual_type: String,
        actual: String,
    },

    /// Non-blank identifier that matches nothing in the pool
    #[error("Couldn't find {association} with {primary_key}={id}")]
    RecordNotFound {
        association: String,
        primary_key: String,
        id: String,
    },

    /// Normalized entry count exceeds the configured limit
    #[error("Maximum {limit} records are allowed for `{association}`. Got {count} records instead.")]
    TooManyRecords {
        association: String,
        limit: usize,
        count: usize,
    },

    /// Singular association cannot build a new target
    #[error("Cannot build association `{association}`. Are you trying to build a polymorphic one-to-one association?")]
    BuildUnsupported { association: String },
}

impl NestedAttributesError {
    /// Whether this error belongs to the setup-time configuration family
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NestedAttributesError::UnknownOption { .. }
                | NestedAttributesError::InvalidOption { .. }
                | NestedAttributesError::ConfigParse { .. }
                | NestedAttributesError::UnknownAssociation { .. }
        )
    }
}

/// Conversion from NestedAttributesError to the canonical ExError
impl From<NestedAttributesError> for ExError {
    fn from(err: NestedAttributesError) -> Self {
        let message = err.to_string();
        match err {
            NestedAttributesError::UnknownOption { association, key } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_op("declare")
                    .with_association(association)
                    .with_entity_id(key)
                    .with_message(message)
            }
            NestedAttributesError::InvalidOption {
                association, key, ..
            } => ExError::new(ExErrorKind::Configuration)
                .with_op("declare")
                .with_association(association)
                .with_entity_id(key)
                .with_message(message),
            NestedAttributesError::ConfigParse { .. } => {
                ExError::new(ExErrorKind::Configuration).with_message(message)
            }
            NestedAttributesError::UnknownAssociation { association } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_association(association)
                    .with_message(message)
            }
            NestedAttributesError::InvalidInputShape { association, .. } => {
                ExError::new(ExErrorKind::InvalidInputShape)
                    .with_association(association)
                    .with_message(message)
            }
            NestedAttributesError::RecordNotFound {
                association, id, ..
            } => ExError::new(ExErrorKind::NotFound)
                .with_association(association)
                .with_entity_id(id)
                .with_message(message),
            NestedAttributesError::TooManyRecords { association, .. } => {
                ExError::new(ExErrorKind::TooManyRecords)
                    .with_association(association)
                    .with_message(message)
            }
            NestedAttributesError::BuildUnsupported { association } => {
                ExError::new(ExErrorKind::BuildUnsupported)
                    .with_association(association)
                    .with_message(message)
            }
        }
    }
}
