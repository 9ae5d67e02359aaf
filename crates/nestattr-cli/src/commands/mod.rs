pub mod apply;
pub mod check_config;

use std::path::Path;

use nestattr_core::{ExError, ExErrorKind, NestedAttributesRegistry};

/// Read a file the command was pointed at
pub fn read_file(op: &str, path: &Path) -> Result<String, ExError> {
    std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op(op)
            .with_message(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Wrap a serde_json failure with the file or value it concerns
pub fn serialization_error(op: &str, what: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op)
        .with_message(format!("{}: {}", what, err))
}

/// Read and validate a declaration file
pub fn load_registry(op: &str, path: &Path) -> Result<NestedAttributesRegistry, ExError> {
    let src = read_file(op, path)?;
    NestedAttributesRegistry::from_toml_str(&src).map_err(|e| ExError::from(e).with_op(op))
}
