use serde_json::Value;

use crate::errors::{NestedAttributesError, Result};
use crate::model::{AttributeMap, ReservedKeys};

/// Turn collection input into an ordered sequence of attribute maps
///
/// - a list is used as-is, in order
/// - a map holding the identifier key is one child's attributes passed
///   directly, and becomes a one-element sequence
/// - any other map is keyed by index; the keys are dropped and the values
///   kept in iteration order
///
/// # Errors
///
/// `InvalidInputShape` if the input, or any entry, is not of the expected shape.
pub fn normalize_collection(
    association: &str,
    input: &Value,
    keys: &ReservedKeys,
) -> Result<Vec<AttributeMap>> {
    match input {
        Value::Array(items) => items
            .iter()
            .map(|item| normalize_single(association, item))
            .collect(),
        Value::Object(map) if map.contains_key(keys.id_key()) => {
            Ok(vec![AttributeMap::from(map.clone())])
        }
        Value::Object(map) => map
            .values()
            .map(|item| normalize_single(association, item))
            .collect(),
        other => Err(shape_error(association, other)),
    }
}

/// Accept one attribute map
///
/// # Errors
///
/// `InvalidInputShape` if the input is not a map.
pub fn normalize_single(association: &str, input: &Value) -> Result<AttributeMap> {
    match input {
        Value::Object(map) => Ok(AttributeMap::from(map.clone())),
        other => Err(shape_error(association, other)),
    }
}

fn shape_error(association: &str, value: &Value) -> NestedAttributesError {
    NestedAttributesError::InvalidInputShape {
        association: association.to_string(),
        actual_type: type_name(value).to_string(),
        actual: value.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
