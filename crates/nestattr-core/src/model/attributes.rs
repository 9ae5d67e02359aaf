use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default identifier control key
pub const ID_KEY: &str = "id";
/// Default destroy-flag control key
pub const DESTROY_KEY: &str = "_destroy";

/// String values the host framework casts to `false`
const FALSE_VALUES: &[&str] = &["0", "f", "F", "false", "FALSE", "off", "OFF"];

/// Whether a value is blank in the host framework's sense
///
/// Blank: `null`, `false`, empty or whitespace-only strings, empty arrays and
/// empty objects. Numbers and `true` are never blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Boolean cast used for the destroy flag
///
/// Blank values cast to `None`; the false-list and numeric zero cast to
/// `Some(false)`; everything else is `Some(true)`.
pub fn cast_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().map_or(true, |f| f != 0.0)),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(!FALSE_VALUES.contains(&s.as_str())),
        other if is_blank(other) => None,
        _ => Some(true),
    }
}

/// Render an identifier-like value as the string used for matching
///
/// Strings are used verbatim, numbers in their canonical form. Anything else
/// falls back to its JSON text so mismatches still surface in errors.
pub fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Control keys that never reach field assignment
///
/// The exact set is a contract of the host entity framework. The identifier
/// and destroy-flag keys are always present; a polymorphic type discriminator
/// can be added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedKeys {
    id: String,
    destroy: String,
    extra: Vec<String>,
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            id: ID_KEY.to_string(),
            destroy: DESTROY_KEY.to_string(),
            extra: Vec::new(),
        }
    }
}

impl ReservedKeys {
    pub fn new(id: impl Into<String>, destroy: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            destroy: destroy.into(),
            extra: Vec::new(),
        }
    }

    /// Add a polymorphic type discriminator key
    pub fn with_type_discriminator(mut self, key: impl Into<String>) -> Self {
        self.extra.push(key.into());
        self
    }

    pub fn id_key(&self) -> &str {
        &self.id
    }

    pub fn destroy_key(&self) -> &str {
        &self.destroy
    }

    pub fn contains(&self, key: &str) -> bool {
        key == self.id || key == self.destroy || self.extra.iter().any(|k| k == key)
    }
}

/// One child's worth of declared attributes
///
/// Keys are plain strings; insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap {
    data: Map<String, Value>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self { data: Map::new() }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw identifier value, blank or not
    pub fn id_value(&self, keys: &ReservedKeys) -> Option<&Value> {
        self.data.get(keys.id_key())
    }

    /// The identifier, if present and not blank
    pub fn id(&self, keys: &ReservedKeys) -> Option<String> {
        self.id_value(keys)
            .filter(|v| !is_blank(v))
            .map(id_string)
    }

    /// Whether the destroy flag is present and casts to true
    pub fn has_destroy_flag(&self, keys: &ReservedKeys) -> bool {
        self.data
            .get(keys.destroy_key())
            .and_then(cast_boolean)
            .unwrap_or(false)
    }

    /// Copy without the reserved control keys
    pub fn assignable(&self, keys: &ReservedKeys) -> AttributeMap {
        let data = self
            .data
            .iter()
            .filter(|(k, _)| !keys.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        AttributeMap { data }
    }

    /// Every non-reserved value is blank (vacuously true when none remain)
    pub fn is_all_blank(&self, keys: &ReservedKeys) -> bool {
        self.data
            .iter()
            .filter(|(k, _)| !keys.contains(k))
            .all(|(_, v)| is_blank(v))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }
}

impl From<Map<String, Value>> for AttributeMap {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl From<AttributeMap> for Value {
    fn from(attrs: AttributeMap) -> Self {
        Value::Object(attrs.data)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
