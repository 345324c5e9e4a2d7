use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// A node of a transform result.
///
/// This mirrors JSON with one addition: [`Value::Absent`] marks a slot whose
/// query matched nothing. The slot exists in the result tree, it just has no
/// value, which keeps "key present but empty" distinct from both `null` and
/// a missing key.
///
/// Objects preserve insertion order, which follows the declaration order of
/// the specification that built them.
///
/// # Examples
///
/// ```
/// use jsonpath_transform::Value;
/// use serde_json::json;
///
/// let value = Value::from(json!({ "name": "Alice", "tags": ["a", "b"] }));
/// assert_eq!(value.get("name"), Some(&Value::String("Alice".to_string())));
/// assert!(Value::Absent.is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A query that matched nothing
    #[default]
    Absent,

    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Bool(bool),

    /// JSON number, kept in `serde_json`'s lossless representation
    Number(serde_json::Number),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with insertion-ordered keys
    Object(IndexMap<String, Value>),
}

/// How [`Value::Absent`] is rendered when a result is converted to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsentPolicy {
    /// Render absent values as `null`
    #[default]
    Null,
    /// Drop object fields whose value is absent. Array elements and the
    /// root still render as `null` so positions are kept.
    Omit,
}

impl Value {
    /// An empty object, the starting point of every transform.
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Look up a field of an object. Returns `None` for non-objects and
    /// for keys that were never written.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up an element of an array.
    pub fn index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`, rendering absent slots per `policy`.
    pub fn to_json_value(&self, policy: AbsentPolicy) -> JsonValue {
        match self {
            Value::Absent | Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(items) => {
                JsonValue::Array(items.iter().map(|v| v.to_json_value(policy)).collect())
            }
            Value::Object(map) => JsonValue::Object(
                map.iter()
                    .filter(|(_, v)| !(policy == AbsentPolicy::Omit && v.is_absent()))
                    .map(|(k, v)| (k.clone(), v.to_json_value(policy)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            JsonValue::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(v: &JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.clone()),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(arr) => Value::Array(arr.iter().map(Value::from).collect()),
            JsonValue::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
