//! JSON text output for transform results.
//!
//! Results render through `serde_json`, keeping object keys in the order the
//! specification declared them. Absent values follow an [`AbsentPolicy`].
//!
//! # Examples
//!
//! ```
//! use jsonpath_transform::{AbsentPolicy, Value};
//! use jsonpath_transform::output::{to_json, to_json_pretty};
//! use serde_json::json;
//!
//! let value = Value::from(json!({ "b": 1, "a": [true] }));
//!
//! assert_eq!(to_json(&value, AbsentPolicy::Null), r#"{"b":1,"a":[true]}"#);
//! assert_eq!(
//!     to_json_pretty(&value, AbsentPolicy::Null),
//!     "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}"
//! );
//! ```

use crate::value::{AbsentPolicy, Value};

/// Compact JSON, no whitespace.
pub fn to_json(value: &Value, absent: AbsentPolicy) -> String {
    value.to_json_value(absent).to_string()
}

/// Pretty-printed JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value, absent: AbsentPolicy) -> String {
    format!("{:#}", value.to_json_value(absent))
}
