use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    error::TransformError,
    query::{JsonPathEvaluator, QueryEvaluator},
    spec::{DEFAULT_TRIGGER, Key, Spec, SpecNode, Trigger},
    value::{AbsentPolicy, Value},
    walker::{ROOT_SLOT, Walker},
};

/// Settings shared by the library entry points and the `jpt` binary.
///
/// Options deserialize from JSON; missing fields keep their defaults.
///
/// ```json
/// { "trigger": "^\\$", "absent": "omit" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Regular expression marking specification strings and keys as queries
    pub trigger: String,
    /// How absent values render when the result is converted to JSON
    pub absent: AbsentPolicy,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            trigger: DEFAULT_TRIGGER.to_string(),
            absent: AbsentPolicy::default(),
        }
    }
}

impl TransformOptions {
    /// Load options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn trigger(&self) -> Result<Trigger, TransformError> {
        Trigger::new(&self.trigger)
    }
}

/// Reshapes documents according to specifications.
///
/// A `Transformer` holds only its query evaluator, so one instance can serve
/// any number of transforms, concurrently when the evaluator is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct Transformer<E = JsonPathEvaluator> {
    walker: Walker<E>,
}

impl Transformer<JsonPathEvaluator> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: QueryEvaluator> Transformer<E> {
    /// Use a custom query evaluator.
    pub fn with_evaluator(evaluator: E) -> Self {
        Transformer {
            walker: Walker::new(evaluator),
        }
    }

    /// Transform `document` into the shape described by `spec`.
    ///
    /// The root is always walked as an object. When the specification root is
    /// anything other than an object mapping, its value lands in a
    /// placeholder slot which is returned directly, so a bare query yields a
    /// scalar and a top-level array specification yields an array.
    ///
    /// Only the result is wrapped for an array document with an array
    /// specification. Queries still address the document itself, so select
    /// the elements of a root array with `$[*]`: `["$[*].a"]` over
    /// `[{"a": 1}, {"a": 2}]` yields `[1, 2]`, while `["$.a"]` matches nothing
    /// and yields `[]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonpath_transform::{Spec, Transformer, Value};
    /// use serde_json::json;
    ///
    /// let doc = json!({ "some": { "crazy": [{ "example": "A" }, { "example": "B" }] } });
    /// let spec = Spec::from_json(&json!({ "foo": ["$.some.crazy", { "bar": "$.example" }] }));
    ///
    /// let result = Transformer::new().transform(&doc, &spec).unwrap();
    /// assert_eq!(result, Value::from(json!({ "foo": [{ "bar": "A" }, { "bar": "B" }] })));
    /// ```
    pub fn transform(&self, document: &JsonValue, spec: &Spec) -> Result<Value, TransformError> {
        let root = spec.root();
        let mut result = Value::object();

        if document.is_array() && spec.is_sequence_root() {
            debug!("array document with array specification, wrapping root");
            let slot = Key::Name(ROOT_SLOT.to_string());
            self.walker.walk(document, root, &mut result, Some(&slot))?;
            return Ok(unwrap_root(result).unwrap_or_else(|| Value::Array(Vec::new())));
        }

        self.walker.walk(document, root, &mut result, None)?;
        if matches!(root, SpecNode::Object(_)) {
            return Ok(result);
        }
        Ok(unwrap_root(result).unwrap_or_else(Value::object))
    }
}

/// Take the placeholder slot out of a root container that holds nothing else.
fn unwrap_root(result: Value) -> Option<Value> {
    match result {
        Value::Object(mut map) if map.len() == 1 => map.shift_remove(ROOT_SLOT),
        _ => None,
    }
}

/// Transform `document` with a JSON specification, using the default query
/// trigger and JSONPath evaluator.
///
/// # Examples
///
/// ```
/// use jsonpath_transform::{transform, Value};
/// use serde_json::json;
///
/// let result = transform(&json!({ "a": 1 }), &json!({ "x": "$.a", "y": "$.missing" })).unwrap();
/// assert_eq!(result.get("x"), Some(&Value::from(json!(1))));
/// assert_eq!(result.get("y"), Some(&Value::Absent));
/// ```
pub fn transform(document: &JsonValue, spec: &JsonValue) -> Result<Value, TransformError> {
    Transformer::new().transform(document, &Spec::from_json(spec))
}
