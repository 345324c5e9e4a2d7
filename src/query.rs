//! Query evaluation.
//!
//! The walker never interprets query syntax itself. It hands every query
//! string to a [`QueryEvaluator`] and works with the ordered list of matches
//! that comes back. [`JsonPathEvaluator`] is the default implementation and
//! understands RFC 9535 JSONPath via `serde_json_path`.

use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

use crate::error::QueryError;

/// Evaluates a query expression against a document.
///
/// Implementations must be deterministic and free of side effects. A query
/// that selects nothing returns an empty list; errors are reserved for
/// expressions that cannot be evaluated at all.
pub trait QueryEvaluator {
    fn evaluate<'a>(
        &self,
        document: &'a JsonValue,
        expression: &str,
    ) -> Result<Vec<&'a JsonValue>, QueryError>;
}

/// RFC 9535 JSONPath evaluator.
///
/// # Examples
///
/// ```
/// use jsonpath_transform::query::{JsonPathEvaluator, QueryEvaluator};
/// use serde_json::json;
///
/// let doc = json!({ "items": [{ "id": 1 }, { "id": 2 }] });
/// let matches = JsonPathEvaluator.evaluate(&doc, "$.items[*].id").unwrap();
/// assert_eq!(matches, vec![&json!(1), &json!(2)]);
///
/// assert!(JsonPathEvaluator.evaluate(&doc, "$.missing").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathEvaluator;

impl QueryEvaluator for JsonPathEvaluator {
    fn evaluate<'a>(
        &self,
        document: &'a JsonValue,
        expression: &str,
    ) -> Result<Vec<&'a JsonValue>, QueryError> {
        let path = JsonPath::parse(expression).map_err(|e| QueryError::new(expression, e))?;
        Ok(path.query(document).all())
    }
}

impl<E: QueryEvaluator + ?Sized> QueryEvaluator for &E {
    fn evaluate<'a>(
        &self,
        document: &'a JsonValue,
        expression: &str,
    ) -> Result<Vec<&'a JsonValue>, QueryError> {
        (**self).evaluate(document, expression)
    }
}
