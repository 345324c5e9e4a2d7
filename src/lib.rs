//! Reshape JSON documents with declarative JSONPath templates.
//!
//! A specification is a JSON tree describing the output document. Its string
//! leaves are either literals or queries evaluated against the input:
//!
//! ```
//! use jsonpath_transform::{transform, Value};
//! use serde_json::json;
//!
//! let doc = json!({ "some": { "crazy": [{ "example": "A" }, { "example": "B" }] } });
//! let spec = json!({ "foo": ["$.some.crazy", { "bar": "$.example" }, { "merge": true }] });
//!
//! let result = transform(&doc, &spec).unwrap();
//! assert_eq!(result, Value::from(json!({ "foo": { "bar": "B" } })));
//! ```

pub mod cli;
pub mod error;
pub mod output;
pub mod query;
pub mod spec;
pub mod transform;
pub mod value;
pub mod walker;

pub use error::{QueryError, TransformError};
pub use output::{to_json, to_json_pretty};
pub use query::{JsonPathEvaluator, QueryEvaluator};
pub use spec::{ArrayOptions, Key, Spec, SpecNode, Trigger};
pub use transform::{TransformOptions, Transformer, transform};
pub use value::{AbsentPolicy, Value};
pub use walker::Walker;
