use thiserror::Error;

/// A query expression the evaluator could not run.
///
/// Evaluators never report "no match" as an error; this is raised only for
/// expressions they cannot parse.
#[derive(Debug, Error)]
#[error("invalid query `{expression}`: {source}")]
pub struct QueryError {
    /// The expression as written in the specification
    pub expression: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl QueryError {
    pub fn new(
        expression: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        QueryError {
            expression: expression.into(),
            source: source.into(),
        }
    }
}

/// Errors that can occur while loading a specification or transforming a document.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A query expression failed to evaluate
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The configured query trigger is not a valid regular expression
    #[error("invalid query trigger pattern: {0}")]
    Trigger(#[from] regex::Error),

    /// Specification or document text is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A specification file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A custom handler node reported a failure
    #[error("custom handler failed: {0}")]
    Custom(String),
}
