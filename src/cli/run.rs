//! Apply a specification to JSON input

use std::path::Path;

use tracing::info;

use super::CliError;
use crate::{Spec, TransformOptions, Transformer, Trigger, output};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to a specification file, or inline specification JSON
    pub spec: String,
    /// JSON input string
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Trigger pattern and absent-value policy
    pub transform: TransformOptions,
}

/// Load a specification given either as a file path or as inline JSON.
///
/// Text that starts like a JSON value is parsed directly; anything else is
/// treated as a path.
pub fn load_spec(spec: &str, trigger: &Trigger) -> Result<Spec, CliError> {
    if looks_inline(spec) {
        let value: serde_json::Value = serde_json::from_str(spec)?;
        return Ok(Spec::with_trigger(&value, trigger));
    }
    info!(path = spec, "reading specification file");
    Ok(Spec::from_path(Path::new(spec), trigger)?)
}

fn looks_inline(spec: &str) -> bool {
    matches!(spec.trim_start().chars().next(), Some('{' | '[' | '"'))
}

/// Execute a run operation, returning the rendered JSON output
pub fn execute_run(options: &RunOptions) -> Result<String, CliError> {
    let trigger = options.transform.trigger()?;
    let spec = load_spec(&options.spec, &trigger)?;

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let document: serde_json::Value = serde_json::from_str(input)?;

    let result = Transformer::new().transform(&document, &spec)?;

    let absent = options.transform.absent;
    Ok(if options.pretty {
        output::to_json_pretty(&result, absent)
    } else {
        output::to_json(&result, absent)
    })
}
