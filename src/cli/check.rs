//! Inspect how a specification is classified

use super::{CliError, load_spec};
use crate::Trigger;

/// Load a specification and return its outline, one node per line.
pub fn execute_check(spec: &str, trigger: &Trigger) -> Result<String, CliError> {
    let spec = load_spec(spec, trigger)?;
    Ok(spec.to_string())
}
