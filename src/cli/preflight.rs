//! Pre-flight checks before paid operations.
//!
//! Validates that required API keys are configured before starting
//! operations that would otherwise fail midway.

use crate::error::{AskTubeError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Processing needs the transcript API and embeddings.
    Process,
    /// Asking/summarizing needs embeddings and the LLM.
    Ask,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Process => {
            check_env_key("OPENAI_API_KEY")?;
            check_env_key("RAPIDAPI_KEY")?;
        }
        Operation::Ask => {
            check_env_key("OPENAI_API_KEY")?;
        }
    }
    Ok(())
}

/// Check that an environment variable holds a non-empty API key.
fn check_env_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        _ => Err(AskTubeError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        let result = check_env_key("ASKTUBE_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert!(matches!(result, Err(AskTubeError::Config(_))));
    }
}
