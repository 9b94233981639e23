//! Spreadsheet conversion through an external converter.

use async_trait::async_trait;
use tracing::warn;

use crate::config::CommandSpec;
use crate::error::{EngineError, EngineResult};
use crate::models::TabularArtifact;
use crate::process::run_with_input;

use super::SpreadsheetEmitter;

/// Pipes the artifact as CSV through a converter and returns its stdout.
///
/// A converter that cannot be started or exits non-zero is an
/// [`EngineError::EmitterError`] carrying its stderr verbatim.
#[derive(Debug, Clone)]
pub struct CommandEmitter {
    spec: CommandSpec,
}

impl CommandEmitter {
    /// Creates an emitter running `spec`.
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl SpreadsheetEmitter for CommandEmitter {
    async fn emit(&self, artifact: &TabularArtifact) -> EngineResult<Vec<u8>> {
        let input = artifact.to_csv()?;
        let envs = [("PYTHONIOENCODING", "utf-8".to_string())];
        let output = run_with_input(&self.spec, &envs, input)
            .await
            .map_err(|e| EngineError::EmitterError {
                diagnostic: format!("failed to run '{}': {}", self.spec.program, e),
            })?;

        if !output.status.success() {
            warn!(
                program = %self.spec.program,
                status = %output.status,
                "spreadsheet converter failed"
            );
            return Err(EngineError::EmitterError {
                diagnostic: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}
