//! Spreadsheet emission.
//!
//! The grouping pipeline hands its [`TabularArtifact`] to a
//! [`SpreadsheetEmitter`] and gets back the bytes of a binary spreadsheet.
//! The CSV rendering lives on the artifact itself
//! ([`TabularArtifact::to_csv`]).

mod command;
mod xlsx;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmitterConfig, EmitterKind};
use crate::error::{EngineError, EngineResult};
use crate::models::TabularArtifact;

pub use command::CommandEmitter;
pub use xlsx::XlsxEmitter;

/// Converts a tabular artifact into a binary spreadsheet.
#[async_trait]
pub trait SpreadsheetEmitter: Send + Sync {
    /// Renders the artifact.
    async fn emit(&self, artifact: &TabularArtifact) -> EngineResult<Vec<u8>>;

    /// File extension of the produced format, without the dot.
    fn extension(&self) -> &'static str;
}

/// Builds the emitter selected in the configuration.
pub fn emitter_for(config: &EmitterConfig) -> EngineResult<Arc<dyn SpreadsheetEmitter>> {
    Ok(match config.kind {
        EmitterKind::Xlsx => Arc::new(XlsxEmitter),
        EmitterKind::Command => {
            let spec = config.command.clone().ok_or_else(|| {
                EngineError::invalid_config(
                    "emitter.command",
                    "required when the command emitter is selected",
                )
            })?;
            Arc::new(CommandEmitter::new(spec))
        }
    })
}
