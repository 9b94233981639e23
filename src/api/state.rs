//! Application state for the coffee team API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{GroupingConfig, ServiceConfig, SwapConfig};
use crate::emit::{SpreadsheetEmitter, emitter_for};
use crate::error::EngineResult;
use crate::pipeline::GroupingPipeline;

use super::store::ArtifactStore;

/// Shared application state.
///
/// Holds the grouping pipeline, the emitter, the grouping and desk swap
/// parameters every request runs with, and the store of generated files.
#[derive(Clone)]
pub struct AppState {
    pipeline: GroupingPipeline,
    emitter: Arc<dyn SpreadsheetEmitter>,
    grouping: Arc<GroupingConfig>,
    swap: Arc<SwapConfig>,
    store: Arc<ArtifactStore>,
}

impl AppState {
    /// Creates a new application state from its parts, with default desk
    /// swap rules.
    pub fn new(
        pipeline: GroupingPipeline,
        emitter: Arc<dyn SpreadsheetEmitter>,
        grouping: GroupingConfig,
        store: ArtifactStore,
    ) -> Self {
        Self {
            pipeline,
            emitter,
            grouping: Arc::new(grouping),
            swap: Arc::new(SwapConfig::default()),
            store: Arc::new(store),
        }
    }

    /// Replaces the desk swap rules.
    pub fn with_swap(mut self, swap: SwapConfig) -> Self {
        self.swap = Arc::new(swap);
        self
    }

    /// Wires the HR client, strategy, emitter, and store from configuration.
    pub fn from_config(config: &ServiceConfig) -> EngineResult<Self> {
        let pipeline = GroupingPipeline::from_config(config)?;
        let emitter = emitter_for(&config.emitter)?;
        Ok(Self::new(
            pipeline,
            emitter,
            config.grouping.clone(),
            ArtifactStore::new(config.server.artifact_capacity),
        )
        .with_swap(config.swap.clone()))
    }

    /// The grouping pipeline.
    pub fn pipeline(&self) -> &GroupingPipeline {
        &self.pipeline
    }

    /// The spreadsheet emitter.
    pub fn emitter(&self) -> &dyn SpreadsheetEmitter {
        self.emitter.as_ref()
    }

    /// Grouping parameters applied to every request.
    pub fn grouping(&self) -> &GroupingConfig {
        &self.grouping
    }

    /// Desk swap rules applied to every swap request.
    pub fn swap(&self) -> &SwapConfig {
        &self.swap
    }

    /// The artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}
