//! Configuration loading and management for the coffee team builder.
//!
//! This module loads the service configuration from an optional YAML file and
//! the environment: how to reach the HR service, which employees take part,
//! how teams are sized, and how artifacts are emitted.
//!
//! # Example
//!
//! ```no_run
//! use coffee_teams::config::ConfigLoader;
//!
//! let config = ConfigLoader::from_env().unwrap();
//! println!("Team size: {}", config.grouping.team_size);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_VAR, ConfigLoader};
pub use types::{
    CommandSpec, DEFAULT_LEAVE_THRESHOLD, DEFAULT_SESSION_COOKIE, DEFAULT_SWAP_GROUP_SIZE,
    DEFAULT_TEAM_SIZE, EmitterConfig, EmitterKind, GroupingConfig, GroupingStrategyKind,
    HrConfig, LoginFlowKind, ServerConfig, ServiceConfig, SwapConfig, parse_exclusions,
};
