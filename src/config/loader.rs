//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type, which reads an optional YAML
//! file and then applies overrides from environment variables.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

use super::types::{GroupingStrategyKind, LoginFlowKind, ServiceConfig, parse_exclusions};

/// Environment variable naming the optional YAML configuration file.
pub const CONFIG_PATH_VAR: &str = "COFFEE_CONFIG";

/// Loads the service configuration.
///
/// Values are resolved in this order, later sources winning:
///
/// 1. built-in defaults
/// 2. the YAML file named by `COFFEE_CONFIG`, if set
/// 3. environment variables
///
/// | Variable | Field |
/// |---|---|
/// | `HR_ADDR` | `hr.base_url` |
/// | `HR_LOGIN` | `hr.login` |
/// | `HR_PASSWORD` | `hr.password` |
/// | `HR_SESSION_COOKIE` | `hr.session_cookie` |
/// | `HR_LOGIN_FLOW` | `hr.login_flow` |
/// | `HR_LEAVE_LEGAL_ENTITY_ID` | `hr.leave_legal_entity_id` |
/// | `LEGAL_ENTITY` | `grouping.legal_entity_filter` |
/// | `COFFEE_EXCLUSION` | `grouping.exclusion_names` (comma-separated) |
/// | `LEAVE_THRESHOLD` | `grouping.leave_threshold` |
/// | `TEAM_SIZE` | `grouping.team_size` |
/// | `GROUPING_STRATEGY` | `grouping.strategy` |
/// | `SWAP_EXCLUSION` | `swap.exclusion_names` (comma-separated) |
/// | `SWAP_LEAVE_THRESHOLD` | `swap.leave_threshold` |
/// | `SWAP_GROUP_SIZE` | `swap.group_size` |
/// | `PORT` | `server.port` |
///
/// # Example
///
/// ```
/// use coffee_teams::config::ConfigLoader;
///
/// let config = ConfigLoader::from_lookup(|key| match key {
///     "HR_ADDR" => Some("https://hr.example".to_string()),
///     "HR_LOGIN" => Some("robot".to_string()),
///     "HR_PASSWORD" => Some("secret".to_string()),
///     "TEAM_SIZE" => Some("4".to_string()),
///     _ => None,
/// })?;
/// assert_eq!(config.grouping.team_size, 4);
/// # Ok::<(), coffee_teams::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the process environment.
    pub fn from_env() -> EngineResult<ServiceConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<ServiceConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR).filter(|path| !path.is_empty()) {
            Some(path) => Self::load_file(path)?,
            None => ServiceConfig::default(),
        };
        Self::apply_overrides(&mut config, &lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and parses a YAML configuration file, without validation.
    pub fn load_file<P: AsRef<Path>>(path: P) -> EngineResult<ServiceConfig> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn apply_overrides<F>(config: &mut ServiceConfig, lookup: &F) -> EngineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HR_ADDR") {
            config.hr.base_url = value;
        }
        if let Some(value) = lookup("HR_LOGIN") {
            config.hr.login = value;
        }
        if let Some(value) = lookup("HR_PASSWORD") {
            config.hr.password = value;
        }
        if let Some(value) = lookup("HR_SESSION_COOKIE") {
            config.hr.session_cookie = value;
        }
        if let Some(value) = lookup("HR_LOGIN_FLOW") {
            config.hr.login_flow = value.parse::<LoginFlowKind>()?;
        }
        if let Some(value) = lookup("HR_LEAVE_LEGAL_ENTITY_ID") {
            config.hr.leave_legal_entity_id = Some(value).filter(|id| !id.is_empty());
        }
        if let Some(value) = lookup("LEGAL_ENTITY") {
            config.grouping.legal_entity_filter = Some(value);
        }
        if let Some(value) = lookup("COFFEE_EXCLUSION") {
            config.grouping.exclusion_names = parse_exclusions(&value);
        }
        if let Some(value) = lookup("LEAVE_THRESHOLD") {
            config.grouping.leave_threshold = parse_number("LEAVE_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("TEAM_SIZE") {
            config.grouping.team_size = parse_number("TEAM_SIZE", &value)?;
        }
        if let Some(value) = lookup("GROUPING_STRATEGY") {
            config.grouping.strategy = value.parse::<GroupingStrategyKind>()?;
        }
        if let Some(value) = lookup("SWAP_EXCLUSION") {
            config.swap.exclusion_names = parse_exclusions(&value);
        }
        if let Some(value) = lookup("SWAP_LEAVE_THRESHOLD") {
            config.swap.leave_threshold = parse_number("SWAP_LEAVE_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("SWAP_GROUP_SIZE") {
            config.swap.group_size = parse_number("SWAP_GROUP_SIZE", &value)?;
        }
        if let Some(value) = lookup("PORT").filter(|port| !port.is_empty()) {
            config.server.port = parse_number("PORT", &value)?;
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(variable: &str, value: &str) -> EngineResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| EngineError::invalid_config(variable, format!("'{}': {}", value, e)))
}
