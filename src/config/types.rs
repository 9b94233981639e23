//! Configuration types for the coffee team builder.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from the YAML configuration file and then overridden from the
//! environment. Every section has defaults so a file may list only what it
//! changes.

use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Default number of short leaves that makes an employee ineligible.
pub const DEFAULT_LEAVE_THRESHOLD: u32 = 4;

/// Default target number of employees per coffee team.
pub const DEFAULT_TEAM_SIZE: usize = 3;

/// Default target number of employees per swap group.
pub const DEFAULT_SWAP_GROUP_SIZE: usize = 3;

/// Default name of the cookie carrying the HR session.
pub const DEFAULT_SESSION_COOKIE: &str = "authToken";

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Connection to the HR service.
    pub hr: HrConfig,
    /// Roster filtering and grouping rules.
    pub grouping: GroupingConfig,
    /// Desk swap rotation.
    pub swap: SwapConfig,
    /// Spreadsheet conversion.
    pub emitter: EmitterConfig,
    /// HTTP listener and artifact store.
    pub server: ServerConfig,
}

impl ServiceConfig {
    /// Checks that required values are present and sensible.
    pub fn validate(&self) -> EngineResult<()> {
        self.hr.validate()?;
        self.grouping.validate()?;
        self.swap.validate()?;
        self.emitter.validate()?;
        if self.server.artifact_capacity == 0 {
            return Err(EngineError::invalid_config(
                "server.artifact_capacity",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Which login sequence to run against the HR service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginFlowKind {
    /// Fetch the login page, harvest its hidden fields, then post.
    #[default]
    Form,
    /// Post the credentials directly.
    Direct,
}

impl FromStr for LoginFlowKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "form" => Ok(LoginFlowKind::Form),
            "direct" => Ok(LoginFlowKind::Direct),
            other => Err(EngineError::invalid_config(
                "hr.login_flow",
                format!("unknown login flow '{}', expected 'form' or 'direct'", other),
            )),
        }
    }
}

/// Connection settings for the HR service.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    /// Base address, e.g. `https://acme.ilucca.net`.
    pub base_url: String,
    /// Login name.
    pub login: String,
    /// Password.
    pub password: String,
    /// Name of the cookie that carries the session.
    pub session_cookie: String,
    /// Login sequence variant.
    pub login_flow: LoginFlowKind,
    /// Restricts the leave query to one legal entity id when set.
    pub leave_legal_entity_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login: String::new(),
            password: String::new(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            login_flow: LoginFlowKind::default(),
            leave_legal_entity_id: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for HrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HrConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("session_cookie", &self.session_cookie)
            .field("login_flow", &self.login_flow)
            .field("leave_legal_entity_id", &self.leave_legal_entity_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HrConfig {
    /// Base address without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("hr.base_url", &self.base_url),
            ("hr.login", &self.login),
            ("hr.password", &self.password),
            ("hr.session_cookie", &self.session_cookie),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::invalid_config(field, "must not be empty"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(EngineError::invalid_config(
                "hr.timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Which grouping algorithm partitions the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategyKind {
    /// Uniform shuffle and bucketed split.
    #[default]
    Random,
    /// Shuffle within departments, then deal departments across teams.
    DepartmentSpread,
    /// Delegate to an external command.
    Command,
}

impl FromStr for GroupingStrategyKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(GroupingStrategyKind::Random),
            "department_spread" => Ok(GroupingStrategyKind::DepartmentSpread),
            "command" => Ok(GroupingStrategyKind::Command),
            other => Err(EngineError::invalid_config(
                "grouping.strategy",
                format!("unknown grouping strategy '{}'", other),
            )),
        }
    }
}

/// An external program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Roster filtering and grouping rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Keep only employees of this legal entity when set and non-empty.
    pub legal_entity_filter: Option<String>,
    /// Names that never take part, matched exactly.
    #[serde(deserialize_with = "deserialize_exclusions")]
    pub exclusion_names: HashSet<String>,
    /// Employees with at least this many short leaves are left out.
    pub leave_threshold: u32,
    /// Target number of employees per team.
    pub team_size: usize,
    /// Partitioning algorithm.
    pub strategy: GroupingStrategyKind,
    /// Delegate used by [`GroupingStrategyKind::Command`].
    pub command: Option<CommandSpec>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            legal_entity_filter: None,
            exclusion_names: HashSet::new(),
            leave_threshold: DEFAULT_LEAVE_THRESHOLD,
            team_size: DEFAULT_TEAM_SIZE,
            strategy: GroupingStrategyKind::default(),
            command: None,
        }
    }
}

impl GroupingConfig {
    /// The legal entity filter, if one is actually set.
    pub fn legal_entity(&self) -> Option<&str> {
        self.legal_entity_filter
            .as_deref()
            .filter(|entity| !entity.is_empty())
    }

    /// Checks the grouping rules for nonsensical values.
    pub fn validate(&self) -> EngineResult<()> {
        if self.team_size == 0 {
            return Err(EngineError::invalid_config(
                "grouping.team_size",
                "must be at least 1",
            ));
        }
        if self.strategy == GroupingStrategyKind::Command && self.command.is_none() {
            return Err(EngineError::invalid_config(
                "grouping.command",
                "required when the command strategy is selected",
            ));
        }
        Ok(())
    }
}

/// Parses a comma-separated exclusion list.
///
/// Entries are trimmed and empty entries dropped, so an empty string
/// excludes nobody.
///
/// # Example
///
/// ```
/// use coffee_teams::config::parse_exclusions;
///
/// let excluded = parse_exclusions("Alice Martin, Bob,,");
/// assert_eq!(excluded.len(), 2);
/// assert!(excluded.contains("Alice Martin"));
/// assert!(excluded.contains("Bob"));
/// ```
pub fn parse_exclusions(raw: &str) -> HashSet<String> {
    normalize_exclusions(raw.split(','))
}

fn normalize_exclusions<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Accepts an exclusion list either as a YAML sequence or as one
/// comma-separated string, normalized like [`parse_exclusions`].
fn deserialize_exclusions<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawExclusions {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<RawExclusions>::deserialize(deserializer)? {
        Some(RawExclusions::List(names)) => normalize_exclusions(names),
        Some(RawExclusions::Joined(raw)) => parse_exclusions(&raw),
        None => HashSet::new(),
    })
}

/// Desk swap rotation rules.
///
/// Half of every department, rounded up, is drawn into the rotation; each
/// group then passes desks round: every member takes the place of the next
/// one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Names that never swap desks, matched exactly.
    #[serde(deserialize_with = "deserialize_exclusions")]
    pub exclusion_names: HashSet<String>,
    /// Employees with at least this many short leaves do not swap.
    pub leave_threshold: u32,
    /// Target number of employees per swap group.
    pub group_size: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            exclusion_names: HashSet::new(),
            leave_threshold: DEFAULT_LEAVE_THRESHOLD,
            group_size: DEFAULT_SWAP_GROUP_SIZE,
        }
    }
}

impl SwapConfig {
    /// Checks the swap rules for nonsensical values.
    pub fn validate(&self) -> EngineResult<()> {
        if self.group_size == 0 {
            return Err(EngineError::invalid_config(
                "swap.group_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Spreadsheet conversion backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    /// Write the workbook in-process.
    #[default]
    Xlsx,
    /// Pipe CSV through an external converter.
    Command,
}

/// Spreadsheet conversion settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Conversion backend.
    pub kind: EmitterKind,
    /// Converter used by [`EmitterKind::Command`].
    pub command: Option<CommandSpec>,
}

impl EmitterConfig {
    fn validate(&self) -> EngineResult<()> {
        if self.kind == EmitterKind::Command && self.command.is_none() {
            return Err(EngineError::invalid_config(
                "emitter.command",
                "required when the command emitter is selected",
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// How many generated files are kept for download. Files of one
    /// request are evicted together, and the newest request is always kept.
    pub artifact_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            artifact_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_defaults() {
        let config = GroupingConfig::default();
        assert_eq!(config.leave_threshold, 4);
        assert_eq!(config.team_size, 3);
        assert_eq!(config.strategy, GroupingStrategyKind::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_team_size_is_invalid() {
        let config = GroupingConfig {
            team_size: 0,
            ..GroupingConfig::default()
        };
        match config.validate() {
            Err(EngineError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "grouping.team_size");
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_command_strategy_requires_command() {
        let config = GroupingConfig {
            strategy: GroupingStrategyKind::Command,
            ..GroupingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_legal_entity_means_no_filter() {
        let config = GroupingConfig {
            legal_entity_filter: Some(String::new()),
            ..GroupingConfig::default()
        };
        assert_eq!(config.legal_entity(), None);
    }

    #[test]
    fn test_parse_exclusions_empty_string_excludes_nobody() {
        assert!(parse_exclusions("").is_empty());
    }

    #[test]
    fn test_parse_exclusions_is_case_sensitive() {
        let excluded = parse_exclusions("bob");
        assert!(!excluded.contains("Bob"));
    }

    #[test]
    fn test_login_flow_from_str() {
        assert_eq!("form".parse::<LoginFlowKind>().unwrap(), LoginFlowKind::Form);
        assert_eq!(
            "DIRECT".parse::<LoginFlowKind>().unwrap(),
            LoginFlowKind::Direct
        );
        assert!("sso".parse::<LoginFlowKind>().is_err());
    }

    #[test]
    fn test_hr_config_debug_redacts_password() {
        let config = HrConfig {
            password: "hunter2".to_string(),
            ..HrConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = HrConfig {
            base_url: "https://hr.example/".to_string(),
            ..HrConfig::default()
        };
        assert_eq!(config.base_url(), "https://hr.example");
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = r#"
grouping:
  team_size: 4
  exclusion_names: [Alice, Bob]
  strategy: department_spread
"#;
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.grouping.team_size, 4);
        assert_eq!(config.grouping.leave_threshold, 4);
        assert_eq!(
            config.grouping.strategy,
            GroupingStrategyKind::DepartmentSpread
        );
        assert!(config.grouping.exclusion_names.contains("Bob"));
        assert_eq!(config.hr.session_cookie, "authToken");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.swap.group_size, 3);
    }

    #[test]
    fn test_yaml_exclusions_are_trimmed_and_blank_entries_dropped() {
        let yaml = r#"
grouping:
  exclusion_names: ["  Alice ", "", "Bob", "   "]
swap:
  exclusion_names: " Carol , ,Dan"
"#;
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.grouping.exclusion_names,
            HashSet::from(["Alice".to_string(), "Bob".to_string()])
        );
        assert_eq!(
            config.swap.exclusion_names,
            HashSet::from(["Carol".to_string(), "Dan".to_string()])
        );
    }

    #[test]
    fn test_null_yaml_exclusions_exclude_nobody() {
        let yaml = "grouping:\n  exclusion_names: ~\n";
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.grouping.exclusion_names.is_empty());
    }

    #[test]
    fn test_zero_swap_group_size_is_invalid() {
        let config = SwapConfig {
            group_size: 0,
            ..SwapConfig::default()
        };
        match config.validate() {
            Err(EngineError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "swap.group_size");
            }
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }
}
