//! Partitioning of the eligible roster into coffee teams.
//!
//! Every algorithm implements [`GroupingStrategy`], so the pipeline does not
//! care whether teams are drawn in-process or by an external program:
//!
//! - [`RandomPartition`]: uniform shuffle, then a bucketed split
//! - [`DepartmentSpread`]: spreads colleagues of one department over teams
//! - [`CommandGrouping`]: delegates to an external command
//!
//! The in-process strategies share the same sizing rule: `n` employees and a
//! target size `s` give `max(1, n / s)` teams whose sizes differ by at most
//! one, labelled `1`, `2`, ... in order.
//!
//! [`SwapPlanner`] reuses the department spread to draw desk swaps.

mod command;
mod department;
mod random;
mod swap;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{GroupingConfig, GroupingStrategyKind};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Team};

pub use command::CommandGrouping;
pub use department::DepartmentSpread;
pub use random::RandomPartition;
pub use swap::SwapPlanner;

/// An algorithm assigning every employee to exactly one team.
#[async_trait]
pub trait GroupingStrategy: Send + Sync {
    /// Partitions `employees` into teams of about `team_size`.
    ///
    /// No employees yields no teams. A zero `team_size` is an
    /// [`EngineError::InvalidConfiguration`].
    async fn partition(&self, employees: &[Employee], team_size: usize) -> EngineResult<Vec<Team>>;
}

/// Builds the strategy selected in the configuration.
pub fn strategy_for(config: &GroupingConfig) -> EngineResult<Arc<dyn GroupingStrategy>> {
    Ok(match config.strategy {
        GroupingStrategyKind::Random => Arc::new(RandomPartition),
        GroupingStrategyKind::DepartmentSpread => Arc::new(DepartmentSpread),
        GroupingStrategyKind::Command => {
            let spec = config.command.clone().ok_or_else(|| {
                EngineError::invalid_config(
                    "grouping.command",
                    "required when the command strategy is selected",
                )
            })?;
            Arc::new(CommandGrouping::new(spec))
        }
    })
}

/// Number of teams for `employee_count` people at `team_size` per team.
///
/// # Example
///
/// ```
/// use coffee_teams::grouping::team_count;
///
/// assert_eq!(team_count(9, 3).unwrap(), 3);
/// assert_eq!(team_count(2, 3).unwrap(), 1);
/// assert_eq!(team_count(0, 3).unwrap(), 0);
/// assert!(team_count(5, 0).is_err());
/// ```
pub fn team_count(employee_count: usize, team_size: usize) -> EngineResult<usize> {
    if team_size == 0 {
        return Err(EngineError::invalid_config(
            "team_size",
            "must be at least 1",
        ));
    }
    if employee_count == 0 {
        return Ok(0);
    }
    Ok((employee_count / team_size).max(1))
}

fn empty_teams(count: usize) -> Vec<Team> {
    (1..=count).map(|number| Team::new(number.to_string())).collect()
}

/// Cuts `ordered` into `count` contiguous runs, the first `len % count`
/// runs taking one extra member.
fn split_contiguous(ordered: Vec<Employee>, count: usize) -> Vec<Team> {
    let mut teams = empty_teams(count);
    if count == 0 {
        return teams;
    }
    let base = ordered.len() / count;
    let extra = ordered.len() % count;

    let mut members = ordered.into_iter();
    for (index, team) in teams.iter_mut().enumerate() {
        let size = base + usize::from(index < extra);
        team.members.extend(members.by_ref().take(size));
    }
    teams
}

/// Deals `ordered` round-robin: member `i` goes to team `i % count`.
fn deal_round_robin(ordered: Vec<Employee>, count: usize) -> Vec<Team> {
    let mut teams = empty_teams(count);
    if count == 0 {
        return teams;
    }
    for (index, employee) in ordered.into_iter().enumerate() {
        teams[index % count].members.push(employee);
    }
    teams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(size: usize) -> Vec<Employee> {
        (0..size)
            .map(|i| Employee::named(format!("emp_{:02}", i), 0))
            .collect()
    }

    fn sizes(teams: &[Team]) -> Vec<usize> {
        teams.iter().map(Team::len).collect()
    }

    #[test]
    fn test_team_count_clamps_to_one() {
        assert_eq!(team_count(1, 3).unwrap(), 1);
        assert_eq!(team_count(5, 3).unwrap(), 1);
        assert_eq!(team_count(6, 3).unwrap(), 2);
        assert_eq!(team_count(11, 3).unwrap(), 3);
    }

    #[test]
    fn test_team_count_rejects_zero_size() {
        match team_count(4, 0) {
            Err(EngineError::InvalidConfiguration { field, .. }) => assert_eq!(field, "team_size"),
            other => panic!("Expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_split_contiguous_front_loads_extra_members() {
        let teams = split_contiguous(roster(11), 3);
        assert_eq!(sizes(&teams), vec![4, 4, 3]);
        assert_eq!(teams[0].members[0].name, "emp_00");
        assert_eq!(teams[2].members[2].name, "emp_10");
    }

    #[test]
    fn test_deal_round_robin_alternates() {
        let teams = deal_round_robin(roster(5), 2);
        assert_eq!(sizes(&teams), vec![3, 2]);
        let first: Vec<&str> = teams[0].member_names().collect();
        assert_eq!(first, vec!["emp_00", "emp_02", "emp_04"]);
    }

    #[test]
    fn test_labels_are_sequential() {
        let teams = split_contiguous(roster(9), 3);
        let labels: Vec<&str> = teams.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_strategy_for_command_without_spec_is_invalid() {
        let config = GroupingConfig {
            strategy: GroupingStrategyKind::Command,
            ..GroupingConfig::default()
        };
        assert!(matches!(
            strategy_for(&config),
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }
}
