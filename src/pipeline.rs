//! The end-to-end grouping operation.
//!
//! [`GroupingPipeline::produce_grouping`] fetches users and leaves
//! concurrently, builds and filters the roster, partitions it, and lays the
//! teams out as a [`TabularArtifact`]. [`GroupingPipeline::produce_swaps`]
//! runs the same fetch with the desk swap rules. Nothing is retained between
//! calls.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{GroupingConfig, ServiceConfig, SwapConfig};
use crate::error::{EngineError, EngineResult};
use crate::grouping::{GroupingStrategy, SwapPlanner, strategy_for};
use crate::hr::{HrClient, HrDirectory};
use crate::models::{Employee, TabularArtifact};
use crate::roster::{build_roster, filter_eligible};

/// Fetch, filter, and group, wired to a directory and a strategy.
#[derive(Clone)]
pub struct GroupingPipeline {
    directory: Arc<dyn HrDirectory>,
    strategy: Arc<dyn GroupingStrategy>,
}

impl GroupingPipeline {
    /// Creates a pipeline from its two collaborators.
    pub fn new(directory: Arc<dyn HrDirectory>, strategy: Arc<dyn GroupingStrategy>) -> Self {
        Self {
            directory,
            strategy,
        }
    }

    /// Wires the HR client and grouping strategy described by `config`.
    pub fn from_config(config: &ServiceConfig) -> EngineResult<Self> {
        let directory = Arc::new(HrClient::new(&config.hr)?);
        let strategy = strategy_for(&config.grouping)?;
        Ok(Self::new(directory, strategy))
    }

    /// Produces a fresh grouping.
    ///
    /// Users and leaves are fetched concurrently; the first failure is
    /// returned and the other fetch is dropped, so the roster is only ever
    /// built from two complete results. Errors propagate unchanged.
    pub async fn produce_grouping(&self, config: &GroupingConfig) -> EngineResult<TabularArtifact> {
        if config.team_size == 0 {
            return Err(EngineError::invalid_config(
                "grouping.team_size",
                "must be at least 1",
            ));
        }

        let roster = self.fetch_roster(config.legal_entity()).await?;
        let eligible = filter_eligible(&roster, &config.exclusion_names, config.leave_threshold);
        info!(
            roster = roster.len(),
            eligible = eligible.len(),
            team_size = config.team_size,
            "roster filtered"
        );

        let teams = self.strategy.partition(&eligible, config.team_size).await?;
        info!(teams = teams.len(), "teams drawn");

        Ok(TabularArtifact::from_teams(&teams))
    }

    /// Produces a fresh desk swap.
    ///
    /// The roster is fetched and scoped to the legal entity exactly as for
    /// a grouping, then filtered with the swap exclusions and threshold.
    pub async fn produce_swaps(
        &self,
        grouping: &GroupingConfig,
        swap: &SwapConfig,
    ) -> EngineResult<TabularArtifact> {
        if swap.group_size == 0 {
            return Err(EngineError::invalid_config(
                "swap.group_size",
                "must be at least 1",
            ));
        }

        let roster = self.fetch_roster(grouping.legal_entity()).await?;
        let eligible = filter_eligible(&roster, &swap.exclusion_names, swap.leave_threshold);
        let assignments = SwapPlanner::plan(&eligible, swap.group_size)?;
        info!(
            roster = roster.len(),
            eligible = eligible.len(),
            movers = assignments.len(),
            "desk swap drawn"
        );

        Ok(TabularArtifact::from_swaps(&assignments))
    }

    /// Fetches users and leaves concurrently and joins them.
    ///
    /// The first failure is returned and the other fetch is dropped.
    async fn fetch_roster(&self, legal_entity: Option<&str>) -> EngineResult<Vec<Employee>> {
        let (users, leaves) = tokio::try_join!(
            self.directory.fetch_users(),
            self.directory.fetch_leaves()
        )?;
        debug!(users = users.len(), leaves = leaves.len(), "fetched HR data");
        Ok(build_roster(&users, &leaves, legal_entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::RandomPartition;
    use crate::models::{Employee, HrUser, LeaveRecord, Team};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeDirectory {
        users: Vec<HrUser>,
        leaves: Vec<LeaveRecord>,
        fail_users: bool,
        fail_leaves: bool,
    }

    fn user(name: &str, department: &str) -> HrUser {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "department": {"name": department},
            "legalEntity": {"name": "Acme"},
        }))
        .unwrap()
    }

    fn leaves_for(name: &str, count: usize) -> Vec<LeaveRecord> {
        vec![LeaveRecord::for_owner(name); count]
    }

    #[async_trait]
    impl HrDirectory for FakeDirectory {
        async fn fetch_users(&self) -> EngineResult<Vec<HrUser>> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail_users {
                return Err(EngineError::UpstreamError {
                    url: "/api/v3/users".to_string(),
                    status: 500,
                    body: "users down".to_string(),
                });
            }
            Ok(self.users.clone())
        }

        async fn fetch_leaves(&self) -> EngineResult<Vec<LeaveRecord>> {
            if self.fail_leaves {
                return Err(EngineError::DecodeError {
                    url: "/api/v3/leaves".to_string(),
                    message: "expected value".to_string(),
                });
            }
            Ok(self.leaves.clone())
        }
    }

    struct CountingStrategy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GroupingStrategy for CountingStrategy {
        async fn partition(&self, employees: &[Employee], _team_size: usize) -> EngineResult<Vec<Team>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut team = Team::new("1");
            team.members.extend(employees.iter().cloned());
            Ok(vec![team])
        }
    }

    fn pipeline(directory: FakeDirectory) -> GroupingPipeline {
        GroupingPipeline::new(Arc::new(directory), Arc::new(RandomPartition))
    }

    fn names(artifact: &TabularArtifact) -> HashSet<String> {
        artifact.rows().iter().map(|row| row[0].clone()).collect()
    }

    #[tokio::test]
    async fn test_scenario_leave_threshold_and_single_team() {
        let mut leaves = leaves_for("Bob", 1);
        leaves.extend(leaves_for("Carol", 5));
        let directory = FakeDirectory {
            users: vec![user("Alice", "Sales"), user("Bob", "Ops"), user("Carol", "Ops")],
            leaves,
            ..FakeDirectory::default()
        };

        let artifact = pipeline(directory)
            .produce_grouping(&GroupingConfig::default())
            .await
            .unwrap();

        assert_eq!(
            names(&artifact),
            HashSet::from(["Alice".to_string(), "Bob".to_string()])
        );
        assert!(artifact.rows().iter().all(|row| row[1] == "1"));
    }

    #[tokio::test]
    async fn test_scenario_nine_employees_three_teams() {
        let directory = FakeDirectory {
            users: (0..9).map(|i| user(&format!("emp_{}", i), "Sales")).collect(),
            ..FakeDirectory::default()
        };

        let artifact = pipeline(directory)
            .produce_grouping(&GroupingConfig::default())
            .await
            .unwrap();

        assert_eq!(names(&artifact).len(), 9);
        for label in ["1", "2", "3"] {
            let size = artifact.rows().iter().filter(|row| row[1] == label).count();
            assert_eq!(size, 3, "team {}", label);
        }
    }

    #[tokio::test]
    async fn test_scenario_excluded_name_is_absent() {
        let directory = FakeDirectory {
            users: vec![user("Alice", "Sales"), user("Bob", "Ops")],
            ..FakeDirectory::default()
        };
        let config = GroupingConfig {
            exclusion_names: HashSet::from(["Bob".to_string()]),
            ..GroupingConfig::default()
        };

        let artifact = pipeline(directory).produce_grouping(&config).await.unwrap();
        assert_eq!(names(&artifact), HashSet::from(["Alice".to_string()]));
    }

    #[tokio::test]
    async fn test_failed_leave_fetch_never_reaches_grouping() {
        let strategy = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
        });
        let directory = FakeDirectory {
            users: vec![user("Alice", "Sales")],
            fail_leaves: true,
            ..FakeDirectory::default()
        };
        let pipeline = GroupingPipeline::new(Arc::new(directory), strategy.clone());

        let result = pipeline.produce_grouping(&GroupingConfig::default()).await;

        assert!(matches!(result, Err(EngineError::DecodeError { .. })));
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_user_fetch_is_reported() {
        let strategy = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
        });
        let directory = FakeDirectory {
            fail_users: true,
            ..FakeDirectory::default()
        };
        let pipeline = GroupingPipeline::new(Arc::new(directory), strategy.clone());

        match pipeline.produce_grouping(&GroupingConfig::default()).await {
            Err(EngineError::UpstreamError { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "users down");
            }
            other => panic!("Expected UpstreamError, got {:?}", other),
        }
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_team_size_fails_before_fetching() {
        let directory = FakeDirectory {
            fail_users: true,
            fail_leaves: true,
            ..FakeDirectory::default()
        };
        let config = GroupingConfig {
            team_size: 0,
            ..GroupingConfig::default()
        };

        let result = pipeline(directory).produce_grouping(&config).await;
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_everybody_filtered_yields_header_only() {
        let directory = FakeDirectory {
            users: vec![user("Alice", "Sales")],
            leaves: leaves_for("Alice", 4),
            ..FakeDirectory::default()
        };

        let artifact = pipeline(directory)
            .produce_grouping(&GroupingConfig::default())
            .await
            .unwrap();
        assert!(artifact.rows().is_empty());
        assert_eq!(artifact.header().len(), 3);
    }

    #[tokio::test]
    async fn test_swaps_use_their_own_exclusions() {
        let directory = FakeDirectory {
            users: vec![
                user("Alice", "Sales"),
                user("Bob", "Ops"),
                user("Carol", "Tech"),
                user("Dan", "Tech"),
            ],
            leaves: leaves_for("Dan", 4),
            ..FakeDirectory::default()
        };
        let grouping = GroupingConfig {
            exclusion_names: HashSet::from(["Alice".to_string()]),
            ..GroupingConfig::default()
        };
        let swap = SwapConfig {
            exclusion_names: HashSet::from(["Bob".to_string()]),
            ..SwapConfig::default()
        };

        let artifact = pipeline(directory)
            .produce_swaps(&grouping, &swap)
            .await
            .unwrap();

        // Alice and Carol are the only movers; each takes the other's desk.
        assert_eq!(artifact.header()[2], "replaces");
        assert_eq!(artifact.rows().len(), 2);
        assert_eq!(artifact.rows()[0][0], "Alice");
        assert_eq!(artifact.rows()[0][2], "Carol");
        assert_eq!(artifact.rows()[1][0], "Carol");
        assert_eq!(artifact.rows()[1][2], "Alice");
    }

    #[tokio::test]
    async fn test_zero_swap_group_size_fails_before_fetching() {
        let directory = FakeDirectory {
            fail_users: true,
            ..FakeDirectory::default()
        };
        let swap = SwapConfig {
            group_size: 0,
            ..SwapConfig::default()
        };

        let result = pipeline(directory)
            .produce_swaps(&GroupingConfig::default(), &swap)
            .await;
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }
}
