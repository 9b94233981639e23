//! Uniformly random partition.

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::EngineResult;
use crate::models::{Employee, Team};

use super::{GroupingStrategy, split_contiguous, team_count};

/// Shuffles the roster uniformly, then cuts it into balanced teams.
///
/// Each call draws from the thread-local generator, which is seeded from the
/// operating system, so identical inputs do not reproduce the same teams.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPartition;

impl RandomPartition {
    /// Partitions using the given random source.
    ///
    /// # Example
    ///
    /// ```
    /// use coffee_teams::grouping::RandomPartition;
    /// use coffee_teams::models::Employee;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let roster: Vec<Employee> = ["Alice", "Bob", "Carol", "Dan", "Eve", "Fay"]
    ///     .into_iter()
    ///     .map(|name| Employee::named(name, 0))
    ///     .collect();
    ///
    /// let teams = RandomPartition::partition_with(&roster, 3, &mut StdRng::seed_from_u64(7)).unwrap();
    /// assert_eq!(teams.len(), 2);
    /// assert!(teams.iter().all(|team| team.len() == 3));
    /// ```
    pub fn partition_with<R: Rng + ?Sized>(
        employees: &[Employee],
        team_size: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<Team>> {
        let count = team_count(employees.len(), team_size)?;
        let mut shuffled = employees.to_vec();
        shuffled.shuffle(rng);
        Ok(split_contiguous(shuffled, count))
    }
}

#[async_trait]
impl GroupingStrategy for RandomPartition {
    async fn partition(&self, employees: &[Employee], team_size: usize) -> EngineResult<Vec<Team>> {
        Self::partition_with(employees, team_size, &mut rand::thread_rng())
    }
}
