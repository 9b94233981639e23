//! Department-mixing partition.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::EngineResult;
use crate::models::{Employee, Team};

use super::{GroupingStrategy, deal_round_robin, team_count};

/// Random teams that mix departments.
///
/// Employees are shuffled within their department, departments are laid out
/// largest first (ties in random order), and the sequence is dealt
/// round-robin. A department with no more members than there are teams never
/// puts two of its members in the same team. Team count and balance are the
/// same as [`RandomPartition`](super::RandomPartition).
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentSpread;

impl DepartmentSpread {
    /// Partitions using the given random source.
    pub fn partition_with<R: Rng + ?Sized>(
        employees: &[Employee],
        team_size: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<Team>> {
        let count = team_count(employees.len(), team_size)?;

        let mut departments: HashMap<&str, Vec<Employee>> = HashMap::new();
        for employee in employees {
            departments
                .entry(employee.department.as_str())
                .or_default()
                .push(employee.clone());
        }

        let mut departments: Vec<Vec<Employee>> = departments.into_values().collect();
        departments.shuffle(rng);
        departments.sort_by_key(|members| std::cmp::Reverse(members.len()));

        let ordered: Vec<Employee> = departments
            .into_iter()
            .flat_map(|mut members| {
                members.shuffle(rng);
                members
            })
            .collect();

        Ok(deal_round_robin(ordered, count))
    }
}

#[async_trait]
impl GroupingStrategy for DepartmentSpread {
    async fn partition(&self, employees: &[Employee], team_size: usize) -> EngineResult<Vec<Team>> {
        Self::partition_with(employees, team_size, &mut rand::thread_rng())
    }
}
