//! Desk swap planning.
//!
//! Half of every department (rounded up) is drawn to move for a day. The
//! movers are grouped so departments mix, and inside each group everybody
//! takes the desk of the next member, the last one wrapping to the first.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::EngineResult;
use crate::models::{Employee, SwapAssignment};

use super::DepartmentSpread;

/// Draws desk swaps from an eligible roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapPlanner;

impl SwapPlanner {
    /// Picks `ceil(len / 2)` random members of each department.
    ///
    /// Departments come out in first-seen order.
    pub fn select_participants<R: Rng + ?Sized>(employees: &[Employee], rng: &mut R) -> Vec<Employee> {
        let mut order: Vec<&str> = Vec::new();
        let mut departments: HashMap<&str, Vec<Employee>> = HashMap::new();
        for employee in employees {
            let department = employee.department.as_str();
            departments
                .entry(department)
                .or_insert_with(|| {
                    order.push(department);
                    Vec::new()
                })
                .push(employee.clone());
        }

        order
            .into_iter()
            .filter_map(|department| departments.remove(department))
            .flat_map(|mut members| {
                members.shuffle(rng);
                members.truncate(members.len().div_ceil(2));
                members
            })
            .collect()
    }

    /// Plans a swap using the given random source.
    ///
    /// A group left with a single member has nobody to swap with and yields
    /// no assignment.
    pub fn plan_with<R: Rng + ?Sized>(
        employees: &[Employee],
        group_size: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<SwapAssignment>> {
        let participants = Self::select_participants(employees, rng);
        let groups = DepartmentSpread::partition_with(&participants, group_size, rng)?;

        let mut assignments = Vec::with_capacity(participants.len());
        for group in groups.iter().filter(|group| group.len() > 1) {
            for (index, member) in group.members.iter().enumerate() {
                let next = &group.members[(index + 1) % group.len()];
                assignments.push(SwapAssignment {
                    name: member.name.clone(),
                    department: member.department.clone(),
                    group: group.label.clone(),
                    replaces: next.name.clone(),
                });
            }
        }
        Ok(assignments)
    }

    /// Plans a swap with the thread-local generator.
    pub fn plan(employees: &[Employee], group_size: usize) -> EngineResult<Vec<SwapAssignment>> {
        Self::plan_with(employees, group_size, &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn staff(department: &str, count: usize) -> Vec<Employee> {
        (0..count)
            .map(|i| Employee::named(format!("{}_{}", department, i), 0).in_department(department))
            .collect()
    }

    #[test]
    fn test_half_of_each_department_rounded_up() {
        let mut roster = staff("Sales", 5);
        roster.extend(staff("Ops", 4));
        roster.extend(staff("Tech", 1));

        let picked = SwapPlanner::select_participants(&roster, &mut StdRng::seed_from_u64(3));

        let count = |department: &str| picked.iter().filter(|e| e.department == department).count();
        assert_eq!(count("Sales"), 3);
        assert_eq!(count("Ops"), 2);
        assert_eq!(count("Tech"), 1);
    }

    #[test]
    fn test_each_mover_replaces_the_next_group_member() {
        let mut roster = staff("Sales", 6);
        roster.extend(staff("Ops", 6));

        for seed in 0..10 {
            let swaps = SwapPlanner::plan_with(&roster, 3, &mut StdRng::seed_from_u64(seed)).unwrap();

            assert_eq!(swaps.len(), 6);
            let movers: HashSet<&str> = swaps.iter().map(|s| s.name.as_str()).collect();
            let replaced: HashSet<&str> = swaps.iter().map(|s| s.replaces.as_str()).collect();
            assert_eq!(movers, replaced);
            for swap in &swaps {
                assert_ne!(swap.name, swap.replaces);
                let target = swaps.iter().find(|s| s.name == swap.replaces).unwrap();
                assert_eq!(target.group, swap.group);
            }
        }
    }

    #[test]
    fn test_lone_mover_gets_no_assignment() {
        let swaps = SwapPlanner::plan_with(&staff("Sales", 1), 3, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(swaps.is_empty());
    }

    #[test]
    fn test_zero_group_size_is_invalid() {
        let result = SwapPlanner::plan(&staff("Sales", 4), 0);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration { .. })));
    }
}
