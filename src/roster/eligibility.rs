//! Eligibility rules applied before grouping.

use std::collections::HashSet;

use crate::models::Employee;

/// Returns the employees that may take part in coffee teams.
///
/// An employee is left out when `short_leave_count >= leave_threshold` or
/// when their name is in `exclusions` (exact, case-sensitive). The input is
/// not modified and the relative order of the remaining employees is kept.
pub fn filter_eligible(
    employees: &[Employee],
    exclusions: &HashSet<String>,
    leave_threshold: u32,
) -> Vec<Employee> {
    employees
        .iter()
        .filter(|employee| employee.short_leave_count < leave_threshold)
        .filter(|employee| !exclusions.contains(&employee.name))
        .cloned()
        .collect()
}
