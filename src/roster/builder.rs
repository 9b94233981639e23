//! Joins directory users with their leaves.

use std::collections::HashMap;

use crate::models::{Employee, HrUser, LeaveRecord};

/// Builds the roster from fetched users and leave records.
///
/// Each user becomes an [`Employee`] whose `short_leave_count` is the number
/// of leave records owned by that name. When `legal_entity_filter` is given,
/// users of any other legal entity are dropped. User order is preserved.
///
/// # Example
///
/// ```
/// use coffee_teams::models::{HrUser, LeaveRecord};
/// use coffee_teams::roster::build_roster;
///
/// let users: Vec<HrUser> = serde_json::from_str(
///     r#"[{"name": "Alice", "department": {"name": "Sales"}, "legalEntity": {"name": "Acme"}}]"#,
/// ).unwrap();
/// let leaves = vec![LeaveRecord::for_owner("Alice"), LeaveRecord::for_owner("Alice")];
///
/// let roster = build_roster(&users, &leaves, None);
/// assert_eq!(roster[0].short_leave_count, 2);
/// ```
pub fn build_roster(
    users: &[HrUser],
    leaves: &[LeaveRecord],
    legal_entity_filter: Option<&str>,
) -> Vec<Employee> {
    let mut leave_counts: HashMap<&str, u32> = HashMap::new();
    for leave in leaves {
        *leave_counts.entry(leave.owner.as_str()).or_insert(0) += 1;
    }

    users
        .iter()
        .filter(|user| legal_entity_filter.is_none_or(|entity| user.legal_entity == entity))
        .map(|user| Employee {
            name: user.name.clone(),
            department: user.department.clone(),
            legal_entity: user.legal_entity.clone(),
            short_leave_count: leave_counts.get(user.name.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, department: &str, legal_entity: &str) -> HrUser {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "department": {"name": department},
            "legalEntity": {"name": legal_entity},
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_leaves_per_owner() {
        let users = vec![
            user("Alice", "Sales", "Acme"),
            user("Bob", "Ops", "Acme"),
        ];
        let leaves = vec![
            LeaveRecord::for_owner("Bob"),
            LeaveRecord::for_owner("Alice"),
            LeaveRecord::for_owner("Bob"),
            LeaveRecord::for_owner("Bob"),
        ];

        let roster = build_roster(&users, &leaves, None);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Alice");
        assert_eq!(roster[0].short_leave_count, 1);
        assert_eq!(roster[1].name, "Bob");
        assert_eq!(roster[1].short_leave_count, 3);
        assert_eq!(roster[1].department, "Ops");
    }

    #[test]
    fn test_user_without_leaves_has_zero() {
        let users = vec![user("Carol", "Sales", "Acme")];
        let roster = build_roster(&users, &[], None);
        assert_eq!(roster[0].short_leave_count, 0);
    }

    #[test]
    fn test_leaves_of_unknown_owners_are_ignored() {
        let users = vec![user("Carol", "Sales", "Acme")];
        let leaves = vec![LeaveRecord::for_owner("Former Employee")];

        let roster = build_roster(&users, &leaves, None);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].short_leave_count, 0);
    }

    #[test]
    fn test_legal_entity_filter_drops_other_entities() {
        let users = vec![
            user("Alice", "Sales", "Acme SAS"),
            user("Bob", "Sales", "Acme GmbH"),
            user("Carol", "Ops", "Acme SAS"),
        ];

        let roster = build_roster(&users, &[], Some("Acme SAS"));

        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
        assert!(roster.iter().all(|e| e.legal_entity == "Acme SAS"));
    }

    #[test]
    fn test_legal_entity_filter_is_exact() {
        let users = vec![user("Alice", "Sales", "acme sas")];
        assert!(build_roster(&users, &[], Some("Acme SAS")).is_empty());
    }
}
