//! Coffee team model.

use serde::{Deserialize, Serialize};

use super::Employee;

/// A labelled group of employees sharing a coffee slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Label unique within one grouping result.
    pub label: String,
    /// Members in assignment order.
    pub members: Vec<Employee>,
}

impl Team {
    /// Creates an empty team with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            members: Vec::new(),
        }
    }

    /// Number of members in the team.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the team has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over member names.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.name.as_str())
    }
}
