//! Desk swap assignment model.

use serde::{Deserialize, Serialize};

/// One person's place in a desk swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAssignment {
    /// The person moving.
    pub name: String,
    /// The person's department.
    pub department: String,
    /// Label of the swap group the person was drawn into.
    pub group: String,
    /// The group member whose place this person takes for the day.
    pub replaces: String,
}
