//! Employee model and the HR directory records it is built from.
//!
//! [`HrUser`] and [`LeaveRecord`] mirror what the HR service returns; they
//! decode from the service's nested JSON shape into flat structs. [`Employee`]
//! is the joined per-request model consumed by filtering and grouping.

use serde::{Deserialize, Serialize};

/// Represents an employee eligible for (or filtered out of) coffee teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Display name, unique within a roster.
    pub name: String,
    /// The department the employee belongs to.
    pub department: String,
    /// The legal entity employing this person.
    pub legal_entity: String,
    /// Number of short leaves found for the upcoming week.
    pub short_leave_count: u32,
}

impl Employee {
    /// Creates an employee with no department or legal entity.
    ///
    /// # Examples
    ///
    /// ```
    /// use coffee_teams::models::Employee;
    ///
    /// let alice = Employee::named("Alice", 2);
    /// assert_eq!(alice.name, "Alice");
    /// assert_eq!(alice.short_leave_count, 2);
    /// assert!(alice.department.is_empty());
    /// ```
    pub fn named(name: impl Into<String>, short_leave_count: u32) -> Self {
        Self {
            name: name.into(),
            department: String::new(),
            legal_entity: String::new(),
            short_leave_count,
        }
    }

    /// Returns a copy of this employee assigned to `department`.
    pub fn in_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }
}

/// A user from the HR directory.
///
/// Decodes from `{"name": ..., "department": {"name": ...}, "legalEntity": {"name": ...}}`.
/// A null or missing department or legal entity becomes an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireUser")]
pub struct HrUser {
    /// Display name.
    pub name: String,
    /// Department name.
    pub department: String,
    /// Legal entity name.
    pub legal_entity: String,
}

/// A single short-leave event, attributed to its owner.
///
/// Decodes from `{"leavePeriod": {"owner": {"name": ...}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireLeave")]
pub struct LeaveRecord {
    /// Name of the employee taking the leave.
    pub owner: String,
}

impl LeaveRecord {
    /// Creates a leave record for `owner`.
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    name: String,
    #[serde(default)]
    department: Option<Named>,
    #[serde(default)]
    legal_entity: Option<Named>,
}

impl From<WireUser> for HrUser {
    fn from(wire: WireUser) -> Self {
        HrUser {
            name: wire.name,
            department: wire.department.unwrap_or_default().name,
            legal_entity: wire.legal_entity.unwrap_or_default().name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLeave {
    leave_period: WireLeavePeriod,
}

#[derive(Deserialize)]
struct WireLeavePeriod {
    owner: Named,
}

impl From<WireLeave> for LeaveRecord {
    fn from(wire: WireLeave) -> Self {
        LeaveRecord {
            owner: wire.leave_period.owner.name,
        }
    }
}
