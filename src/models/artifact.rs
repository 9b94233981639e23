//! Tabular artifact produced from a grouping.
//!
//! The artifact is the hand-off format between the grouping pipeline and the
//! emitters: a header row plus data rows of identical width.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{SwapAssignment, Team};

/// Column names of the exported grouping.
pub const ARTIFACT_HEADER: [&str; 3] = ["name", "coffee team", "team"];

/// Column names of the exported desk swap.
pub const SWAP_HEADER: [&str; 4] = ["name", "team", "replaces", "swap group"];

/// Header row plus fixed-width data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularArtifact {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularArtifact {
    /// Lays out teams one row per member: name, team label, department.
    ///
    /// Rows follow team order, then member order within each team.
    ///
    /// # Example
    ///
    /// ```
    /// use coffee_teams::models::{Employee, TabularArtifact, Team};
    ///
    /// let mut team = Team::new("1");
    /// team.members.push(Employee::named("Alice", 0).in_department("Sales"));
    ///
    /// let artifact = TabularArtifact::from_teams(&[team]);
    /// assert_eq!(artifact.header(), ["name", "coffee team", "team"]);
    /// assert_eq!(artifact.rows()[0], ["Alice", "1", "Sales"]);
    /// ```
    pub fn from_teams(teams: &[Team]) -> Self {
        let rows = teams
            .iter()
            .flat_map(|team| {
                team.members.iter().map(move |member| {
                    vec![
                        member.name.clone(),
                        team.label.clone(),
                        member.department.clone(),
                    ]
                })
            })
            .collect();
        Self::fixed_width(&ARTIFACT_HEADER, rows)
    }

    /// Lays out a desk swap one row per mover: name, department, the person
    /// replaced, swap group. Rows are sorted by name.
    pub fn from_swaps(assignments: &[SwapAssignment]) -> Self {
        let mut sorted: Vec<&SwapAssignment> = assignments.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let rows = sorted
            .into_iter()
            .map(|swap| {
                vec![
                    swap.name.clone(),
                    swap.department.clone(),
                    swap.replaces.clone(),
                    swap.group.clone(),
                ]
            })
            .collect();
        Self::fixed_width(&SWAP_HEADER, rows)
    }

    fn fixed_width(header: &[&str], rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == header.len()));
        Self {
            header: header.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// The header row.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// The data rows, without the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header followed by data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }

    /// Serializes header and rows as comma-separated values.
    pub fn to_csv(&self) -> EngineResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in self.all_rows() {
            writer
                .write_record(row)
                .map_err(|e| EngineError::ArtifactError {
                    message: e.to_string(),
                })?;
        }
        writer.into_inner().map_err(|e| EngineError::ArtifactError {
            message: e.to_string(),
        })
    }
}
