//! Grouping delegated to an external command.
//!
//! The command receives the roster as CSV on stdin (`name,department` header
//! plus one row per employee) and the environment variables
//! `COFFEE_TEAM_SIZE` and `COFFEE_TEAM_COUNT`. It answers with CSV rows
//! `label,name` on stdout, optionally preceded by a `label,name` header.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::CommandSpec;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Team};
use crate::process::run_with_input;

use super::{GroupingStrategy, team_count};

/// Runs an external program to compute the teams.
#[derive(Debug, Clone)]
pub struct CommandGrouping {
    spec: CommandSpec,
}

impl CommandGrouping {
    /// Creates a strategy running `spec`.
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl GroupingStrategy for CommandGrouping {
    async fn partition(&self, employees: &[Employee], team_size: usize) -> EngineResult<Vec<Team>> {
        let count = team_count(employees.len(), team_size)?;
        if employees.is_empty() {
            return Ok(Vec::new());
        }

        let input = roster_csv(employees)?;
        let envs = [
            ("COFFEE_TEAM_SIZE", team_size.to_string()),
            ("COFFEE_TEAM_COUNT", count.to_string()),
        ];
        let output = run_with_input(&self.spec, &envs, input)
            .await
            .map_err(|e| EngineError::GroupingBackendError {
                diagnostic: format!("failed to run '{}': {}", self.spec.program, e),
            })?;

        if !output.status.success() {
            warn!(
                program = %self.spec.program,
                status = %output.status,
                "grouping command failed"
            );
            return Err(EngineError::GroupingBackendError {
                diagnostic: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let teams = parse_assignments(employees, &output.stdout)?;
        debug!(program = %self.spec.program, teams = teams.len(), "grouping command succeeded");
        Ok(teams)
    }
}

fn roster_csv(employees: &[Employee]) -> EngineResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut write = |record: [&str; 2]| {
        writer
            .write_record(record)
            .map_err(|e| EngineError::ArtifactError {
                message: e.to_string(),
            })
    };
    write(["name", "department"])?;
    for employee in employees {
        write([employee.name.as_str(), employee.department.as_str()])?;
    }
    writer.into_inner().map_err(|e| EngineError::ArtifactError {
        message: e.to_string(),
    })
}

/// Turns `label,name` rows into teams, in order of first appearance.
///
/// Every employee must be assigned exactly once and every name must be
/// known; otherwise the raw output is returned as the diagnostic.
fn parse_assignments(employees: &[Employee], stdout: &[u8]) -> EngineResult<Vec<Team>> {
    let malformed = |reason: String| EngineError::GroupingBackendError {
        diagnostic: format!("{}\n{}", reason, String::from_utf8_lossy(stdout)),
    };

    let by_name: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.name.as_str(), e)).collect();
    let mut assigned: HashSet<&str> = HashSet::new();
    let mut teams: Vec<Team> = Vec::new();
    let mut team_index: HashMap<String, usize> = HashMap::new();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(stdout);
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| malformed(format!("invalid CSV output: {}", e)))?;
        let (label, name) = match (record.get(0), record.get(1), record.len()) {
            (Some(label), Some(name), 2) => (label.trim(), name.trim()),
            _ => {
                return Err(malformed(format!(
                    "line {}: expected 'label,name', got {} fields",
                    line + 1,
                    record.len()
                )));
            }
        };
        if line == 0 && label == "label" && name == "name" {
            continue;
        }

        let employee = by_name
            .get(name)
            .ok_or_else(|| malformed(format!("line {}: unknown employee '{}'", line + 1, name)))?;
        if !assigned.insert(employee.name.as_str()) {
            return Err(malformed(format!(
                "line {}: '{}' assigned twice",
                line + 1,
                name
            )));
        }

        let index = *team_index.entry(label.to_string()).or_insert_with(|| {
            teams.push(Team::new(label));
            teams.len() - 1
        });
        teams[index].members.push((*employee).clone());
    }

    if assigned.len() != employees.len() {
        let missing: Vec<&str> = employees
            .iter()
            .map(|e| e.name.as_str())
            .filter(|name| !assigned.contains(name))
            .collect();
        return Err(malformed(format!("unassigned employees: {}", missing.join(", "))));
    }

    Ok(teams)
}
