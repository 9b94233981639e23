//! Core data models for the coffee team builder.
//!
//! This module contains the domain models used throughout the crate.

mod artifact;
mod employee;
mod swap;
mod team;

pub use artifact::{ARTIFACT_HEADER, SWAP_HEADER, TabularArtifact};
pub use employee::{Employee, HrUser, LeaveRecord};
pub use swap::SwapAssignment;
pub use team::Team;
