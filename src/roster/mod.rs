//! Roster construction and eligibility filtering.
//!
//! The roster is rebuilt on every request from freshly fetched directory and
//! leave data, then narrowed down to the employees who take part.

mod builder;
mod eligibility;

pub use builder::build_roster;
pub use eligibility::filter_eligible;
