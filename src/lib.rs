//! Coffee team builder.
//!
//! This crate logs in to an HR service, fetches the user directory and the
//! coming week's short leaves, drops everybody who is excluded or absent too
//! often, and draws the rest into small random teams. The result is exported
//! as CSV and as a spreadsheet and served over a small HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod emit;
pub mod error;
pub mod grouping;
pub mod hr;
pub mod models;
pub mod pipeline;
pub mod roster;

mod process;
