//! Core data types for the resolve/fetch/aggregate pipeline.
//!
//! - [`RepoRef`] - A resolved GitHub repository tied back to its PURL
//! - [`ScorecardRecord`] - One OpenSSF Scorecard assessment
//! - [`CheckResult`] - A single per-check sub-score within a record
//! - [`Outcome`] - Per-PURL result, success or failure, never both

mod outcome;
mod repo;
mod scorecard;

pub use outcome::*;
pub use repo::*;
pub use scorecard::*;
