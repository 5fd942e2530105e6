//! Candidate profile intake: validation, aggregate assembly, and persistence outcome mapping
//! for the recruiting tool's submission pipeline.

pub mod candidates;
pub mod config;
pub mod error;
pub mod telemetry;
