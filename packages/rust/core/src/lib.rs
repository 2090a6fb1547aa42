//! Core extraction and ordering logic for the course catalog.
//!
//! This crate turns raw listing rows into classified, team-ordered course
//! records and writes them as CSV (e.g., `run_term`, `run_batch`).

pub mod classifier;
pub mod export;
pub mod parsers;
pub mod pipeline;
pub mod record;
pub mod team;

pub use pipeline::{BatchPolicy, BatchReport, ProgressReporter, SilentProgress, TermReport};
