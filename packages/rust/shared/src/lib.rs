//! Shared types, error model, and configuration for the course catalog tools.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`CourseRecord`], [`AcademicTerm`], [`Term`])
//! - Configuration ([`AppConfig`], [`CatalogConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BatchConfig, CatalogConfig, OutputConfig, config_dir, config_file_path,
    current_roc_year, init_config, load_config, load_config_from,
};
pub use error::{CatalogError, ExportViolation, Result};
pub use types::{AcademicTerm, CourseRecord, Term, UNKNOWN};
