//! Course listing fetcher and table extraction.
//!
//! This crate provides:
//! - [`engine`]: HTTP client for listing pages and the [`ListingSource`] seam
//! - [`listing`]: named-cell extraction of listing rows into [`RawRow`]s

pub mod engine;
pub mod listing;

pub use engine::{CatalogClient, ListingSource};
pub use listing::{CellLabel, RawRow, parse_listing};
