//! Core library for the facturas invoice-report pipeline.
//!
//! This crate provides:
//! - Vision-model extraction of structured invoice fields from photos
//! - Presence-based per-image result caching
//! - Merging of cached results into a single ordered snapshot
//! - Flattening of variable-shape results into tabular records
//! - Spreadsheet report emission with highlighted key columns

pub mod cache;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod merge;
pub mod models;
pub mod report;
pub mod scan;

pub use error::{FacturasError, Result};
pub use extract::{Extractor, VisionExtractor};
pub use merge::MERGED_SNAPSHOT_FILENAME;
pub use models::config::FacturasConfig;
pub use models::record::{ExtractionResult, FlatRecord, PurchasedProduct, SnapshotEntry};
pub use report::REPORT_FILENAME;
