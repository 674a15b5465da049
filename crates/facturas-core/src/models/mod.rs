//! Data models for the facturas pipeline.

pub mod config;
pub mod record;
