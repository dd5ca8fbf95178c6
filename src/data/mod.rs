//! Data layer for the Store/Record architecture
//!
//! This module holds the in-memory table model and every transformation
//! that runs over it. All cell values are text; numeric coercion only
//! happens inside `column_stats` and `query_engine::sort_numeric`.

// Core model
pub mod error;
pub mod record;
pub mod store;

// Delimited text in/out
pub mod csv_exporter;
pub mod csv_loader;
pub mod text_encoding;

// Transformations
pub mod column_stats;
pub mod join;
pub mod query_engine;

// Semistructured export/import
pub mod json_bridge;
