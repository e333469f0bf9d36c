//! Precios Claros crawler
//!
//! This crate walks the Precios Claros listing API: stores, their nested
//! product/price pages, and the category-scoped catalog variant. Extracted
//! records land in per-type CSV files with per-run deduplication.

pub mod api;
pub mod categories;
pub mod config;
pub mod items;
pub mod pipeline;
pub mod quota;
pub mod runner;
pub mod stats;
mod worker;

// Re-exports
pub use api::{ApiClient, ApiSettings};
pub use config::{Config, CrawlArgs};
pub use items::{Item, ItemKind};
pub use runner::run;
pub use stats::CrawlSummary;
