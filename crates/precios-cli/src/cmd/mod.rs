pub mod categories;
pub mod consolidate;
pub mod crawl;
pub mod merge;
