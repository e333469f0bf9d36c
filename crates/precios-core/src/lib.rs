//! Precios Core - Common infrastructure for price data pipelines
//!
//! This crate provides reusable components for fetching, partitioning,
//! and storing retail price-transparency data.

pub mod error;
pub mod http;
pub mod logging;
pub mod partition;
pub mod progress;
pub mod shutdown;
pub mod sink;
pub mod work_queue;

// Re-exports for convenience
pub use error::FetchError;
pub use http::{SHARED_RUNTIME, http_client};
pub use logging::{IndicatifLogger, init_logging};
pub use partition::{PartitionRange, Shard};
pub use progress::{ProgressContext, SharedProgress};
pub use shutdown::{is_shutdown_requested, shutdown_flag};
pub use sink::{CsvSink, cleanup_tmp_files};
pub use work_queue::WorkQueue;
