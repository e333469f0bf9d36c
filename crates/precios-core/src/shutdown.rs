//! Cooperative shutdown flag.
//!
//! Workers poll [`is_shutdown_requested`] between pages and drain without
//! starting new work once it is set, so finalized output files stay intact.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// The process-wide flag, for registering signal handlers against.
pub fn shutdown_flag() -> &'static AtomicBool {
    &SHUTDOWN
}

pub fn is_shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
