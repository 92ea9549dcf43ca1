//! Foreign function call accounting.

use std::sync::atomic::{AtomicU64, Ordering};

static FOREIGN_CALLS: AtomicU64 = AtomicU64::new(0);

/// Records one call into foreign code.
///
/// Hosts call this at their FFI boundary; the total is reported as
/// `cpu.cgo_calls`.
pub fn record_foreign_call() {
    FOREIGN_CALLS.fetch_add(1, Ordering::Relaxed);
}

/// Runs `f` and records it as one foreign call.
pub fn foreign_call<T, F: FnOnce() -> T>(f: F) -> T {
    record_foreign_call();
    f()
}

/// Number of foreign calls recorded since process start.
pub fn foreign_calls() -> u64 {
    FOREIGN_CALLS.load(Ordering::Relaxed)
}
