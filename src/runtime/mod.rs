//! Process backed runtime statistics.
//!
//! [`ProcessStats`] reports what a native process can observe about itself:
//! - concurrency units are the threads of the process
//! - foreign calls are counted through [`record_foreign_call`]
//! - allocator counters come from a registered [`CountingAllocator`], and
//!   from jemalloc with the `jemalloc` feature
//! - operating system memory comes from `/proc/self` on Linux
//!
//! There is no garbage collector in a native process, so all collector
//! counters stay zero.

mod alloc;
mod ffi;

pub use alloc::{snapshot as alloc_snapshot, AllocCounters, AllocSnapshot, CountingAllocator};
pub use ffi::{foreign_call, foreign_calls, record_foreign_call};

use crate::stats::{MemStats, RuntimeStats};

/// Runtime statistics of the current process.
#[derive(Debug)]
pub struct ProcessStats {
    _private: (),
}

impl ProcessStats {
    /// Creates a new process statistics source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for ProcessStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeStats for ProcessStats {
    fn concurrency_units(&self) -> u64 {
        get_thread_count().unwrap_or(0)
    }

    fn foreign_calls(&self) -> u64 {
        foreign_calls()
    }

    fn mem_stats(&self) -> MemStats {
        let mut stats = MemStats::default();

        if let Some(os) = get_os_memory() {
            stats.sys = os.resident;
            stats.stack_sys = os.stack;
            stats.stack_inuse = os.stack;
            stats.heap_sys = os.resident.saturating_sub(os.stack);
        }

        if let Some(counts) = alloc_snapshot() {
            stats.alloc = counts.allocated;
            stats.total_alloc = counts.total_allocated;
            stats.mallocs = counts.mallocs;
            stats.frees = counts.frees;
            stats.heap_alloc = counts.allocated;
            stats.heap_inuse = counts.allocated;
            stats.heap_objects = counts.live_objects();
        }

        #[cfg(all(unix, feature = "jemalloc"))]
        if let Some(je) = get_jemalloc_stats() {
            if stats.alloc == 0 {
                stats.alloc = je.allocated;
            }
            stats.heap_alloc = je.allocated;
            stats.heap_inuse = je.active;
            stats.heap_sys = je.mapped;
            stats.heap_released = je.retained;
            stats.mspan_inuse = je.metadata;
            stats.mspan_sys = je.metadata;
        }

        stats.heap_idle = stats.heap_sys.saturating_sub(stats.heap_inuse);
        stats.other_sys = stats
            .sys
            .saturating_sub(stats.heap_sys)
            .saturating_sub(stats.stack_sys)
            .saturating_sub(stats.mspan_sys);
        stats
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct OsMemory {
    resident: u64,
    stack: u64,
}

/// Gets the number of threads in the current process.
#[cfg(target_os = "linux")]
fn get_thread_count() -> Option<u64> {
    let entries = std::fs::read_dir("/proc/self/task").ok()?;
    Some(entries.count() as u64)
}

/// Fallback for platforms without `/proc`.
#[cfg(not(target_os = "linux"))]
fn get_thread_count() -> Option<u64> {
    None
}

/// Gets resident and stack memory in bytes.
#[cfg(target_os = "linux")]
fn get_os_memory() -> Option<OsMemory> {
    use std::fs;

    // Format: size resident shared text lib data dt, in pages
    let statm = fs::read_to_string("/proc/self/statm").ok()?;
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    let page_size = u64::try_from(page_size).ok()?;

    let status = fs::read_to_string("/proc/self/status").unwrap_or_default();
    let stack = parse_status_kb(&status, "VmStk:").unwrap_or(0) * 1024;

    Some(OsMemory {
        resident: resident_pages * page_size,
        stack,
    })
}

/// Fallback for platforms without `/proc`.
#[cfg(not(target_os = "linux"))]
fn get_os_memory() -> Option<OsMemory> {
    None
}

/// Parses a `Key:   1234 kB` line from `/proc/self/status`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status_kb(status: &str, key: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

#[cfg(all(unix, feature = "jemalloc"))]
struct JemallocStats {
    allocated: u64,
    active: u64,
    mapped: u64,
    retained: u64,
    metadata: u64,
}

/// Gets jemalloc memory statistics.
#[cfg(all(unix, feature = "jemalloc"))]
fn get_jemalloc_stats() -> Option<JemallocStats> {
    use tikv_jemalloc_ctl::{epoch, stats};

    // Advance the epoch to get fresh stats
    epoch::advance().ok()?;

    Some(JemallocStats {
        allocated: stats::allocated::read().ok()? as u64,
        active: stats::active::read().ok()? as u64,
        mapped: stats::mapped::read().ok()? as u64,
        retained: stats::retained::read().ok()? as u64,
        metadata: stats::metadata::read().ok()? as u64,
    })
}
