//! Built-in metric collectors.
//!
//! Each collector turns one group of runtime counters into gauge samples:
//! - CPU statistics (`cpu.*`)
//! - Memory and garbage collector statistics (`mem.*`)

mod cpu;
mod memory;

pub use cpu::CpuCollector;
pub use memory::MemoryCollector;

use crate::protocol::Sample;
use crate::stats::RuntimeStats;

/// Trait for metric collectors.
///
/// A collector reads the counters it needs from a [`RuntimeStats`] source and
/// returns them as samples named by their leaf (`mem.heap.inuse`), in a
/// fixed order.
pub trait MetricCollector: Send + Sync + 'static {
    /// Collect samples for one cycle.
    fn collect(&self, stats: &dyn RuntimeStats) -> Vec<Sample>;

    /// Name of this collector for debugging and logging.
    fn name(&self) -> &'static str;
}
