//! Memory statistics collector.

use super::MetricCollector;
use crate::protocol::Sample;
use crate::stats::RuntimeStats;

/// Collects memory related statistics from one [`MemStats`] snapshot.
///
/// Metrics collected, in this order:
/// - `mem.alloc`, `mem.total`, `mem.sys`, `mem.lookups`, `mem.malloc`,
///   `mem.frees`
/// - `mem.heap.alloc`, `mem.heap.sys`, `mem.heap.idle`, `mem.heap.inuse`,
///   `mem.heap.released`, `mem.heap.objects`
/// - `mem.stack.inuse`, `mem.stack.sys`, `mem.stack.mspan_inuse`,
///   `mem.stack.mspan_sys`, `mem.stack.mcache_inuse`, `mem.stack.mcache_sys`
/// - `mem.othersys`
///
/// With garbage collector statistics enabled, additionally:
/// - `mem.gc.sys`, `mem.gc.next`, `mem.gc.last`, `mem.gc.pause_total`,
///   `mem.gc.pause`, `mem.gc.count`
///
/// [`MemStats`]: crate::MemStats
#[derive(Debug)]
pub struct MemoryCollector {
    collect_gc: bool,
}

impl MemoryCollector {
    /// Creates a new memory collector.
    pub fn new(collect_gc: bool) -> Self {
        Self { collect_gc }
    }
}

impl MetricCollector for MemoryCollector {
    fn collect(&self, stats: &dyn RuntimeStats) -> Vec<Sample> {
        let m = stats.mem_stats();
        let mut metrics = Vec::with_capacity(if self.collect_gc { 25 } else { 19 });
        let mut gauge = |leaf: &'static str, value: u64| {
            metrics.push(Sample::gauge(leaf, value));
        };

        // General
        gauge("mem.alloc", m.alloc);
        gauge("mem.total", m.total_alloc);
        gauge("mem.sys", m.sys);
        gauge("mem.lookups", m.lookups);
        gauge("mem.malloc", m.mallocs);
        gauge("mem.frees", m.frees);

        // Heap
        gauge("mem.heap.alloc", m.heap_alloc);
        gauge("mem.heap.sys", m.heap_sys);
        gauge("mem.heap.idle", m.heap_idle);
        gauge("mem.heap.inuse", m.heap_inuse);
        gauge("mem.heap.released", m.heap_released);
        gauge("mem.heap.objects", m.heap_objects);

        // Stack
        gauge("mem.stack.inuse", m.stack_inuse);
        gauge("mem.stack.sys", m.stack_sys);
        gauge("mem.stack.mspan_inuse", m.mspan_inuse);
        gauge("mem.stack.mspan_sys", m.mspan_sys);
        gauge("mem.stack.mcache_inuse", m.mcache_inuse);
        gauge("mem.stack.mcache_sys", m.mcache_sys);

        gauge("mem.othersys", m.other_sys);

        if self.collect_gc {
            gauge("mem.gc.sys", m.gc_sys);
            gauge("mem.gc.next", m.next_gc);
            gauge("mem.gc.last", m.last_gc);
            gauge("mem.gc.pause_total", m.pause_total_ns);
            gauge("mem.gc.pause", m.last_pause_ns());
            gauge("mem.gc.count", u64::from(m.num_gc));
        }

        metrics
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
