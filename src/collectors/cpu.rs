//! CPU statistics collector.

use super::MetricCollector;
use crate::protocol::Sample;
use crate::stats::RuntimeStats;

/// Collects CPU related statistics.
///
/// Metrics collected:
/// - `cpu.goroutines` - Active concurrency units
/// - `cpu.cgo_calls` - Foreign function calls since process start
#[derive(Debug, Default)]
pub struct CpuCollector {
    _private: (),
}

impl CpuCollector {
    /// Creates a new CPU collector.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl MetricCollector for CpuCollector {
    fn collect(&self, stats: &dyn RuntimeStats) -> Vec<Sample> {
        vec![
            Sample::gauge("cpu.goroutines", stats.concurrency_units()),
            Sample::gauge("cpu.cgo_calls", stats.foreign_calls()),
        ]
    }

    fn name(&self) -> &'static str {
        "cpu"
    }
}
