//! Configuration for runtime statistics collection.

use std::time::Duration;

use crate::Error;

/// Default pause between two collection cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the runtime statistics collector.
///
/// The configuration is read once when the collector is created and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunstatsConfig {
    /// How long to pause between two collection cycles.
    ///
    /// Default: 10 seconds
    pub interval: Duration,

    /// Enable CPU statistics.
    ///
    /// Collects: `cpu.goroutines`, `cpu.cgo_calls`
    ///
    /// Default: true
    pub collect_cpu: bool,

    /// Enable memory statistics.
    ///
    /// Collects the general, `mem.heap.*` and `mem.stack.*` gauges as well as
    /// `mem.othersys`.
    ///
    /// Default: true
    pub collect_memory: bool,

    /// Enable garbage collector statistics.
    ///
    /// Collects the `mem.gc.*` gauges. Only honored when
    /// [`collect_memory`](Self::collect_memory) is enabled as well.
    ///
    /// Default: true
    pub collect_gc: bool,
}

impl Default for RunstatsConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            collect_cpu: true,
            collect_memory: true,
            collect_gc: true,
        }
    }
}

impl RunstatsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pause between collection cycles.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enables or disables CPU statistics.
    #[must_use]
    pub fn with_cpu_stats(mut self, enabled: bool) -> Self {
        self.collect_cpu = enabled;
        self
    }

    /// Enables or disables memory statistics.
    #[must_use]
    pub fn with_memory_stats(mut self, enabled: bool) -> Self {
        self.collect_memory = enabled;
        self
    }

    /// Enables or disables garbage collector statistics.
    #[must_use]
    pub fn with_gc_stats(mut self, enabled: bool) -> Self {
        self.collect_gc = enabled;
        self
    }

    /// Returns whether the `mem.gc.*` gauges are emitted.
    pub fn gc_enabled(&self) -> bool {
        self.collect_memory && self.collect_gc
    }

    /// Checks that the configuration can drive a collector.
    pub fn validate(&self) -> Result<(), Error> {
        if self.interval.is_zero() {
            return Err(Error::InvalidInterval);
        }
        Ok(())
    }
}
