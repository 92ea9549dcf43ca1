//! The collection loop.

use std::panic::RefUnwindSafe;

use cadence::{Gauged, MetricSink, StatsdClient};

use crate::collectors::{CpuCollector, MemoryCollector, MetricCollector};
use crate::config::RunstatsConfig;
use crate::prefix;
use crate::protocol::Sample;
use crate::runtime::ProcessStats;
use crate::stats::RuntimeStats;
use crate::worker::{CollectorGuard, Shutdown};
use crate::Error;

/// Outcome of one collection cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Samples handed to the transport successfully.
    pub sent: usize,
    /// Samples the transport failed to send.
    pub failed: usize,
}

impl CycleReport {
    /// Total number of samples attempted in the cycle.
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// Samples runtime statistics and emits them as statsd gauges.
///
/// The collector exclusively owns a [`StatsdClient`] wrapping its transport.
/// Every cycle emits the enabled metric groups in a fixed order: CPU first,
/// then memory (general, heap, stack, garbage collector).
///
/// # Example
///
/// ```rust,no_run
/// use runstats::{transport, Collector, RunstatsConfig};
///
/// let sink = transport::connect_udp().expect("unable to connect to statsd");
/// let collector = Collector::new(RunstatsConfig::default(), sink).unwrap();
/// let report = collector.run_cycle();
/// assert_eq!(report.failed, 0);
/// ```
pub struct Collector {
    config: RunstatsConfig,
    prefix: String,
    client: StatsdClient,
    stats: Box<dyn RuntimeStats>,
    collectors: Vec<Box<dyn MetricCollector>>,
}

impl Collector {
    /// Creates a collector for the current process.
    ///
    /// The metric prefix is resolved from the host name.
    pub fn new<S>(config: RunstatsConfig, sink: S) -> Result<Self, Error>
    where
        S: MetricSink + Send + Sync + RefUnwindSafe + 'static,
    {
        Self::with_stats(config, sink, ProcessStats::new())
    }

    /// Creates a collector reading from the given statistics source.
    pub fn with_stats<S, R>(config: RunstatsConfig, sink: S, stats: R) -> Result<Self, Error>
    where
        S: MetricSink + Send + Sync + RefUnwindSafe + 'static,
        R: RuntimeStats,
    {
        Self::from_parts(config, prefix::resolve(), sink, stats)
    }

    /// Creates a collector with an explicit metric prefix.
    ///
    /// Every metric is sent as `<prefix>.<leaf>`.
    pub fn from_parts<S, R>(
        config: RunstatsConfig,
        prefix: impl Into<String>,
        sink: S,
        stats: R,
    ) -> Result<Self, Error>
    where
        S: MetricSink + Send + Sync + RefUnwindSafe + 'static,
        R: RuntimeStats,
    {
        config.validate()?;
        let prefix = prefix.into();
        let client = StatsdClient::from_sink(&prefix, sink);
        let collectors = build_collectors(&config);
        Ok(Self {
            config,
            prefix,
            client,
            stats: Box::new(stats),
            collectors,
        })
    }

    /// The configuration this collector was created with.
    pub fn config(&self) -> &RunstatsConfig {
        &self.config
    }

    /// The prefix shared by all emitted metric names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Samples all enabled metric groups without sending anything.
    pub fn collect(&self) -> Vec<Sample> {
        self.collectors
            .iter()
            .flat_map(|collector| collector.collect(self.stats.as_ref()))
            .collect()
    }

    /// Runs one collection cycle: samples and emits every enabled gauge.
    ///
    /// A failed send is logged and counted; the remaining samples of the
    /// cycle are still attempted.
    pub fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        for sample in self.collect() {
            let sent = self
                .client
                .gauge_with_tags(sample.name, sample.value)
                .with_sampling_rate(f64::from(sample.sample_rate))
                .try_send();
            match sent {
                Ok(_) => report.sent += 1,
                Err(err) => {
                    log::warn!("failed to send `{}.{}`: {}", self.prefix, sample.name, err);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Runs collection cycles until `shutdown` is triggered.
    ///
    /// After each cycle the loop sleeps for the configured interval.
    pub fn run(&self, shutdown: &Shutdown) {
        log::debug!(
            "collecting runtime stats every {:?} as `{}`",
            self.config.interval,
            self.prefix
        );
        while !shutdown.is_triggered() {
            let report = self.run_cycle();
            log::trace!("cycle sent {} samples, {} failed", report.sent, report.failed);
            if shutdown.wait_timeout(self.config.interval) {
                break;
            }
        }
        log::debug!("runtime stats collector stopped");
    }

    /// Moves the collector onto its own background thread.
    pub fn spawn(self) -> Result<CollectorGuard, Error> {
        let shutdown = Shutdown::new();
        let worker_shutdown = shutdown.clone();
        let worker = std::thread::Builder::new()
            .name("runstats-collector".into())
            .spawn(move || self.run(&worker_shutdown))
            .map_err(Error::Spawn)?;
        Ok(CollectorGuard::new(shutdown, worker))
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("config", &self.config)
            .field("prefix", &self.prefix)
            .field(
                "collectors",
                &self.collectors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn build_collectors(config: &RunstatsConfig) -> Vec<Box<dyn MetricCollector>> {
    let mut collectors: Vec<Box<dyn MetricCollector>> = Vec::new();

    if config.collect_cpu {
        collectors.push(Box::new(CpuCollector::new()));
    }

    if config.collect_memory {
        collectors.push(Box::new(MemoryCollector::new(config.collect_gc)));
    }

    collectors
}
