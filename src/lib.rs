//! Background runtime statistics for statsd.
//!
//! This crate periodically samples runtime statistics of the host process and
//! emits them as statsd gauges.
//!
//! # Overview
//!
//! Every collection cycle emits, depending on the configuration:
//! - CPU statistics: active concurrency units and foreign calls
//! - Memory statistics: allocator, heap and stack counters
//! - Garbage collector statistics: collector memory, pauses and counts
//!
//! Metric names have the form `<hostname>.go.<group>.<leaf>`, for example
//! `web-01.go.mem.heap.inuse`. All gauges are sent with a sample rate of 1.0
//! to the statsd collector at `localhost:8125` over UDP.
//!
//! # Usage
//!
//! ```rust,no_run
//! use runstats::RunstatsConfig;
//! use std::time::Duration;
//!
//! let _guard = runstats::init(RunstatsConfig {
//!     interval: Duration::from_secs(10),
//!     ..Default::default()
//! })
//! .expect("unable to connect to statsd");
//! ```
//!
//! The collector runs on a background thread until the returned guard is
//! dropped. Hosts that want it to live for the rest of the process can call
//! [`CollectorGuard::detach`].
//!
//! Sending is best effort: a sample that cannot be sent is logged through the
//! [`log`] facade and the cycle continues.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod collector;
mod config;
mod error;
mod protocol;
mod stats;
mod worker;

pub mod collectors;
pub mod prefix;
pub mod runtime;
pub mod transport;

#[cfg(feature = "cli")]
pub mod cli;

pub use collector::{Collector, CycleReport};
pub use config::{RunstatsConfig, DEFAULT_INTERVAL};
pub use error::Error;
pub use protocol::{Sample, ALWAYS_SAMPLE};
pub use stats::{MemStats, PauseRing, RuntimeStats, PAUSE_RING_SIZE};
pub use worker::{CollectorGuard, Shutdown};

/// Starts collecting runtime statistics of this process in the background.
///
/// Connects to the statsd collector at `localhost:8125`, resolves the metric
/// prefix from the host name and spawns the collection loop. Failing to set up
/// the transport is fatal and returned as [`Error::Connect`]; the caller
/// decides whether to abort.
pub fn init(config: RunstatsConfig) -> Result<CollectorGuard, Error> {
    config.validate()?;
    let sink = transport::connect_udp()?;
    Collector::new(config, sink)?.spawn()
}
