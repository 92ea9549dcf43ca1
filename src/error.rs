use thiserror::Error;

/// Errors that prevent the collector from starting.
///
/// Once the collector is running there is no error path: failed sends are
/// logged and counted in the [`CycleReport`](crate::CycleReport) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The statsd transport could not be set up.
    #[error("unable to connect to statsd")]
    Connect(#[source] cadence::MetricError),

    /// The configured collection interval was zero.
    #[error("collection interval must be positive")]
    InvalidInterval,

    /// The background collector thread could not be spawned.
    #[error("failed to spawn collector thread")]
    Spawn(#[source] std::io::Error),
}
