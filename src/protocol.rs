//! Protocol types for emitted samples.

/// Sample rate used for every gauge; no client side down-sampling happens.
pub const ALWAYS_SAMPLE: f32 = 1.0;

/// A single gauge measurement, ready to be sent to statsd.
///
/// Samples are built fresh every collection cycle and never retained. The
/// host prefix is added by the statsd client when the sample is sent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Metric name below the host prefix, e.g. `mem.heap.inuse`.
    pub name: &'static str,

    /// The gauge value.
    pub value: u64,

    /// Fraction of events that are transmitted.
    pub sample_rate: f32,
}

impl Sample {
    /// Creates a new gauge sample that is always sent.
    pub fn gauge(name: &'static str, value: u64) -> Self {
        Self {
            name,
            value,
            sample_rate: ALWAYS_SAMPLE,
        }
    }
}
