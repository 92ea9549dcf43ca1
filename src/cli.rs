//! Command line flags.
//!
//! **Feature:** `cli` (*enabled by default*)
//!
//! [`RunstatsArgs`] can be flattened into a host's own clap parser:
//!
//! ```rust
//! use clap::Parser;
//! use runstats::cli::RunstatsArgs;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     runstats: RunstatsArgs,
//! }
//!
//! let args = Args::parse_from(["host", "--pause", "5", "--gc", "false"]);
//! let config = args.runstats.to_config();
//! assert!(!config.collect_gc);
//! ```

use std::time::Duration;

use clap::{ArgAction, Args};

use crate::config::RunstatsConfig;

/// The runtime statistics startup flags.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct RunstatsArgs {
    /// Collection pause interval in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub pause: u64,

    /// Collect CPU statistics
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub cpu: bool,

    /// Collect memory statistics
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub mem: bool,

    /// Collect GC statistics (requires memory be enabled)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub gc: bool,
}

impl RunstatsArgs {
    /// Converts the flags into a collector configuration.
    pub fn to_config(&self) -> RunstatsConfig {
        RunstatsConfig::new()
            .with_interval(Duration::from_secs(self.pause))
            .with_cpu_stats(self.cpu)
            .with_memory_stats(self.mem)
            .with_gc_stats(self.gc)
    }
}
