//! Runs the runtime statistics collector as a standalone process.

use std::process::ExitCode;

use clap::Parser;
use runstats::cli::RunstatsArgs;

/// Report runtime statistics of this process to statsd at localhost:8125.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(flatten)]
    runstats: RunstatsArgs,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let guard = match runstats::init(args.runstats.to_config()) {
        Ok(guard) => guard,
        Err(err) => {
            match std::error::Error::source(&err) {
                Some(source) => log::error!("{}: {}", err, source),
                None => log::error!("{}", err),
            }
            return ExitCode::FAILURE;
        }
    };
    log::info!("collecting runtime stats, interrupt to stop");

    // the collector never stops on its own
    guard.detach();
    loop {
        std::thread::park();
    }
}
