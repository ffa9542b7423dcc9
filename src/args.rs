//! Argument parsing for running from the command line

use clap::Parser;
use csi_slurper::config::MAX_BUFFER_CAPACITY;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Ring buffer capacity (frames)
    #[clap(short, long, default_value_t = 128, value_parser = valid_capacity)]
    pub capacity: usize,
    /// Frames with more I/Q samples than this are rejected
    #[clap(short, long, default_value_t = 128)]
    pub max_samples: usize,
    /// Subcarriers per synthetic frame
    #[clap(short, long, default_value_t = 64)]
    pub subcarriers: usize,
    /// Stop after this many frames (runs until Ctrl-C otherwise)
    #[clap(short, long)]
    pub frames: Option<u64>,
    /// Producer frame rate in Hz, 0 to push as fast as possible
    #[clap(short, long, default_value_t = 100.0)]
    pub rate: f64,
    /// Corrupt every Nth synthetic frame
    #[clap(long)]
    pub malformed_every: Option<u64>,
    /// Seconds between status reports
    #[clap(long, default_value_t = 1)]
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    pub report_secs: u64,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

/// Match verbosity filter with tracing subscriber log levels
pub fn convert_filter(filter: log::LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    match filter {
        log::LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
        log::LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        log::LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    }
}

fn valid_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if (1..=MAX_BUFFER_CAPACITY).contains(&n) => Ok(n),
        _ => Err(format!("capacity must be between 1 and {MAX_BUFFER_CAPACITY}")),
    }
}
