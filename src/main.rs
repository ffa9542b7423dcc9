use std::{error::Error, sync::Arc, thread, time::Duration};

use clap::Parser;
use crossbeam_channel::{bounded, select, tick};
use csi_slurper::{
    capture::{run_capture, SyntheticSource},
    exfil::{drain, LogSink},
    CaptureConfig, CaptureSession,
};
use tracing::info;

mod args;

// How many frames the consumer pulls per wakeup
const DRAIN_BATCH: usize = 64;
// Consumer backoff when the ring is empty
const IDLE_SLEEP: Duration = Duration::from_micros(500);

fn main() -> Result<(), Box<dyn Error>> {
    let args = args::Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args::convert_filter(args.verbose.log_level_filter()))
        .init();

    let config = CaptureConfig::default()
        .with_buffer_capacity(args.capacity)
        .with_max_samples(args.max_samples);
    let session = Arc::new(CaptureSession::new(config));
    session.enable_default()?;

    // Forward Ctrl-C into the consumer loop
    let (sd_s, sd_r) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = sd_s.try_send(());
    })?;

    // Start the producer on its own thread, standing in for the radio driver
    let mut source = SyntheticSource::new(args.subcarriers).with_channel(6);
    if let Some(n) = args.frames {
        source = source.with_limit(n);
    }
    if let Some(n) = args.malformed_every {
        source = source.with_malformed_every(n);
    }
    let pace = (args.rate > 0.0).then(|| Duration::from_secs_f64(1.0 / args.rate));
    let producer_session = session.clone();
    let producer = thread::spawn(move || run_capture(&producer_session, source, pace));

    let mut sink = LogSink::new();
    let report = tick(Duration::from_secs(args.report_secs));
    loop {
        select! {
            recv(sd_r) -> _ => {
                info!("Interrupted, stopping capture");
                break;
            }
            recv(report) -> _ => sink.monitor().report(&session.stats()),
            default => {
                if drain(&session, &mut sink, DRAIN_BATCH) == 0 {
                    if producer.is_finished() {
                        break;
                    }
                    thread::sleep(IDLE_SLEEP);
                }
            }
        }
    }

    // Disabling is what stops the producer; anything still buffered gets drained after
    session.disable()?;
    let summary = producer
        .join()
        .map_err(|_| "capture thread panicked")?;
    while drain(&session, &mut sink, DRAIN_BATCH) > 0 {}
    info!(
        offered = summary.offered,
        accepted = summary.accepted,
        dropped = summary.dropped,
        malformed = summary.malformed,
        "Producer finished"
    );
    sink.monitor().report(&session.stats());
    Ok(())
}
