//! This module is responsible for getting analyzed frames out of the session
//! and into whatever wants them (logs, files, the network).

use tracing::debug;

use crate::{
    frame::CsiFrame,
    monitoring::Monitor,
    session::CaptureSession,
    stats::{self, FrameStatistics},
};

/// Destination for consumed frames. `stats` is `None` for frames with no subcarriers.
pub trait FrameSink {
    fn accept(&mut self, frame: &CsiFrame, stats: Option<&FrameStatistics>);
}

impl<F> FrameSink for F
where
    F: FnMut(&CsiFrame, Option<&FrameStatistics>),
{
    fn accept(&mut self, frame: &CsiFrame, stats: Option<&FrameStatistics>) {
        self(frame, stats)
    }
}

/// Poll up to `max` frames, analyze each and hand it to `sink`.
/// Returns how many frames were drained; 0 means the ring was empty.
pub fn drain<S: FrameSink + ?Sized>(session: &CaptureSession, sink: &mut S, max: usize) -> usize {
    let mut drained = 0;
    while drained < max {
        let frame = match session.poll() {
            Some(frame) => frame,
            None => break,
        };
        let stats = stats::analyze(&frame);
        sink.accept(&frame, stats.as_ref());
        drained += 1;
    }
    drained
}

/// Logs every frame at debug level and keeps the running aggregates
#[derive(Debug, Default)]
pub struct LogSink {
    monitor: Monitor,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }
}

impl FrameSink for LogSink {
    fn accept(&mut self, frame: &CsiFrame, stats: Option<&FrameStatistics>) {
        self.monitor.record(frame, stats);
        match stats {
            Some(s) => debug!(
                timestamp_us = frame.timestamp_us(),
                mac = %frame.source_mac(),
                rssi = frame.rssi(),
                mcs = frame.mcs(),
                channel = frame.channel(),
                subcarriers = s.subcarrier_count,
                mean = format_args!("{:.2}", s.mean),
                min = format_args!("{:.2}", s.min),
                max = format_args!("{:.2}", s.max),
                std = format_args!("{:.2}", s.std_dev),
                "CSI frame"
            ),
            None => debug!(
                timestamp_us = frame.timestamp_us(),
                mac = %frame.source_mac(),
                rssi = frame.rssi(),
                "CSI frame without subcarriers"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RawFrame;

    fn raw(ts: u64, samples: Vec<i8>) -> RawFrame {
        RawFrame {
            timestamp_us: ts,
            samples,
            ..Default::default()
        }
    }

    #[test]
    fn test_drain_respects_max() {
        let session = CaptureSession::default();
        session.enable(8).unwrap();
        for ts in 0..5 {
            session.ingest(raw(ts, vec![1, 0])).unwrap();
        }
        let mut seen = Vec::new();
        let mut sink = |f: &CsiFrame, _: Option<&FrameStatistics>| seen.push(f.timestamp_us());
        assert_eq!(drain(&session, &mut sink, 3), 3);
        assert_eq!(drain(&session, &mut sink, 3), 2);
        assert_eq!(drain(&session, &mut sink, 3), 0);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_log_sink_feeds_monitor() {
        let session = CaptureSession::default();
        session.enable(8).unwrap();
        session.ingest(raw(0, vec![3, 4])).unwrap();
        session.ingest(raw(1, vec![])).unwrap();
        let mut sink = LogSink::new();
        assert_eq!(drain(&session, &mut sink, 16), 2);
        assert_eq!(sink.monitor().frames(), 2);
        assert_eq!(sink.monitor().empty_frames(), 1);
    }
}
