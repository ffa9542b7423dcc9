//! In this module, we implement the monitoring logic for the capture pipeline.
//! This keeps running aggregates over the frames the consumer has analyzed
//! and reports them, together with the session's drop and throughput
//! counters, through tracing.

use tracing::info;

use crate::{
    frame::CsiFrame,
    session::SessionStats,
    stats::{FrameStatistics, RunningStats},
};

#[derive(Debug, Default, Clone)]
pub struct Monitor {
    frames: u64,
    empty_frames: u64,
    rssi: RunningStats,
    mean_amplitude: RunningStats,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one consumed frame (and its statistics, if it had any subcarriers) into the aggregates
    pub fn record(&mut self, frame: &CsiFrame, stats: Option<&FrameStatistics>) {
        self.frames += 1;
        self.rssi.push(frame.rssi() as f64);
        match stats {
            Some(s) => self.mean_amplitude.push(s.mean),
            None => self.empty_frames += 1,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn empty_frames(&self) -> u64 {
        self.empty_frames
    }

    pub fn rssi(&self) -> &RunningStats {
        &self.rssi
    }

    pub fn mean_amplitude(&self) -> &RunningStats {
        &self.mean_amplitude
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self, session: &SessionStats) {
        info!(
            state = ?session.state,
            captured = session.frames_captured,
            dropped = session.frames_dropped,
            malformed = session.frames_malformed,
            available = session.available,
            capacity = session.capacity,
            throughput = format_args!("{:.1} frames/s", session.throughput()),
            analyzed = self.frames,
            empty = self.empty_frames,
            rssi = format_args!("{:.1}", self.rssi.mean().unwrap_or(f64::NAN)),
            amplitude = format_args!(
                "{:.2} ± {:.2}",
                self.mean_amplitude.mean().unwrap_or(f64::NAN),
                self.mean_amplitude.std_dev().unwrap_or(f64::NAN)
            ),
            "Capture status"
        );
    }
}
