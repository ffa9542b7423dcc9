//! This module contains the producer side of the pipeline

// The capture thread does one thing, as fast as it can: take frames from
// the radio driver and hand them to the session. Everything else happens
// on the consumer side of the ring.

use std::{
    f64::consts::TAU,
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    error::IngestError,
    frame::{Bandwidth, MacAddress, RawFrame, RxControl, SignalMode},
    session::CaptureSession,
};

/// Anything that can hand us raw frames. `None` means the source is exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<RawFrame>;
}

impl<I: Iterator<Item = RawFrame>> FrameSource for I {
    fn next_frame(&mut self) -> Option<RawFrame> {
        self.next()
    }
}

/// What happened to the frames a source offered
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSummary {
    pub offered: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub malformed: u64,
}

/// Push frames from `source` into `session` until the source runs dry or the
/// session is disabled. `pace` optionally sleeps between frames.
pub fn run_capture<S: FrameSource>(
    session: &CaptureSession,
    mut source: S,
    pace: Option<Duration>,
) -> CaptureSummary {
    let mut summary = CaptureSummary::default();
    while let Some(raw) = source.next_frame() {
        summary.offered += 1;
        match session.ingest(raw) {
            Ok(()) => summary.accepted += 1,
            Err(IngestError::CapacityDrop) => summary.dropped += 1,
            Err(IngestError::Malformed(_)) => summary.malformed += 1,
            Err(IngestError::NotActive) => {
                summary.dropped += 1;
                info!("Capture session disabled, stopping producer");
                return summary;
            }
        }
        if let Some(pace) = pace {
            thread::sleep(pace);
        }
    }
    debug!(offered = summary.offered, "Frame source exhausted");
    summary
}

/// Deterministic stand-in for a radio: every subcarrier carries a slowly
/// rotating tone whose amplitude ripples across the band.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    start: Instant,
    emitted: u64,
    limit: Option<u64>,
    subcarriers: usize,
    malformed_every: Option<u64>,
    channel: u8,
    mac: MacAddress,
}

impl SyntheticSource {
    pub fn new(subcarriers: usize) -> Self {
        Self {
            start: Instant::now(),
            emitted: 0,
            limit: None,
            subcarriers,
            malformed_every: None,
            channel: 1,
            mac: MacAddress([0x02, 0x00, 0x00, 0xc5, 0x1c, 0x00]),
        }
    }

    /// Stop after `frames` frames
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Truncate every `n`th frame to an odd sample count
    pub fn with_malformed_every(mut self, n: u64) -> Self {
        self.malformed_every = (n > 0).then_some(n);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    fn samples(&self, t: f64) -> Vec<i8> {
        let n = self.subcarriers.max(1) as f64;
        let mut samples = Vec::with_capacity(self.subcarriers * 2);
        for k in 0..self.subcarriers {
            let k = k as f64;
            let amp = 40.0 + 20.0 * (TAU * k / n + 0.1 * t).sin();
            let phase = 0.3 * k + 0.05 * t;
            samples.push((amp * phase.cos()).round() as i8);
            samples.push((amp * phase.sin()).round() as i8);
        }
        samples
    }
}

impl Iterator for SyntheticSource {
    type Item = RawFrame;

    fn next(&mut self) -> Option<RawFrame> {
        if self.limit.map_or(false, |limit| self.emitted >= limit) {
            return None;
        }
        let t = self.emitted as f64;
        self.emitted += 1;
        let mut samples = self.samples(t);
        if self
            .malformed_every
            .map_or(false, |n| self.emitted % n == 0)
        {
            samples.pop();
        }
        Some(RawFrame {
            timestamp_us: self.start.elapsed().as_micros() as u64,
            rssi: -40 - (self.emitted % 20) as i8,
            rate: 11,
            mcs: (self.emitted % 8) as u8,
            channel: self.channel,
            bandwidth: Bandwidth::Ht20,
            source_mac: self.mac,
            rx: RxControl {
                sig_mode: SignalMode::Ht,
                noise_floor: -92,
                ..Default::default()
            },
            samples,
        })
    }
}
