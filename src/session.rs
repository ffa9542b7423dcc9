//! The capture session: lifecycle, counters and throughput around the frame ring.
//!
//! A session is shared (usually behind an `Arc`) between exactly one producer
//! context calling [`CaptureSession::ingest`] and one consumer context calling
//! [`CaptureSession::poll`]. Each ring half sits behind its own lock, and the
//! hot paths only ever `try_lock`, so neither side can stall the other.

use std::{
    sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::{
    config::{check_capacity, CaptureConfig},
    error::{IngestError, SessionError},
    frame::{CsiFrame, RawFrame},
    ring::{self, FrameConsumer, FrameProducer},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Disabled,
    Active,
}

/// Point-in-time snapshot of the session counters
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SessionStats {
    pub state: SessionState,
    /// Ring capacity of the current (or last) enable, 0 if never enabled
    pub capacity: usize,
    /// Frames accepted into the ring
    pub frames_captured: u64,
    /// Frames lost to a full ring or pushed while disabled
    pub frames_dropped: u64,
    /// Frames rejected by validation
    pub frames_malformed: u64,
    /// Frames handed to the consumer
    pub frames_polled: u64,
    pub available: usize,
    /// Time spent active; frozen once disabled
    pub elapsed: Duration,
}

impl SessionStats {
    /// Captured frames per second of active time
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_captured as f64 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    captured: AtomicU64,
    dropped: AtomicU64,
    malformed: AtomicU64,
    polled: AtomicU64,
}

impl Counters {
    fn reset(&self) {
        self.captured.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.malformed.store(0, Ordering::Relaxed);
        self.polled.store(0, Ordering::Relaxed);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Clock {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl Clock {
    fn elapsed(&self) -> Duration {
        match self.started {
            Some(start) => self
                .stopped
                .unwrap_or_else(Instant::now)
                .saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct CaptureSession {
    config: CaptureConfig,
    active: AtomicBool,
    capacity: AtomicUsize,
    producer: Mutex<Option<FrameProducer>>,
    consumer: Mutex<Option<FrameConsumer>>,
    counters: Counters,
    clock: Mutex<Clock>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

impl CaptureSession {
    /// A new session starts disabled with no ring allocated
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            active: AtomicBool::new(false),
            capacity: AtomicUsize::new(0),
            producer: Mutex::new(None),
            consumer: Mutex::new(None),
            counters: Counters::default(),
            clock: Mutex::new(Clock::default()),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.active.load(Ordering::Acquire) {
            SessionState::Active
        } else {
            SessionState::Disabled
        }
    }

    /// Allocate a fresh ring of `capacity` frames, zero every counter and go active.
    /// Anything left in the previous ring is discarded.
    pub fn enable(&self, capacity: usize) -> Result<(), SessionError> {
        let mut producer = self.producer.lock();
        let mut consumer = self.consumer.lock();
        if self.active.load(Ordering::Acquire) {
            return Err(SessionError::AlreadyActive);
        }
        let capacity = check_capacity(capacity)?;
        let (tx, rx) = ring::channel(capacity);
        *producer = Some(tx);
        *consumer = Some(rx);
        self.counters.reset();
        self.capacity.store(capacity, Ordering::Relaxed);
        *self.clock.lock() = Clock {
            started: Some(Instant::now()),
            stopped: None,
        };
        self.active.store(true, Ordering::Release);
        info!(capacity, "CSI capture enabled");
        Ok(())
    }

    /// [`enable`](Self::enable) with the configured default capacity
    pub fn enable_default(&self) -> Result<(), SessionError> {
        self.enable(self.config.buffer_capacity)
    }

    /// Stop accepting frames. Already-buffered frames stay pollable.
    pub fn disable(&self) -> Result<(), SessionError> {
        let mut producer = self.producer.lock();
        if !self.active.swap(false, Ordering::AcqRel) {
            return Err(SessionError::NotActive);
        }
        *producer = None;
        self.clock.lock().stopped = Some(Instant::now());
        info!(
            captured = self.counters.captured.load(Ordering::Relaxed),
            dropped = self.counters.dropped.load(Ordering::Relaxed),
            malformed = self.counters.malformed.load(Ordering::Relaxed),
            "CSI capture disabled"
        );
        Ok(())
    }

    /// Producer entry point. Validates `raw` and queues it without ever blocking.
    pub fn ingest(&self, raw: RawFrame) -> Result<(), IngestError> {
        if !self.active.load(Ordering::Acquire) {
            return Err(self.reject_inactive());
        }
        let frame = raw.validate(self.config.max_samples).map_err(|e| {
            self.counters.malformed.fetch_add(1, Ordering::Relaxed);
            warn!(reason = %e, "Rejected malformed CSI frame");
            IngestError::from(e)
        })?;
        // Only an out-of-contract second producer or a concurrent
        // enable/disable can hold this lock
        let mut guard = match self.producer.try_lock() {
            Some(guard) => guard,
            None => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                debug!("Producer slot busy, frame dropped");
                return Err(IngestError::CapacityDrop);
            }
        };
        let producer = match guard.as_mut() {
            Some(producer) => producer,
            None => return Err(self.reject_inactive()),
        };
        if producer.push(frame) {
            self.counters.captured.fetch_add(1, Ordering::Relaxed);
            Ok(())
        } else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            trace!("Ring full, newest frame dropped");
            Err(IngestError::CapacityDrop)
        }
    }

    fn reject_inactive(&self) -> IngestError {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        trace!("Frame pushed while capture is disabled");
        IngestError::NotActive
    }

    /// Consumer entry point. Oldest buffered frame, if any. Never blocks.
    pub fn poll(&self) -> Option<CsiFrame> {
        let mut consumer = self.consumer.try_lock()?;
        let frame = consumer.as_mut()?.pop()?;
        self.counters.polled.fetch_add(1, Ordering::Relaxed);
        Some(frame)
    }

    /// Frames currently buffered
    pub fn available(&self) -> usize {
        let captured = self.counters.captured.load(Ordering::Relaxed);
        let polled = self.counters.polled.load(Ordering::Relaxed);
        captured.saturating_sub(polled) as usize
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state(),
            capacity: self.capacity.load(Ordering::Relaxed),
            frames_captured: self.counters.captured.load(Ordering::Relaxed),
            frames_dropped: self.counters.dropped.load(Ordering::Relaxed),
            frames_malformed: self.counters.malformed.load(Ordering::Relaxed),
            frames_polled: self.counters.polled.load(Ordering::Relaxed),
            available: self.available(),
            elapsed: self.clock.lock().elapsed(),
        }
    }
}
