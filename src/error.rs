//! Error types for the capture pipeline

use thiserror::Error;

/// Why a raw frame was refused at ingest. Malformed frames never enter the ring.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedFrame {
    #[error("odd number of I/Q samples ({len})")]
    OddSampleCount { len: usize },
    #[error("{len} samples exceeds the maximum of {max}")]
    TooManySamples { len: usize, max: usize },
    #[error("40 MHz frame without a secondary channel")]
    MissingSecondaryChannel,
}

/// Outcome of a rejected [`ingest`](crate::session::CaptureSession::ingest)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] MalformedFrame),
    /// Ring was full, the newest frame was discarded
    #[error("ring buffer full, frame dropped")]
    CapacityDrop,
    #[error("capture session is not active")]
    NotActive,
}

/// Session state-machine misuse
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("capture session is already active")]
    AlreadyActive,
    #[error("capture session is not active")]
    NotActive,
    #[error("buffer capacity {requested} outside 1..={max}")]
    InvalidCapacity { requested: usize, max: usize },
}
