//! Capture configuration

use crate::error::SessionError;

/// Default ring capacity (frames)
pub const DEFAULT_BUFFER_CAPACITY: usize = 128;
/// Largest ring we'll allocate
pub const MAX_BUFFER_CAPACITY: usize = 1024;
/// HT20 with 64 subcarriers, two samples (I, Q) each
pub const DEFAULT_MAX_SAMPLES: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Ring capacity used by [`CaptureSession::enable_default`](crate::session::CaptureSession::enable_default)
    pub buffer_capacity: usize,
    /// Frames carrying more samples than this are rejected as malformed
    pub max_samples: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl CaptureConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }
}

/// Check a requested ring capacity against `1..=MAX_BUFFER_CAPACITY`
pub fn check_capacity(requested: usize) -> Result<usize, SessionError> {
    if (1..=MAX_BUFFER_CAPACITY).contains(&requested) {
        Ok(requested)
    } else {
        Err(SessionError::InvalidCapacity {
            requested,
            max: MAX_BUFFER_CAPACITY,
        })
    }
}
