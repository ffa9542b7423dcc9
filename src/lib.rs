//! Capture and analysis of WiFi Channel State Information (CSI) frames.
//!
//! A radio driver pushes raw frames into a [`CaptureSession`] from its own
//! context; application code polls the session, decodes each frame's I/Q
//! samples into amplitude/phase and summarizes them with [`analyze`].

pub mod capture;
pub mod config;
pub mod decode;
pub mod error;
pub mod exfil;
pub mod frame;
pub mod monitoring;
pub mod ring;
pub mod session;
pub mod stats;

pub use config::CaptureConfig;
pub use decode::{amplitudes, phases};
pub use error::{IngestError, MalformedFrame, SessionError};
pub use frame::{Bandwidth, CsiFrame, MacAddress, RawFrame, RxControl, SignalMode};
pub use ring::RingBuffer;
pub use session::{CaptureSession, SessionState, SessionStats};
pub use stats::{analyze, FrameStatistics};
