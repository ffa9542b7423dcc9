//! The CSI frame record and the raw form the radio driver hands us

use std::fmt;

use byte_slice_cast::AsSliceOf;

use crate::{
    decode,
    error::MalformedFrame,
    stats::{self, FrameStatistics},
};

/// Transmitter hardware address
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

/// Channel width the CSI was measured over
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Bandwidth {
    #[default]
    Ht20,
    Ht40,
}

impl Bandwidth {
    /// From the hardware's channel-width bit (`cwb`)
    pub fn from_cwb(cwb: bool) -> Self {
        if cwb {
            Self::Ht40
        } else {
            Self::Ht20
        }
    }

    pub fn mhz(self) -> u32 {
        match self {
            Self::Ht20 => 20,
            Self::Ht40 => 40,
        }
    }
}

/// PHY signal mode of the frame that carried the CSI report
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum SignalMode {
    /// 802.11a/g legacy
    #[default]
    NonHt,
    /// 802.11n
    Ht,
    /// 802.11ac
    Vht,
    Unknown(u8),
}

impl From<u8> for SignalMode {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::NonHt,
            1 => Self::Ht,
            3 => Self::Vht,
            other => Self::Unknown(other),
        }
    }
}

/// Extra receive-control metadata some radios report alongside CSI.
/// Everything defaults to zero for radios that don't fill it in.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct RxControl {
    pub sig_mode: SignalMode,
    /// dBm
    pub noise_floor: i8,
    /// 0 = none, 1 = above primary, 2 = below primary
    pub secondary_channel: u8,
    pub sgi: bool,
    pub stbc: bool,
    pub aggregation: bool,
    pub smoothing: bool,
    pub not_sounding: bool,
    pub fec_coding: bool,
    pub ampdu_count: u16,
    pub antenna: u8,
    pub sig_len: u16,
    pub rx_state: u32,
    /// Radio-local clock, microseconds
    pub local_timestamp: u32,
}

/// A frame as delivered by the radio driver, not yet validated
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct RawFrame {
    /// Monotonic capture time, microseconds
    pub timestamp_us: u64,
    /// dBm
    pub rssi: i8,
    pub rate: u8,
    pub mcs: u8,
    pub channel: u8,
    pub bandwidth: Bandwidth,
    pub source_mac: MacAddress,
    pub rx: RxControl,
    /// Interleaved I, Q
    pub samples: Vec<i8>,
}

impl RawFrame {
    /// Reinterpret a hardware byte buffer as signed samples
    pub fn samples_from_bytes(bytes: &[u8]) -> Result<Vec<i8>, byte_slice_cast::Error> {
        Ok(bytes.as_slice_of::<i8>()?.to_vec())
    }

    /// Check the frame invariants and freeze it into a [`CsiFrame`]
    pub fn validate(self, max_samples: usize) -> Result<CsiFrame, MalformedFrame> {
        let len = self.samples.len();
        if len % 2 != 0 {
            return Err(MalformedFrame::OddSampleCount { len });
        }
        if len > max_samples {
            return Err(MalformedFrame::TooManySamples {
                len,
                max: max_samples,
            });
        }
        if self.bandwidth == Bandwidth::Ht40 && self.rx.secondary_channel == 0 {
            return Err(MalformedFrame::MissingSecondaryChannel);
        }
        Ok(CsiFrame {
            timestamp_us: self.timestamp_us,
            rssi: self.rssi,
            rate: self.rate,
            mcs: self.mcs,
            channel: self.channel,
            bandwidth: self.bandwidth,
            source_mac: self.source_mac,
            rx: self.rx,
            samples: self.samples,
        })
    }
}

/// One captured CSI frame. Immutable once built; the sample count is always even.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CsiFrame {
    timestamp_us: u64,
    rssi: i8,
    rate: u8,
    mcs: u8,
    channel: u8,
    bandwidth: Bandwidth,
    source_mac: MacAddress,
    rx: RxControl,
    samples: Vec<i8>,
}

impl CsiFrame {
    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }

    pub fn rssi(&self) -> i8 {
        self.rssi
    }

    pub fn rate(&self) -> u8 {
        self.rate
    }

    pub fn mcs(&self) -> u8 {
        self.mcs
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    pub fn source_mac(&self) -> MacAddress {
        self.source_mac
    }

    pub fn rx(&self) -> &RxControl {
        &self.rx
    }

    pub fn samples(&self) -> &[i8] {
        &self.samples
    }

    pub fn subcarrier_count(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        decode::amplitudes(&self.samples)
    }

    pub fn phases(&self) -> Vec<f64> {
        decode::phases(&self.samples)
    }

    /// `None` for a frame with no subcarriers
    pub fn analyze(&self) -> Option<FrameStatistics> {
        stats::analyze(self)
    }

    /// Signal-to-noise ratio in dB, only meaningful if the radio reports a noise floor
    pub fn snr_db(&self) -> i16 {
        self.rssi as i16 - self.rx.noise_floor as i16
    }
}
