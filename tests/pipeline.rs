use std::{sync::Arc, thread};

use approx::assert_relative_eq;
use csi_slurper::{
    capture::{run_capture, SyntheticSource},
    exfil::drain,
    CaptureSession, CsiFrame, FrameStatistics, IngestError, MalformedFrame, RawFrame,
};

fn raw(ts: u64, samples: Vec<i8>) -> RawFrame {
    RawFrame {
        timestamp_us: ts,
        rssi: -55,
        channel: 11,
        samples,
        ..Default::default()
    }
}

#[test]
fn producer_and_consumer_threads_keep_order() {
    let session = Arc::new(CaptureSession::default());
    session.enable(32).unwrap();

    let total = 5_000;
    let producer_session = session.clone();
    let producer = thread::spawn(move || {
        let source = (0..total).map(|ts| raw(ts, vec![1, 0, 0, 1]));
        run_capture(&producer_session, source, None)
    });

    let mut seen = Vec::new();
    let mut sink = |f: &CsiFrame, s: Option<&FrameStatistics>| {
        assert_eq!(s.map(|s| s.subcarrier_count), Some(2));
        seen.push(f.timestamp_us());
    };
    while !producer.is_finished() {
        drain(&session, &mut sink, 16);
    }
    let summary = producer.join().unwrap();
    drain(&session, &mut sink, usize::MAX);

    assert_eq!(summary.offered, total);
    assert_eq!(summary.accepted + summary.dropped, total);
    assert_eq!(seen.len() as u64, summary.accepted);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));

    let stats = session.stats();
    assert_eq!(stats.frames_captured, summary.accepted);
    assert_eq!(stats.frames_dropped, summary.dropped);
    assert_eq!(stats.frames_polled, summary.accepted);
    assert_eq!(stats.available, 0);
}

#[test]
fn overflow_without_consumer() {
    let session = CaptureSession::default();
    let n = 16;
    let k = 5;
    session.enable(n).unwrap();
    let drops = (0..(n + k) as u64)
        .map(|ts| session.ingest(raw(ts, vec![1, 0])))
        .filter(|r| *r == Err(IngestError::CapacityDrop))
        .count();
    assert_eq!(drops, k);
    assert_eq!(session.available(), n);
    assert_eq!(session.stats().frames_dropped, k as u64);
}

#[test]
fn malformed_frames_never_reach_the_consumer() {
    let session = CaptureSession::default();
    session.enable(4).unwrap();
    let err = session.ingest(raw(0, vec![1, 2, 3])).unwrap_err();
    assert_eq!(
        err,
        IngestError::Malformed(MalformedFrame::OddSampleCount { len: 3 })
    );
    assert_ne!(err, IngestError::CapacityDrop);
    assert_eq!(session.available(), 0);
    assert_eq!(session.stats().frames_captured, 0);
    assert!(session.poll().is_none());
    // Still usable afterwards
    session.ingest(raw(1, vec![1, 2])).unwrap();
    assert_eq!(session.poll().unwrap().timestamp_us(), 1);
}

#[test]
fn analysis_of_polled_frames() {
    let session = CaptureSession::default();
    session.enable(4).unwrap();
    session.ingest(raw(0, vec![1, 0, 1, 0, 1, 0])).unwrap();
    session.ingest(raw(1, vec![])).unwrap();

    let flat = session.poll().unwrap().analyze().unwrap();
    assert_eq!(flat.mean, 1.0);
    assert_eq!(flat.variance, 0.0);
    assert_eq!(flat.subcarrier_count, 3);

    let empty = session.poll().unwrap();
    assert!(empty.analyze().is_none());
    assert!(empty.amplitudes().is_empty());
}

#[test]
fn synthetic_capture_end_to_end() {
    let session = CaptureSession::default();
    session.enable(256).unwrap();
    let summary = run_capture(&session, SyntheticSource::new(64).with_limit(100), None);
    assert_eq!(summary.accepted, 100);

    let mut means = Vec::new();
    drain(
        &session,
        &mut |_: &CsiFrame, s: Option<&FrameStatistics>| means.push(s.unwrap().mean),
        usize::MAX,
    );
    assert_eq!(means.len(), 100);
    // Ripple averages out across the band
    for mean in means {
        assert_relative_eq!(mean, 40.0, epsilon = 2.0);
    }
}

#[test]
fn disable_then_enable_round_trip() {
    let session = CaptureSession::default();
    session.enable(2).unwrap();
    for ts in 0..5 {
        let _ = session.ingest(raw(ts, vec![0, 1]));
    }
    session.disable().unwrap();
    session.enable(2).unwrap();
    let stats = session.stats();
    assert_eq!(stats.frames_captured, 0);
    assert_eq!(stats.frames_dropped, 0);
    assert_eq!(stats.available, 0);
}
