//! Bounded SPSC ring of frames with drop accounting.
//!
//! The producer half lives wherever the radio driver calls us from (callback,
//! interrupt-ish context, a dedicated capture thread) and must never stall, so
//! a full ring discards the *newest* frame and bumps a counter. Frames already
//! queued keep their FIFO order for the consumer.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::PushError;

use crate::frame::CsiFrame;

/// Build a connected producer/consumer pair holding at most `capacity` frames
pub fn channel(capacity: usize) -> (FrameProducer, FrameConsumer) {
    let (producer, consumer) = rtrb::RingBuffer::new(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        FrameProducer {
            inner: producer,
            dropped: dropped.clone(),
        },
        FrameConsumer {
            inner: consumer,
            dropped,
        },
    )
}

/// Write half. Only one context may hold it.
#[derive(Debug)]
pub struct FrameProducer {
    inner: rtrb::Producer<CsiFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameProducer {
    /// Enqueue `frame`, returning whether it was accepted. Never blocks.
    pub fn push(&mut self, frame: CsiFrame) -> bool {
        match self.inner.push(frame) {
            Ok(()) => true,
            Err(PushError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.buffer().capacity()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Read half. Only one context may hold it.
#[derive(Debug)]
pub struct FrameConsumer {
    inner: rtrb::Consumer<CsiFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameConsumer {
    /// Oldest buffered frame, or `None` if the ring is empty. Never blocks.
    pub fn pop(&mut self) -> Option<CsiFrame> {
        self.inner.pop().ok()
    }

    /// Frames currently buffered
    pub fn available(&self) -> usize {
        self.inner.slots()
    }

    pub fn capacity(&self) -> usize {
        self.inner.buffer().capacity()
    }

    /// Frames discarded because the ring was full, since the last reset
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Zero the drop counter, leaving buffered frames alone
    pub fn reset_counters(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }
}

/// Both halves in one place, for callers that push and pop from the same context
#[derive(Debug)]
pub struct RingBuffer {
    producer: FrameProducer,
    consumer: FrameConsumer,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = channel(capacity);
        Self { producer, consumer }
    }

    pub fn push(&mut self, frame: CsiFrame) -> bool {
        self.producer.push(frame)
    }

    pub fn pop(&mut self) -> Option<CsiFrame> {
        self.consumer.pop()
    }

    pub fn available(&self) -> usize {
        self.consumer.available()
    }

    pub fn dropped(&self) -> u64 {
        self.consumer.dropped()
    }

    pub fn reset_counters(&self) {
        self.consumer.reset_counters()
    }

    pub fn capacity(&self) -> usize {
        self.consumer.capacity()
    }

    /// Hand the halves to separate producer and consumer contexts
    pub fn split(self) -> (FrameProducer, FrameConsumer) {
        (self.producer, self.consumer)
    }
}
