//! The sample source/sink boundary of the PHY.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use num_complex::Complex32;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("receive overflow, samples were dropped")]
    Overflow,
    #[error("burst fragment out of sequence")]
    OutOfSequence,
    #[error("failed to open device: {0}")]
    Open(String),
    #[error("failed to configure device: {0}")]
    Configure(String),
}

impl DeviceError {
    /// Fatal errors abort startup; everything else is logged and the
    /// stream continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DeviceError::Open(_) | DeviceError::Configure(_))
    }
}

/// A producer/consumer of complex baseband samples, typically an SDR
/// front end. The pipeline only ever needs these two operations.
pub trait SampleDevice: Send {
    /// Fill `out` with exactly `n` samples, blocking as needed.
    fn get_samples(&mut self, n: usize, out: &mut Vec<Complex32>) -> Result<(), DeviceError>;

    /// Transmit one burst, blocking until it has left the device.
    fn send_burst_sync(&mut self, samples: &[Complex32]) -> Result<(), DeviceError>;
}

#[derive(Default)]
struct LoopbackShared {
    queue: Mutex<VecDeque<Complex32>>,
    available: Condvar,
}

/// In-memory device for simulation: bursts sent on one handle come out of
/// `get_samples` on any clone. When the queue runs dry the receive side
/// reads silence, which is exactly what flushes the pipeline after the
/// last frame.
#[derive(Clone, Default)]
pub struct Loopback {
    shared: Arc<LoopbackShared>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples currently queued and not yet consumed.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().expect("loopback lock").len()
    }
}

impl SampleDevice for Loopback {
    fn get_samples(&mut self, n: usize, out: &mut Vec<Complex32>) -> Result<(), DeviceError> {
        out.clear();
        let mut queue = self.shared.queue.lock().expect("loopback lock");
        if queue.is_empty() {
            // wait briefly for a burst, then fall back to silence
            let (q, _) = self
                .shared
                .available
                .wait_timeout(queue, Duration::from_millis(1))
                .expect("loopback lock");
            queue = q;
        }
        while out.len() < n {
            match queue.pop_front() {
                Some(s) => out.push(s),
                None => out.push(Complex32::new(0.0, 0.0)),
            }
        }
        Ok(())
    }

    fn send_burst_sync(&mut self, samples: &[Complex32]) -> Result<(), DeviceError> {
        let mut queue = self.shared.queue.lock().expect("loopback lock");
        queue.extend(samples.iter().copied());
        self.shared.available.notify_all();
        Ok(())
    }
}
