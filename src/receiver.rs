//! Public receiver: pulls samples from a device, drives the pipeline,
//! and hands decoded payloads to a callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use tracing::{error, warn};

use crate::config;
use crate::device::SampleDevice;
use crate::receiver_chain::ReceiverChain;

/// Owns the receive loop thread. Construction starts it; [`halt`]
/// (or dropping the receiver) stops it. The callback runs on the loop
/// thread with the payloads of each batch, in arrival order, and only
/// ever sees CRC-valid frames.
///
/// [`halt`]: Receiver::halt
pub struct Receiver {
    halt: Arc<AtomicBool>,
    pause: Arc<(Mutex<bool>, Condvar)>,
    thread: Option<JoinHandle<()>>,
}

impl Receiver {
    pub fn new<D, F>(mut device: D, mut callback: F) -> Self
    where
        D: SampleDevice + 'static,
        F: FnMut(Vec<Vec<u8>>) + Send + 'static,
    {
        let halt = Arc::new(AtomicBool::new(false));
        let pause = Arc::new((Mutex::new(false), Condvar::new()));
        let batch_size = config::config().rx_batch_size;

        let halt_flag = halt.clone();
        let pause_flag = pause.clone();
        let thread = std::thread::Builder::new()
            .name("receiver".to_string())
            .spawn(move || {
                let mut chain = ReceiverChain::new();
                let mut samples = Vec::with_capacity(batch_size);

                loop {
                    {
                        let (lock, parked) = &*pause_flag;
                        let mut paused = lock.lock().expect("pause lock");
                        while *paused && !halt_flag.load(Ordering::SeqCst) {
                            paused = parked.wait(paused).expect("pause lock");
                        }
                    }
                    if halt_flag.load(Ordering::SeqCst) {
                        break;
                    }

                    if let Err(e) = device.get_samples(batch_size, &mut samples) {
                        if e.is_fatal() {
                            error!("receiver halting: {e}");
                            break;
                        }
                        warn!("{e}");
                        continue;
                    }

                    let payloads = chain.process_samples(std::mem::take(&mut samples));
                    if !payloads.is_empty() {
                        callback(payloads);
                    }
                }
            })
            .expect("spawn receiver thread");

        Receiver {
            halt,
            pause,
            thread: Some(thread),
        }
    }

    /// Stop the receive loop and wait for it to exit.
    pub fn halt(&mut self) {
        self.halt.store(true, Ordering::SeqCst);
        self.resume();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Park the receive loop, e.g. while transmitting on the same
    /// front end.
    pub fn pause(&self) {
        let (lock, _) = &*self.pause;
        *lock.lock().expect("pause lock") = true;
    }

    /// Wake a paused receive loop.
    pub fn resume(&self) {
        let (lock, parked) = &*self.pause;
        *lock.lock().expect("pause lock") = false;
        parked.notify_all();
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.halt();
    }
}
