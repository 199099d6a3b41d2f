//! The six-stage receive pipeline and its batch coordinator.

use std::mem;
use std::thread::JoinHandle;
use std::time::Duration;

use num_complex::Complex32;

use crate::channel_est::ChannelEstimator;
use crate::config;
use crate::fft_symbols::FftSymbols;
use crate::frame_decoder::FrameDecoder;
use crate::frame_detector::FrameDetector;
use crate::phase_tracker::PhaseTracker;
use crate::sample::{TaggedSample, TaggedSymbol};
use crate::stage::{spawn, StageHandle};
use crate::timing_sync::TimingSync;

struct ChainIo {
    detector: StageHandle<Complex32, TaggedSample>,
    sync: StageHandle<TaggedSample, TaggedSample>,
    fft: StageHandle<TaggedSample, TaggedSymbol<64>>,
    channel: StageHandle<TaggedSymbol<64>, TaggedSymbol<64>>,
    phase: StageHandle<TaggedSymbol<64>, TaggedSymbol<48>>,
    decoder: StageHandle<TaggedSymbol<48>, Vec<u8>>,
}

/// Runs every stage on its own thread, lock-stepped per batch: the
/// coordinator wakes all six with the data staged for them, waits for all
/// six to finish, then shifts each output one stage down the chain. A
/// sample entering stage *i* in one batch reaches stage *i+1* in the
/// next, so decoded payloads trail the input by a handful of batches.
pub struct ReceiverChain {
    io: Option<ChainIo>,
    threads: Vec<JoinHandle<()>>,
    to_sync: Vec<TaggedSample>,
    to_fft: Vec<TaggedSample>,
    to_channel: Vec<TaggedSymbol<64>>,
    to_phase: Vec<TaggedSymbol<64>>,
    to_decoder: Vec<TaggedSymbol<48>>,
}

impl ReceiverChain {
    pub fn new() -> Self {
        let cfg = config::config();
        let budget = Duration::from_secs_f64(cfg.rx_batch_size as f64 / cfg.sample_rate);

        let (detector, t0) = spawn(FrameDetector::new(), budget);
        let (sync, t1) = spawn(TimingSync::new(), budget);
        let (fft, t2) = spawn(FftSymbols::new(), budget);
        let (channel, t3) = spawn(ChannelEstimator::new(), budget);
        let (phase, t4) = spawn(PhaseTracker::new(), budget);
        let (decoder, t5) = spawn(FrameDecoder::new(), budget);

        ReceiverChain {
            io: Some(ChainIo {
                detector,
                sync,
                fft,
                channel,
                phase,
                decoder,
            }),
            threads: vec![t0, t1, t2, t3, t4, t5],
            to_sync: Vec::new(),
            to_fft: Vec::new(),
            to_channel: Vec::new(),
            to_phase: Vec::new(),
            to_decoder: Vec::new(),
        }
    }

    /// Push one batch of raw samples through the pipeline and return the
    /// payloads that completed decoding this batch.
    pub fn process_samples(&mut self, samples: Vec<Complex32>) -> Vec<Vec<u8>> {
        let io = self.io.as_ref().expect("pipeline is running");

        // wake every stage with the batch staged for it
        io.detector.wake.send(samples).expect("frame_detector alive");
        io.sync
            .wake
            .send(mem::take(&mut self.to_sync))
            .expect("timing_sync alive");
        io.fft
            .wake
            .send(mem::take(&mut self.to_fft))
            .expect("fft_symbols alive");
        io.channel
            .wake
            .send(mem::take(&mut self.to_channel))
            .expect("channel_est alive");
        io.phase
            .wake
            .send(mem::take(&mut self.to_phase))
            .expect("phase_tracker alive");
        io.decoder
            .wake
            .send(mem::take(&mut self.to_decoder))
            .expect("frame_decoder alive");

        // wait for all of them, then shift outputs one stage down
        self.to_sync = io.detector.done.recv().expect("frame_detector alive");
        self.to_fft = io.sync.done.recv().expect("timing_sync alive");
        self.to_channel = io.fft.done.recv().expect("fft_symbols alive");
        self.to_phase = io.channel.done.recv().expect("channel_est alive");
        self.to_decoder = io.phase.done.recv().expect("phase_tracker alive");
        io.decoder.done.recv().expect("frame_decoder alive")
    }

    /// Number of raw-sample batches it takes for a frame at the input to
    /// fully clear the chain.
    pub fn latency_batches() -> usize {
        6
    }
}

impl Default for ReceiverChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReceiverChain {
    fn drop(&mut self) {
        // dropping the wake senders disconnects every stage loop
        drop(self.io.take());
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}
