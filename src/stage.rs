//! Threaded execution of pipeline stages.
//!
//! Every stage owns a dedicated thread that sleeps until the coordinator
//! hands it a batch over a bounded channel and answers with its output on
//! a second one. Dropping the wake sender shuts the thread down cleanly.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::warn;

/// One step of the receive pipeline: consume a batch, produce a batch.
/// Stages keep whatever carryover state they need to bridge windowed
/// operations across batch boundaries; they never fail.
pub trait Stage: Send + 'static {
    type In: Send + 'static;
    type Out: Send + 'static;

    fn name(&self) -> &'static str;

    fn work(&mut self, input: Vec<Self::In>) -> Vec<Self::Out>;
}

pub(crate) struct StageHandle<I, O> {
    pub wake: Sender<Vec<I>>,
    pub done: Receiver<Vec<O>>,
}

/// Spawn a stage on its own named thread. `budget` is the real-time span
/// of one batch; a stage exceeding it cannot keep up with the sample rate
/// and says so once per offense.
pub(crate) fn spawn<S: Stage>(
    mut stage: S,
    budget: Duration,
) -> (StageHandle<S::In, S::Out>, JoinHandle<()>) {
    let (wake_tx, wake_rx) = bounded::<Vec<S::In>>(1);
    let (done_tx, done_rx) = bounded::<Vec<S::Out>>(1);
    let name = stage.name();

    let thread = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            while let Ok(input) = wake_rx.recv() {
                let start = Instant::now();
                let output = stage.work(input);
                let elapsed = start.elapsed();
                if elapsed > budget {
                    warn!("{name}: batch took {elapsed:?}, budget is {budget:?}");
                }
                if done_tx.send(output).is_err() {
                    break;
                }
            }
        })
        .expect("spawn stage thread");

    (
        StageHandle {
            wake: wake_tx,
            done: done_rx,
        },
        thread,
    )
}
