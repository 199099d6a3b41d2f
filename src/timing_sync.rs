//! Symbol timing refinement and coarse frequency correction from the
//! long training sequence.

use num_complex::Complex32;
use tracing::debug;

use crate::preamble::{LTS_LENGTH, LTS_TIME_CONJ};
use crate::sample::{Tag, TaggedSample};
use crate::stage::Stage;

/// Window kept across batches; long enough to cover the whole LTS search
/// after an StsEnd near the batch boundary.
const CARRYOVER_LENGTH: usize = 160;
const LTS_CORR_THRESHOLD: f32 = 0.9;
/// Candidate peaks considered when pairing.
const PEAK_FANOUT: usize = 5;

/// After the detector flags the end of the STS, this stage matched-filters
/// the following window against the known LTS and looks for the two
/// correlation peaks exactly one symbol apart. The earlier peak, backed
/// off into the cyclic prefix, anchors Lts1/Lts2 tags for the FFT stage;
/// the phase drift between the two LTS symbols gives the per-sample
/// frequency correction applied to everything downstream.
///
/// The stage delays the stream by one carryover length so tags can land
/// ahead of the current sample.
pub struct TimingSync {
    phase_acc: f32,
    phase_offset: f32,
    carryover: Vec<TaggedSample>,
}

impl TimingSync {
    pub fn new() -> Self {
        TimingSync {
            phase_acc: 0.0,
            phase_offset: 0.0,
            carryover: vec![TaggedSample::default(); CARRYOVER_LENGTH],
        }
    }

    /// Cross-correlate a window of `buf` against the conjugate LTS,
    /// normalized by the local power.
    fn lts_peaks(buf: &[TaggedSample], from: usize) -> Vec<(f32, usize)> {
        let mut peaks = Vec::new();
        for p in from..from + CARRYOVER_LENGTH - LTS_LENGTH {
            let mut corr = Complex32::new(0.0, 0.0);
            let mut power = 0.0f32;
            for s in 0..LTS_LENGTH {
                corr += buf[p + s].sample * LTS_TIME_CONJ[s];
                power += buf[p + s].sample.norm_sqr();
            }
            let norm = corr.norm() / power;
            if norm > LTS_CORR_THRESHOLD {
                peaks.push((norm, p));
            }
        }
        peaks.sort_by(|a, b| b.0.total_cmp(&a.0));
        peaks
    }
}

impl Default for TimingSync {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for TimingSync {
    type In = TaggedSample;
    type Out = TaggedSample;

    fn name(&self) -> &'static str {
        "timing_sync"
    }

    fn work(&mut self, input: Vec<TaggedSample>) -> Vec<TaggedSample> {
        let n = input.len();
        let mut buf = Vec::with_capacity(n + CARRYOVER_LENGTH);
        buf.append(&mut self.carryover);
        buf.extend(input);

        for x in 0..n {
            if buf[x].tag == Tag::StsEnd {
                let peaks = Self::lts_peaks(&buf, x);

                // two peaks one LTS apart, starting from the strongest
                let pair = peaks.first().and_then(|&(_, best)| {
                    peaks
                        .iter()
                        .take(PEAK_FANOUT)
                        .map(|&(_, p)| p)
                        .find(|&p| best.abs_diff(p) == LTS_LENGTH)
                        .map(|p| (best.min(p), best.max(p)))
                });

                if let Some((first, _)) = pair {
                    // back to the start of the LTS cyclic prefix
                    let Some(lts_offset) = first.checked_sub(32) else {
                        continue;
                    };
                    // both LTS symbols and their prefix must be in view
                    if lts_offset + 2 * LTS_LENGTH + 32 > buf.len() {
                        continue;
                    }
                    buf[lts_offset + 24].tag = Tag::Lts1;
                    buf[lts_offset + 24 + 64].tag = Tag::Lts2;

                    // frequency offset from the drift between the two LTS
                    // symbols
                    let lts1 = lts_offset + 32;
                    let mut acc = Complex32::new(0.0, 0.0);
                    for k in 0..LTS_LENGTH {
                        acc += buf[lts1 + k].sample * buf[lts1 + 64 + k].sample.conj();
                    }
                    self.phase_offset = acc.arg() / LTS_LENGTH as f32;
                    // absolute phase reference from the last LTS sample
                    self.phase_acc =
                        (buf[lts_offset + 32 + 127].sample * LTS_TIME_CONJ[63]).arg();
                    debug!(
                        "LTS at {lts_offset}, freq offset {:.6} rad/sample",
                        self.phase_offset
                    );
                }
            }

            self.phase_acc += self.phase_offset;
            if self.phase_acc > 2.0 * std::f32::consts::PI {
                self.phase_acc -= 2.0 * std::f32::consts::PI;
            } else if self.phase_acc < -2.0 * std::f32::consts::PI {
                self.phase_acc += 2.0 * std::f32::consts::PI;
            }
            buf[x].sample *= Complex32::from_polar(1.0, self.phase_acc);
        }

        self.carryover = buf.split_off(n);
        buf
    }
}
