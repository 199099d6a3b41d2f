//! Frame detection from the short training sequence.

use num_complex::Complex32;

use crate::accumulator::SlidingAccumulator;
use crate::preamble::STS_LENGTH;
use crate::sample::{Tag, TaggedSample};
use crate::stage::Stage;

const PLATEAU_THRESHOLD: f32 = 0.9;
/// Samples the correlation must stay above threshold before a start is
/// declared.
const PLATEAU_LENGTH: usize = 16;

/// Tags the approximate start and end of the STS by correlating the input
/// against itself delayed by one STS period. The ten repetitions produce
/// a plateau of high normalized correlation; everything else decorrelates.
pub struct FrameDetector {
    corr_acc: SlidingAccumulator<Complex32>,
    power_acc: SlidingAccumulator<f32>,
    carryover: [Complex32; STS_LENGTH],
    plateau_length: usize,
    plateau_flag: bool,
}

impl FrameDetector {
    pub fn new() -> Self {
        FrameDetector {
            corr_acc: SlidingAccumulator::new(STS_LENGTH),
            power_acc: SlidingAccumulator::new(STS_LENGTH),
            carryover: [Complex32::new(0.0, 0.0); STS_LENGTH],
            plateau_length: 0,
            plateau_flag: false,
        }
    }
}

impl Default for FrameDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FrameDetector {
    type In = Complex32;
    type Out = TaggedSample;

    fn name(&self) -> &'static str {
        "frame_detector"
    }

    fn work(&mut self, input: Vec<Complex32>) -> Vec<TaggedSample> {
        let mut output = Vec::with_capacity(input.len());

        for (x, &sample) in input.iter().enumerate() {
            let delayed = if x < STS_LENGTH {
                self.carryover[x]
            } else {
                input[x - STS_LENGTH]
            };

            self.corr_acc.add(sample * delayed.conj());
            self.power_acc.add(sample.norm_sqr());
            let corr = self.corr_acc.sum.norm() / self.power_acc.sum;

            let mut tag = Tag::None;
            if corr > PLATEAU_THRESHOLD {
                self.plateau_length += 1;
                if self.plateau_length == PLATEAU_LENGTH {
                    tag = Tag::StsStart;
                    self.plateau_flag = true;
                }
            } else {
                if self.plateau_flag {
                    tag = Tag::StsEnd;
                    self.plateau_flag = false;
                }
                self.plateau_length = 0;
            }

            output.push(TaggedSample { sample, tag });
        }

        // keep the last STS period for the next batch
        let n = input.len();
        if n >= STS_LENGTH {
            self.carryover.copy_from_slice(&input[n - STS_LENGTH..]);
        } else {
            self.carryover.copy_within(n.., 0);
            self.carryover[STS_LENGTH - n..].copy_from_slice(&input);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preamble::{PREAMBLE, STS_TIME};

    #[test]
    fn detects_a_repeating_sts() {
        // trailing silence lets the plateau collapse and StsEnd fire
        let mut signal = vec![Complex32::new(0.0, 0.0); 300];
        for rep in 0..10 {
            signal[40 + rep * 16..40 + (rep + 1) * 16].copy_from_slice(&*STS_TIME);
        }

        let mut detector = FrameDetector::new();
        let tagged = detector.work(signal);

        let starts: Vec<usize> = tagged
            .iter()
            .enumerate()
            .filter(|(_, t)| t.tag == Tag::StsStart)
            .map(|(i, _)| i)
            .collect();
        let ends: Vec<usize> = tagged
            .iter()
            .enumerate()
            .filter(|(_, t)| t.tag == Tag::StsEnd)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(starts.len(), 1);
        assert!(starts[0] > 40 && starts[0] < 40 + 80, "start at {}", starts[0]);
        assert_eq!(ends.len(), 1);
        assert!(ends[0] > starts[0]);
    }

    #[test]
    fn zero_input_produces_no_tags() {
        let mut detector = FrameDetector::new();
        let tagged = detector.work(vec![Complex32::new(0.0, 0.0); 1024]);
        assert!(tagged.iter().all(|t| t.tag == Tag::None));
    }

    #[test]
    fn carryover_bridges_batches() {
        // the plateau must still be found when the preamble straddles a
        // batch boundary
        let mut signal = vec![Complex32::new(0.0, 0.0); 1000];
        signal[400..720].copy_from_slice(&*PREAMBLE);

        let mut detector = FrameDetector::new();
        let mut tags = Vec::new();
        for chunk in signal.chunks(250) {
            tags.extend(detector.work(chunk.to_vec()));
        }
        assert!(tags.iter().any(|t| t.tag == Tag::StsStart));
        assert!(tags.iter().any(|t| t.tag == Tag::StsEnd));
    }

    #[test]
    fn short_batches_are_accepted() {
        let mut detector = FrameDetector::new();
        for chunk in PREAMBLE.chunks(7) {
            detector.work(chunk.to_vec());
        }
    }
}
