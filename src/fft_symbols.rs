//! Cyclic prefix removal, symbol framing, and the forward transform.

use crate::fft::Ofdm64;
use crate::sample::{Tag, TaggedSample, TaggedSymbol};
use crate::stage::Stage;

/// Groups the sample stream into 80-sample cycles (16 prefix samples
/// dropped, 64 collected), re-anchored by the Lts1/Lts2 tags, and
/// transforms each complete symbol to the frequency domain. The first
/// symbol after Lts1 carries the LtsStart tag for the channel estimator.
pub struct FftSymbols {
    fft: Ofdm64,
    current: TaggedSymbol<64>,
    offset: usize,
}

impl FftSymbols {
    pub fn new() -> Self {
        FftSymbols {
            fft: Ofdm64::new(),
            current: TaggedSymbol::default(),
            offset: 0,
        }
    }
}

impl Default for FftSymbols {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FftSymbols {
    type In = TaggedSample;
    type Out = TaggedSymbol<64>;

    fn name(&self) -> &'static str {
        "fft_symbols"
    }

    fn work(&mut self, input: Vec<TaggedSample>) -> Vec<TaggedSymbol<64>> {
        let mut output = Vec::with_capacity(input.len() / 80 + 1);

        for s in &input {
            if s.tag == Tag::Lts1 {
                // flush whatever was being collected and restart on the
                // first LTS symbol; Lts1 points into the prefix, so the
                // body starts right here
                if self.offset > 15 {
                    output.push(self.current);
                }
                self.current = TaggedSymbol {
                    tag: Tag::LtsStart,
                    ..TaggedSymbol::default()
                };
                self.offset = 16;
            }
            if s.tag == Tag::Lts2 {
                // the second LTS symbol follows without a prefix of its own
                self.offset = 16;
            }

            if self.offset > 15 {
                self.current.samples[self.offset - 16] = s.sample;
            }

            self.offset += 1;
            if self.offset == 80 {
                output.push(self.current);
                self.current.tag = Tag::None;
                self.offset = 0;
            }
        }

        for symbol in output.iter_mut() {
            self.fft.forward(&mut symbol.samples);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preamble::LTS_FREQ;
    use num_complex::Complex32;

    #[test]
    fn recovers_lts_symbols_from_a_tagged_preamble() {
        use crate::preamble::PREAMBLE;

        // tag the preamble the way timing sync would: Lts1 eight samples
        // into the cyclic prefix, Lts2 one symbol later
        let mut tagged: Vec<TaggedSample> =
            PREAMBLE.iter().map(|&s| TaggedSample::new(s)).collect();
        tagged.extend(vec![TaggedSample::default(); 240]);
        tagged[184].tag = Tag::Lts1;
        tagged[184 + 64].tag = Tag::Lts2;

        let mut stage = FftSymbols::new();
        let symbols = stage.work(tagged);

        let lts: Vec<&TaggedSymbol<64>> = symbols
            .iter()
            .filter(|s| s.tag == Tag::LtsStart)
            .collect();
        assert_eq!(lts.len(), 1);

        // collected eight samples early, the symbol is a cyclic rotation
        // of the LTS: every active subcarrier keeps the same magnitude
        // and the nulls stay empty
        let magnitude = lts[0].samples[6].norm();
        assert!(magnitude > 1.0);
        for (k, reference) in LTS_FREQ.iter().enumerate() {
            let received = lts[0].samples[k];
            if reference.norm() > 0.5 {
                assert!(
                    (received.norm() - magnitude).abs() < 1e-2,
                    "subcarrier {k}: {received}"
                );
            } else {
                assert!(received.norm() < 1e-2, "null subcarrier {k}: {received}");
            }
        }
    }

    #[test]
    fn frames_resume_after_the_lts() {
        // Lts1/Lts2 followed by two 80-sample data symbols of a known
        // impulse shape
        let mut samples = vec![TaggedSample::default(); 480];
        samples[8].tag = Tag::Lts1;
        samples[72].tag = Tag::Lts2;
        // the second LTS body ends at 136; the next symbol's prefix spans
        // 136..152 and its body 152..216
        for i in 152..216 {
            samples[i].sample = Complex32::new(1.0, 0.0);
        }

        let mut stage = FftSymbols::new();
        let symbols = stage.work(samples);

        // LTS1, LTS2, then the data symbols
        assert!(symbols.len() >= 4);
        assert_eq!(symbols[0].tag, Tag::LtsStart);
        assert_eq!(symbols[1].tag, Tag::None);
        // constant body transforms to pure DC at the center bin
        assert!((symbols[2].samples[32].re - 64.0).abs() < 1e-3);
        assert!(symbols[3].samples[32].norm() < 1e-3);
    }
}
