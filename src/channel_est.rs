//! Per-subcarrier channel estimation and equalization from the two LTS
//! symbols.

use num_complex::Complex32;

use crate::preamble::LTS_FREQ;
use crate::sample::{Tag, TaggedSymbol};
use crate::stage::Stage;

/// Averages the two received LTS symbols against the known transmitted
/// LTS into a 64-tap equalizer, then applies it to every following
/// symbol. The first symbol after the training sequence is the SIGNAL
/// symbol and gets tagged StartOfFrame.
pub struct ChannelEstimator {
    chan_est: [Complex32; 64],
    /// 0 outside the LTS, otherwise which LTS symbol is next (1 or 2)
    lts_count: u8,
    frame_start: bool,
}

impl ChannelEstimator {
    pub fn new() -> Self {
        ChannelEstimator {
            chan_est: [Complex32::new(1.0, 0.0); 64],
            lts_count: 0,
            frame_start: false,
        }
    }
}

impl Default for ChannelEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for ChannelEstimator {
    type In = TaggedSymbol<64>;
    type Out = TaggedSymbol<64>;

    fn name(&self) -> &'static str {
        "channel_est"
    }

    fn work(&mut self, input: Vec<TaggedSymbol<64>>) -> Vec<TaggedSymbol<64>> {
        let mut output = Vec::with_capacity(input.len());

        for symbol in &input {
            if symbol.tag == Tag::LtsStart {
                self.lts_count = 1;
                self.chan_est = [Complex32::new(0.0, 0.0); 64];
            }

            if self.lts_count > 0 {
                for (est, (reference, received)) in self
                    .chan_est
                    .iter_mut()
                    .zip(LTS_FREQ.iter().zip(symbol.samples.iter()))
                {
                    *est += reference / received / 2.0;
                }
                self.lts_count += 1;
                if self.lts_count == 3 {
                    self.lts_count = 0;
                    self.frame_start = true;
                }
            } else {
                let mut out = TaggedSymbol {
                    tag: symbol.tag,
                    ..TaggedSymbol::default()
                };
                if self.frame_start {
                    out.tag = Tag::StartOfFrame;
                    self.frame_start = false;
                }
                for ((o, est), received) in out
                    .samples
                    .iter_mut()
                    .zip(self.chan_est.iter())
                    .zip(symbol.samples.iter())
                {
                    *o = est * received;
                }
                output.push(out);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lts_symbol() -> TaggedSymbol<64> {
        TaggedSymbol {
            samples: *LTS_FREQ,
            tag: Tag::None,
        }
    }

    #[test]
    fn flat_channel_passes_through() {
        let mut est = ChannelEstimator::new();
        let mut lts1 = lts_symbol();
        lts1.tag = Tag::LtsStart;

        let mut data = TaggedSymbol::<64>::default();
        for (i, s) in data.samples.iter_mut().enumerate() {
            if LTS_FREQ[i].norm() > 0.5 {
                *s = Complex32::new(0.5, -0.25);
            }
        }

        let out = est.work(vec![lts1, lts_symbol(), data, data]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tag, Tag::StartOfFrame);
        assert_eq!(out[1].tag, Tag::None);
        for (i, s) in out[0].samples.iter().enumerate() {
            if LTS_FREQ[i].norm() > 0.5 {
                assert!((s - Complex32::new(0.5, -0.25)).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn inverts_a_rotating_channel() {
        let mut est = ChannelEstimator::new();
        // a channel that scales and rotates each subcarrier differently
        let channel: Vec<Complex32> = (0..64)
            .map(|k| Complex32::from_polar(0.5 + 0.01 * k as f32, 0.05 * k as f32))
            .collect();

        let apply = |sym: &TaggedSymbol<64>| {
            let mut out = *sym;
            for (s, h) in out.samples.iter_mut().zip(channel.iter()) {
                *s *= h;
            }
            out
        };

        let mut lts1 = apply(&lts_symbol());
        lts1.tag = Tag::LtsStart;
        let lts2 = apply(&lts_symbol());

        let mut data = TaggedSymbol::<64>::default();
        for (i, s) in data.samples.iter_mut().enumerate() {
            if LTS_FREQ[i].norm() > 0.5 {
                *s = Complex32::new(-1.0, 1.0);
            }
        }
        let data_rx = apply(&data);

        let out = est.work(vec![lts1, lts2, data_rx]);
        assert_eq!(out.len(), 1);
        for (i, s) in out[0].samples.iter().enumerate() {
            if LTS_FREQ[i].norm() > 0.5 {
                assert!(
                    (s - Complex32::new(-1.0, 1.0)).norm() < 1e-3,
                    "subcarrier {i}: {s}"
                );
            }
        }
    }
}
