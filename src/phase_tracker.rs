//! Residual phase tracking from the pilot subcarriers.

use num_complex::Complex32;

use crate::sample::{Tag, TaggedSymbol};
use crate::stage::Stage;
use crate::symbol_mapper::{DATA_INDICES, PILOT_INDICES, PILOT_VALUES};
use crate::POLARITY;

/// Uses the four pilots of each symbol to measure the common phase error
/// left over after coarse frequency correction, removes it from the 48
/// data subcarriers, and drops pilots and nulls from the output.
pub struct PhaseTracker {
    symbol_count: usize,
}

impl PhaseTracker {
    pub fn new() -> Self {
        PhaseTracker { symbol_count: 0 }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for PhaseTracker {
    type In = TaggedSymbol<64>;
    type Out = TaggedSymbol<48>;

    fn name(&self) -> &'static str {
        "phase_tracker"
    }

    fn work(&mut self, input: Vec<TaggedSymbol<64>>) -> Vec<TaggedSymbol<48>> {
        let mut output = Vec::with_capacity(input.len());

        for symbol in &input {
            if symbol.tag == Tag::StartOfFrame {
                self.symbol_count = 0;
            }

            let polarity = POLARITY[self.symbol_count % 127];
            let mut error = Complex32::new(0.0, 0.0);
            for (pilot, value) in PILOT_INDICES.iter().zip(PILOT_VALUES.iter()) {
                let reference = Complex32::new(value * polarity, 0.0);
                error += symbol.samples[*pilot] * reference.conj() / 4.0;
            }
            let rotation = Complex32::from_polar(1.0, -error.arg());

            let mut out = TaggedSymbol {
                tag: symbol.tag,
                ..TaggedSymbol::default()
            };
            for (o, index) in out.samples.iter_mut().zip(DATA_INDICES.iter()) {
                *o = symbol.samples[*index] * rotation;
            }
            output.push(out);
            self.symbol_count += 1;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol_with_phase(n: usize, data: Complex32, phase: f32) -> TaggedSymbol<64> {
        let mut symbol = TaggedSymbol::<64>::default();
        let rot = Complex32::from_polar(1.0, phase);
        let polarity = POLARITY[n % 127];
        for (pilot, value) in PILOT_INDICES.iter().zip(PILOT_VALUES.iter()) {
            symbol.samples[*pilot] = Complex32::new(value * polarity, 0.0) * rot;
        }
        for index in DATA_INDICES.iter() {
            symbol.samples[*index] = data * rot;
        }
        symbol
    }

    #[test]
    fn removes_common_phase_error() {
        let mut tracker = PhaseTracker::new();
        let data = Complex32::new(1.0, -1.0);

        let mut first = symbol_with_phase(0, data, 0.3);
        first.tag = Tag::StartOfFrame;
        let symbols = vec![first, symbol_with_phase(1, data, -0.7)];

        let out = tracker.work(symbols);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tag, Tag::StartOfFrame);
        for symbol in &out {
            for s in symbol.samples.iter() {
                assert!((s - data).norm() < 1e-4, "{s}");
            }
        }
    }

    #[test]
    fn output_has_no_pilot_positions() {
        // structural: 48-wide output means pilots and nulls are gone
        let mut tracker = PhaseTracker::new();
        let mut symbol = symbol_with_phase(0, Complex32::new(0.5, 0.5), 0.0);
        symbol.tag = Tag::StartOfFrame;
        let out = tracker.work(vec![symbol]);
        assert_eq!(out[0].samples.len(), 48);
    }

    #[test]
    fn polarity_wraps_after_127_symbols() {
        let mut tracker = PhaseTracker::new();
        let data = Complex32::new(-0.5, 0.25);
        let mut symbols: Vec<TaggedSymbol<64>> = (0..130)
            .map(|n| symbol_with_phase(n % 127, data, 0.1))
            .collect();
        symbols[0].tag = Tag::StartOfFrame;

        let out = tracker.work(symbols);
        for symbol in &out {
            for s in symbol.samples.iter() {
                assert!((s - data).norm() < 1e-4);
            }
        }
    }
}
