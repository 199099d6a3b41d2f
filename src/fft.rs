use std::sync::Arc;

use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// Permutation between natural DFT bin order and the frequency-shifted
/// subcarrier layout used everywhere else in the crate: index `i`
/// addresses subcarrier `i - 32`, so the guard bands sit at the edges and
/// DC at index 32.
#[rustfmt::skip]
const SHIFT_MAP: [usize; 64] = [
    32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47,
    48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63,
     0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15,
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
];

/// 64-point forward and inverse DFT with the subcarrier shift applied, so
/// callers only ever see the shifted layout.
pub struct Ofdm64 {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex32>,
}

impl Ofdm64 {
    pub fn new() -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(64);
        let inverse = planner.plan_fft_inverse(64);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        Ofdm64 {
            forward,
            inverse,
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
        }
    }

    /// In-place forward transform of one symbol, output in the shifted
    /// layout.
    pub fn forward(&mut self, symbol: &mut [Complex32; 64]) {
        self.forward
            .process_with_scratch(symbol, &mut self.scratch);
        let bins = *symbol;
        for s in 0..64 {
            symbol[s] = bins[SHIFT_MAP[s]];
        }
    }

    /// In-place inverse transform of whole symbols given in the shifted
    /// layout, scaled by 1/64 so that forward(inverse(x)) = x.
    pub fn inverse(&mut self, symbols: &mut [Complex32]) {
        assert_eq!(symbols.len() % 64, 0);
        for symbol in symbols.chunks_exact_mut(64) {
            let shifted: [Complex32; 64] = symbol.try_into().unwrap();
            for s in 0..64 {
                symbol[s] = shifted[SHIFT_MAP[s]];
            }
            self.inverse.process_with_scratch(symbol, &mut self.scratch);
            for v in symbol.iter_mut() {
                *v /= 64.0;
            }
        }
    }
}

impl Default for Ofdm64 {
    fn default() -> Self {
        Self::new()
    }
}
