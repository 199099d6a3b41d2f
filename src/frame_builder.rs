//! Transmit path: payload bytes to a complete baseband PPDU.

use num_complex::Complex32;

use crate::fft::Ofdm64;
use crate::ppdu::Ppdu;
use crate::preamble::{PREAMBLE, TIME_SCALE};
use crate::rate::Rate;
use crate::symbol_mapper::SymbolMapper;

/// Builds on-air frames: encode, map onto subcarriers, inverse transform,
/// prefix each symbol cyclically, prepend the preamble.
pub struct FrameBuilder {
    ifft: Ofdm64,
    mapper: SymbolMapper,
}

impl FrameBuilder {
    pub fn new() -> Self {
        FrameBuilder {
            ifft: Ofdm64::new(),
            mapper: SymbolMapper::new(),
        }
    }

    /// Turn a payload into time-domain samples ready for the radio:
    /// 320 preamble samples followed by 80 samples per OFDM symbol
    /// (SIGNAL plus data).
    pub fn build_frame(&mut self, payload: &[u8], rate: Rate) -> Vec<Complex32> {
        let ppdu = Ppdu::new(payload, rate);
        let data_samples = ppdu.encode();

        let mut mapped = self.mapper.map(&data_samples);
        self.ifft.inverse(&mut mapped);
        for s in mapped.iter_mut() {
            *s *= TIME_SCALE;
        }

        let n_symbols = mapped.len() / 64;
        let mut frame = Vec::with_capacity(320 + n_symbols * 80);
        frame.extend_from_slice(&*PREAMBLE);
        for symbol in mapped.chunks_exact(64) {
            // cyclic prefix: the last 16 samples lead the symbol
            frame.extend_from_slice(&symbol[48..]);
            frame.extend_from_slice(symbol);
        }
        frame
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}
