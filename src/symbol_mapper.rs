//! Mapping between streams of data-subcarrier samples and full
//! 64-subcarrier OFDM symbols.

use num_complex::Complex32;

use crate::POLARITY;

/// Subcarrier roles in the shifted layout: 0 = null, 1 = data, 2 = pilot.
#[rustfmt::skip]
const ACTIVE_MAP: [u8; 64] = [
    0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2,
    1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 2, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0,
];

/// Indices of the four pilot subcarriers.
pub const PILOT_INDICES: [usize; 4] = [11, 25, 39, 53];

/// Base pilot values; the fourth pilot is inverted.
pub const PILOT_VALUES: [f32; 4] = [1.0, 1.0, 1.0, -1.0];

/// Indices of the 48 data subcarriers.
pub static DATA_INDICES: once_cell::sync::Lazy<[usize; 48]> = once_cell::sync::Lazy::new(|| {
    let mut indices = [0usize; 48];
    let mut n = 0;
    for (i, role) in ACTIVE_MAP.iter().enumerate() {
        if *role == 1 {
            indices[n] = i;
            n += 1;
        }
    }
    assert_eq!(n, 48);
    indices
});

/// Inserts pilots and nulls on transmit, tracking the pilot polarity
/// sequence across the symbols of a frame.
#[derive(Default)]
pub struct SymbolMapper;

impl SymbolMapper {
    pub fn new() -> Self {
        SymbolMapper
    }

    /// Spread data samples (a multiple of 48) over OFDM symbols, placing
    /// pilots and nulls. The first 48 input samples become symbol 0, the
    /// SIGNAL symbol, whose pilots use `POLARITY[0]`.
    pub fn map(&self, data: &[Complex32]) -> Vec<Complex32> {
        assert_eq!(data.len() % 48, 0);
        let mut out = vec![Complex32::new(0.0, 0.0); data.len() / 48 * 64];

        for (symbol_count, (chunk, symbol)) in
            data.chunks_exact(48).zip(out.chunks_exact_mut(64)).enumerate()
        {
            let polarity = POLARITY[symbol_count % 127];
            for (pilot, value) in PILOT_INDICES.iter().zip(PILOT_VALUES.iter()) {
                symbol[*pilot] = Complex32::new(value * polarity, 0.0);
            }
            for (sample, index) in chunk.iter().zip(DATA_INDICES.iter()) {
                symbol[*index] = *sample;
            }
        }
        out
    }

    /// Extract the 48 data subcarriers of each 64-wide symbol, dropping
    /// pilots and nulls.
    pub fn demap(&self, symbols: &[Complex32]) -> Vec<Complex32> {
        assert_eq!(symbols.len() % 64, 0);
        let mut out = Vec::with_capacity(symbols.len() / 64 * 48);
        for symbol in symbols.chunks_exact(64) {
            out.extend(DATA_INDICES.iter().map(|&i| symbol[i]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_partition_the_symbol() {
        let nulls = ACTIVE_MAP.iter().filter(|r| **r == 0).count();
        let data = ACTIVE_MAP.iter().filter(|r| **r == 1).count();
        let pilots = ACTIVE_MAP.iter().filter(|r| **r == 2).count();
        assert_eq!((nulls, data, pilots), (12, 48, 4));
        assert_eq!(ACTIVE_MAP[32], 0, "DC is null");
        for p in PILOT_INDICES {
            assert_eq!(ACTIVE_MAP[p], 2);
        }
    }

    #[test]
    fn map_demap_roundtrip() {
        let mapper = SymbolMapper::new();
        let data: Vec<Complex32> = (0..96)
            .map(|i| Complex32::new(i as f32, -(i as f32)))
            .collect();
        let symbols = mapper.map(&data);
        assert_eq!(symbols.len(), 128);
        assert_eq!(mapper.demap(&symbols), data);
    }

    #[test]
    fn pilots_follow_polarity() {
        let mapper = SymbolMapper::new();
        let data = vec![Complex32::new(1.0, 0.0); 48 * 5];
        let symbols = mapper.map(&data);
        for (n, symbol) in symbols.chunks_exact(64).enumerate() {
            assert_eq!(symbol[11].re, POLARITY[n]);
            assert_eq!(symbol[53].re, -POLARITY[n]);
            assert_eq!(symbol[32], Complex32::new(0.0, 0.0));
        }
    }
}
