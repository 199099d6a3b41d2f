//! Gray-coded QAM mapping with soft-output demapping.
//!
//! Each constellation axis is encoded and decoded recursively so the
//! demapper yields a meaningful confidence per bit (0..255, 128 neutral)
//! instead of only the smallest per-bit distance. The Viterbi decoder
//! consumes these confidences directly.

use num_complex::Complex32;

use crate::rate::RateParams;

/// One constellation axis carrying `bits` Gray-coded bits.
#[derive(Clone, Copy, Debug)]
struct Axis {
    bits: usize,
    scale_e: f32,
    scale_d: f32,
    gain: i32,
}

impl Axis {
    /// `power` is the desired mean power of this axis.
    fn new(bits: usize, power: f32) -> Self {
        let gain = 8 - bits as i32;
        let nn = 1 << (bits - 1);
        // sum((2k+1)^2, k = 0..nn-1)
        let sum2 = (4 * nn * nn * nn - nn) / 3;
        let sf = (power * nn as f32 / sum2 as f32).sqrt();
        Axis {
            bits,
            scale_e: sf,
            scale_d: (1 << gain) as f32 / sf,
            gain,
        }
    }

    fn encode(&self, bits: &[u8]) -> f32 {
        let mut pt: i32 = 0;
        let mut flip: i32 = 1;
        for &b in &bits[..self.bits] {
            let bit = b as i32 * 2 - 1;
            pt = bit * flip + pt * 2;
            flip *= -bit;
        }
        pt as f32 * self.scale_e
    }

    fn decode(&self, sym: f32, out: &mut [u8]) {
        let mut pt = (sym * self.scale_d) as i32;
        let mut flip: i32 = 1;
        let mut amp: i32 = (1 << (self.bits - 1)) << self.gain;
        for bit_out in out.iter_mut().take(self.bits) {
            *bit_out = (flip * pt + 128).clamp(0, 255) as u8;
            let bit = if pt >= 0 { 1 } else { -1 };
            pt -= bit * amp;
            flip = -bit;
            amp /= 2;
        }
    }
}

fn axis_for(params: &RateParams) -> Axis {
    match params.bpsc {
        1 => Axis::new(1, 1.0),
        2 => Axis::new(1, 0.5),
        4 => Axis::new(2, 0.5),
        6 => Axis::new(3, 0.5),
        _ => unreachable!("bits per subcarrier is one of 1,2,4,6"),
    }
}

/// Map hard coded bits (one byte per bit) onto constellation points. The
/// first half of each subcarrier's bits selects the I axis, the second
/// half the Q axis; BPSK uses the I axis alone.
pub fn modulate(bits: &[u8], params: &RateParams) -> Vec<Complex32> {
    assert_eq!(bits.len() % params.bpsc, 0);
    let axis = axis_for(params);
    bits.chunks_exact(params.bpsc)
        .map(|chunk| {
            if params.bpsc == 1 {
                Complex32::new(axis.encode(chunk), 0.0)
            } else {
                let half = params.bpsc / 2;
                Complex32::new(axis.encode(&chunk[..half]), axis.encode(&chunk[half..]))
            }
        })
        .collect()
}

/// Demap constellation points to soft bits, `bpsc` confidences per
/// subcarrier.
pub fn demodulate(samples: &[Complex32], params: &RateParams) -> Vec<u8> {
    let axis = axis_for(params);
    let mut soft = vec![0u8; samples.len() * params.bpsc];
    for (s, out) in samples.iter().zip(soft.chunks_exact_mut(params.bpsc)) {
        if params.bpsc == 1 {
            axis.decode(s.re, out);
        } else {
            let half = params.bpsc / 2;
            axis.decode(s.re, &mut out[..half]);
            axis.decode(s.im, &mut out[half..]);
        }
    }
    soft
}
