//! Puncturing of the rate-1/2 mother code up to 2/3 and 3/4, and the
//! matching depuncturing with neutral soft values in the stolen
//! positions.

use crate::rate::{Rate, RateParams};

/// Soft value inserted where a coded bit was punctured away; halfway
/// between the two hard decisions so the Viterbi metrics stay unbiased.
pub const NEUTRAL: u8 = 127;

#[derive(Clone, Copy, PartialEq)]
enum Coding {
    Half,
    TwoThirds,
    ThreeQuarters,
}

fn coding(params: &RateParams) -> Coding {
    match params.rate {
        Rate::Bpsk1_2 | Rate::Qpsk1_2 | Rate::Qam16_1_2 => Coding::Half,
        Rate::Bpsk2_3 | Rate::Qpsk2_3 | Rate::Qam16_2_3 | Rate::Qam64_2_3 => Coding::TwoThirds,
        Rate::Bpsk3_4 | Rate::Qpsk3_4 | Rate::Qam16_3_4 | Rate::Qam64_3_4 => {
            Coding::ThreeQuarters
        }
    }
}

/// Drop coded bits according to the rate's puncturing pattern.
pub fn puncture(bits: &[u8], params: &RateParams) -> Vec<u8> {
    match coding(params) {
        Coding::Half => bits.to_vec(),
        // keep keep skip keep skip keep
        Coding::ThreeQuarters => {
            let mut out = Vec::with_capacity(bits.len() * 2 / 3);
            for group in bits.chunks_exact(6) {
                out.extend_from_slice(&[group[0], group[1], group[3], group[5]]);
            }
            out
        }
        // keep keep keep skip
        Coding::TwoThirds => {
            let mut out = Vec::with_capacity(bits.len() * 3 / 4);
            for group in bits.chunks_exact(4) {
                out.extend_from_slice(&[group[0], group[1], group[2]]);
            }
            out
        }
    }
}

/// Re-insert [`NEUTRAL`] soft values in the punctured positions.
pub fn depuncture(soft: &[u8], params: &RateParams) -> Vec<u8> {
    match coding(params) {
        Coding::Half => soft.to_vec(),
        Coding::ThreeQuarters => {
            let mut out = Vec::with_capacity(soft.len() * 3 / 2);
            for group in soft.chunks_exact(4) {
                out.extend_from_slice(&[
                    group[0], group[1], NEUTRAL, group[2], NEUTRAL, group[3],
                ]);
            }
            out
        }
        Coding::TwoThirds => {
            let mut out = Vec::with_capacity(soft.len() * 4 / 3);
            for group in soft.chunks_exact(3) {
                out.extend_from_slice(&[group[0], group[1], group[2], NEUTRAL]);
            }
            out
        }
    }
}
