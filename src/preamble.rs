//! Training sequences of the 802.11a PLCP preamble.
//!
//! The frequency-domain definitions are the authoritative tables; the
//! time-domain sequences are derived through the same inverse DFT the
//! transmitter uses for data symbols, so detector, correlator, and
//! channel estimator always agree with what the frame builder emits.

use num_complex::Complex32;
use once_cell::sync::Lazy;

use crate::fft::Ofdm64;

/// Samples per STS repetition.
pub const STS_LENGTH: usize = 16;
/// Samples per LTS symbol.
pub const LTS_LENGTH: usize = 64;
/// STS section plus LTS section (10 x 16 + 32 CP + 2 x 64).
pub const PREAMBLE_LENGTH: usize = 320;

const SQRT_13_6: f32 = 1.471_960_1;

/// Scale applied to every transmitted time-domain sample so a symbol with
/// 52 active unit subcarriers averages unit power on air. The channel
/// estimator removes it again on the receive side like any other flat
/// channel gain.
pub const TIME_SCALE: f32 = 8.875_203;

/// Frequency-domain short training sequence in the shifted layout: twelve
/// subcarriers at multiples of four carry `±(1+j)·sqrt(13/6)`.
pub static STS_FREQ: Lazy<[Complex32; 64]> = Lazy::new(|| {
    let mut sts = [Complex32::new(0.0, 0.0); 64];
    let plus = Complex32::new(SQRT_13_6, SQRT_13_6);
    for k in [-24i32, -16, -4, 12, 16, 20, 24] {
        sts[(k + 32) as usize] = plus;
    }
    for k in [-20i32, -12, -8, 4, 8] {
        sts[(k + 32) as usize] = -plus;
    }
    sts
});

/// Frequency-domain long training sequence in the shifted layout (BPSK
/// over the 52 active subcarriers, zero on DC and the guard bands).
#[rustfmt::skip]
pub static LTS_FREQ: Lazy<[Complex32; 64]> = Lazy::new(|| {
    const BITS: [i8; 64] = [
        0, 0, 0, 0, 0, 0,
        1, 1, -1, -1, 1, 1, -1, 1, -1, 1, 1, 1, 1, 1, 1, -1, -1, 1, 1, -1,
        1, -1, 1, 1, 1, 1,
        0,
        1, -1, -1, 1, 1, -1, 1, -1, 1, -1, -1, -1, -1, -1, 1, 1, -1, -1, 1,
        -1, 1, -1, 1, 1, 1, 1,
        0, 0, 0, 0, 0,
    ];
    let mut lts = [Complex32::new(0.0, 0.0); 64];
    for (l, b) in lts.iter_mut().zip(BITS.iter()) {
        *l = Complex32::new(*b as f32, 0.0);
    }
    lts
});

/// One period of the time-domain STS.
pub static STS_TIME: Lazy<[Complex32; STS_LENGTH]> = Lazy::new(|| {
    let mut time = STS_FREQ.to_vec();
    Ofdm64::new().inverse(&mut time);
    for s in time.iter_mut() {
        *s *= TIME_SCALE;
    }
    // only every fourth subcarrier is active, so the symbol repeats with
    // period 16
    time[..STS_LENGTH].try_into().unwrap()
});

/// The time-domain LTS symbol.
pub static LTS_TIME: Lazy<[Complex32; LTS_LENGTH]> = Lazy::new(|| {
    let mut time = LTS_FREQ.to_vec();
    Ofdm64::new().inverse(&mut time);
    for s in time.iter_mut() {
        *s *= TIME_SCALE;
    }
    time.as_slice().try_into().unwrap()
});

/// Complex conjugate of the time-domain LTS, the matched filter the
/// timing-sync stage correlates against.
pub static LTS_TIME_CONJ: Lazy<[Complex32; LTS_LENGTH]> = Lazy::new(|| {
    let mut conj = *LTS_TIME;
    for s in conj.iter_mut() {
        *s = s.conj();
    }
    conj
});

/// The complete 320-sample preamble: ten STS repetitions followed by a
/// 32-sample cyclic prefix and two LTS symbols.
pub static PREAMBLE: Lazy<[Complex32; PREAMBLE_LENGTH]> = Lazy::new(|| {
    let mut samples = [Complex32::new(0.0, 0.0); PREAMBLE_LENGTH];
    for rep in 0..10 {
        samples[rep * STS_LENGTH..(rep + 1) * STS_LENGTH].copy_from_slice(&*STS_TIME);
    }
    samples[160..192].copy_from_slice(&LTS_TIME[32..]);
    samples[192..256].copy_from_slice(&*LTS_TIME);
    samples[256..320].copy_from_slice(&*LTS_TIME);
    samples
});
