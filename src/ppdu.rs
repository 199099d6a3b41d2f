//! PLCP protocol data unit: SIGNAL header plus coded payload.
//!
//! Encoding runs payload bytes through scrambling, convolutional coding,
//! puncturing, interleaving and QAM mapping; decoding is the exact
//! inverse, gated by the header parity bit and the payload CRC-32.

use num_complex::Complex32;
use tracing::{debug, warn};

use crate::interleaver;
use crate::puncturer;
use crate::qam;
use crate::rate::{Rate, RateParams};
use crate::viterbi;

/// Longest payload the PHY accepts.
pub const MAX_PAYLOAD_SIZE: usize = 1500;

const SCRAMBLER_SEED: u8 = 93;
/// SERVICE(16) ‖ payload ‖ CRC-32 ‖ tail(6), in bits.
fn used_bits(length: usize) -> usize {
    16 + 8 * (length + 4) + 6
}

/// Decoded SIGNAL header fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlcpHeader {
    pub rate: Rate,
    pub length: usize,
    pub num_symbols: usize,
    pub service: u16,
}

impl PlcpHeader {
    pub fn new(rate: Rate, length: usize) -> Self {
        PlcpHeader {
            rate,
            length,
            num_symbols: rate.params().n_symbols(length),
            service: 0,
        }
    }
}

/// A PHY frame: header plus payload, encodable to and decodable from
/// 48-sample data-subcarrier symbols.
#[derive(Clone, Debug)]
pub struct Ppdu {
    pub header: PlcpHeader,
    pub payload: Vec<u8>,
}

impl Ppdu {
    pub fn new(payload: &[u8], rate: Rate) -> Self {
        assert!(payload.len() <= MAX_PAYLOAD_SIZE, "payload too large");
        Ppdu {
            header: PlcpHeader::new(rate, payload.len()),
            payload: payload.to_vec(),
        }
    }

    /// Encode header and payload into `48 * (1 + num_symbols)` data
    /// subcarrier samples.
    pub fn encode(&self) -> Vec<Complex32> {
        let mut samples = self.encode_header();
        samples.extend(self.encode_data());
        samples
    }

    /// The SIGNAL symbol: 24 header bits, rate-1/2 coded, interleaved and
    /// BPSK mapped. Never scrambled.
    fn encode_header(&self) -> Vec<Complex32> {
        let params = self.header.rate.params();
        let bits = signal_bits(params.rate_field, self.header.length);
        let mut bytes = [0u8; 3];
        for (i, b) in bits.iter().enumerate() {
            bytes[i / 8] |= *b << (7 - i % 8);
        }

        let coded = viterbi::conv_encode(&bytes, 18);
        let interleaved = interleaver::interleave(&coded, 48, 1);
        qam::modulate(&interleaved, &Rate::Bpsk1_2.params())
    }

    fn encode_data(&self) -> Vec<Complex32> {
        let params = self.header.rate.params();
        let length = self.payload.len();
        let num_data_bits = self.header.num_symbols * params.dbps;
        let num_bytes = num_data_bits.div_ceil(8);

        // SERVICE (zeros) ‖ payload ‖ CRC-32 ‖ tail ‖ pad
        let mut data = vec![0u8; num_bytes];
        data[2..2 + length].copy_from_slice(&self.payload);
        let crc = crc32fast::hash(&data[..2 + length]);
        data[2 + length..2 + length + 4].copy_from_slice(&crc.to_le_bytes());

        scramble(&mut data);
        // reset tail and pad so the encoder terminates in state 0
        clear_bits(&mut data, used_bits(length) - 6, num_data_bits);

        let coded = viterbi::conv_encode(&data, num_data_bits - 6);
        let punctured = puncturer::puncture(&coded, &params);
        let interleaved = interleaver::interleave(&punctured, params.cbps, params.bpsc);
        qam::modulate(&interleaved, &params)
    }

    /// Try to decode a SIGNAL symbol. `None` on parity failure or an
    /// unknown rate field.
    pub fn decode_header(samples: &[Complex32]) -> Option<PlcpHeader> {
        assert_eq!(samples.len(), 48);
        let bpsk = Rate::Bpsk1_2.params();

        let soft = qam::demodulate(samples, &bpsk);
        let deinterleaved = interleaver::deinterleave(&soft, 48, 1);
        let bytes = viterbi::conv_decode(&deinterleaved, 18);

        let mut bits = [0u8; 18];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = (bytes[i / 8] >> (7 - i % 8)) & 1;
        }

        // even parity over rate, reserved and length
        if bits.iter().fold(0, |acc, b| acc ^ b) != 0 {
            debug!("header parity check failed");
            return None;
        }

        let rate_field = bits[0] << 3 | bits[1] << 2 | bits[2] << 1 | bits[3];
        let length = bits[5..17]
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, b)| acc | (*b as usize) << i);

        let Some(params) = RateParams::from_rate_field(rate_field) else {
            debug!("unknown rate field {rate_field:#x}");
            return None;
        };

        Some(PlcpHeader::new(params.rate, length))
    }

    /// Decode `num_symbols * 48` equalized data samples against a header.
    /// `None` (with one warning) when the CRC does not match.
    pub fn decode_data(header: &PlcpHeader, samples: &[Complex32]) -> Option<Ppdu> {
        let params = header.rate.params();
        let num_data_bits = header.num_symbols * params.dbps;

        let soft = qam::demodulate(samples, &params);
        let deinterleaved = interleaver::deinterleave(&soft, params.cbps, params.bpsc);
        let depunctured = puncturer::depuncture(&deinterleaved, &params);
        let mut bytes = viterbi::conv_decode(&depunctured, num_data_bits - 6);
        descramble(&mut bytes);

        if bytes.len() < 2 + header.length + 4 {
            warn!("Invalid CRC (length {})", header.length);
            return None;
        }

        let crc = crc32fast::hash(&bytes[..2 + header.length]);
        let given = u32::from_le_bytes(
            bytes[2 + header.length..2 + header.length + 4]
                .try_into()
                .expect("four CRC bytes"),
        );
        if crc != given {
            warn!("Invalid CRC (length {})", header.length);
            return None;
        }

        let service = u16::from_le_bytes(bytes[..2].try_into().expect("two SERVICE bytes"));
        Some(Ppdu {
            header: PlcpHeader {
                service,
                ..*header
            },
            payload: bytes[2..2 + header.length].to_vec(),
        })
    }
}

/// The 24 SIGNAL bits in transmit order: rate MSB-first, the reserved
/// bit, length LSB-first, even parity over the preceding 17 bits, and a
/// zero tail.
fn signal_bits(rate_field: u8, length: usize) -> [u8; 24] {
    let mut bits = [0u8; 24];
    for i in 0..4 {
        bits[i] = (rate_field >> (3 - i)) & 1;
    }
    for i in 0..12 {
        bits[5 + i] = ((length >> i) & 1) as u8;
    }
    bits[17] = bits[..17].iter().sum::<u8>() % 2;
    bits
}

/// Byte-clocked scrambler: the LFSR (feedback = bit 6 ⊕ bit 3, seed 93)
/// advances once per byte and its feedback bit is folded into the byte.
/// Running the identical circuit again undoes it, which is what the
/// receive side does.
fn scramble(data: &mut [u8]) {
    let mut state = SCRAMBLER_SEED;
    for byte in data.iter_mut() {
        let feedback = u8::from(state & 64 != 0) ^ u8::from(state & 8 != 0);
        *byte ^= feedback;
        state = ((state << 1) & 0x7e) | feedback;
    }
}

fn descramble(data: &mut [u8]) {
    scramble(data);
}

fn clear_bits(data: &mut [u8], from: usize, to: usize) {
    for i in from..to {
        data[i / 8] &= !(1 << (7 - i % 8));
    }
}
