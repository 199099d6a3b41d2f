//! IEEE 802.11a OFDM PHY.
//!
//! The transmit side turns payload bytes into complex baseband samples
//! ([`FrameBuilder`], [`Transmitter`]); the receive side is a chain of six
//! concurrently executed DSP stages that recovers payloads from a
//! continuous sample stream ([`ReceiverChain`], [`Receiver`]).

pub mod accumulator;
pub mod config;
pub mod device;
pub mod logging;

mod fft;
pub use fft::Ofdm64;

mod rate;
pub use rate::{Rate, RateParams};

mod sample;
pub use sample::{Tag, TaggedSample, TaggedSymbol};

pub mod preamble;

mod qam;
pub use qam::{demodulate, modulate};

pub mod interleaver;
pub mod puncturer;

mod viterbi;
pub use viterbi::{conv_decode, conv_encode};

mod ppdu;
pub use ppdu::{PlcpHeader, Ppdu, MAX_PAYLOAD_SIZE};

mod symbol_mapper;
pub use symbol_mapper::SymbolMapper;

mod frame_builder;
pub use frame_builder::FrameBuilder;

mod frame_detector;
pub use frame_detector::FrameDetector;

mod timing_sync;
pub use timing_sync::TimingSync;

mod fft_symbols;
pub use fft_symbols::FftSymbols;

mod channel_est;
pub use channel_est::ChannelEstimator;

mod phase_tracker;
pub use phase_tracker::PhaseTracker;

mod frame_decoder;
pub use frame_decoder::FrameDecoder;

mod stage;
pub use stage::Stage;

mod receiver_chain;
pub use receiver_chain::ReceiverChain;

mod receiver;
pub use receiver::Receiver;

mod transmitter;
pub use transmitter::Transmitter;

/// Polarity of the pilot subcarriers, one entry per OFDM symbol starting
/// with the SIGNAL symbol and repeating every 127 symbols.
#[rustfmt::skip]
pub const POLARITY: [f32; 127] = [
     1.0,  1.0,  1.0,  1.0, -1.0, -1.0, -1.0,  1.0, -1.0, -1.0, -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0,  1.0,
     1.0,  1.0, -1.0,  1.0,  1.0, -1.0, -1.0,  1.0,  1.0,  1.0, -1.0,  1.0, -1.0, -1.0, -1.0,  1.0,
    -1.0,  1.0, -1.0, -1.0,  1.0, -1.0, -1.0,  1.0,  1.0,  1.0,  1.0,  1.0, -1.0, -1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0, -1.0,  1.0, -1.0,  1.0,  1.0, -1.0, -1.0, -1.0,  1.0,  1.0, -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0, -1.0,  1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,  1.0, -1.0,  1.0,  1.0, -1.0,  1.0, -1.0,  1.0,  1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0, -1.0, -1.0,  1.0,  1.0,  1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0,
];
