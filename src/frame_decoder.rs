//! Final stage: SIGNAL header decoding, frame accumulation, and payload
//! recovery.

use num_complex::Complex32;
use tracing::debug;

use crate::ppdu::{PlcpHeader, Ppdu};
use crate::sample::{Tag, TaggedSymbol};
use crate::stage::Stage;

struct FrameInProgress {
    header: PlcpHeader,
    samples: Vec<Complex32>,
    copied: usize,
}

impl FrameInProgress {
    fn sample_count(&self) -> usize {
        self.header.num_symbols * 48
    }
}

/// Collects equalized data subcarriers symbol by symbol. A StartOfFrame
/// symbol is decoded as a SIGNAL header; if its parity and rate field
/// check out, the indicated number of data symbols is accumulated and
/// decoded in one shot. Only payloads with a valid CRC leave this stage;
/// every failure is local and silent apart from a single log line.
pub struct FrameDecoder {
    frame: Option<FrameInProgress>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder { frame: None }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FrameDecoder {
    type In = TaggedSymbol<48>;
    type Out = Vec<u8>;

    fn name(&self) -> &'static str {
        "frame_decoder"
    }

    fn work(&mut self, input: Vec<TaggedSymbol<48>>) -> Vec<Vec<u8>> {
        let mut output = Vec::new();

        for symbol in &input {
            if let Some(mut frame) = self.frame.take() {
                if frame.copied < frame.sample_count() {
                    frame.samples.extend_from_slice(&symbol.samples);
                    frame.copied += 48;
                }

                if frame.copied >= frame.sample_count() {
                    if let Some(ppdu) = Ppdu::decode_data(&frame.header, &frame.samples) {
                        output.push(ppdu.payload);
                    }
                } else {
                    self.frame = Some(frame);
                }
            }

            if symbol.tag == Tag::StartOfFrame {
                match Ppdu::decode_header(&symbol.samples) {
                    Some(header) => {
                        debug!(
                            "frame start: {} bytes at {}",
                            header.length,
                            header.rate.params().name
                        );
                        self.frame = Some(FrameInProgress {
                            header,
                            samples: Vec::with_capacity(header.num_symbols * 48),
                            copied: 0,
                        });
                    }
                    None => {
                        self.frame = None;
                    }
                }
            }
        }
        output
    }
}
