//! Public transmitter: frame building plus a synchronous burst out of the
//! device.

use anyhow::{bail, Result};

use crate::device::SampleDevice;
use crate::frame_builder::FrameBuilder;
use crate::ppdu::MAX_PAYLOAD_SIZE;
use crate::rate::Rate;

pub struct Transmitter<D: SampleDevice> {
    device: D,
    frame_builder: FrameBuilder,
}

impl<D: SampleDevice> Transmitter<D> {
    pub fn new(device: D) -> Self {
        Transmitter {
            device,
            frame_builder: FrameBuilder::new(),
        }
    }

    /// Encode one payload at the given PHY rate and transmit it, blocking
    /// until the burst has left the device.
    pub fn send_frame(&mut self, payload: &[u8], rate: Rate) -> Result<()> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            bail!(
                "frame too large ({} bytes, max {MAX_PAYLOAD_SIZE})",
                payload.len()
            );
        }
        let samples = self.frame_builder.build_frame(payload, rate);
        self.device.send_burst_sync(&samples)?;
        Ok(())
    }
}
