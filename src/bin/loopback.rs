//! Loopback demo: frames go out through a transmitter into an in-memory
//! device and come back through the full receive pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use wlan_phy::device::Loopback;
use wlan_phy::{logging, Rate, Receiver, Transmitter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RateArg {
    Bpsk12,
    Bpsk23,
    Bpsk34,
    Qpsk12,
    Qpsk23,
    Qpsk34,
    Qam16_12,
    Qam16_23,
    Qam16_34,
    Qam64_23,
    Qam64_34,
}

impl From<RateArg> for Rate {
    fn from(arg: RateArg) -> Rate {
        match arg {
            RateArg::Bpsk12 => Rate::Bpsk1_2,
            RateArg::Bpsk23 => Rate::Bpsk2_3,
            RateArg::Bpsk34 => Rate::Bpsk3_4,
            RateArg::Qpsk12 => Rate::Qpsk1_2,
            RateArg::Qpsk23 => Rate::Qpsk2_3,
            RateArg::Qpsk34 => Rate::Qpsk3_4,
            RateArg::Qam16_12 => Rate::Qam16_1_2,
            RateArg::Qam16_23 => Rate::Qam16_2_3,
            RateArg::Qam16_34 => Rate::Qam16_3_4,
            RateArg::Qam64_23 => Rate::Qam64_2_3,
            RateArg::Qam64_34 => Rate::Qam64_3_4,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "send frames through the PHY and back")]
struct Args {
    /// PHY rate for the data symbols
    #[arg(short, long, value_enum, default_value = "qpsk12")]
    rate: RateArg,

    /// Number of frames to send
    #[arg(short, long, default_value_t = 10)]
    frames: usize,

    /// Payload carried by every frame
    #[arg(short, long, default_value = "Hello 802.11a!")]
    message: String,

    /// Seconds to wait for the last frame to decode
    #[arg(long, default_value_t = 5)]
    timeout: u64,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let device = Loopback::new();
    let received = Arc::new(AtomicUsize::new(0));

    let counter = received.clone();
    let _receiver = Receiver::new(device.clone(), move |payloads| {
        for payload in payloads {
            counter.fetch_add(1, Ordering::SeqCst);
            println!("payload: {}", String::from_utf8_lossy(&payload));
        }
    });

    let mut tx = Transmitter::new(device);
    for _ in 0..args.frames {
        tx.send_frame(args.message.as_bytes(), args.rate.into())?;
    }

    let deadline = Instant::now() + Duration::from_secs(args.timeout);
    while received.load(Ordering::SeqCst) < args.frames && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }

    let got = received.load(Ordering::SeqCst);
    println!("received {got}/{} frames", args.frames);
    Ok(())
}
