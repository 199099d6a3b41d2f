//! Noise-free end-to-end tests: frames built by the transmit path must
//! come back out of the receive pipeline byte for byte.

use num_complex::Complex32;
use wlan_phy::{FrameBuilder, Rate, ReceiverChain};

const TEA_POT: &str = "I'm a little tea pot, short and stout.....here is my \
                       handle.....blah blah blah.....this rhyme sucks!";

fn zeros(n: usize) -> Vec<Complex32> {
    vec![Complex32::new(0.0, 0.0); n]
}

/// Feed a signal through the pipeline in fixed-size chunks and collect
/// every decoded payload, flushing the pipeline afterwards.
fn run_chain(signal: &[Complex32], chunk: usize) -> Vec<Vec<u8>> {
    let mut chain = ReceiverChain::new();
    let mut payloads = Vec::new();
    for batch in signal.chunks(chunk) {
        payloads.extend(chain.process_samples(batch.to_vec()));
    }
    for _ in 0..ReceiverChain::latency_batches() + 1 {
        payloads.extend(chain.process_samples(zeros(chunk)));
    }
    payloads
}

#[test]
fn hello_world_at_bpsk_half() {
    let mut fb = FrameBuilder::new();
    let mut signal = zeros(1000);
    signal.extend(fb.build_frame(b"Hello World", Rate::Bpsk1_2));
    signal.extend(zeros(1000));

    let payloads = run_chain(&signal, 4096);
    assert_eq!(payloads, vec![b"Hello World".to_vec()]);
}

#[test]
fn every_rate_roundtrips() {
    let mut fb = FrameBuilder::new();
    for rate in Rate::ALL {
        for len in [1usize, 100, 1500] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            let mut signal = zeros(1000);
            signal.extend(fb.build_frame(&payload, rate));
            signal.extend(zeros(1000));

            let payloads = run_chain(&signal, 4096);
            assert_eq!(
                payloads,
                vec![payload],
                "{} with {len} bytes",
                rate.params().name
            );
        }
    }
}

#[test]
fn ten_tea_pot_frames_chunked() {
    // 15 repetitions of the 100-character rhyme: 1500 bytes
    let payload: Vec<u8> = TEA_POT.as_bytes().repeat(15);
    assert_eq!(payload.len(), 1500);

    let mut fb = FrameBuilder::new();
    let frame = fb.build_frame(&payload, Rate::Qam16_3_4);

    let mut signal = zeros(1000);
    for _ in 0..10 {
        signal.extend_from_slice(&frame);
        signal.extend(zeros(1000));
    }

    let payloads = run_chain(&signal, 4096);
    assert_eq!(payloads.len(), 10);
    for received in payloads {
        assert_eq!(received, payload);
    }
}

#[test]
fn corrupted_frame_emits_nothing() {
    let mut fb = FrameBuilder::new();
    let mut frame = fb.build_frame(b"this payload will not survive", Rate::Qpsk2_3);
    // invert two whole data symbols after preamble and SIGNAL: far more
    // than the code can repair, so only the CRC gate can catch it
    for s in frame.iter_mut().skip(320 + 80).take(160) {
        *s = -*s;
    }

    let mut signal = zeros(1000);
    signal.extend(frame);
    signal.extend(zeros(1000));

    let payloads = run_chain(&signal, 4096);
    assert!(payloads.is_empty());
}

#[test]
fn preamble_without_data_emits_nothing() {
    use wlan_phy::preamble::PREAMBLE;
    let mut signal = zeros(1000);
    signal.extend_from_slice(&*PREAMBLE);
    signal.extend(zeros(4096));

    let payloads = run_chain(&signal, 1024);
    assert!(payloads.is_empty());
}

#[test]
fn back_to_back_frames_all_decode() {
    // pipeline liveness: N frames with inter-frame gaps yield exactly N
    // payloads
    let mut fb = FrameBuilder::new();
    let mut signal = zeros(500);
    for i in 0..5u8 {
        let payload = vec![i; 64];
        signal.extend(fb.build_frame(&payload, Rate::Bpsk3_4));
        signal.extend(zeros(500));
    }

    let payloads = run_chain(&signal, 2048);
    assert_eq!(payloads.len(), 5);
    for (i, p) in payloads.iter().enumerate() {
        assert_eq!(p, &vec![i as u8; 64]);
    }
}
