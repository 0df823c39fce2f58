//! Fuzzing entry points for chanlink-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_channel

use bytes::Bytes;
use chanlink_core::{ChannelConfig, ChannelLayer, Segment};

pub fn fuzz_decode(data: &[u8]) {
    use chanlink_core::bitstream::bytes_to_bits;
    use chanlink_core::codec::{decode_frame, Cyclic74};

    // Any bit pattern, of any length, must decode without panicking
    let _ = decode_frame(&Cyclic74, &bytes_to_bits(data));
}

pub fn fuzz_channel(data: &[u8]) {
    // First two bytes pick the probabilities, the rest is the payload
    let (p, r) = match data {
        [p, r, ..] => (*p as f64 / 255.0, *r as f64 / 255.0),
        _ => (0.0, 0.0),
    };
    let payload = data.get(2..).unwrap_or_default();

    let Ok(layer) = ChannelLayer::with_seed(ChannelConfig::new(p, r), 0) else {
        return;
    };
    let _ = layer.process_segment(Segment::new(Bytes::copy_from_slice(payload), 0, 1, 1));
}

pub fn fuzz_send_time(data: &[u8]) {
    use chanlink_core::ingress::parse_send_time;

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_send_time(s);
    }
}
