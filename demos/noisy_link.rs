//! Send a short message through a noisy channel, one segment at a time

use chanlink_core::constants::FIXED_PAYLOAD_SIZE;
use chanlink_core::ingress::build_segment;
use chanlink_core::{ChannelConfig, ChannelLayer, Transmission};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Chanlink Noisy Link Example\n");

    let channel = ChannelLayer::new(ChannelConfig::new(0.3, 0.1))?;
    let message = "Segments of this message travel through a channel that loses \
                   whole frames and flips single bits. The [7,4] code catches every \
                   single-bit error, so a flagged segment is never mistaken for a clean one.";

    let chunks: Vec<&[u8]> = message.as_bytes().chunks(FIXED_PAYLOAD_SIZE).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        let segment = build_segment(chunk, "2024-05-01T09:00:00Z", chunks.len() as u32, i as u32 + 1)?;

        match channel.process_segment(segment) {
            Transmission::Lost => println!("Segment {}: lost", i + 1),
            Transmission::Delivered(out) if out.is_channel_error => {
                println!("Segment {}: delivered with a detected error", i + 1)
            }
            Transmission::Delivered(out) => {
                let text = String::from_utf8_lossy(&out.payload);
                println!("Segment {}: {}", i + 1, text.trim_end_matches('\0'));
            }
        }
    }

    Ok(())
}
