use anyhow::{bail, Result};
use chanlink_core::bitstream::{bits_to_bytes, bytes_to_bits};
use chanlink_core::codec::{decode_block, decode_frame, encode_frame, Cyclic74};
use chanlink_core::constants::{CODED_BITS_PER_BLOCK, ENCODED_BIT_LENGTH};
use chanlink_core::ingress::pad_payload;
use colored::Colorize;
use serde::Serialize;

/// One block whose syndrome check failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedBlock {
    pub block: usize,
    /// Syndrome as s2 s1 s0
    pub syndrome: u8,
}

/// Encoded view of a single payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    /// Padded payload, hex
    pub payload_hex: String,
    /// Encoded frame packed MSB first, hex
    pub frame_hex: String,
    pub flipped_bit: Option<usize>,
    pub flagged: Vec<FlaggedBlock>,
    /// Decoded payload, hex
    pub decoded_hex: String,
}

/// Encode a payload, optionally flip one frame bit, and decode it again
pub fn inspect(payload: &str, flip: Option<usize>) -> Result<Inspection> {
    let padded = pad_payload(payload.as_bytes())?;
    let mut frame = encode_frame(&Cyclic74, &bytes_to_bits(&padded));

    if let Some(index) = flip {
        if index >= ENCODED_BIT_LENGTH {
            bail!(
                "Bit index {} out of range (frame has {} bits)",
                index,
                ENCODED_BIT_LENGTH
            );
        }
        frame[index] = !frame[index];
    }

    let decoded = decode_frame(&Cyclic74, &frame);
    let flagged = decoded
        .flagged_blocks
        .iter()
        .map(|&block| {
            let start = block * CODED_BITS_PER_BLOCK;
            let word = &frame[start..start + CODED_BITS_PER_BLOCK];
            FlaggedBlock {
                block,
                syndrome: decode_block(word).syndrome.as_u8(),
            }
        })
        .collect();

    Ok(Inspection {
        payload_hex: hex::encode(&padded),
        frame_hex: hex::encode(bits_to_bytes(&frame)),
        flipped_bit: flip,
        flagged,
        decoded_hex: hex::encode(bits_to_bytes(&decoded.bits)),
    })
}

pub fn execute(payload: &str, flip: Option<usize>, json: bool) -> Result<()> {
    let inspection = inspect(payload, flip)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("\n=== Frame Inspection ===");
    println!("Payload ({} hex chars): {}", inspection.payload_hex.len(), inspection.payload_hex);
    println!("Frame   ({} hex chars): {}", inspection.frame_hex.len(), inspection.frame_hex);
    if let Some(index) = inspection.flipped_bit {
        println!(
            "Flipped bit {} (block {}, position {})",
            index,
            index / CODED_BITS_PER_BLOCK,
            index % CODED_BITS_PER_BLOCK
        );
    }
    println!("Decoded ({} hex chars): {}", inspection.decoded_hex.len(), inspection.decoded_hex);

    if inspection.flagged.is_empty() {
        println!("{}", "All blocks passed the syndrome check".green());
    } else {
        for fb in &inspection.flagged {
            println!(
                "{}",
                format!("Block {} flagged, syndrome {:03b}", fb.block, fb.syndrome).red()
            );
        }
    }
    println!();

    Ok(())
}
