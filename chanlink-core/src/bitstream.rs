//! Byte <-> bit stream conversion.
//!
//! Bits are emitted most-significant first: the byte `0b1011_0100` becomes
//! `[1, 0, 1, 1, 0, 1, 0, 0]`.

use crate::error::ChannelError;
use crate::types::Bit;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::warn;

/// Expand bytes into a bit stream, MSB first
pub fn bytes_to_bits(data: &[u8]) -> Vec<Bit> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Pack a bit stream into bytes, first bit of each group of 8 as the MSB
///
/// Trailing bits that do not fill a whole byte are dropped and a warning is
/// logged.
pub fn bits_to_bytes(bits: &[Bit]) -> Bytes {
    let whole = bits.len() / 8 * 8;
    if whole != bits.len() {
        #[cfg(feature = "logging")]
        warn!(
            "{}; truncating to {}",
            ChannelError::TruncatedBitStream(bits.len()),
            whole
        );
    }
    pack(&bits[..whole])
}

/// Pack a bit stream into bytes, rejecting lengths that are not a multiple of 8
pub fn try_bits_to_bytes(bits: &[Bit]) -> Result<Bytes, ChannelError> {
    if bits.len() % 8 != 0 {
        return Err(ChannelError::TruncatedBitStream(bits.len()));
    }
    Ok(pack(bits))
}

fn pack(bits: &[Bit]) -> Bytes {
    bits.chunks_exact(8)
        .map(|group| {
            group
                .iter()
                .fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit))
        })
        .collect::<Vec<u8>>()
        .into()
}
