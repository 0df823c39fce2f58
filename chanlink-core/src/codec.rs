//! [7,4] cyclic block code with generator polynomial g(x) = x^3 + x + 1.
//!
//! A 4-bit information block `[i3, i2, i1, i0]` becomes the systematic
//! codeword `[i3, i2, i1, i0, r2, r1, r0]` with parity (over GF(2)):
//!
//! ```text
//! r0 = i0 ^ i1 ^ i3
//! r1 = i0 ^ i2 ^ i3
//! r2 = i1 ^ i2 ^ i3
//! ```
//!
//! A received word `[v6, v5, v4, v3, v2, v1, v0]` is checked with the
//! syndrome
//!
//! ```text
//! s0 = v0 ^ v3 ^ v4 ^ v6
//! s1 = v1 ^ v3 ^ v5 ^ v6
//! s2 = v2 ^ v4 ^ v5 ^ v6
//! ```
//!
//! The decoder only detects errors. Information bits are always taken from
//! `[v6, v5, v4, v3]`, even when the syndrome is nonzero, so a flagged block
//! carries untrusted (not discarded) bits.

use crate::constants::{CODED_BITS_PER_BLOCK, INFO_BITS_PER_BLOCK};
use crate::error::ChannelError;
use crate::types::Bit;

#[cfg(feature = "logging")]
use tracing::error;

/// One 4-bit information block, `[i3, i2, i1, i0]`
pub type InfoBlock = [Bit; INFO_BITS_PER_BLOCK];

/// One 7-bit codeword, `[i3, i2, i1, i0, r2, r1, r0]`
pub type Codeword = [Bit; CODED_BITS_PER_BLOCK];

/// 3-bit syndrome of a received word, stored as `0b0000_0s2s1s0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Syndrome(u8);

impl Syndrome {
    /// Syndrome of a valid codeword
    pub const ZERO: Syndrome = Syndrome(0);

    /// Build a syndrome from its three bits
    pub const fn from_bits(s2: Bit, s1: Bit, s0: Bit) -> Self {
        Self(((s2 as u8) << 2) | ((s1 as u8) << 1) | (s0 as u8))
    }

    /// Raw value (0..=7)
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Check if the syndrome is zero (received word is a codeword)
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Bit s0
    pub const fn s0(&self) -> Bit {
        self.0 & 0b001 != 0
    }

    /// Bit s1
    pub const fn s1(&self) -> Bit {
        self.0 & 0b010 != 0
    }

    /// Bit s2
    pub const fn s2(&self) -> Bit {
        self.0 & 0b100 != 0
    }
}

/// Result of decoding one received block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedBlock {
    /// Information bits `[v6, v5, v4, v3]`, never corrected
    pub info: InfoBlock,

    /// Syndrome of the received word (zero for malformed input)
    pub syndrome: Syndrome,

    /// True when the syndrome is nonzero or the input was malformed
    pub error_detected: bool,
}

/// Encode one information block
///
/// Returns an all-zero codeword if `info` is not exactly 4 bits.
pub fn encode_block(info: &[Bit]) -> Codeword {
    let [i3, i2, i1, i0]: InfoBlock = match info.try_into() {
        Ok(block) => block,
        Err(_) => {
            report_malformed(INFO_BITS_PER_BLOCK, info.len());
            return [false; CODED_BITS_PER_BLOCK];
        }
    };

    let r0 = i0 ^ i1 ^ i3;
    let r1 = i0 ^ i2 ^ i3;
    let r2 = i1 ^ i2 ^ i3;

    [i3, i2, i1, i0, r2, r1, r0]
}

/// Compute the syndrome of a received 7-bit word
pub fn syndrome(received: &Codeword) -> Syndrome {
    let [v6, v5, v4, v3, v2, v1, v0] = *received;

    let s0 = v0 ^ v3 ^ v4 ^ v6;
    let s1 = v1 ^ v3 ^ v5 ^ v6;
    let s2 = v2 ^ v4 ^ v5 ^ v6;

    Syndrome::from_bits(s2, s1, s0)
}

/// Decode one received block
///
/// Returns zero information bits with `error_detected` set if `received` is
/// not exactly 7 bits.
pub fn decode_block(received: &[Bit]) -> DecodedBlock {
    let word: Codeword = match received.try_into() {
        Ok(word) => word,
        Err(_) => {
            report_malformed(CODED_BITS_PER_BLOCK, received.len());
            return DecodedBlock {
                info: [false; INFO_BITS_PER_BLOCK],
                syndrome: Syndrome::ZERO,
                error_detected: true,
            };
        }
    };

    let syndrome = syndrome(&word);

    DecodedBlock {
        info: [word[0], word[1], word[2], word[3]],
        syndrome,
        error_detected: !syndrome.is_zero(),
    }
}

fn report_malformed(expected: usize, actual: usize) {
    let err = ChannelError::MalformedBlock { expected, actual };
    #[cfg(feature = "logging")]
    error!("Internal error: {}; substituting a zero-filled block", err);
    #[cfg(not(feature = "logging"))]
    let _ = err;
}

/// A linear block code working on fixed-width blocks of bits
pub trait BlockCode {
    /// Information bits per block (k)
    const INFO_BITS: usize;

    /// Coded bits per block (n)
    const CODED_BITS: usize;

    /// Encode one block, appending `CODED_BITS` bits to `out`
    fn encode_into(&self, info: &[Bit], out: &mut Vec<Bit>);

    /// Decode one block, appending `INFO_BITS` bits to `out`
    ///
    /// Returns true when an error was detected in the block.
    fn decode_into(&self, received: &[Bit], out: &mut Vec<Bit>) -> bool;
}

/// The [7,4] cyclic code with g(x) = x^3 + x + 1
#[derive(Debug, Clone, Copy, Default)]
pub struct Cyclic74;

impl BlockCode for Cyclic74 {
    const INFO_BITS: usize = INFO_BITS_PER_BLOCK;
    const CODED_BITS: usize = CODED_BITS_PER_BLOCK;

    fn encode_into(&self, info: &[Bit], out: &mut Vec<Bit>) {
        out.extend_from_slice(&encode_block(info));
    }

    fn decode_into(&self, received: &[Bit], out: &mut Vec<Bit>) -> bool {
        let decoded = decode_block(received);
        out.extend_from_slice(&decoded.info);
        decoded.error_detected
    }
}

/// A decoded frame together with the blocks that failed their check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Concatenated information bits of all blocks, in block order
    pub bits: Vec<Bit>,

    /// Indices of blocks whose check failed, ascending
    pub flagged_blocks: Vec<usize>,
}

impl DecodedFrame {
    /// OR of all per-block error flags
    pub fn has_errors(&self) -> bool {
        !self.flagged_blocks.is_empty()
    }
}

/// Encode a bit stream block by block
///
/// The stream is split into consecutive, non-overlapping groups of
/// `C::INFO_BITS`; each group is encoded on its own and the codewords are
/// concatenated in order.
pub fn encode_frame<C: BlockCode>(code: &C, bits: &[Bit]) -> Vec<Bit> {
    let blocks = bits.len().div_ceil(C::INFO_BITS);
    let mut encoded = Vec::with_capacity(blocks * C::CODED_BITS);
    for info in bits.chunks(C::INFO_BITS) {
        code.encode_into(info, &mut encoded);
    }
    encoded
}

/// Decode an encoded bit stream block by block
pub fn decode_frame<C: BlockCode>(code: &C, bits: &[Bit]) -> DecodedFrame {
    let blocks = bits.len().div_ceil(C::CODED_BITS);
    let mut decoded = Vec::with_capacity(blocks * C::INFO_BITS);
    let mut flagged_blocks = Vec::new();
    for (index, received) in bits.chunks(C::CODED_BITS).enumerate() {
        if code.decode_into(received, &mut decoded) {
            flagged_blocks.push(index);
        }
    }
    DecodedFrame {
        bits: decoded,
        flagged_blocks,
    }
}
