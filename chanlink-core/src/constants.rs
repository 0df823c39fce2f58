//! Constants and limits for the Chanlink channel model

/// Fixed payload size in bytes carried by every segment (after padding)
pub const FIXED_PAYLOAD_SIZE: usize = 140;

/// k: information bits per [7,4] block
pub const INFO_BITS_PER_BLOCK: usize = 4;

/// n: coded bits per [7,4] block
pub const CODED_BITS_PER_BLOCK: usize = 7;

/// Parity bits per block (n - k)
pub const PARITY_BITS_PER_BLOCK: usize = CODED_BITS_PER_BLOCK - INFO_BITS_PER_BLOCK;

/// Payload length in bits (140 * 8 = 1120)
pub const PAYLOAD_BIT_LENGTH: usize = FIXED_PAYLOAD_SIZE * 8;

/// Number of [7,4] blocks per payload (1120 / 4 = 280)
pub const NUM_CODING_BLOCKS: usize = PAYLOAD_BIT_LENGTH / INFO_BITS_PER_BLOCK;

/// Length of the encoded frame in bits (280 * 7 = 1960)
pub const ENCODED_BIT_LENGTH: usize = NUM_CODING_BLOCKS * CODED_BITS_PER_BLOCK;

/// Length of the encoded frame when packed into bytes (1960 / 8 = 245)
pub const ENCODED_BYTE_LENGTH: usize = ENCODED_BIT_LENGTH / 8;

/// Largest request body accepted by front ends, in bytes
pub const MAX_REQUEST_BYTES: usize = 1024;

const _: () = assert!(PAYLOAD_BIT_LENGTH % INFO_BITS_PER_BLOCK == 0);
const _: () = assert!(ENCODED_BIT_LENGTH % 8 == 0);
const _: () = assert!(NUM_CODING_BLOCKS * INFO_BITS_PER_BLOCK == PAYLOAD_BIT_LENGTH);
