//! # Chanlink Core
//!
//! One link of a noisy digital channel: fixed-size payloads are protected with a
//! [7,4] cyclic block code, pushed through a loss / single-bit-error model and
//! decoded with syndrome-based error detection.
//!
//! ## Modules
//!
//! - `constants`: Payload and block-code dimensions
//! - `types`: Core types (Segment, Transmission)
//! - `error`: Error taxonomy
//! - `bitstream`: Byte <-> bit conversion (MSB first)
//! - `codec`: [7,4] cyclic encoder / syndrome decoder
//! - `noise`: Frame loss and bit-flip simulation
//! - `channel`: The channel layer that ties the pipeline together
//! - `ingress`: Payload padding and send-time parsing for front ends

#![warn(missing_docs)]

pub mod bitstream;
pub mod channel;
pub mod codec;
pub mod constants;
pub mod error;
pub mod ingress;
pub mod noise;
pub mod types;

// Re-export commonly used types
pub use channel::{ChannelConfig, ChannelLayer};
pub use error::ChannelError;
pub use types::{Bit, Segment, Transmission};

/// Result type alias for Chanlink operations
pub type Result<T> = core::result::Result<T, ChannelError>;
