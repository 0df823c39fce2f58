//! The channel layer: encode, impair, decode.
//!
//! [`ChannelLayer::process_segment`] runs a fixed sequence per call:
//!
//! 1. validate the payload size
//! 2. expand the payload to bits and encode 280 blocks with the [7,4] code
//! 3. run the 1960-bit frame through the [`NoiseSimulator`]
//! 4. decode all blocks, OR-ing their error flags
//! 5. pack the information bits back into a 140-byte payload
//!
//! Loss is the only early exit that does not produce a segment. Every
//! invariant violation resolves to a delivered segment with an empty payload
//! and `is_channel_error` set.

use crate::bitstream::{bits_to_bytes, bytes_to_bits};
use crate::codec::{decode_frame, encode_frame, Cyclic74};
use crate::constants::{ENCODED_BIT_LENGTH, FIXED_PAYLOAD_SIZE, NUM_CODING_BLOCKS, PAYLOAD_BIT_LENGTH};
use crate::error::ChannelError;
use crate::noise::{NoiseOutcome, NoiseSimulator};
use crate::types::{Segment, Transmission};
use bytes::Bytes;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "logging")]
use tracing::{debug, error, info};

/// Channel impairment configuration, fixed for the lifetime of a layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// P: probability that a surviving frame gets one bit flipped
    pub error_probability: f64,

    /// R: probability that a whole frame is lost
    pub loss_probability: f64,
}

impl ChannelConfig {
    /// Create a new configuration
    pub const fn new(error_probability: f64, loss_probability: f64) -> Self {
        Self {
            error_probability,
            loss_probability,
        }
    }
}

/// Detailed account of one pass through the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReport {
    /// What the caller receives
    pub transmission: Transmission,

    /// What the noise step did; `None` when the segment was rejected before it
    pub noise: Option<NoiseOutcome>,

    /// Blocks whose syndrome check failed
    pub flagged_blocks: Vec<usize>,
}

/// Simulated unreliable link between two protocol layers
///
/// The layer is `Send + Sync`; share one instance by reference or `Arc`.
/// Only the random source mutates, and it sits behind a mutex.
#[derive(Debug)]
pub struct ChannelLayer {
    config: ChannelConfig,
    noise: NoiseSimulator,
    code: Cyclic74,
    rng: Mutex<StdRng>,
}

impl ChannelLayer {
    /// Create a channel layer seeded from OS entropy
    pub fn new(config: ChannelConfig) -> Result<Self, ChannelError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a channel layer with a fixed seed for reproducible runs
    pub fn with_seed(config: ChannelConfig, seed: u64) -> Result<Self, ChannelError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ChannelConfig, rng: StdRng) -> Result<Self, ChannelError> {
        let noise = NoiseSimulator::new(config.error_probability, config.loss_probability)?;

        #[cfg(feature = "logging")]
        info!(
            "Channel layer created with bit error probability P={:.4} and frame loss probability R={:.4}",
            config.error_probability, config.loss_probability
        );

        Ok(Self {
            config,
            noise,
            code: Cyclic74,
            rng: Mutex::new(rng),
        })
    }

    /// The configuration this layer was built with
    pub fn config(&self) -> ChannelConfig {
        self.config
    }

    /// Push one segment through the simulated channel
    pub fn process_segment(&self, input: Segment) -> Transmission {
        self.process_segment_with_report(input).transmission
    }

    /// Like [`process_segment`](Self::process_segment), but also report what
    /// the noise step did and which blocks were flagged
    pub fn process_segment_with_report(&self, input: Segment) -> ChannelReport {
        #[cfg(feature = "logging")]
        debug!(
            "Received segment #{}/{} (timestamp {}), payload {} bytes",
            input.segment_number,
            input.total_segments,
            input.timestamp,
            input.payload.len()
        );

        if !input.has_fixed_size() {
            return reject(
                &input,
                ChannelError::PayloadSizeMismatch {
                    expected: FIXED_PAYLOAD_SIZE,
                    actual: input.payload.len(),
                },
            );
        }

        let payload_bits = bytes_to_bits(&input.payload);
        if payload_bits.len() != PAYLOAD_BIT_LENGTH {
            return reject(
                &input,
                ChannelError::BitLengthMismatch {
                    expected: PAYLOAD_BIT_LENGTH,
                    actual: payload_bits.len(),
                },
            );
        }

        let mut frame = encode_frame(&self.code, &payload_bits);
        if frame.len() != ENCODED_BIT_LENGTH {
            return reject(
                &input,
                ChannelError::BitLengthMismatch {
                    expected: ENCODED_BIT_LENGTH,
                    actual: frame.len(),
                },
            );
        }

        #[cfg(feature = "logging")]
        debug!(
            "Encoded {} bits into {} bits ({} [7,4] blocks)",
            PAYLOAD_BIT_LENGTH, ENCODED_BIT_LENGTH, NUM_CODING_BLOCKS
        );

        let noise = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.noise.apply(&mut *rng, &mut frame)
        };

        if noise == NoiseOutcome::Lost {
            #[cfg(feature = "logging")]
            info!(
                "Segment #{}/{} lost in the channel",
                input.segment_number, input.total_segments
            );
            return ChannelReport {
                transmission: Transmission::Lost,
                noise: Some(noise),
                flagged_blocks: Vec::new(),
            };
        }

        let decoded = decode_frame(&self.code, &frame);
        let is_channel_error = decoded.has_errors();

        #[cfg(feature = "logging")]
        if is_channel_error {
            info!(
                "Segment #{}/{}: syndrome check failed in blocks {:?}",
                input.segment_number, input.total_segments, decoded.flagged_blocks
            );
        }

        let payload = bits_to_bytes(&decoded.bits);
        if payload.len() != FIXED_PAYLOAD_SIZE {
            return reject(
                &input,
                ChannelError::PayloadSizeMismatch {
                    expected: FIXED_PAYLOAD_SIZE,
                    actual: payload.len(),
                },
            );
        }

        ChannelReport {
            transmission: Transmission::Delivered(input.reply(payload, is_channel_error)),
            noise: Some(noise),
            flagged_blocks: decoded.flagged_blocks,
        }
    }
}

fn reject(input: &Segment, err: ChannelError) -> ChannelReport {
    #[cfg(feature = "logging")]
    error!(
        "Segment #{}/{} rejected: {}",
        input.segment_number, input.total_segments, err
    );
    #[cfg(not(feature = "logging"))]
    let _ = err;

    ChannelReport {
        transmission: Transmission::Delivered(input.reply(Bytes::new(), true)),
        noise: None,
        flagged_blocks: Vec::new(),
    }
}
