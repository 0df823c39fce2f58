//! Frame loss and single-bit error simulation.
//!
//! Each frame goes through two draws in a fixed order:
//!
//! 1. `u1 <= loss_probability`: the whole frame is lost, nothing else happens.
//! 2. `u2 <= error_probability`: one uniformly chosen bit is flipped in place.
//!
//! At most one bit is ever flipped per frame, whatever its length.

use crate::error::ChannelError;
use crate::types::Bit;
use rand::Rng;

#[cfg(feature = "logging")]
use tracing::debug;

/// What the channel did to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseOutcome {
    /// The frame was dropped; its bits must not be used
    Lost,
    /// Exactly one bit was flipped at `index`
    Corrupted {
        /// Position of the flipped bit within the frame
        index: usize,
    },
    /// The frame passed through untouched
    Clean,
}

/// Loss / bit-error model of the channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSimulator {
    error_probability: f64,
    loss_probability: f64,
}

impl NoiseSimulator {
    /// Create a simulator, rejecting probabilities outside [0, 1]
    pub fn new(error_probability: f64, loss_probability: f64) -> Result<Self, ChannelError> {
        Ok(Self {
            error_probability: check_probability("error", error_probability)?,
            loss_probability: check_probability("loss", loss_probability)?,
        })
    }

    /// Probability P that a surviving frame gets one bit flipped
    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }

    /// Probability R that a frame is lost
    pub fn loss_probability(&self) -> f64 {
        self.loss_probability
    }

    /// Run one frame through the channel, flipping at most one bit in place
    pub fn apply<R: Rng + ?Sized>(&self, rng: &mut R, frame: &mut [Bit]) -> NoiseOutcome {
        let loss_draw: f64 = rng.gen();
        if loss_draw <= self.loss_probability {
            #[cfg(feature = "logging")]
            debug!("Frame lost (draw {:.6} <= R {:.4})", loss_draw, self.loss_probability);
            return NoiseOutcome::Lost;
        }

        let error_draw: f64 = rng.gen();
        if error_draw > self.error_probability || frame.is_empty() {
            return NoiseOutcome::Clean;
        }

        let index = rng.gen_range(0..frame.len());
        frame[index] = !frame[index];

        #[cfg(feature = "logging")]
        debug!("Flipped bit {} of {}-bit frame", index, frame.len());

        NoiseOutcome::Corrupted { index }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<f64, ChannelError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ChannelError::InvalidProbability { name, value })
    }
}
