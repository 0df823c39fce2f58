//! Library entry for chanlink-cli used by integration tests and embedding.

pub mod commands;

use anyhow::{Context, Result};
use chanlink_core::{ChannelConfig, ChannelLayer};

// Re-export commands for convenience
pub use commands::*;

/// Build the process-wide channel layer from command-line settings
pub fn build_channel(
    error_probability: f64,
    loss_probability: f64,
    seed: Option<u64>,
) -> Result<ChannelLayer> {
    let config = ChannelConfig::new(error_probability, loss_probability);
    let layer = match seed {
        Some(seed) => ChannelLayer::with_seed(config, seed),
        None => ChannelLayer::new(config),
    };
    layer.context("Invalid channel configuration")
}
