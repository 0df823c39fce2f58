use anyhow::{bail, Context, Result};
use bytes::Bytes;
use chanlink_core::constants::FIXED_PAYLOAD_SIZE;
use chanlink_core::noise::NoiseOutcome;
use chanlink_core::{ChannelLayer, Segment, Transmission};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// Keeps the payload generator off the channel's random trajectory when both
/// are seeded from the same `--seed`
const PAYLOAD_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Counters gathered over a Monte-Carlo run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub trials: u64,
    pub lost: u64,
    pub delivered: u64,
    /// Delivered frames that had a bit flipped
    pub injected: u64,
    /// Delivered frames the decoder flagged
    pub detected: u64,
    /// Frames with a flipped bit that decoded without a flag
    pub undetected: u64,
    /// Unflagged frames whose payload differs from what was sent
    pub silent_corruptions: u64,
}

impl SimulationStats {
    /// Observed loss rate (lost / trials)
    pub fn loss_rate(&self) -> f64 {
        ratio(self.lost, self.trials)
    }

    /// Observed bit-error injection rate among delivered frames
    pub fn injection_rate(&self) -> f64 {
        ratio(self.injected, self.delivered)
    }

    /// Observed detection rate among delivered frames
    pub fn detection_rate(&self) -> f64 {
        ratio(self.detected, self.delivered)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Push `trials` random segments through the channel and count outcomes
///
/// `seed` drives the payload generator only; the channel keeps its own source.
pub fn run(channel: &ChannelLayer, trials: u64, seed: Option<u64>, progress: bool) -> SimulationStats {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ PAYLOAD_SEED_SALT),
        None => StdRng::from_entropy(),
    };

    let bar = if progress {
        let pb = ProgressBar::new(trials);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} segments ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = SimulationStats {
        trials,
        ..Default::default()
    };
    let mut payload = vec![0u8; FIXED_PAYLOAD_SIZE];

    for n in 0..trials {
        rng.fill_bytes(&mut payload);
        let sent = Bytes::copy_from_slice(&payload);
        let segment = Segment::new(sent.clone(), n as i64, trials as u32, (n + 1) as u32);

        let report = channel.process_segment_with_report(segment);
        let injected = matches!(report.noise, Some(NoiseOutcome::Corrupted { .. }));

        match report.transmission {
            Transmission::Lost => stats.lost += 1,
            Transmission::Delivered(out) => {
                stats.delivered += 1;
                if injected {
                    stats.injected += 1;
                }
                if out.is_channel_error {
                    stats.detected += 1;
                } else {
                    if injected {
                        stats.undetected += 1;
                    }
                    if out.payload != sent {
                        stats.silent_corruptions += 1;
                    }
                }
            }
        }

        if let Some(pb) = &bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    stats
}

pub fn execute(
    channel: &ChannelLayer,
    trials: u64,
    seed: Option<u64>,
    output: Option<&str>,
    progress: bool,
) -> Result<()> {
    if trials == 0 {
        bail!("Number of trials must be positive");
    }

    let config = channel.config();
    info!(
        "Simulating {} segments (P={:.4}, R={:.4})",
        trials, config.error_probability, config.loss_probability
    );

    let stats = run(channel, trials, seed, progress);

    println!("\n=== Simulation Results ===");
    println!("Segments sent:      {}", stats.trials);
    println!(
        "Lost:               {} ({:.3}%, expected {:.3}%)",
        stats.lost,
        stats.loss_rate() * 100.0,
        config.loss_probability * 100.0
    );
    println!("Delivered:          {}", stats.delivered);
    println!(
        "Bit errors injected: {} ({:.3}%, expected {:.3}%)",
        stats.injected,
        stats.injection_rate() * 100.0,
        config.error_probability * 100.0
    );
    println!(
        "Errors detected:    {} ({:.3}%)",
        stats.detected,
        stats.detection_rate() * 100.0
    );

    if stats.undetected == 0 && stats.silent_corruptions == 0 {
        println!("{}", "Every injected error was detected".green());
    } else {
        println!(
            "{}",
            format!(
                "Undetected errors: {}, silent corruptions: {}",
                stats.undetected, stats.silent_corruptions
            )
            .red()
        );
    }
    println!();

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&stats)
            .with_context(|| "Failed to serialize simulation stats")?;
        fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path))?;
        info!("Simulation stats written to: {}", path);
    }

    Ok(())
}
