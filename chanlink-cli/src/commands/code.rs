use anyhow::{bail, Context, Result};
use chanlink_core::constants::MAX_REQUEST_BYTES;
use chanlink_core::ingress::build_segment;
use chanlink_core::{ChannelLayer, Transmission};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use tracing::{info, warn};

/// Incoming request for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRequest {
    pub segment_number: u32,
    pub total_segments: u32,
    pub sender: String,
    pub send_time: String,
    pub payload: String,
}

/// Request handed on to the transfer layer after the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub segment_number: u32,
    pub total_segments: u32,
    pub sender: String,
    /// Forwarded as received
    pub send_time: String,
    /// Always the full fixed-size payload, padding included
    pub payload: String,
}

/// Run one JSON request body through the channel
///
/// Fails when the body is oversized or malformed, when the segment is lost,
/// or when the channel flagged an uncorrectable error.
pub fn process_request(channel: &ChannelLayer, body: &[u8]) -> Result<TransferRequest> {
    if body.len() > MAX_REQUEST_BYTES {
        bail!(
            "Request body too large. Maximum allowed is {} bytes.",
            MAX_REQUEST_BYTES
        );
    }

    let req: CodeRequest =
        serde_json::from_slice(body).with_context(|| "Failed to decode JSON request")?;

    let segment = build_segment(
        req.payload.as_bytes(),
        &req.send_time,
        req.total_segments,
        req.segment_number,
    )?;

    info!(
        "Accepted segment #{}/{} from {} (payload {} bytes before padding)",
        req.segment_number,
        req.total_segments,
        req.sender,
        req.payload.len()
    );

    let delivered = match channel.process_segment(segment) {
        Transmission::Lost => {
            warn!(
                "Segment #{}/{} lost during channel simulation",
                req.segment_number, req.total_segments
            );
            bail!("Segment lost during channel simulation");
        }
        Transmission::Delivered(segment) => segment,
    };

    if delivered.is_channel_error {
        warn!(
            "Channel detected an uncorrectable error in segment #{}/{}",
            req.segment_number, req.total_segments
        );
        bail!("Uncorrectable channel error detected during processing");
    }

    Ok(TransferRequest {
        segment_number: req.segment_number,
        total_segments: req.total_segments,
        sender: req.sender,
        send_time: req.send_time,
        payload: String::from_utf8_lossy(&delivered.payload).into_owned(),
    })
}

pub fn execute(channel: &ChannelLayer, input: &str, output: Option<&str>) -> Result<()> {
    let body = if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    let transfer = process_request(channel, &body)?;
    let json = serde_json::to_string_pretty(&transfer)
        .with_context(|| "Failed to serialize transfer request")?;

    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write output file: {}", path))?;
            info!(
                "Segment #{}/{} written to {}",
                transfer.segment_number, transfer.total_segments, path
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
