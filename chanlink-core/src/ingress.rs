//! Helpers for front ends that turn user requests into channel segments.
//!
//! Payloads are right-padded with zero bytes to [`FIXED_PAYLOAD_SIZE`]; send
//! times are accepted as RFC 3339 or in the `2006-01-02 15:04:05 -0700 MST`
//! form that Go's `time.Time` prints by default.

use crate::constants::FIXED_PAYLOAD_SIZE;
use crate::error::ChannelError;
use crate::types::Segment;
use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, FixedOffset};

/// Layout of the fallback send-time format, minus the zone abbreviation
const GO_DEFAULT_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Right-pad a payload with zeros to the fixed segment size
pub fn pad_payload(raw: &[u8]) -> Result<Bytes, ChannelError> {
    if raw.is_empty() {
        return Err(ChannelError::EmptyPayload);
    }
    if raw.len() > FIXED_PAYLOAD_SIZE {
        return Err(ChannelError::PayloadTooLarge {
            actual: raw.len(),
            max: FIXED_PAYLOAD_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(FIXED_PAYLOAD_SIZE);
    buf.put_slice(raw);
    buf.put_bytes(0, FIXED_PAYLOAD_SIZE - raw.len());
    Ok(buf.freeze())
}

/// Parse a send time into nanoseconds since the Unix epoch
pub fn parse_send_time(send_time: &str) -> Result<i64, ChannelError> {
    let parsed = DateTime::parse_from_rfc3339(send_time)
        .ok()
        .or_else(|| parse_go_default(send_time))
        .ok_or_else(|| ChannelError::InvalidSendTime(send_time.to_string()))?;

    parsed
        .timestamp_nanos_opt()
        .ok_or_else(|| ChannelError::InvalidSendTime(send_time.to_string()))
}

fn parse_go_default(send_time: &str) -> Option<DateTime<FixedOffset>> {
    // chrono cannot parse zone abbreviations; the numeric offset is authoritative
    let tokens: Vec<&str> = send_time.split_whitespace().collect();
    let [date, time, offset, _zone] = tokens.as_slice() else {
        return None;
    };
    DateTime::parse_from_str(&format!("{date} {time} {offset}"), GO_DEFAULT_LAYOUT).ok()
}

/// Build an input segment from a raw payload and request metadata
pub fn build_segment(
    raw_payload: &[u8],
    send_time: &str,
    total_segments: u32,
    segment_number: u32,
) -> Result<Segment, ChannelError> {
    let payload = pad_payload(raw_payload)?;
    let timestamp = parse_send_time(send_time)?;
    Ok(Segment::new(payload, timestamp, total_segments, segment_number))
}
