//! Core types for Chanlink segments

use crate::constants::FIXED_PAYLOAD_SIZE;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single binary digit of a bit stream
pub type Bit = bool;

/// Unit of data handed to the channel layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Application data, always `FIXED_PAYLOAD_SIZE` bytes after padding.
    /// Empty when the channel rejected the segment.
    pub payload: Bytes,

    /// Sender timestamp in nanoseconds (opaque to the channel)
    pub timestamp: i64,

    /// Number of segments in the original message
    pub total_segments: u32,

    /// Position of this segment in the message (starts at 1)
    pub segment_number: u32,

    /// Set by the channel when a block failed its syndrome check or the
    /// payload could not be processed. Always false on input.
    #[serde(default)]
    pub is_channel_error: bool,
}

impl Segment {
    /// Create a new input segment
    pub fn new(payload: Bytes, timestamp: i64, total_segments: u32, segment_number: u32) -> Self {
        Self {
            payload,
            timestamp,
            total_segments,
            segment_number,
            is_channel_error: false,
        }
    }

    /// Check whether the payload has the fixed channel size
    pub fn has_fixed_size(&self) -> bool {
        self.payload.len() == FIXED_PAYLOAD_SIZE
    }

    /// Build an output segment carrying this segment's metadata
    pub(crate) fn reply(&self, payload: Bytes, is_channel_error: bool) -> Self {
        Self {
            payload,
            timestamp: self.timestamp,
            total_segments: self.total_segments,
            segment_number: self.segment_number,
            is_channel_error,
        }
    }
}

/// Outcome of pushing one segment through the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transmission {
    /// The frame arrived; check `is_channel_error` before trusting the payload
    Delivered(Segment),
    /// The whole frame was dropped by the channel
    Lost,
}

impl Transmission {
    /// Check if the frame was lost
    pub fn is_lost(&self) -> bool {
        matches!(self, Transmission::Lost)
    }

    /// Borrow the delivered segment, if any
    pub fn segment(&self) -> Option<&Segment> {
        match self {
            Transmission::Delivered(segment) => Some(segment),
            Transmission::Lost => None,
        }
    }

    /// Take the delivered segment, if any
    pub fn into_segment(self) -> Option<Segment> {
        match self {
            Transmission::Delivered(segment) => Some(segment),
            Transmission::Lost => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_keeps_metadata() {
        let input = Segment::new(Bytes::from(vec![1u8; FIXED_PAYLOAD_SIZE]), -42, 3, 2);
        let out = input.reply(Bytes::new(), true);

        assert_eq!(out.timestamp, -42);
        assert_eq!(out.total_segments, 3);
        assert_eq!(out.segment_number, 2);
        assert!(out.is_channel_error);
        assert!(out.payload.is_empty());
    }

    #[test]
    fn test_transmission_accessors() {
        let seg = Segment::new(Bytes::from_static(b"x"), 0, 1, 1);
        let delivered = Transmission::Delivered(seg.clone());
        assert!(!delivered.is_lost());
        assert_eq!(delivered.segment(), Some(&seg));
        assert_eq!(delivered.into_segment(), Some(seg));

        assert!(Transmission::Lost.is_lost());
        assert_eq!(Transmission::Lost.into_segment(), None);
    }
}
