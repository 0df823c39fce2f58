//! Error types for Chanlink operations

/// Errors that can occur while moving a segment through the channel
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChannelError {
    /// Payload is not exactly the fixed payload size
    #[error("Payload size mismatch: expected {expected} bytes, got {actual}")]
    PayloadSizeMismatch {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Bit stream has an unexpected length at some stage of the pipeline
    #[error("Bit length mismatch: expected {expected} bits, got {actual}")]
    BitLengthMismatch {
        /// The number of bits expected.
        expected: usize,
        /// The number of bits actually found.
        actual: usize,
    },

    /// A block handed to the coder has the wrong width
    #[error("Malformed block: expected {expected} bits, got {actual}")]
    MalformedBlock {
        /// Block width the coder works on.
        expected: usize,
        /// Width of the block that was passed in.
        actual: usize,
    },

    /// Bit stream length is not a multiple of 8
    #[error("Bit stream length {0} is not a multiple of 8")]
    TruncatedBitStream(usize),

    /// Probability outside [0, 1] or not finite
    #[error("Invalid {name} probability: {value} (must be within [0, 1])")]
    InvalidProbability {
        /// Which probability was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Ingress payload is empty
    #[error("Invalid payload size: payload cannot be empty")]
    EmptyPayload,

    /// Ingress payload does not fit into one segment
    #[error("Invalid payload size: expected {max} bytes or less, got {actual}")]
    PayloadTooLarge {
        /// Size of the payload that was offered.
        actual: usize,
        /// Largest payload a segment can carry.
        max: usize,
    },

    /// Send time could not be parsed in any supported format
    #[error("Failed to parse send_time '{0}'")]
    InvalidSendTime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChannelError::PayloadSizeMismatch {
            expected: 140,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Payload size mismatch: expected 140 bytes, got 12"
        );

        let err = ChannelError::InvalidProbability {
            name: "loss",
            value: 1.5,
        };
        assert!(err.to_string().contains("loss"));
    }
}
