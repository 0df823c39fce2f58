//! Property-based tests using proptest

use bytes::Bytes;
use chanlink_core::{
    bitstream::{bits_to_bytes, bytes_to_bits, try_bits_to_bytes},
    codec::{decode_block, decode_frame, encode_block, encode_frame, Cyclic74},
    constants::FIXED_PAYLOAD_SIZE,
    ChannelConfig, ChannelLayer, Segment,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_bytes_bits_round_trip(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let bits = bytes_to_bits(&data);
        prop_assert_eq!(bits.len(), data.len() * 8);
        prop_assert_eq!(&bits_to_bytes(&bits)[..], &data[..]);
        prop_assert_eq!(&try_bits_to_bytes(&bits).unwrap()[..], &data[..]);
    }

    #[test]
    fn prop_frame_round_trip(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let bits = bytes_to_bits(&data);
        let decoded = decode_frame(&Cyclic74, &encode_frame(&Cyclic74, &bits));
        prop_assert!(!decoded.has_errors());
        prop_assert_eq!(decoded.bits, bits);
    }

    #[test]
    fn prop_decode_never_panics(word in prop::collection::vec(any::<bool>(), 0..16)) {
        let decoded = decode_block(&word);
        if word.len() != 7 {
            prop_assert!(decoded.error_detected);
        }
    }

    #[test]
    fn prop_encode_never_panics(info in prop::collection::vec(any::<bool>(), 0..16)) {
        let codeword = encode_block(&info);
        prop_assert_eq!(codeword.len(), 7);
    }

    #[test]
    fn prop_clean_channel_is_identity(
        payload in prop::collection::vec(any::<u8>(), FIXED_PAYLOAD_SIZE),
        timestamp in any::<i64>(),
        seed in any::<u64>(),
    ) {
        let layer = ChannelLayer::with_seed(ChannelConfig::new(0.0, 0.0), seed).unwrap();
        let input = Segment::new(Bytes::from(payload), timestamp, 7, 3);
        let out = layer.process_segment(input.clone()).into_segment().unwrap();
        prop_assert!(!out.is_channel_error);
        prop_assert_eq!(out, input);
    }

    #[test]
    fn prop_wrong_size_always_flagged(len in 0usize..400, seed in any::<u64>()) {
        prop_assume!(len != FIXED_PAYLOAD_SIZE);
        let layer = ChannelLayer::with_seed(ChannelConfig::new(0.5, 0.5), seed).unwrap();
        let out = layer
            .process_segment(Segment::new(Bytes::from(vec![0xAA; len]), 0, 1, 1))
            .into_segment()
            .unwrap();
        prop_assert!(out.is_channel_error);
        prop_assert!(out.payload.is_empty());
    }
}
