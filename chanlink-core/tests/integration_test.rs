//! Integration tests for the complete pad → encode → impair → decode flow

use bytes::Bytes;
use chanlink_core::{
    bitstream::{bits_to_bytes, bytes_to_bits},
    codec::{decode_frame, encode_frame, Cyclic74},
    constants::{CODED_BITS_PER_BLOCK, ENCODED_BIT_LENGTH, FIXED_PAYLOAD_SIZE, NUM_CODING_BLOCKS},
    ingress::build_segment,
    noise::{NoiseOutcome, NoiseSimulator},
    ChannelConfig, ChannelLayer, Segment, Transmission,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn sample_payload() -> Bytes {
    let mut data = b"The quick brown fox jumps over the lazy dog".to_vec();
    data.resize(FIXED_PAYLOAD_SIZE, 0);
    Bytes::from(data)
}

#[test]
fn test_full_workflow_clean() {
    let layer = ChannelLayer::with_seed(ChannelConfig::default(), 17).unwrap();
    let input = build_segment(b"hello channel", "2024-01-02T03:04:05Z", 2, 1).unwrap();

    match layer.process_segment(input.clone()) {
        Transmission::Delivered(out) => {
            assert!(!out.is_channel_error);
            assert_eq!(out.payload, input.payload);
            assert_eq!(&out.payload[..13], b"hello channel");
            assert_eq!(out.timestamp, input.timestamp);
        }
        Transmission::Lost => panic!("clean channel must not lose frames"),
    }
}

#[test]
fn test_block_locality_over_full_frame() {
    let bits = bytes_to_bits(&sample_payload());
    let encoded = encode_frame(&Cyclic74, &bits);
    assert_eq!(encoded.len(), ENCODED_BIT_LENGTH);

    for k in 0..ENCODED_BIT_LENGTH {
        let mut corrupted = encoded.clone();
        corrupted[k] = !corrupted[k];

        let decoded = decode_frame(&Cyclic74, &corrupted);
        assert_eq!(decoded.flagged_blocks, vec![k / CODED_BITS_PER_BLOCK], "bit {k}");
        assert!(decoded.has_errors());

        // only the information bits of the hit block may differ
        let block = k / CODED_BITS_PER_BLOCK;
        let offset = k % CODED_BITS_PER_BLOCK;
        let expected_diff = if offset < 4 { 1 } else { 0 };
        let diff = decoded
            .bits
            .iter()
            .zip(&bits)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| {
                assert_eq!(i / 4, block);
                i
            })
            .count();
        assert_eq!(diff, expected_diff);
    }
}

#[test]
fn test_corrupted_payload_is_returned_uncorrected() {
    let layer = ChannelLayer::with_seed(ChannelConfig::new(1.0, 0.0), 5).unwrap();
    let input = Segment::new(sample_payload(), 1, 1, 1);

    let report = layer.process_segment_with_report(input.clone());
    let Some(NoiseOutcome::Corrupted { index }) = report.noise else {
        panic!("expected corruption");
    };
    let out = report.transmission.into_segment().unwrap();
    assert!(out.is_channel_error);

    let changed: Vec<usize> = bytes_to_bits(&out.payload)
        .iter()
        .zip(bytes_to_bits(&input.payload))
        .enumerate()
        .filter(|(_, (a, b))| **a != *b)
        .map(|(i, _)| i)
        .collect();

    let offset = index % CODED_BITS_PER_BLOCK;
    if offset < 4 {
        assert_eq!(changed, vec![index / CODED_BITS_PER_BLOCK * 4 + offset]);
    } else {
        assert!(changed.is_empty());
    }
}

#[test]
fn test_loss_and_error_frequencies() {
    const TRIALS: usize = 100_000;
    let (p, r) = (0.05, 0.1);
    let sim = NoiseSimulator::new(p, r).unwrap();
    let mut rng = StdRng::seed_from_u64(0xC0DE);
    let mut frame = vec![false; ENCODED_BIT_LENGTH];

    let mut lost = 0usize;
    let mut corrupted = 0usize;
    for _ in 0..TRIALS {
        match sim.apply(&mut rng, &mut frame) {
            NoiseOutcome::Lost => lost += 1,
            NoiseOutcome::Corrupted { index } => {
                corrupted += 1;
                frame[index] = false;
            }
            NoiseOutcome::Clean => {}
        }
    }

    let loss_rate = lost as f64 / TRIALS as f64;
    let error_rate = corrupted as f64 / (TRIALS - lost) as f64;
    assert!((loss_rate - r).abs() < 0.005, "loss rate {loss_rate}");
    assert!((error_rate - p).abs() < 0.005, "error rate {error_rate}");
}

#[test]
fn test_channel_rates_match_detection() {
    let layer = ChannelLayer::with_seed(ChannelConfig::new(0.3, 0.2), 99).unwrap();
    let mut lost = 0;
    let mut flagged = 0;
    let trials = 5_000;
    for i in 0..trials {
        let report = layer.process_segment_with_report(Segment::new(sample_payload(), i, 1, 1));
        match report.transmission {
            Transmission::Lost => lost += 1,
            Transmission::Delivered(seg) => {
                // every single-bit flip is detected, and nothing else is
                let injected = matches!(report.noise, Some(NoiseOutcome::Corrupted { .. }));
                assert_eq!(seg.is_channel_error, injected);
                if seg.is_channel_error {
                    flagged += 1;
                }
            }
        }
    }
    let loss_rate = lost as f64 / trials as f64;
    let error_rate = flagged as f64 / (trials as f64 - lost as f64);
    assert!((loss_rate - 0.2).abs() < 0.03, "loss rate {loss_rate}");
    assert!((error_rate - 0.3).abs() < 0.03, "error rate {error_rate}");
}

#[test]
fn test_size_validation_never_loses() {
    let layer = ChannelLayer::with_seed(ChannelConfig::new(1.0, 1.0), 3).unwrap();
    let out = layer
        .process_segment(Segment::new(Bytes::from_static(b"short"), 0, 1, 1))
        .into_segment()
        .expect("size errors are delivered, not lost");
    assert!(out.is_channel_error);
    assert!(out.payload.is_empty());
}

#[test]
fn test_shared_layer_across_threads() {
    let layer = Arc::new(ChannelLayer::with_seed(ChannelConfig::new(0.5, 0.0), 8).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let layer = Arc::clone(&layer);
            thread::spawn(move || {
                (0..50)
                    .filter(|&i| {
                        let seg = Segment::new(sample_payload(), i, 50, t);
                        let out = layer.process_segment(seg).into_segment().unwrap();
                        assert_eq!(out.payload.len(), FIXED_PAYLOAD_SIZE);
                        out.is_channel_error
                    })
                    .count()
            })
        })
        .collect();

    let flagged: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(flagged > 0 && flagged < 200);
}

#[test]
fn test_frame_packs_into_whole_bytes() {
    let encoded = encode_frame(&Cyclic74, &bytes_to_bits(&sample_payload()));
    let packed = bits_to_bytes(&encoded);
    assert_eq!(packed.len() * 8, ENCODED_BIT_LENGTH);
    assert_eq!(decode_frame(&Cyclic74, &bytes_to_bits(&packed)).flagged_blocks.len(), 0);
    assert_eq!(encoded.len() / CODED_BITS_PER_BLOCK, NUM_CODING_BLOCKS);
}
