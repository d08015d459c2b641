// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end contract tests for the embedding front-end.
//!
//! Run:
//!   `cargo test --test frontend_contract`

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    missing_docs
)]

use candle_core::{DType, Device, Tensor};
use candle_embed::{EmbedError, FrontendConfig, PosKind, TokenPositionalEmbedding};
use candle_nn::{VarBuilder, VarMap};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const VOCAB: usize = 100;
const D_MODEL: usize = 8;
const MAX_LEN: usize = 16;

fn build(config: &FrontendConfig) -> TokenPositionalEmbedding {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    TokenPositionalEmbedding::load(config, vb).unwrap()
}

fn ids(batch: usize, seq_len: usize) -> Tensor {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let data: Vec<u32> = (0..batch * seq_len)
        .map(|i| ((i * 13 + 7) % VOCAB) as u32)
        .collect();
    Tensor::from_vec(data, (batch, seq_len), &Device::Cpu).unwrap()
}

// ---------------------------------------------------------------------------
// End-to-end scenario: d_model 8, max_len 16
// ---------------------------------------------------------------------------

#[test]
fn batch_of_two_length_four_produces_2_4_8() {
    for pos_kind in [PosKind::Sinusoidal, PosKind::Learned] {
        let config = FrontendConfig::new(VOCAB, D_MODEL, MAX_LEN, pos_kind);
        let block = build(&config);
        let out = block.forward(&ids(2, 4), false).unwrap();
        assert_eq!(out.dims(), &[2, 4, D_MODEL], "wrong shape for {pos_kind}");
    }
}

#[test]
fn length_thirty_two_fails_with_length_exceeded() {
    for pos_kind in [PosKind::Sinusoidal, PosKind::Learned] {
        let config = FrontendConfig::new(VOCAB, D_MODEL, MAX_LEN, pos_kind);
        let block = build(&config);
        let err = block.forward(&ids(2, 32), false).unwrap_err();
        match err {
            EmbedError::LengthExceeded { seq_len, max_len } => {
                assert_eq!(seq_len, 32);
                assert_eq!(max_len, MAX_LEN);
            }
            other => panic!("expected LengthExceeded, got: {other}"),
        }
    }
}

#[test]
fn strategies_swap_with_zero_code_changes() {
    // The same config modulo pos_kind drives both variants through the
    // identical call sequence.
    let input = ids(2, 4);
    for pos_kind in [PosKind::Sinusoidal, PosKind::Learned] {
        let mut config = FrontendConfig::new(VOCAB, D_MODEL, MAX_LEN, pos_kind);
        config.dropout = 0.1;
        config.pad_id = Some(0);
        let block = build(&config);
        let out = block.forward(&input, false).unwrap();
        assert_eq!(out.dims(), &[2, 4, D_MODEL]);
        assert_eq!(out.dtype(), DType::F32);
    }
}

#[test]
fn config_json_drives_the_frontend() {
    let json = serde_json::json!({
        "vocab_size": VOCAB,
        "d_model": D_MODEL,
        "max_len": MAX_LEN,
        "pos_kind": "sinusoidal",
        "dropout": 0.0,
        "pad_id": 0
    });
    let config = FrontendConfig::from_json(&json).unwrap();
    let block = build(&config);
    let out = block.forward(&ids(2, 4), false).unwrap();
    assert_eq!(out.dims(), &[2, 4, D_MODEL]);
}

#[test]
fn error_message_names_both_lengths() {
    let config = FrontendConfig::new(VOCAB, D_MODEL, MAX_LEN, PosKind::Sinusoidal);
    let block = build(&config);
    let err = block.forward(&ids(1, 32), false).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("32"), "message should name the input length: {msg}");
    assert!(msg.contains("16"), "message should name max_len: {msg}");
}
