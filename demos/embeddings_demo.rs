// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embeddings demo: visualise the token -> embedding transformation.
//!
//! ```bash
//! cargo run --example embeddings_demo
//! ```
//!
//! Builds a [`TokenPositionalEmbedding`] with each positional strategy,
//! runs a tiny batch through, and prints the concrete input/output values
//! so you can see exactly what the front-end does at every step.  Saves a
//! JSON summary to `artifacts/embeddings_demo.json`.

use candle_core::{DType, Device, Module, Tensor};
use candle_embed::{FrontendConfig, PosKind, TokenPositionalEmbedding};
use candle_nn::{VarBuilder, VarMap};

const VOCAB_SIZE: usize = 1_000;
const D_MODEL: usize = 16; // small so printed vectors are readable
const MAX_LEN: usize = 128;
const PAD_ID: u32 = 0;
const SHOW_DIMS: usize = 4; // embedding dims to print per vector

fn main() -> candle_embed::Result<()> {
    let device = Device::Cpu;

    // Fake "sentences" -- each row is a sequence of token ids (0 = padding).
    let ids = Tensor::from_vec(
        vec![12_u32, 453, 7, 88, 0, 999, 5, 23, 101, 0, 0, 42],
        (2, 6),
        &device,
    )?;

    println!("token ids (shape {:?}):", ids.dims());
    for b in 0..2 {
        println!("  sentence {b}: {:?}", ids.get(b)?.to_vec1::<u32>()?);
    }

    let mut variants = Vec::new();
    for pos_kind in [PosKind::Sinusoidal, PosKind::Learned] {
        variants.push(run_variant(pos_kind, &ids, &device)?);
    }

    let results = serde_json::json!({
        "config": {
            "vocab_size": VOCAB_SIZE,
            "d_model": D_MODEL,
            "max_len": MAX_LEN,
            "pad_id": PAD_ID,
        },
        "variants": variants,
    });

    std::fs::create_dir_all("artifacts")?;
    let out_path = "artifacts/embeddings_demo.json";
    std::fs::write(out_path, serde_json::to_string_pretty(&results).unwrap_or_default())?;
    println!("\nsaved -> {out_path}");

    Ok(())
}

/// Build one variant, print the transformation, and return a JSON summary.
fn run_variant(
    pos_kind: PosKind,
    ids: &Tensor,
    device: &Device,
) -> candle_embed::Result<serde_json::Value> {
    let mut config = FrontendConfig::new(VOCAB_SIZE, D_MODEL, MAX_LEN, pos_kind);
    config.pad_id = Some(PAD_ID);

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
    let block = TokenPositionalEmbedding::load(&config, vb)?;

    // Raw token embeddings (before the positional signal) and full output.
    let tok_emb = block.token().forward(ids)?;
    let out = block.forward(ids, false)?;

    println!("\n=== pos_kind = {pos_kind} ===");
    let (batch, seq_len) = ids.dims2()?;
    for b in 0..batch {
        println!("  -- sentence {b} --");
        println!("  {:>3}  {:>5}  {:^34}  {:^34}", "pos", "id", "token embedding", "+ positional = final");
        for pos in 0..seq_len {
            let tid: u32 = ids.get(b)?.get(pos)?.to_scalar()?;
            let te = fmt_vec(&tok_emb.get(b)?.get(pos)?.to_vec1::<f32>()?);
            let fe = fmt_vec(&out.get(b)?.get(pos)?.to_vec1::<f32>()?);
            println!("  {pos:>3}  {tid:>5}  {te:>34}  {fe:>34}");
        }
    }

    let num_params: usize = varmap
        .all_vars()
        .iter()
        .map(|v| v.as_tensor().elem_count())
        .sum();
    println!("  trainable params: {num_params}");

    Ok(serde_json::json!({
        "pos_kind": pos_kind.to_string(),
        "input_shape": ids.dims(),
        "output_shape": out.dims(),
        "output_dtype": format!("{:?}", out.dtype()),
        "num_params": num_params,
        "sample_output_first_token": out.get(0)?.get(0)?.to_vec1::<f32>()?,
    }))
}

/// Format the first [`SHOW_DIMS`] values of a vector as a compact string.
fn fmt_vec(values: &[f32]) -> String {
    let shown: Vec<String> = values
        .iter()
        .take(SHOW_DIMS)
        .map(|v| format!("{v:+.3}"))
        .collect();
    let suffix = if values.len() > SHOW_DIMS { ", .." } else { "" };
    format!("[{}{suffix}]", shown.join(", "))
}
