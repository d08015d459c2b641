// SPDX-License-Identifier: MIT OR Apache-2.0

//! Positional signal providers for the embedding front-end.
//!
//! Two interchangeable strategies behind one contract: given an embedding
//! tensor of shape `[batch, seq_len, d_model]`, return the same shape with
//! a per-position signal added elementwise.  Selected at construction by
//! [`PosKind`].

use candle_core::{Module, Tensor};
use candle_nn::{Embedding, VarBuilder};

use crate::config::PosKind;
use crate::error::{EmbedError, Result};

use super::sinusoidal::SinusoidalTable;

// ---------------------------------------------------------------------------
// Positional — enum-dispatched provider
// ---------------------------------------------------------------------------

/// A positional signal provider, selected at construction by [`PosKind`].
// EXHAUSTIVE: internal dispatch enum; crate owns both strategies and matches exhaustively
#[allow(clippy::exhaustive_enums)]
pub enum Positional {
    /// Fixed sin/cos encoding; no learnable state.
    Sinusoidal(SinusoidalTable),
    /// Trainable per-position embedding.
    Learned(LearnedPositional),
}

impl Positional {
    /// Add the positional signal to the input tensor.
    ///
    /// # Shapes
    /// - `xs`: `[batch, seq_len, d_model]`
    /// - returns: `[batch, seq_len, d_model]`
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::LengthExceeded`] when `seq_len` exceeds the
    /// configured maximum and [`EmbedError::Model`] on tensor operation
    /// failures.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Self::Sinusoidal(table) => table.forward(xs),
            Self::Learned(emb) => emb.forward(xs),
        }
    }

    /// Maximum sequence length accepted by this provider.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        match self {
            Self::Sinusoidal(table) => table.max_len(),
            Self::Learned(emb) => emb.max_len(),
        }
    }
}

/// Create a [`Positional`] provider of the given kind.
///
/// The sinusoidal table is built on the `VarBuilder`'s device and dtype;
/// the learned table registers its weight through the `VarBuilder`, so it
/// is trainable when the builder is backed by a `VarMap`.
///
/// # Errors
///
/// Returns [`EmbedError::Config`] for invalid dimensions and
/// [`EmbedError::Model`] if weight creation fails.
#[allow(clippy::needless_pass_by_value)] // VarBuilder is candle's pass-by-value convention
pub fn create_positional(
    kind: PosKind,
    d_model: usize,
    max_len: usize,
    vb: VarBuilder<'_>,
) -> Result<Positional> {
    match kind {
        PosKind::Sinusoidal => {
            let table = SinusoidalTable::new(d_model, max_len, vb.device(), vb.dtype())?;
            Ok(Positional::Sinusoidal(table))
        }
        PosKind::Learned => {
            let emb = LearnedPositional::load(d_model, max_len, vb)?;
            Ok(Positional::Learned(emb))
        }
    }
}

// ---------------------------------------------------------------------------
// LearnedPositional — trainable position table
// ---------------------------------------------------------------------------

/// Trainable positional embedding (BERT / GPT-2 style).
///
/// Each position in `[0, max_len)` maps to an independent trainable vector;
/// positions at or beyond `max_len` are undefined and rejected.
pub struct LearnedPositional {
    /// Position table: `[max_len, d_model]`.
    embedding: Embedding,
    /// Maximum sequence length (number of rows).
    max_len: usize,
}

impl LearnedPositional {
    /// Load the position table from a [`VarBuilder`] under `"weight"`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Model`] if weight creation fails.
    #[allow(clippy::needless_pass_by_value)] // VarBuilder convention
    pub fn load(d_model: usize, max_len: usize, vb: VarBuilder<'_>) -> Result<Self> {
        let embedding = candle_nn::embedding(max_len, d_model, vb)?;
        Ok(Self { embedding, max_len })
    }

    /// Add the learned positional embedding to the input tensor.
    ///
    /// The position rows are converted to the input's dtype before the add,
    /// so mixed-precision inputs keep their precision.
    ///
    /// # Shapes
    /// - `xs`: `[batch, seq_len, d_model]`
    /// - returns: `[batch, seq_len, d_model]`
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::LengthExceeded`] when `seq_len > max_len` and
    /// [`EmbedError::Model`] on tensor operation failures.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (_, seq_len, _) = xs.dims3()?;
        if seq_len > self.max_len {
            return Err(EmbedError::LengthExceeded {
                seq_len,
                max_len: self.max_len,
            });
        }

        // Positions [0, seq_len) looked up on the input's device.
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        // Safe: seq_len <= max_len, which is far below u32::MAX for any real table
        let end = seq_len as u32;
        let positions = Tensor::arange(0_u32, end, xs.device())?;
        let pos_emb = self.embedding.forward(&positions)?.unsqueeze(0)?;
        let pos_emb = if pos_emb.dtype() == xs.dtype() {
            pos_emb
        } else {
            pos_emb.to_dtype(xs.dtype())?
        };
        Ok(xs.broadcast_add(&pos_emb)?)
    }

    /// Maximum sequence length this table covers.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// The underlying `[max_len, d_model]` embedding.
    #[must_use]
    pub const fn embedding(&self) -> &Embedding {
        &self.embedding
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    use super::*;

    fn learned(d_model: usize, max_len: usize) -> (LearnedPositional, VarMap) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let emb = LearnedPositional::load(d_model, max_len, vb).unwrap();
        (emb, varmap)
    }

    #[test]
    fn learned_forward_preserves_shape() {
        let (emb, _varmap) = learned(64, 50);
        let x = Tensor::zeros((2, 20, 64), DType::F32, &Device::Cpu).unwrap();
        let out = emb.forward(&x).unwrap();
        assert_eq!(out.dims(), &[2, 20, 64]);
    }

    #[test]
    fn learned_zero_input_equals_table_rows() {
        let (emb, _varmap) = learned(16, 50);
        let out = emb
            .forward(&Tensor::zeros((1, 10, 16), DType::F32, &Device::Cpu).unwrap())
            .unwrap();
        let positions = Tensor::arange(0_u32, 10, &Device::Cpu).unwrap();
        let expected: Vec<f32> = emb
            .embedding()
            .forward(&positions)
            .unwrap()
            .flatten_all()
            .unwrap()
            .to_vec1()
            .unwrap();
        let got: Vec<f32> = out.flatten_all().unwrap().to_vec1().unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn learned_registers_trainable_params() {
        let (_emb, varmap) = learned(32, 100);
        let total: usize = varmap
            .all_vars()
            .iter()
            .map(|v| v.as_tensor().elem_count())
            .sum();
        assert_eq!(total, 100 * 32);
    }

    #[test]
    fn learned_rejects_length_over_max() {
        let (emb, _varmap) = learned(16, 10);
        let x = Tensor::zeros((1, 20, 16), DType::F32, &Device::Cpu).unwrap();
        let err = emb.forward(&x).unwrap_err();
        assert!(matches!(err, EmbedError::LengthExceeded { .. }));
    }

    #[test]
    fn create_positional_dispatches_on_kind() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);

        let sin = create_positional(PosKind::Sinusoidal, 16, 50, vb.pp("sin")).unwrap();
        assert!(matches!(sin, Positional::Sinusoidal(_)));
        // Sinusoidal registers no trainable state.
        assert!(varmap.all_vars().is_empty());

        let learned = create_positional(PosKind::Learned, 16, 50, vb.pp("pos")).unwrap();
        assert!(matches!(learned, Positional::Learned(_)));
        assert!(!varmap.all_vars().is_empty());
    }

    #[test]
    fn providers_share_forward_contract() {
        // Both kinds accept the same input and produce the same shape.
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let x = Tensor::zeros((2, 8, 16), DType::F32, &Device::Cpu).unwrap();

        for kind in [PosKind::Sinusoidal, PosKind::Learned] {
            let provider = create_positional(kind, 16, 32, vb.pp(kind.to_string())).unwrap();
            let out = provider.forward(&x).unwrap();
            assert_eq!(out.dims(), x.dims(), "shape mismatch for {kind}");
            assert_eq!(provider.max_len(), 32);
        }
    }
}
