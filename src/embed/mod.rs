// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding front-end: token lookup + positional signal + dropout.
//!
//! [`TokenPositionalEmbedding`] is the standard embedding front-end shared
//! by virtually every transformer: it converts a batch of integer token ids
//! into the float representations consumed by the encoder/decoder stack.
//! The positional strategy is a construction-time choice via
//! [`PosKind`](crate::config::PosKind).

pub mod positional;
pub mod sinusoidal;

use candle_core::{Module, Tensor};
use candle_nn::{Dropout, Embedding, VarBuilder};

use crate::config::FrontendConfig;
use crate::error::{EmbedError, Result};

use self::positional::{create_positional, Positional};

// ---------------------------------------------------------------------------
// TokenPositionalEmbedding
// ---------------------------------------------------------------------------

/// Token embedding + positional encoding + dropout in one module.
///
/// # Shapes
/// - input: `[batch, seq_len]` -- `u32` token ids
/// - output: `[batch, seq_len, d_model]` -- float embeddings
pub struct TokenPositionalEmbedding {
    /// Token embedding matrix: `[vocab_size, d_model]`.
    token: Embedding,
    /// Positional signal provider.
    positional: Positional,
    /// Dropout applied to the summed embeddings (training only).
    dropout: Dropout,
    /// Reserved padding token id, if any.
    pad_id: Option<u32>,
    /// Maximum sequence length accepted at forward time.
    max_len: usize,
}

impl TokenPositionalEmbedding {
    /// Build the front-end from a configuration and a [`VarBuilder`].
    ///
    /// The token table lives under `"token"` and the learned position table
    /// (if selected) under `"pos"`.  When the builder is backed by a
    /// `VarMap`, both tables are trainable.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Config`] if the configuration is invalid and
    /// [`EmbedError::Model`] if weight creation fails.
    #[allow(clippy::needless_pass_by_value)] // VarBuilder is candle's pass-by-value convention
    pub fn load(config: &FrontendConfig, vb: VarBuilder<'_>) -> Result<Self> {
        config.validate()?;

        let token = candle_nn::embedding(config.vocab_size, config.d_model, vb.pp("token"))?;
        let positional =
            create_positional(config.pos_kind, config.d_model, config.max_len, vb.pp("pos"))?;
        let dropout = Dropout::new(config.dropout);

        Ok(Self {
            token,
            positional,
            dropout,
            pad_id: config.pad_id,
            max_len: config.max_len,
        })
    }

    /// Map token ids to float embeddings with positional information.
    ///
    /// Dropout is applied only when `train` is true; at evaluation time the
    /// output is a deterministic function of the input and the tables.
    ///
    /// # Shapes
    /// - `token_ids`: `[batch, seq_len]`
    /// - returns: `[batch, seq_len, d_model]`
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::LengthExceeded`] when `seq_len > max_len` and
    /// [`EmbedError::Model`] on tensor operation failures.
    pub fn forward(&self, token_ids: &Tensor, train: bool) -> Result<Tensor> {
        let (_, seq_len) = token_ids.dims2()?;
        if seq_len > self.max_len {
            return Err(EmbedError::LengthExceeded {
                seq_len,
                max_len: self.max_len,
            });
        }

        let mut embedded = self.token.forward(token_ids)?;

        // Padding positions contribute zero and route no gradient to the
        // pad row: the mask is a constant, so the product's gradient
        // vanishes wherever the mask does.
        if let Some(pad_id) = self.pad_id {
            let mask = token_ids
                .ne(pad_id)?
                .unsqueeze(2)?
                .to_dtype(embedded.dtype())?;
            embedded = embedded.broadcast_mul(&mask)?;
        }

        let with_pos = self.positional.forward(&embedded)?;
        Ok(self.dropout.forward(&with_pos, train)?)
    }

    /// The token embedding table.
    #[must_use]
    pub const fn token(&self) -> &Embedding {
        &self.token
    }

    /// The positional signal provider.
    #[must_use]
    pub const fn positional(&self) -> &Positional {
        &self.positional
    }

    /// Maximum sequence length accepted at forward time.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
