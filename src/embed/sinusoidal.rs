// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed sinusoidal positional encoding.
//!
//! Pre-computes the sin/cos table from "Attention Is All You Need"
//! (Vaswani et al., 2017, Section 3.5) at construction time and adds the
//! relevant rows to the input during the forward pass.

use candle_core::{DType, Device, Tensor};

use crate::error::{EmbedError, Result};

// ---------------------------------------------------------------------------
// SinusoidalTable — pre-computed sin/cos encoding
// ---------------------------------------------------------------------------

/// Pre-computed sinusoidal positional-encoding table.
///
/// Zero learnable parameters; two constructions with the same arguments
/// produce identical tables, and the output is independent of training.
pub struct SinusoidalTable {
    /// Encoding values: `[max_len, d_model]`.
    table: Tensor,
    /// Maximum sequence length (number of rows).
    max_len: usize,
}

impl SinusoidalTable {
    /// Pre-compute the encoding table for `max_len` positions.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Config`] if `d_model` is odd and
    /// [`EmbedError::Model`] on tensor operation failures.
    pub fn new(d_model: usize, max_len: usize, device: &Device, dtype: DType) -> Result<Self> {
        let table = Self::build_table(max_len, d_model, device, dtype)?;
        Ok(Self { table, max_len })
    }

    /// Build a raw sinusoidal encoding table.
    ///
    /// Encoding scheme (position `pos`, channel pair index `i`):
    ///
    /// ```text
    /// PE(pos, 2i)   = sin(pos / 10000^(2i / d_model))
    /// PE(pos, 2i+1) = cos(pos / 10000^(2i / d_model))
    /// ```
    ///
    /// Even columns contain `sin`; odd columns contain `cos`.
    ///
    /// # Shapes
    /// - returns: `[seq_len, d_model]`
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Config`] if `d_model` is odd and
    /// [`EmbedError::Model`] on tensor operation failures.
    pub fn build_table(
        seq_len: usize,
        d_model: usize,
        device: &Device,
        dtype: DType,
    ) -> Result<Tensor> {
        if d_model % 2 != 0 {
            return Err(EmbedError::Config(format!(
                "d_model must be even, got {d_model}"
            )));
        }
        let half_dim = d_model / 2;

        // Inverse frequencies: 10000^(-2i/d) for i in 0..half_dim
        let inv_freq: Vec<f32> = (0..half_dim)
            .map(|i| {
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let freq = 1.0 / 10_000_f64.powf(2.0 * i as f64 / d_model as f64);
                // Safe: f64 -> f32 truncation is intentional for encoding frequencies
                #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
                let freq_f32 = freq as f32;
                freq_f32
            })
            .collect();
        let inv_freq_tensor = Tensor::from_vec(inv_freq, (1, half_dim), device)?;

        // Position indices: [0, 1, 2, ..., seq_len - 1]
        let positions: Vec<f32> = (0..seq_len)
            .map(|p| {
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let pf = p as f32;
                pf
            })
            .collect();
        let pos_tensor = Tensor::from_vec(positions, (seq_len, 1), device)?;

        // Outer product: [seq_len, half_dim]
        let angles = pos_tensor.matmul(&inv_freq_tensor)?;

        // Interleave sin/cos per channel pair: [seq_len, half_dim, 2]
        // reshaped to [seq_len, d_model] gives [sin_0, cos_0, sin_1, cos_1, ...].
        let table = Tensor::stack(&[&angles.sin()?, &angles.cos()?], 2)?
            .reshape((seq_len, d_model))?;

        Ok(table.to_dtype(dtype)?)
    }

    /// Add the positional encoding to an embedding tensor.
    ///
    /// The encoding slice is converted to the input's dtype before the add,
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

        let pe = self.table.narrow(0, 0, seq_len)?.unsqueeze(0)?;
        let pe = if pe.dtype() == xs.dtype() {
            pe
        } else {
            pe.to_dtype(xs.dtype())?
        };
        Ok(xs.broadcast_add(&pe)?)
    }

    /// Maximum sequence length this table covers.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// The raw `[max_len, d_model]` encoding tensor.
    #[must_use]
    pub const fn table(&self) -> &Tensor {
        &self.table
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
