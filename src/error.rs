// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for candle-embed.

/// Errors that can occur when building or running an embedding front-end.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Input sequence length exceeds the configured maximum.
    ///
    /// Raised immediately at the start of a forward pass, before any tensor
    /// work.  The caller is expected to fix the configuration or the input;
    /// sequences are never silently truncated.
    #[error("sequence length {seq_len} exceeds max_len {max_len}")]
    LengthExceeded {
        /// Observed input sequence length.
        seq_len: usize,
        /// Configured maximum sequence length.
        max_len: usize,
    },

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Tensor operation error (wraps candle).
    #[error("model error: {0}")]
    Model(#[from] candle_core::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for candle-embed operations.
pub type Result<T> = std::result::Result<T, EmbedError>;
