// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding front-end configuration and JSON parsing.
//!
//! [`FrontendConfig`] captures the recognized construction options of the
//! embedding front-end: vocabulary size, model dimension, maximum sequence
//! length, positional-encoding strategy, dropout probability, and an
//! optional padding index.
//!
//! # Usage
//!
//! ```
//! use candle_embed::FrontendConfig;
//!
//! let config_str = r#"{"vocab_size": 30000, "d_model": 512,
//!     "max_len": 1024, "pos_kind": "sinusoidal", "dropout": 0.1}"#;
//! let json: serde_json::Value = serde_json::from_str(config_str).unwrap();
//! let config = FrontendConfig::from_json(&json).unwrap();
//! assert_eq!(config.d_model, 512);
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{EmbedError, Result};

// ---------------------------------------------------------------------------
// PosKind
// ---------------------------------------------------------------------------

/// Positional-encoding strategy.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosKind {
    /// Fixed sin/cos encoding (Vaswani et al., 2017).  Zero learnable
    /// parameters; output is independent of training.
    Sinusoidal,
    /// Trainable per-position embedding (BERT / GPT-2 style).  Adds
    /// `max_len * d_model` learnable parameters.
    Learned,
}

impl fmt::Display for PosKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sinusoidal => write!(f, "sinusoidal"),
            Self::Learned => write!(f, "learned"),
        }
    }
}

impl FromStr for PosKind {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sinusoidal" => Ok(Self::Sinusoidal),
            "learned" => Ok(Self::Learned),
            other => Err(EmbedError::Config(format!(
                "unknown pos_kind '{other}' (expected 'sinusoidal' or 'learned')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// FrontendConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`TokenPositionalEmbedding`](crate::TokenPositionalEmbedding).
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Size of the token vocabulary.
    pub vocab_size: usize,
    /// Embedding / model dimension.  Must be even for the sinusoidal
    /// strategy.
    pub d_model: usize,
    /// Maximum sequence length accepted at forward time.
    pub max_len: usize,
    /// Positional-encoding strategy, fixed at construction.
    pub pos_kind: PosKind,
    /// Dropout probability applied to the summed embeddings.  Must be in
    /// `[0, 1)`.
    pub dropout: f32,
    /// Optional padding token id.  When set, the corresponding embedding
    /// contributes zero to the output and receives no gradient.
    pub pad_id: Option<u32>,
}

impl FrontendConfig {
    /// Create a config with no dropout and no padding index.
    #[must_use]
    pub const fn new(vocab_size: usize, d_model: usize, max_len: usize, pos_kind: PosKind) -> Self {
        Self {
            vocab_size,
            d_model,
            max_len,
            pos_kind,
            dropout: 0.0,
            pad_id: None,
        }
    }

    /// Parse a [`FrontendConfig`] from a JSON value.
    ///
    /// Required fields: `vocab_size`, `d_model`, `max_len`, `pos_kind`.
    /// Optional fields: `dropout` (default `0.0`), `pad_id` (default absent).
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Config`] if a required field is missing or
    /// invalid, or if validation fails.
    pub fn from_json(config: &Value) -> Result<Self> {
        let pos_kind = config
            .get("pos_kind")
            .and_then(Value::as_str)
            .ok_or_else(|| EmbedError::Config("missing or invalid field 'pos_kind'".into()))?
            .parse::<PosKind>()?;

        let parsed = Self {
            vocab_size: get_usize(config, "vocab_size")?,
            d_model: get_usize(config, "d_model")?,
            max_len: get_usize(config, "max_len")?,
            pos_kind,
            dropout: get_f32_or(config, "dropout", 0.0),
            pad_id: get_optional_u32(config, "pad_id"),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Config`] if `dropout` is outside `[0, 1)` or
    /// if `d_model` is odd while `pos_kind` is sinusoidal.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(EmbedError::Config(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        if self.pos_kind == PosKind::Sinusoidal && self.d_model % 2 != 0 {
            return Err(EmbedError::Config(format!(
                "d_model must be even for sinusoidal encoding, got {}",
                self.d_model
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON extraction helpers
// ---------------------------------------------------------------------------

/// Extract a required `usize` field from a JSON object.
fn get_usize(config: &Value, key: &str) -> Result<usize> {
    let val = config
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| EmbedError::Config(format!("missing or invalid field '{key}'")))?;
    usize::try_from(val)
        .map_err(|_| EmbedError::Config(format!("field '{key}' value {val} overflows usize")))
}

/// Extract an `f32` field, returning a default if absent.
fn get_f32_or(config: &Value, key: &str, default: f32) -> f32 {
    config
        .get(key)
        .and_then(Value::as_f64)
        .map_or(default, |v| {
            // Safe: dropout probabilities are small; f64 -> f32 truncation is fine
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let v_f32 = v as f32;
            v_f32
        })
}

/// Extract an optional `u32` field, returning `None` if absent.
fn get_optional_u32(config: &Value, key: &str) -> Option<u32> {
    config
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Helper to create a minimal front-end config JSON.
    fn basic_config_json() -> Value {
        serde_json::json!({
            "vocab_size": 30000,
            "d_model": 512,
            "max_len": 1024,
            "pos_kind": "sinusoidal"
        })
    }

    #[test]
    fn parse_basic() {
        let config = FrontendConfig::from_json(&basic_config_json()).unwrap();
        assert_eq!(config.vocab_size, 30000);
        assert_eq!(config.d_model, 512);
        assert_eq!(config.max_len, 1024);
        assert_eq!(config.pos_kind, PosKind::Sinusoidal);
        assert!((config.dropout - 0.0).abs() < f32::EPSILON);
        assert!(config.pad_id.is_none());
    }

    #[test]
    fn parse_optional_fields() {
        let json = serde_json::json!({
            "vocab_size": 256,
            "d_model": 64,
            "max_len": 50,
            "pos_kind": "learned",
            "dropout": 0.1,
            "pad_id": 0
        });
        let config = FrontendConfig::from_json(&json).unwrap();
        assert_eq!(config.pos_kind, PosKind::Learned);
        assert!((config.dropout - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.pad_id, Some(0));
    }

    #[test]
    fn missing_required_field_errors() {
        let json = serde_json::json!({ "vocab_size": 256, "pos_kind": "learned" });
        assert!(FrontendConfig::from_json(&json).is_err());
    }

    #[test]
    fn unknown_pos_kind_errors() {
        let json = serde_json::json!({
            "vocab_size": 256,
            "d_model": 64,
            "max_len": 50,
            "pos_kind": "rotary"
        });
        let err = FrontendConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("unknown pos_kind"));
    }

    #[test]
    fn pos_kind_round_trips_through_display() {
        for kind in [PosKind::Sinusoidal, PosKind::Learned] {
            assert_eq!(kind.to_string().parse::<PosKind>().unwrap(), kind);
        }
    }

    #[test]
    fn dropout_out_of_range_errors() {
        let mut config = FrontendConfig::new(256, 64, 50, PosKind::Sinusoidal);
        config.dropout = 1.0;
        assert!(config.validate().is_err());
        config.dropout = -0.1;
        assert!(config.validate().is_err());
        config.dropout = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn odd_d_model_rejected_for_sinusoidal() {
        let config = FrontendConfig::new(256, 15, 50, PosKind::Sinusoidal);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be even"));

        // The learned strategy has no evenness requirement.
        let config = FrontendConfig::new(256, 15, 50, PosKind::Learned);
        assert!(config.validate().is_ok());
    }
}
