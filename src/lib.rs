// SPDX-License-Identifier: MIT OR Apache-2.0

//! # candle-embed
//!
//! Transformer embedding front-ends in Rust, built on
//! [candle](https://github.com/huggingface/candle).
//!
//! candle-embed provides the standard "embedding front-end" shared by
//! virtually every transformer — token embedding lookup, a positional
//! signal, and dropout — as small, well-tested building blocks:
//!
//! - [`SinusoidalTable`] — the fixed sin/cos encoding from Vaswani et al.
//!   (2017).  Zero learnable parameters; deterministic for any position.
//! - [`LearnedPositional`] — a trainable per-position table (BERT / GPT-2
//!   style).
//! - [`TokenPositionalEmbedding`] — token lookup + positional signal +
//!   dropout, with optional zeroed padding index.  The positional strategy
//!   is selected once at construction via [`PosKind`].
//!
//! Both positional strategies share one forward contract
//! (`[batch, seq_len, d_model]` in and out), reject sequences longer than
//! the configured maximum with [`EmbedError::LengthExceeded`], and preserve
//! the input's dtype and device.
//!
//! The crate also ships the `workbench` binary, a thin CLI over the
//! [`workbench`] listing helpers used by the surrounding experiment
//! repository.

#![deny(warnings)]
#![warn(missing_docs)]

pub mod config;
pub mod embed;
pub mod error;
pub mod seed;
pub mod workbench;

pub use config::{FrontendConfig, PosKind};
pub use embed::positional::{create_positional, LearnedPositional, Positional};
pub use embed::sinusoidal::SinusoidalTable;
pub use embed::TokenPositionalEmbedding;
pub use error::{EmbedError, Result};
pub use seed::{seeded_rng, set_seed, SeedConfig};
