// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reproducibility utilities: seeding the device and host RNGs.
//!
//! Mirrors the usual experiment-workbench contract: one call seeds
//! everything a small experiment touches, and the `deterministic` flag
//! additionally pins the cuBLAS workspace configuration so GEMM reductions
//! are repeatable on CUDA.

use candle_core::Device;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;

/// cuBLAS workspace configuration required for deterministic GEMM.
const CUBLAS_DETERMINISTIC_CONFIG: &str = ":4096:8";

// ---------------------------------------------------------------------------
// SeedConfig
// ---------------------------------------------------------------------------

/// Immutable configuration for reproducibility seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    /// Seed for all RNGs.
    pub seed: u64,
    /// When true, also pins the cuBLAS workspace configuration.  May reduce
    /// performance.
    pub deterministic: bool,
}

impl SeedConfig {
    /// Create a config with `deterministic` enabled.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            deterministic: true,
        }
    }

    /// Apply this seed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::Model`](crate::EmbedError::Model) if the device
    /// RNG rejects the seed.
    pub fn apply(&self, device: &Device) -> Result<()> {
        set_seed(self.seed, self.deterministic, device)
    }
}

// ---------------------------------------------------------------------------
// Seeding functions
// ---------------------------------------------------------------------------

/// Seed the device RNG and configure deterministic execution.
///
/// CUDA and Metal expose a seedable generator through the device; the CPU
/// backend draws from its own thread-local source and cannot be seeded this
/// way, so CPU devices are left untouched.  Host-side randomness should go
/// through [`seeded_rng`].
///
/// # Errors
///
/// Returns [`EmbedError::Model`](crate::EmbedError::Model) if the device
/// RNG rejects the seed.
pub fn set_seed(seed: u64, deterministic: bool, device: &Device) -> Result<()> {
    match device {
        Device::Cpu => {}
        _ => device.set_seed(seed)?,
    }

    if deterministic {
        std::env::set_var("CUBLAS_WORKSPACE_CONFIG", CUBLAS_DETERMINISTIC_CONFIG);
    }

    tracing::debug!(seed, deterministic, "seeded RNGs");
    Ok(())
}

/// A host RNG seeded for reproducible sampling (token ids in demos, fixture
/// data in tests).
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
