// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workbench directory listings backing the `workbench` CLI.
//!
//! The surrounding experiment repository keeps project modules under
//! `projects/` and markdown notes under `notes/<category>/`.  These helpers
//! are informational only; no flag here affects any computation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Best-effort repository root discovery, starting from the current
/// working directory.
///
/// Walks upwards until a `Cargo.toml` is found so the CLI behaves correctly
/// anywhere inside a dev checkout.  Falls back to the starting directory.
#[must_use]
pub fn find_repo_root() -> PathBuf {
    std::env::current_dir()
        .map(|cwd| find_repo_root_from(&cwd))
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Repository root discovery from an explicit starting directory.
#[must_use]
pub fn find_repo_root_from(start: &Path) -> PathBuf {
    for candidate in start.ancestors() {
        if candidate.join("Cargo.toml").exists() {
            return candidate.to_path_buf();
        }
    }
    start.to_path_buf()
}

/// List project module directories under `base`, sorted by name.
///
/// A project module is a subdirectory whose name does not start with `_`
/// or `.`.
///
/// # Errors
///
/// Returns [`EmbedError::Io`](crate::EmbedError::Io) if `base` cannot be
/// read (e.g. it does not exist).
pub fn list_project_modules(base: &Path) -> Result<Vec<String>> {
    list_dirs(base, |name| !name.starts_with('_') && !name.starts_with('.'))
}

/// List note category directories under `notes_dir`, sorted by name.
///
/// A category is any non-hidden subdirectory.
///
/// # Errors
///
/// Returns [`EmbedError::Io`](crate::EmbedError::Io) if `notes_dir` cannot
/// be read.
pub fn list_note_categories(notes_dir: &Path) -> Result<Vec<String>> {
    list_dirs(notes_dir, |name| !name.starts_with('.'))
}

/// Sorted subdirectory names of `base` that pass the `keep` filter.
fn list_dirs(base: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if keep(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
