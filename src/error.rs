// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Paperglass

use thiserror::Error;

/// Result type alias for Paperglass operations
pub type Result<T> = std::result::Result<T, PaperglassError>;

/// Paperglass error types
///
/// The schema/analytics core itself has no fatal error class: unknown
/// categories fall back to the generic template, malformed values are
/// treated as absent, empty inputs produce empty results. These variants
/// cover the ambient surface only (loading category tables and content
/// collections, CLI output).
#[derive(Error, Debug)]
pub enum PaperglassError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Content item not found: {0}")]
    ItemNotFound(String),
}
