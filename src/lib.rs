// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Paperglass: Document Capture Schema & Analytics Core
//!
//! The category-driven document schema and derived analytics engine behind
//! a capture app: field specs, a closed category registry, typed extraction
//! reducers over OCR'd field values, time-windowed spending analytics, and
//! a render-plan builder for the presentation layer.

pub mod analytics;
pub mod content;
pub mod error;
pub mod extract;
pub mod schema;
pub mod template;

pub use content::{ContentItem, ExtractedField};
pub use error::{PaperglassError, Result};
pub use schema::{CategoryDefinition, CategoryId, CategoryRegistry, FieldSpec};
