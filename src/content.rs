// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Captured content records
//!
//! A [`ContentItem`] is one saved, categorized document with the field
//! values extraction produced for it. Items own their fields exclusively;
//! edits replace field values in place and removal is whole-item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

use crate::schema::CategoryId;

/// One value captured for a content item
///
/// `field_id` ties the value to a [`crate::schema::FieldSpec`]; `id` is
/// unique per extraction instance. Several entries may share a `field_id`
/// when produced by distinct extraction passes; consumers take the first
/// list-order match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub id: String,
    pub field_id: String,
    pub value: Option<String>,
    /// Extraction confidence in [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ExtractedField {
    /// Build a field with a generated instance id
    pub fn new(field_id: &str, value: &str, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field_id: field_id.to_string(),
            value: Some(value.to_string()),
            confidence,
            label: None,
            metadata: Map::new(),
        }
    }

    /// Build a field whose extraction produced no value
    pub fn empty(field_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field_id: field_id.to_string(),
            value: None,
            confidence: 0.0,
            label: None,
            metadata: Map::new(),
        }
    }

    /// Whether the field carries a usable value
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// One saved, categorized document instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub category: CategoryId,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<ExtractedField>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Build an empty item with a generated id and current timestamps
    pub fn new(category: CategoryId, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            category,
            title: title.to_string(),
            fields: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a field, returning the item (sample/test construction)
    pub fn with_field(mut self, field: ExtractedField) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a tag, returning the item
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}

/// Load a content collection from a JSON file
pub fn load_items(path: &Path) -> crate::Result<Vec<ContentItem>> {
    let content = std::fs::read_to_string(path)?;
    let items: Vec<ContentItem> = serde_json::from_str(&content)?;
    Ok(items)
}

/// Save a content collection to a JSON file
pub fn save_items(path: &Path, items: &[ContentItem]) -> crate::Result<()> {
    let content = serde_json::to_string_pretty(items)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_value() {
        assert!(ExtractedField::new("merchant_name", "Acme Corp.", 0.96).has_value());
        assert!(!ExtractedField::empty("merchant_name").has_value());
        assert!(!ExtractedField::new("merchant_name", "", 0.5).has_value());
    }

    #[test]
    fn test_items_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let items = vec![ContentItem::new(CategoryId::Receipt, "Acme Corp. Receipt")
            .with_field(ExtractedField::new("total_amount", "$124.20", 0.88))
            .with_tag("Finance")];
        save_items(&path, &items).unwrap();

        let loaded = load_items(&path).unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_field_metadata_defaults_empty() {
        let json = r#"{"id":"f1","field_id":"notes","value":"hi","confidence":0.7}"#;
        let field: ExtractedField = serde_json::from_str(json).unwrap();
        assert!(field.metadata.is_empty());
        assert!(field.label.is_none());
    }
}
