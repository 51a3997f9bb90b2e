// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Category schemas: field specs, presentation layout, and the registry
//!
//! The registry is the single source of truth for what a captured document
//! of a given category contains: which fields are required, how each one
//! renders, which template lays the detail view out, and whether the
//! category participates in analytics. Definitions are static configuration
//! loaded at startup, never mutated at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::content::ContentItem;

/// Value type of a field, drives input widgets and formatting downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Date,
    Currency,
    Email,
    Phone,
    Url,
}

/// Date rendering pattern hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePattern {
    #[serde(rename = "YYYY-MM-DD")]
    Ymd,
    #[serde(rename = "ISO8601")]
    Iso8601,
}

/// Optional formatting hints for a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_pattern: Option<DatePattern>,
}

/// Static declaration of one data point a category may contain
///
/// Identity is `id`, unique within a category's combined required and
/// optional field list. `label_key` is a localization key; this core never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    pub label_key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub editable: bool,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
}

/// Rendering strategy for a category's detail view
///
/// Closed set: an unrecognized tag in a loaded table deserializes to
/// `Generic`, so a malformed or newly added category still renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateComponent {
    Receipt,
    BusinessCard,
    #[default]
    #[serde(other)]
    Generic,
}

/// One titled group of fields in the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub title_key: String,
    pub field_ids: Vec<String>,
}

/// Presentation layout for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub component: TemplateComponent,
    pub sections: Vec<TemplateSection>,
}

/// Per-category analytics switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub enabled: bool,
}

/// Closed set of document categories
///
/// Adding a category is a schema change, not a runtime operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Receipt,
    BusinessCard,
}

impl CategoryId {
    pub const ALL: [CategoryId; 2] = [CategoryId::Receipt, CategoryId::BusinessCard];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Receipt => "receipt",
            CategoryId::BusinessCard => "business_card",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CategoryId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Full schema for one document category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: CategoryId,
    pub label: String,
    pub required_fields: Vec<FieldSpec>,
    #[serde(default)]
    pub optional_fields: Vec<FieldSpec>,
    pub presentation: Presentation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsConfig>,
}

impl CategoryDefinition {
    /// All field specs, required first, in declaration order
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.required_fields.iter().chain(self.optional_fields.iter())
    }

    /// Look up a field spec by id across required and optional fields
    pub fn field_spec(&self, field_id: &str) -> Option<&FieldSpec> {
        self.all_fields().find(|spec| spec.id == field_id)
    }

    fn analytics_enabled(&self) -> bool {
        self.analytics.map(|a| a.enabled).unwrap_or(false)
    }
}

/// An analytics-enabled category together with how many items it has
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsCategory {
    pub id: CategoryId,
    pub label: String,
    pub count: usize,
}

/// Advisory schema problem found by [`CategoryRegistry::validate`]
///
/// Warnings never block rendering; dangling section references simply
/// render as empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaWarning {
    DuplicateFieldId {
        category: CategoryId,
        field_id: String,
    },
    DanglingSectionField {
        category: CategoryId,
        section: String,
        field_id: String,
    },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::DuplicateFieldId { category, field_id } => {
                write!(f, "{}: duplicate field id '{}'", category, field_id)
            }
            SchemaWarning::DanglingSectionField { category, section, field_id } => {
                write!(
                    f,
                    "{}: section '{}' references unknown field '{}'",
                    category, section, field_id
                )
            }
        }
    }
}

/// Declaration-ordered table of category definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRegistry {
    definitions: Vec<CategoryDefinition>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryRegistry {
    /// Registry with the built-in category table
    pub fn builtin() -> Self {
        Self {
            definitions: vec![receipt_definition(), business_card_definition()],
        }
    }

    /// Registry over an explicit table (loaded configuration, tests)
    pub fn from_definitions(definitions: Vec<CategoryDefinition>) -> Self {
        Self { definitions }
    }

    /// Look up a category's definition
    ///
    /// Permissive by design: an id with no table entry yields `None` and
    /// callers fall back to the generic template rather than failing.
    pub fn definition(&self, id: CategoryId) -> Option<&CategoryDefinition> {
        self.definitions.iter().find(|def| def.id == id)
    }

    /// Look up a single field spec within a category
    pub fn field_spec(&self, id: CategoryId, field_id: &str) -> Option<&FieldSpec> {
        self.definition(id).and_then(|def| def.field_spec(field_id))
    }

    /// Whether a category participates in analytics (absent entry or
    /// absent analytics block means no)
    pub fn is_analytics_enabled(&self, id: CategoryId) -> bool {
        self.definition(id).map(|def| def.analytics_enabled()).unwrap_or(false)
    }

    /// Categories that are analytics-enabled AND have at least one item,
    /// in registry declaration order (not data order)
    pub fn analytics_categories(&self, items: &[ContentItem]) -> Vec<AnalyticsCategory> {
        self.definitions
            .iter()
            .filter(|def| def.analytics_enabled())
            .filter_map(|def| {
                let count = items.iter().filter(|item| item.category == def.id).count();
                if count == 0 {
                    return None;
                }
                Some(AnalyticsCategory {
                    id: def.id,
                    label: def.label.clone(),
                    count,
                })
            })
            .collect()
    }

    /// All definitions in declaration order
    pub fn definitions(&self) -> &[CategoryDefinition] {
        &self.definitions
    }

    /// Check the table for duplicate field ids and dangling section
    /// references. Advisory only: warnings are logged and returned, the
    /// table stays usable either way.
    pub fn validate(&self) -> Vec<SchemaWarning> {
        let mut warnings = Vec::new();

        for def in &self.definitions {
            let mut seen: Vec<&str> = Vec::new();
            for spec in def.all_fields() {
                if seen.contains(&spec.id.as_str()) {
                    warnings.push(SchemaWarning::DuplicateFieldId {
                        category: def.id,
                        field_id: spec.id.clone(),
                    });
                } else {
                    seen.push(&spec.id);
                }
            }

            for section in &def.presentation.sections {
                for field_id in &section.field_ids {
                    if def.field_spec(field_id).is_none() {
                        warnings.push(SchemaWarning::DanglingSectionField {
                            category: def.id,
                            section: section.title_key.clone(),
                            field_id: field_id.clone(),
                        });
                    }
                }
            }
        }

        for warning in &warnings {
            tracing::warn!("Schema warning: {}", warning);
        }

        warnings
    }

    /// Load a category table from a JSON file, falling back to the
    /// built-in table when the file does not exist
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let registry: Self = serde_json::from_str(&content).map_err(|e| {
                crate::PaperglassError::Config(format!("Failed to parse category table: {}", e))
            })?;
            Ok(registry)
        } else {
            tracing::info!("Category table not found at {:?}, using built-ins", path);
            Ok(Self::builtin())
        }
    }

    /// Save the category table to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn spec(id: &str, label_key: &str, field_type: FieldType, editable: bool, required: bool) -> FieldSpec {
    FieldSpec {
        id: id.to_string(),
        label_key: label_key.to_string(),
        field_type,
        editable,
        required,
        format: None,
    }
}

fn section(title_key: &str, field_ids: &[&str]) -> TemplateSection {
    TemplateSection {
        title_key: title_key.to_string(),
        field_ids: field_ids.iter().map(|id| id.to_string()).collect(),
    }
}

fn receipt_definition() -> CategoryDefinition {
    CategoryDefinition {
        id: CategoryId::Receipt,
        label: "categories.receipt".to_string(),
        required_fields: vec![
            spec("merchant_name", "fields.merchant", FieldType::String, true, true),
            FieldSpec {
                format: Some(FieldFormat {
                    currency: Some("USD".to_string()),
                    date_pattern: None,
                }),
                ..spec("total_amount", "fields.total", FieldType::Currency, false, true)
            },
            FieldSpec {
                format: Some(FieldFormat {
                    currency: None,
                    date_pattern: Some(DatePattern::Ymd),
                }),
                ..spec("transaction_date", "fields.date", FieldType::Date, true, true)
            },
        ],
        optional_fields: vec![
            spec("tax_amount", "fields.tax", FieldType::Currency, true, false),
            spec("payment_method", "fields.paymentMethod", FieldType::String, true, false),
            spec("notes", "fields.notes", FieldType::String, true, false),
            spec("items", "fields.items", FieldType::String, false, false),
        ],
        presentation: Presentation {
            component: TemplateComponent::Receipt,
            sections: vec![
                section(
                    "receipt.section.summary",
                    &["merchant_name", "transaction_date", "total_amount"],
                ),
                section(
                    "receipt.section.payment",
                    &["payment_method", "tax_amount", "notes"],
                ),
            ],
        },
        analytics: Some(AnalyticsConfig { enabled: true }),
    }
}

fn business_card_definition() -> CategoryDefinition {
    CategoryDefinition {
        id: CategoryId::BusinessCard,
        label: "categories.businessCard".to_string(),
        required_fields: vec![
            spec("full_name", "fields.fullName", FieldType::String, true, true),
            spec("company", "fields.company", FieldType::String, true, true),
            spec("title", "fields.title", FieldType::String, true, true),
            spec("email", "fields.email", FieldType::Email, true, true),
            spec("phone_number", "fields.phone", FieldType::Phone, true, true),
        ],
        optional_fields: vec![
            spec("website", "fields.website", FieldType::Url, true, false),
            spec("address", "fields.address", FieldType::String, true, false),
            spec("notes", "fields.notes", FieldType::String, true, false),
        ],
        presentation: Presentation {
            component: TemplateComponent::BusinessCard,
            sections: vec![
                section(
                    "businessCard.section.identity",
                    &["full_name", "title", "company"],
                ),
                section(
                    "businessCard.section.contact",
                    &["email", "phone_number", "website", "address"],
                ),
            ],
        },
        analytics: None,
    }
}
