// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Template dispatch and render-plan construction
//!
//! The presentation layer asks this module what to draw: which template
//! strategy applies to an item, which fields go in which section, and what
//! is missing. Dispatch is a closed enum with a mandatory generic arm, so
//! a malformed or newly added category still renders something ordered and
//! labeled instead of failing the view.
//!
//! The fallback is two-level: a category-specific template when the
//! definition names one, the generic layout honoring the definition's
//! sections when the tag is unrecognized, and a plain unordered field dump
//! when no definition exists at all.

use serde::Serialize;

use crate::content::ExtractedField;
use crate::schema::{CategoryDefinition, TemplateComponent};

/// One slot in a rendered section
///
/// A schema gap (a section field with no matching extraction) becomes an
/// explicit `Missing` placeholder rather than being omitted, so the user
/// can see what's absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSlot {
    Filled {
        field_id: String,
        label_key: String,
        value: String,
        confidence: f64,
    },
    Missing {
        field_id: String,
        label_key: String,
    },
}

/// A titled group of field slots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSection {
    /// Localization key; `None` for the schema-less field dump
    pub title_key: Option<String>,
    pub slots: Vec<FieldSlot>,
}

/// Everything the detail view needs to draw one item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub template: TemplateComponent,
    pub sections: Vec<RenderSection>,
    /// Extracted fields matching no spec in the definition
    pub additional: Vec<ExtractedField>,
    /// Required field ids with no usable extraction; drives the advisory
    /// "missing required fields" banner, never blocks rendering
    pub missing_required: Vec<String>,
}

/// Resolve the rendering strategy for a category definition
///
/// Absence of a definition resolves to the generic strategy.
pub fn resolve_template(definition: Option<&CategoryDefinition>) -> TemplateComponent {
    // Unrecognized tags already collapsed to Generic at deserialization,
    // so the only remaining fallback is a missing definition.
    definition
        .map(|def| def.presentation.component)
        .unwrap_or(TemplateComponent::Generic)
}

/// Required field specs with no non-empty extraction
pub fn missing_required_fields<'a>(
    definition: &'a CategoryDefinition,
    fields: &[ExtractedField],
) -> Vec<&'a crate::schema::FieldSpec> {
    definition
        .required_fields
        .iter()
        .filter(|spec| !fields.iter().any(|f| f.field_id == spec.id && f.has_value()))
        .collect()
}

/// Build the render plan for one item's fields
pub fn build_render_plan(
    definition: Option<&CategoryDefinition>,
    fields: &[ExtractedField],
) -> RenderPlan {
    let Some(def) = definition else {
        // No schema at all: unordered dump in extraction order.
        return RenderPlan {
            template: TemplateComponent::Generic,
            sections: vec![RenderSection {
                title_key: None,
                slots: fields.iter().map(dump_slot).collect(),
            }],
            additional: Vec::new(),
            missing_required: Vec::new(),
        };
    };

    let mut sections = Vec::new();
    for template_section in &def.presentation.sections {
        let mut slots = Vec::new();
        for field_id in &template_section.field_ids {
            let Some(spec) = def.field_spec(field_id) else {
                // Dangling reference: renders as empty, not as an error.
                tracing::debug!(
                    "Section '{}' references unknown field '{}'",
                    template_section.title_key,
                    field_id
                );
                continue;
            };

            let extracted = fields
                .iter()
                .find(|f| f.field_id == spec.id)
                .filter(|f| f.has_value());

            slots.push(match extracted {
                Some(field) => FieldSlot::Filled {
                    field_id: spec.id.clone(),
                    label_key: spec.label_key.clone(),
                    value: field.value.clone().unwrap_or_default(),
                    confidence: field.confidence,
                },
                None => FieldSlot::Missing {
                    field_id: spec.id.clone(),
                    label_key: spec.label_key.clone(),
                },
            });
        }
        sections.push(RenderSection {
            title_key: Some(template_section.title_key.clone()),
            slots,
        });
    }

    let additional: Vec<ExtractedField> = fields
        .iter()
        .filter(|f| def.field_spec(&f.field_id).is_none())
        .cloned()
        .collect();

    let missing_required = missing_required_fields(def, fields)
        .into_iter()
        .map(|spec| spec.id.clone())
        .collect();

    RenderPlan {
        template: resolve_template(Some(def)),
        sections,
        additional,
        missing_required,
    }
}

fn dump_slot(field: &ExtractedField) -> FieldSlot {
    match &field.value {
        Some(value) if !value.is_empty() => FieldSlot::Filled {
            field_id: field.field_id.clone(),
            label_key: field.label.clone().unwrap_or_else(|| field.field_id.clone()),
            value: value.clone(),
            confidence: field.confidence,
        },
        _ => FieldSlot::Missing {
            field_id: field.field_id.clone(),
            label_key: field.label.clone().unwrap_or_else(|| field.field_id.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ExtractedField;
    use crate::schema::{CategoryId, CategoryRegistry};

    fn registry() -> CategoryRegistry {
        CategoryRegistry::builtin()
    }

    fn receipt_fields() -> Vec<ExtractedField> {
        vec![
            ExtractedField::new("merchant_name", "Acme Corp.", 0.96),
            ExtractedField::new("total_amount", "$124.20", 0.88),
            ExtractedField::new("transaction_date", "2024-06-01", 0.92),
        ]
    }

    #[test]
    fn test_resolve_known_templates() {
        let registry = registry();
        assert_eq!(
            resolve_template(registry.definition(CategoryId::Receipt)),
            TemplateComponent::Receipt
        );
        assert_eq!(
            resolve_template(registry.definition(CategoryId::BusinessCard)),
            TemplateComponent::BusinessCard
        );
        assert_eq!(resolve_template(None), TemplateComponent::Generic);
    }

    #[test]
    fn test_plan_groups_fields_under_sections() {
        let registry = registry();
        let def = registry.definition(CategoryId::Receipt);
        let plan = build_render_plan(def, &receipt_fields());

        assert_eq!(plan.template, TemplateComponent::Receipt);
        assert_eq!(plan.sections.len(), 2);
        assert_eq!(
            plan.sections[0].title_key.as_deref(),
            Some("receipt.section.summary")
        );
        // Summary section order follows the schema, not extraction order.
        assert!(matches!(
            &plan.sections[0].slots[0],
            FieldSlot::Filled { field_id, .. } if field_id == "merchant_name"
        ));
        assert!(matches!(
            &plan.sections[0].slots[1],
            FieldSlot::Filled { field_id, .. } if field_id == "transaction_date"
        ));
        assert!(plan.missing_required.is_empty());
    }

    #[test]
    fn test_plan_emits_missing_placeholders() {
        let registry = registry();
        let def = registry.definition(CategoryId::Receipt);
        let fields = vec![ExtractedField::new("merchant_name", "Acme Corp.", 0.96)];
        let plan = build_render_plan(def, &fields);

        // Unextracted section fields become placeholders, not omissions.
        assert!(plan.sections[0].slots.iter().any(|slot| matches!(
            slot,
            FieldSlot::Missing { field_id, .. } if field_id == "total_amount"
        )));
        // Required completeness is advisory and reported.
        assert_eq!(
            plan.missing_required,
            vec!["total_amount".to_string(), "transaction_date".to_string()]
        );
    }

    #[test]
    fn test_plan_empty_value_counts_as_missing() {
        let registry = registry();
        let def = registry.definition(CategoryId::Receipt);
        let fields = vec![
            ExtractedField::new("merchant_name", "", 0.3),
            ExtractedField::new("total_amount", "12.00", 0.9),
            ExtractedField::new("transaction_date", "2024-06-01", 0.9),
        ];
        let plan = build_render_plan(def, &fields);
        assert_eq!(plan.missing_required, vec!["merchant_name".to_string()]);
    }

    #[test]
    fn test_plan_collects_additional_fields() {
        let registry = registry();
        let def = registry.definition(CategoryId::Receipt);
        let mut fields = receipt_fields();
        fields.push(ExtractedField::new("loyalty_number", "GOLD-1234", 0.6));

        let plan = build_render_plan(def, &fields);
        assert_eq!(plan.additional.len(), 1);
        assert_eq!(plan.additional[0].field_id, "loyalty_number");
    }

    #[test]
    fn test_plan_skips_dangling_section_refs() {
        let mut def = registry().definition(CategoryId::Receipt).unwrap().clone();
        def.presentation.sections[0].field_ids.insert(0, "ghost_field".to_string());

        let plan = build_render_plan(Some(&def), &receipt_fields());
        // The dangling id renders as empty: the section simply lacks it.
        assert!(!plan.sections[0].slots.iter().any(|slot| matches!(
            slot,
            FieldSlot::Missing { field_id, .. } | FieldSlot::Filled { field_id, .. }
                if field_id == "ghost_field"
        )));
        assert_eq!(plan.sections[0].slots.len(), 3);
    }

    #[test]
    fn test_plan_without_definition_dumps_fields() {
        let fields = receipt_fields();
        let plan = build_render_plan(None, &fields);

        assert_eq!(plan.template, TemplateComponent::Generic);
        assert_eq!(plan.sections.len(), 1);
        assert!(plan.sections[0].title_key.is_none());
        assert_eq!(plan.sections[0].slots.len(), 3);
        assert!(plan.additional.is_empty());
        assert!(plan.missing_required.is_empty());
    }

    #[test]
    fn test_duplicate_field_id_first_match_renders() {
        let registry = registry();
        let def = registry.definition(CategoryId::Receipt);
        let fields = vec![
            ExtractedField::new("merchant_name", "First Pass", 0.7),
            ExtractedField::new("merchant_name", "Second Pass", 0.9),
            ExtractedField::new("total_amount", "12.00", 0.9),
            ExtractedField::new("transaction_date", "2024-06-01", 0.9),
        ];
        let plan = build_render_plan(def, &fields);
        assert!(matches!(
            &plan.sections[0].slots[0],
            FieldSlot::Filled { value, .. } if value == "First Pass"
        ));
    }
}
