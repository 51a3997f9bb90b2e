// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Paperglass CLI
//!
//! Front door to the schema and analytics core: inspect the category
//! table, validate a custom one, render an item's detail plan, and run
//! spending analytics over a content collection.

use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use paperglass::analytics::{
    calculate_monthly_stats, filter_by_time_range, group_by_merchant, top_rankings,
    window_summary, Trend,
};
use paperglass::content::{load_items, save_items, ContentItem, ExtractedField};
use paperglass::extract::{MERCHANT_NAME, TOTAL_AMOUNT, TRANSACTION_DATE};
use paperglass::schema::{CategoryId, CategoryRegistry};
use paperglass::template::{build_render_plan, FieldSlot};
use paperglass::{PaperglassError, Result};

/// Paperglass CLI - document schema registry and spending analytics
#[derive(Parser, Debug)]
#[command(name = "paperglass")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Document-capture schema and analytics core", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a category table (JSON); built-ins are used when absent
    #[arg(short, long, default_value = "categories.json", global = true)]
    schema: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run spending analytics over a content collection
    Analytics {
        /// Content collection (JSON array of items)
        content: PathBuf,

        /// Trailing window in days
        #[arg(short, long, default_value = "30")]
        window: i64,

        /// Restrict to one category (default: all analytics-enabled)
        #[arg(short, long)]
        category: Option<CategoryId>,
    },

    /// Render the detail plan for a single item
    Show {
        /// Content collection (JSON array of items)
        content: PathBuf,

        /// Item id to render
        id: String,
    },

    /// List the category table
    Categories,

    /// Validate the category table (advisory warnings only)
    Validate,

    /// Write a starter category table and sample content collection
    Init {
        /// Directory to initialize (default: current)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Force overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let registry = CategoryRegistry::load(&cli.schema)?;

    match cli.command {
        Commands::Analytics { content, window, category } => {
            run_analytics(&registry, &content, window, category, &cli.format)
        }
        Commands::Show { content, id } => run_show(&registry, &content, &id, &cli.format),
        Commands::Categories => run_categories(&registry, &cli.format),
        Commands::Validate => run_validate(&registry, &cli.format),
        Commands::Init { dir, force } => run_init(dir, force),
    }
}

/// Run windowed analytics over a content file
fn run_analytics(
    registry: &CategoryRegistry,
    content: &Path,
    window: i64,
    category: Option<CategoryId>,
    format: &str,
) -> Result<()> {
    if window <= 0 {
        return Err(PaperglassError::Config(format!(
            "Window must be positive, got {}",
            window
        )));
    }

    let items = load_items(content)?;
    info!("Loaded {} items from {:?}", items.len(), content);

    let available = registry.analytics_categories(&items);
    info!(
        "Analytics categories with data: {:?}",
        available.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()
    );

    // The engine does not re-check categories; filter here.
    let scoped: Vec<ContentItem> = items
        .iter()
        .filter(|item| match category {
            Some(id) => item.category == id,
            None => registry.is_analytics_enabled(item.category),
        })
        .cloned()
        .collect();

    if let Some(id) = category {
        if !registry.is_analytics_enabled(id) {
            warn!("Category '{}' is not analytics-enabled", id);
        }
    }

    let windowed = filter_by_time_range(&scoped, window);
    let summary = window_summary(&windowed);
    let monthly = calculate_monthly_stats(&scoped);
    let breakdown = group_by_merchant(&windowed);
    let rankings = top_rankings(&windowed);

    match format {
        "json" => {
            let output = serde_json::json!({
                "window_days": window,
                "summary": summary,
                "monthly": monthly,
                "breakdown": breakdown,
                "rankings": rankings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("Last {} days: {} items, {:.2} total, {:.2} average",
                window, summary.count, summary.total, summary.average);

            let arrow = match monthly.trend {
                Trend::Up => "↑",
                Trend::Down => "↓",
                Trend::Neutral => "→",
            };
            println!("\nThis month: {:.2} (prev {:.2}, {} {:.1}%)",
                monthly.current_total, monthly.previous_total, arrow, monthly.percent_change);

            if !breakdown.is_empty() {
                println!("\nTop merchants:");
                for entry in &breakdown {
                    println!("  {:<24} {:>10.2}  {:>5.1}%  ({} items)",
                        entry.label, entry.amount, entry.percentage, entry.count);
                }
            }

            if let Some(highest) = &rankings.highest {
                println!("\nHighest transaction: {} at {:.2}{}",
                    highest.label,
                    highest.amount,
                    highest.date.as_deref().map(|d| format!(" on {}", d)).unwrap_or_default());
            }
            if let Some(frequent) = &rankings.frequent {
                println!("Most frequent merchant: {} ({} visits)", frequent.label, frequent.count);
            }
        }
    }

    Ok(())
}

/// Render one item's detail plan
fn run_show(registry: &CategoryRegistry, content: &Path, id: &str, format: &str) -> Result<()> {
    let items = load_items(content)?;
    let item = items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| PaperglassError::ItemNotFound(id.to_string()))?;

    let definition = registry.definition(item.category);
    if definition.is_none() {
        warn!("No definition for category '{}', using generic layout", item.category);
    }

    let plan = build_render_plan(definition, &item.fields);

    match format {
        "json" => {
            let output = serde_json::json!({
                "id": item.id,
                "title": item.title,
                "category": item.category,
                "plan": plan,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("{} [{}] via {:?} template", item.title, item.category, plan.template);
            for section in &plan.sections {
                println!("\n== {} ==", section.title_key.as_deref().unwrap_or("fields"));
                for slot in &section.slots {
                    match slot {
                        FieldSlot::Filled { label_key, value, confidence, .. } => {
                            println!("  {:<28} {} ({:.0}%)", label_key, value, confidence * 100.0);
                        }
                        FieldSlot::Missing { label_key, .. } => {
                            println!("  {:<28} <missing>", label_key);
                        }
                    }
                }
            }

            if !plan.additional.is_empty() {
                println!("\n== additional ==");
                for field in &plan.additional {
                    println!("  {:<28} {}",
                        field.label.as_deref().unwrap_or(&field.field_id),
                        field.value.as_deref().unwrap_or("<missing>"));
                }
            }

            if !plan.missing_required.is_empty() {
                println!("\nMissing required fields: {}", plan.missing_required.join(", "));
            }
        }
    }

    Ok(())
}

/// List the category table
fn run_categories(registry: &CategoryRegistry, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(registry.definitions())?);
        }
        _ => {
            println!("Categories:");
            for def in registry.definitions() {
                let analytics = if def.analytics.map(|a| a.enabled).unwrap_or(false) {
                    "analytics"
                } else {
                    "-"
                };
                println!("  {:<16} {:?} template, {} required + {} optional fields [{}]",
                    def.id.to_string(),
                    def.presentation.component,
                    def.required_fields.len(),
                    def.optional_fields.len(),
                    analytics);
            }
        }
    }
    Ok(())
}

/// Validate the category table
fn run_validate(registry: &CategoryRegistry, format: &str) -> Result<()> {
    let warnings = registry.validate();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&warnings)?);
        }
        _ => {
            if warnings.is_empty() {
                println!("Category table is clean ({} categories)", registry.definitions().len());
            } else {
                println!("{} warning(s):", warnings.len());
                for warning in &warnings {
                    println!("  {}", warning);
                }
            }
        }
    }

    // Warnings are advisory; validation never fails the process.
    Ok(())
}

/// Write starter files into a directory
fn run_init(dir: Option<PathBuf>, force: bool) -> Result<()> {
    let target = dir.unwrap_or_else(|| PathBuf::from("."));
    let schema_path = target.join("categories.json");
    let content_path = target.join("content.json");

    if (schema_path.exists() || content_path.exists()) && !force {
        return Err(PaperglassError::Config(
            "categories.json or content.json already exists. Use --force to overwrite".to_string(),
        ));
    }

    std::fs::create_dir_all(&target)?;

    CategoryRegistry::builtin().save(&schema_path)?;
    save_items(&content_path, &sample_items())?;

    println!("Paperglass initialized in {:?}", target);
    println!("\nCreated:");
    println!("  - categories.json");
    println!("  - content.json");
    println!("\nNext steps:");
    println!("  1. Inspect the table: paperglass categories");
    println!("  2. Run analytics: paperglass analytics content.json --window 30");

    Ok(())
}

/// Sample collection mirroring a few freshly captured documents
fn sample_items() -> Vec<ContentItem> {
    let today = Local::now().date_naive();
    let day = |offset: i64| (today - Duration::days(offset)).format("%Y-%m-%d").to_string();

    vec![
        ContentItem::new(CategoryId::Receipt, "Starbucks Receipt")
            .with_field(ExtractedField::new(MERCHANT_NAME, "Starbucks", 0.96))
            .with_field(ExtractedField::new(TOTAL_AMOUNT, "$12.50", 0.88))
            .with_field(ExtractedField::new(TRANSACTION_DATE, &day(1), 0.92))
            .with_tag("Coffee"),
        ContentItem::new(CategoryId::Receipt, "Uber Receipt")
            .with_field(ExtractedField::new(MERCHANT_NAME, "Uber", 0.93))
            .with_field(ExtractedField::new(TOTAL_AMOUNT, "$24.00", 0.90))
            .with_field(ExtractedField::new(TRANSACTION_DATE, &day(2), 0.95))
            .with_tag("Transport"),
        ContentItem::new(CategoryId::Receipt, "Whole Foods Receipt")
            .with_field(ExtractedField::new(MERCHANT_NAME, "Whole Foods", 0.91))
            .with_field(ExtractedField::new(TOTAL_AMOUNT, "$86.40", 0.85))
            .with_field(ExtractedField::new(TRANSACTION_DATE, &day(12), 0.89))
            .with_tag("Groceries"),
        ContentItem::new(CategoryId::BusinessCard, "Business Card · Jane Doe")
            .with_field(ExtractedField::new("full_name", "Jane Doe", 0.97))
            .with_field(ExtractedField::new("company", "Nova Labs", 0.94))
            .with_field(ExtractedField::new("title", "Product Design Lead", 0.90))
            .with_field(ExtractedField::new("email", "jane@novalabs.io", 0.92))
            .with_field(ExtractedField::new("phone_number", "+1 555 0142", 0.86))
            .with_tag("Networking"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["paperglass", "categories"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_analytics_command() {
        let cli = Cli::try_parse_from([
            "paperglass", "analytics", "content.json", "--window", "7", "--category", "receipt",
        ])
        .unwrap();

        match cli.command {
            Commands::Analytics { content, window, category } => {
                assert_eq!(content, PathBuf::from("content.json"));
                assert_eq!(window, 7);
                assert_eq!(category, Some(CategoryId::Receipt));
            }
            _ => panic!("Expected Analytics command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from([
            "paperglass", "analytics", "content.json", "--category", "warranty",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_show_command() {
        let cli = Cli::try_parse_from([
            "paperglass", "--format", "json", "show", "content.json", "item-1",
        ])
        .unwrap();

        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Show { id, .. } => assert_eq!(id, "item-1"),
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_sample_items_are_well_formed() {
        let items = sample_items();
        assert_eq!(items.len(), 4);

        let registry = CategoryRegistry::builtin();
        for item in &items {
            let def = registry.definition(item.category).unwrap();
            let plan = build_render_plan(Some(def), &item.fields);
            assert!(plan.missing_required.is_empty(), "{} incomplete", item.title);
        }
    }

    #[test]
    fn test_init_then_analytics_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        run_init(Some(dir.path().to_path_buf()), false).unwrap();

        let registry = CategoryRegistry::load(&dir.path().join("categories.json")).unwrap();
        let items = load_items(&dir.path().join("content.json")).unwrap();

        // Business cards are not analytics-enabled; receipts are.
        let scoped: Vec<ContentItem> = items
            .iter()
            .filter(|item| registry.is_analytics_enabled(item.category))
            .cloned()
            .collect();
        assert_eq!(scoped.len(), 3);

        let windowed = filter_by_time_range(&scoped, 7);
        assert_eq!(windowed.len(), 2);

        let rankings = top_rankings(&windowed);
        assert_eq!(rankings.highest.unwrap().label, "Uber");
    }
}
