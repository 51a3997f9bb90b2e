// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Spending analytics over captured content
//!
//! Stateless reductions: every query re-derives from the full item slice,
//! nothing is cached between calls. Callers filter to analytics-enabled
//! categories first (see [`crate::schema::CategoryRegistry`]); the engine
//! does not re-check category membership.
//!
//! Each operation has an `*_at` variant taking an explicit `today` so
//! results are deterministic under test; the plain variants use the local
//! calendar date.

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::extract::{extract_amount, extract_date, extract_merchant, parse_date};

/// Trailing analytics windows offered by the UI
///
/// The algorithms are general over any positive day count; this is just
/// the closed set the selector exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
}

impl TimeRange {
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }
}

/// Direction of month-over-month change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Current vs previous calendar month totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub current_total: f64,
    pub previous_total: f64,
    /// Absolute magnitude of the change, in percent. Zero when the
    /// previous month had no spend, even if the current month does; the
    /// trend still reports the direction.
    pub percent_change: f64,
    pub trend: Trend,
}

/// Per-merchant share of total spend within a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingBreakdown {
    pub label: String,
    pub amount: f64,
    pub percentage: f64,
    pub count: usize,
}

/// The single largest transaction in a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestTransaction {
    pub label: String,
    pub amount: f64,
    pub date: Option<String>,
}

/// The most often seen merchant in a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentMerchant {
    pub label: String,
    pub count: usize,
}

/// Top-of-window rankings; both slots are `None` on empty input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub highest: Option<HighestTransaction>,
    pub frequent: Option<FrequentMerchant>,
}

/// Totals over an already-windowed slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

/// Items whose transaction date falls strictly within the trailing window
///
/// Items with a missing or unparsable date are excluded, whatever the rest
/// of the record looks like.
pub fn filter_by_time_range(items: &[ContentItem], days: i64) -> Vec<ContentItem> {
    filter_by_time_range_at(items, days, Local::now().date_naive())
}

/// [`filter_by_time_range`] with an explicit reference date
pub fn filter_by_time_range_at(
    items: &[ContentItem],
    days: i64,
    today: NaiveDate,
) -> Vec<ContentItem> {
    let cutoff = today - chrono::Duration::days(days);
    items
        .iter()
        .filter(|item| {
            extract_date(&item.fields)
                .and_then(parse_date)
                .is_some_and(|date| date > cutoff)
        })
        .cloned()
        .collect()
}

/// Current vs previous calendar month spend
pub fn calculate_monthly_stats(items: &[ContentItem]) -> MonthlyStats {
    calculate_monthly_stats_at(items, Local::now().date_naive())
}

/// [`calculate_monthly_stats`] with an explicit reference date
///
/// Partitioning is calendar-month-aligned, not a rolling 30-day window:
/// an item belongs to "current" when its date shares `today`'s year and
/// month, to "previous" when it falls in the month before.
pub fn calculate_monthly_stats_at(items: &[ContentItem], today: NaiveDate) -> MonthlyStats {
    let previous = today
        .checked_sub_months(Months::new(1))
        .unwrap_or(today);

    let mut current_total = 0.0;
    let mut previous_total = 0.0;

    for item in items {
        let Some(date) = extract_date(&item.fields).and_then(parse_date) else {
            continue;
        };
        let amount = extract_amount(&item.fields);

        if date.year() == today.year() && date.month() == today.month() {
            current_total += amount;
        } else if date.year() == previous.year() && date.month() == previous.month() {
            previous_total += amount;
        }
    }

    let change = if previous_total == 0.0 {
        0.0
    } else {
        (current_total - previous_total) / previous_total * 100.0
    };

    let raw_delta = current_total - previous_total;
    let trend = if raw_delta > 0.0 {
        Trend::Up
    } else if raw_delta < 0.0 {
        Trend::Down
    } else {
        Trend::Neutral
    };

    MonthlyStats {
        current_total,
        previous_total,
        percent_change: change.abs(),
        trend,
    }
}

/// Spend grouped by merchant, top five groups by amount
///
/// Percentages are computed against the total of ALL groups before the
/// list is truncated, so the returned shares still describe the full
/// window. Ties in amount keep encounter order (stable sort).
pub fn group_by_merchant(items: &[ContentItem]) -> Vec<SpendingBreakdown> {
    // Vec keyed by merchant keeps encounter order for the tie rule.
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    let mut total_amount = 0.0;

    for item in items {
        let merchant = extract_merchant(&item.fields);
        let amount = extract_amount(&item.fields);
        total_amount += amount;

        match groups.iter_mut().find(|(label, _, _)| *label == merchant) {
            Some((_, group_amount, count)) => {
                *group_amount += amount;
                *count += 1;
            }
            None => groups.push((merchant, amount, 1)),
        }
    }

    let mut breakdown: Vec<SpendingBreakdown> = groups
        .into_iter()
        .map(|(label, amount, count)| SpendingBreakdown {
            label,
            amount,
            percentage: if total_amount == 0.0 {
                0.0
            } else {
                amount / total_amount * 100.0
            },
            count,
        })
        .collect();

    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    breakdown.truncate(5);
    breakdown
}

/// Highest single transaction and most frequent merchant
///
/// First occurrence wins amount ties; first-encountered merchant wins
/// count ties.
pub fn top_rankings(items: &[ContentItem]) -> RankingResult {
    let mut highest: Option<HighestTransaction> = None;
    let mut highest_amount = f64::NEG_INFINITY;

    for item in items {
        let amount = extract_amount(&item.fields);
        if amount > highest_amount {
            highest_amount = amount;
            highest = Some(HighestTransaction {
                label: extract_merchant(&item.fields),
                amount,
                date: extract_date(&item.fields).map(str::to_string),
            });
        }
    }

    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        let merchant = extract_merchant(&item.fields);
        match counts.iter_mut().find(|(label, _)| *label == merchant) {
            Some((_, count)) => *count += 1,
            None => counts.push((merchant, 1)),
        }
    }

    let mut frequent: Option<FrequentMerchant> = None;
    for (label, count) in counts {
        if frequent.as_ref().map_or(true, |f| count > f.count) {
            frequent = Some(FrequentMerchant { label, count });
        }
    }

    RankingResult { highest, frequent }
}

/// Total, count and average over an already-windowed slice
pub fn window_summary(items: &[ContentItem]) -> WindowSummary {
    let total: f64 = items.iter().map(|item| extract_amount(&item.fields)).sum();
    let count = items.len();
    WindowSummary {
        total,
        count,
        average: if count == 0 { 0.0 } else { total / count as f64 },
    }
}
