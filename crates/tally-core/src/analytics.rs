//! Aggregation engine
//!
//! Pure functions that turn a snapshot of expense and income records into the
//! statistics shown on the dashboard and analytics pages:
//! - Global totals and balance
//! - Trailing monthly series (expenses, income, balance, savings rate)
//! - Category breakdown
//! - Spending trends (month-over-month change, trailing average, best month)
//!
//! Nothing here reads the clock. Month windows are anchored on an explicit
//! reference instant so the same snapshot always produces the same output.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Expense, ExpenseCategory, Income};

/// Months shown on the dashboard chart
pub const DASHBOARD_MONTHS: u32 = 6;

/// Months shown on the analytics page
pub const ANALYTICS_MONTHS: u32 = 12;

/// Buckets averaged for `average_spending`
pub const TRAILING_WINDOW: usize = 3;

/// Which records `transaction_count` covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Count expenses only (dashboard and analytics pages)
    ExpensesOnly,
    /// Count expenses and incomes together (transactions page)
    All,
}

impl CountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpensesOnly => "expenses",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for CountMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expenses" | "expenses_only" | "expenses-only" => Ok(Self::ExpensesOnly),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown count mode: {} (valid: expenses, all)", s)),
        }
    }
}

/// Totals over the whole snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_expenses: f64,
    pub total_income: f64,
    pub current_balance: f64,
    pub transaction_count: usize,
    /// What `transaction_count` covers
    pub count_mode: CountMode,
}

/// One calendar month of the series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Short label, e.g. "Jan"
    pub month: String,
    /// Long label, e.g. "January 2024"
    pub full_month: String,
    pub year: i32,
    pub month_number: u32,
    /// Total expenses in the month
    pub amount: f64,
    pub income: f64,
    pub balance: f64,
    pub savings_rate: f64,
}

/// Expense totals for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub transactions: usize,
    pub percentage: f64,
}

/// Trend indicators derived from a monthly series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub monthly_change: f64,
    pub average_spending: f64,
    pub savings_rate: f64,
    pub is_increasing: bool,
    pub best_savings_month: MonthlyBucket,
}

/// Highest, lowest, and mean monthly spending over a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
}

/// Payload for the dashboard page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: Stats,
    pub monthly: Vec<MonthlyBucket>,
    pub summary: SeriesSummary,
    /// Change in spending from the previous month, in percent
    pub monthly_change: f64,
    pub categories: Vec<CategoryStat>,
}

/// Headline figures for the analytics page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub top_category: Option<ExpenseCategory>,
    pub category_count: usize,
}

/// Payload for the analytics page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub stats: Stats,
    pub monthly: Vec<MonthlyBucket>,
    pub categories: Vec<CategoryStat>,
    pub trends: TrendSummary,
    pub key_metrics: KeyMetrics,
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive
fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator) * 100.0
    } else {
        0.0
    }
}

/// Savings rate for a period: share of income left after expenses
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    percent_of(income - expenses, income)
}

/// Compute totals and balance over the snapshot
pub fn compute_global_stats(expenses: &[Expense], incomes: &[Income], count: CountMode) -> Stats {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let total_income: f64 = incomes.iter().map(|i| i.amount).sum();

    let transaction_count = match count {
        CountMode::ExpensesOnly => expenses.len(),
        CountMode::All => expenses.len() + incomes.len(),
    };

    Stats {
        total_expenses,
        total_income,
        current_balance: total_income - total_expenses,
        transaction_count,
        count_mode: count,
    }
}

/// The `(year, month)` that lies `back` calendar months before the reference's month
pub fn month_offset(reference: DateTime<Utc>, back: u32) -> (i32, u32) {
    let index = reference.year() * 12 + reference.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn in_month(at: &DateTime<Utc>, year: i32, month: u32) -> bool {
    at.year() == year && at.month() == month
}

fn month_labels(year: i32, month: u32) -> (String, String) {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => (
            first.format("%b").to_string(),
            first.format("%B %Y").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

/// Build `month_count` calendar-month buckets ending with the reference month
///
/// Buckets are ordered oldest to newest and are produced even when a month has
/// no records.
pub fn compute_monthly_series(
    expenses: &[Expense],
    incomes: &[Income],
    month_count: u32,
    reference: DateTime<Utc>,
) -> Vec<MonthlyBucket> {
    (0..month_count)
        .rev()
        .map(|back| {
            let (year, month) = month_offset(reference, back);

            let amount: f64 = expenses
                .iter()
                .filter(|e| in_month(&e.created_at, year, month))
                .map(|e| e.amount)
                .sum();
            let income: f64 = incomes
                .iter()
                .filter(|i| in_month(&i.created_at, year, month))
                .map(|i| i.amount)
                .sum();

            let (short, full) = month_labels(year, month);

            MonthlyBucket {
                month: short,
                full_month: full,
                year,
                month_number: month,
                amount,
                income,
                balance: income - amount,
                savings_rate: savings_rate(income, amount),
            }
        })
        .collect()
}

/// Group expenses by category, largest total first
///
/// Categories with equal totals keep the order in which they were first seen.
pub fn compute_category_breakdown(expenses: &[Expense]) -> Vec<CategoryStat> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut index: HashMap<ExpenseCategory, usize> = HashMap::new();
    let mut groups: Vec<CategoryStat> = Vec::new();

    for expense in expenses {
        let slot = *index.entry(expense.category).or_insert_with(|| {
            groups.push(CategoryStat {
                category: expense.category,
                amount: 0.0,
                transactions: 0,
                percentage: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].amount += expense.amount;
        groups[slot].transactions += 1;
    }

    for group in &mut groups {
        group.percentage = percent_of(group.amount, total);
    }

    // sort_by is stable, so ties stay in first-seen order
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    groups
}

/// Derive trend indicators from a monthly series
///
/// A series shorter than two buckets yields a zeroed summary whose best month
/// is the only bucket (or an empty one).
pub fn compute_spending_trends(series: &[MonthlyBucket]) -> TrendSummary {
    let (previous, current) = match series {
        [.., previous, current] => (previous, current),
        _ => {
            return TrendSummary {
                best_savings_month: series.first().cloned().unwrap_or_default(),
                ..TrendSummary::default()
            }
        }
    };

    let monthly_change = percent_of(current.amount - previous.amount, previous.amount);

    let window = &series[series.len().saturating_sub(TRAILING_WINDOW)..];
    let average_spending = window.iter().map(|b| b.amount).sum::<f64>() / window.len() as f64;

    // Keep the earliest bucket on ties
    let best_savings_month = series
        .iter()
        .fold(&series[0], |best, bucket| {
            if bucket.savings_rate > best.savings_rate {
                bucket
            } else {
                best
            }
        })
        .clone();

    TrendSummary {
        monthly_change,
        average_spending,
        savings_rate: savings_rate(current.income, current.amount),
        is_increasing: monthly_change > 0.0,
        best_savings_month,
    }
}

/// Highest, lowest, and mean spending over the series
pub fn summarize_series(series: &[MonthlyBucket]) -> SeriesSummary {
    if series.is_empty() {
        return SeriesSummary::default();
    }

    let amounts = series.iter().map(|b| b.amount);
    SeriesSummary {
        highest: amounts.clone().fold(f64::MIN, f64::max),
        lowest: amounts.clone().fold(f64::MAX, f64::min),
        average: amounts.sum::<f64>() / series.len() as f64,
    }
}

/// Everything the dashboard page shows
pub fn build_dashboard(
    expenses: &[Expense],
    incomes: &[Income],
    reference: DateTime<Utc>,
) -> Dashboard {
    let monthly = compute_monthly_series(expenses, incomes, DASHBOARD_MONTHS, reference);
    let summary = summarize_series(&monthly);
    let monthly_change = compute_spending_trends(&monthly).monthly_change;

    Dashboard {
        stats: compute_global_stats(expenses, incomes, CountMode::ExpensesOnly),
        monthly,
        summary,
        monthly_change,
        categories: compute_category_breakdown(expenses),
    }
}

/// Everything the analytics page shows
pub fn build_analytics(
    expenses: &[Expense],
    incomes: &[Income],
    reference: DateTime<Utc>,
) -> AnalyticsReport {
    let monthly = compute_monthly_series(expenses, incomes, ANALYTICS_MONTHS, reference);
    let categories = compute_category_breakdown(expenses);
    let trends = compute_spending_trends(&monthly);

    let key_metrics = KeyMetrics {
        top_category: categories.first().map(|c| c.category),
        category_count: categories.len(),
    };

    AnalyticsReport {
        stats: compute_global_stats(expenses, incomes, CountMode::ExpensesOnly),
        monthly,
        categories,
        trends,
        key_metrics,
    }
}
