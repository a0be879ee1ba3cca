//! Report command implementations

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use tally_core::analytics::{
    build_analytics, build_dashboard, compute_category_breakdown, compute_global_stats,
    compute_monthly_series, compute_spending_trends, CategoryStat, CountMode, MonthlyBucket, Stats,
    TrendSummary,
};
use tally_core::db::Database;
use tally_core::models::{Expense, Income};

use super::{money, truncate};

/// Upper bound for --months, matching the API
pub const MAX_REPORT_MONTHS: u32 = 120;

fn snapshot(db: &Database) -> Result<(Vec<Expense>, Vec<Income>)> {
    Ok((db.list_expenses()?, db.list_incomes()?))
}

fn check_months(months: u32) -> Result<u32> {
    if months == 0 || months > MAX_REPORT_MONTHS {
        anyhow::bail!("--months must be between 1 and {}", MAX_REPORT_MONTHS);
    }
    Ok(months)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stats(stats: &Stats) {
    println!("   Total income:    {:>16}", money(stats.total_income));
    println!("   Total expenses:  {:>16}", money(stats.total_expenses));
    println!("   Balance:         {:>16}", money(stats.current_balance));
    println!("   Transactions:    {:>16}", stats.transaction_count);
}

fn print_monthly(series: &[MonthlyBucket]) {
    println!(
        "   {:14} │ {:>14} │ {:>14} │ {:>14} │ {:>7}",
        "Month", "Expenses", "Income", "Balance", "Saved"
    );
    println!("   ───────────────┼────────────────┼────────────────┼────────────────┼────────");
    for bucket in series {
        println!(
            "   {:14} │ {:>14} │ {:>14} │ {:>14} │ {:>6.1}%",
            bucket.full_month,
            money(bucket.amount),
            money(bucket.income),
            money(bucket.balance),
            bucket.savings_rate
        );
    }
}

fn print_categories(categories: &[CategoryStat]) {
    if categories.is_empty() {
        println!("   No expenses recorded.");
        return;
    }
    println!(
        "   {:20} │ {:>14} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ─────────────────────┼────────────────┼────────┼──────");
    for cat in categories {
        println!(
            "   {:20} │ {:>14} │ {:>5.1}% │ {:>5}",
            truncate(cat.category.as_str(), 20),
            money(cat.amount),
            cat.percentage,
            cat.transactions
        );
    }
}

fn print_trends(trends: &TrendSummary) {
    let arrow = if trends.is_increasing { "📈" } else { "📉" };
    println!(
        "   {} Month-over-month:  {:+.1}%",
        arrow, trends.monthly_change
    );
    println!(
        "   Trailing average:     {}",
        money(trends.average_spending)
    );
    println!("   Savings rate:         {:.1}%", trends.savings_rate);
    if trends.best_savings_month.full_month.is_empty() {
        println!("   Best month:           n/a");
    } else {
        println!(
            "   Best month:           {} ({:.1}% saved)",
            trends.best_savings_month.full_month, trends.best_savings_month.savings_rate
        );
    }
}

pub fn cmd_report_stats(db: &Database, count: &str, json: bool) -> Result<()> {
    let mode: CountMode = count.parse().map_err(|e: String| anyhow!(e))?;
    let (expenses, incomes) = snapshot(db)?;
    let stats = compute_global_stats(&expenses, &incomes, mode);

    if json {
        return print_json(&stats);
    }

    println!();
    println!("📊 Totals (counting {})", mode.as_str());
    println!("   ─────────────────────────────────");
    print_stats(&stats);
    Ok(())
}

pub fn cmd_report_monthly(db: &Database, months: u32, json: bool) -> Result<()> {
    let months = check_months(months)?;
    let (expenses, incomes) = snapshot(db)?;
    let series = compute_monthly_series(&expenses, &incomes, months, Utc::now());

    if json {
        return print_json(&series);
    }

    println!();
    println!("📅 Last {} Months", months);
    print_monthly(&series);
    Ok(())
}

pub fn cmd_report_categories(db: &Database, json: bool) -> Result<()> {
    let (expenses, _) = snapshot(db)?;
    let categories = compute_category_breakdown(&expenses);

    if json {
        return print_json(&categories);
    }

    println!();
    println!("🏷️  Spending by Category");
    print_categories(&categories);
    Ok(())
}

pub fn cmd_report_trends(db: &Database, months: u32, json: bool) -> Result<()> {
    let months = check_months(months)?;
    let (expenses, incomes) = snapshot(db)?;
    let series = compute_monthly_series(&expenses, &incomes, months, Utc::now());
    let trends = compute_spending_trends(&series);

    if json {
        return print_json(&trends);
    }

    println!();
    println!("📈 Spending Trends ({} months)", months);
    println!("   ─────────────────────────────────");
    print_trends(&trends);
    Ok(())
}

pub fn cmd_report_dashboard(db: &Database, json: bool) -> Result<()> {
    let (expenses, incomes) = snapshot(db)?;
    let dashboard = build_dashboard(&expenses, &incomes, Utc::now());

    if json {
        return print_json(&dashboard);
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    print_stats(&dashboard.stats);
    println!();
    println!("   Highest month:   {:>16}", money(dashboard.summary.highest));
    println!("   Lowest month:    {:>16}", money(dashboard.summary.lowest));
    println!("   Monthly average: {:>16}", money(dashboard.summary.average));
    println!("   Change vs last:  {:>15.1}%", dashboard.monthly_change);
    println!();
    print_monthly(&dashboard.monthly);
    println!();
    print_categories(&dashboard.categories);
    Ok(())
}

pub fn cmd_report_analytics(db: &Database, json: bool) -> Result<()> {
    let (expenses, incomes) = snapshot(db)?;
    let report = build_analytics(&expenses, &incomes, Utc::now());

    if json {
        return print_json(&report);
    }

    println!();
    println!("🔎 Analytics");
    println!("   ─────────────────────────────────");
    print_stats(&report.stats);
    println!();
    match report.key_metrics.top_category {
        Some(top) => println!("   Top category:    {}", top),
        None => println!("   Top category:    n/a"),
    }
    println!("   Categories used: {}", report.key_metrics.category_count);
    println!();
    print_trends(&report.trends);
    println!();
    print_monthly(&report.monthly);
    println!();
    print_categories(&report.categories);
    Ok(())
}
