//! Expense command implementations

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::NewExpense;
use tracing::debug;

use super::{money, truncate, validation_failed};

pub fn cmd_expenses_list(db: &Database, limit: usize) -> Result<()> {
    let expenses = db.list_expenses()?;

    if expenses.is_empty() {
        println!("No expenses yet. Record one with:");
        println!("  tally expenses add --title \"Lunch\" --amount 12.50 --category Food");
        return Ok(());
    }

    println!();
    println!("💸 Recent Expenses ({} total)", expenses.len());
    println!("   ─────────────────────────────────────────────────────────────────────");

    for expense in expenses.iter().take(limit) {
        println!(
            "   [{:>4}] {} │ {:>14} │ {:18} │ {}",
            expense.id,
            expense.created_at.format("%Y-%m-%d"),
            money(expense.amount),
            truncate(expense.category.as_str(), 18),
            truncate(&expense.title, 30)
        );
    }

    Ok(())
}

/// Validate and store an expense, returning its ID
pub fn cmd_expenses_add(db: &Database, title: &str, amount: f64, category: &str) -> Result<i64> {
    let valid = NewExpense::new(title, amount, category)
        .validate()
        .map_err(validation_failed)?;

    let id = db
        .insert_expense(&valid)
        .context("Failed to save expense")?;
    debug!(id, "Expense recorded");

    println!(
        "✅ Recorded expense {}: {} ({}, {})",
        id,
        valid.title,
        money(valid.amount),
        valid.category
    );

    Ok(id)
}

pub fn cmd_expenses_delete(db: &Database, id: i64) -> Result<()> {
    let expense = db
        .get_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    db.delete_expense(id)?;

    println!("🗑️  Deleted expense {}:", id);
    println!(
        "   {} │ {} │ {}",
        expense.created_at.format("%Y-%m-%d"),
        money(expense.amount),
        truncate(&expense.title, 40)
    );

    Ok(())
}
