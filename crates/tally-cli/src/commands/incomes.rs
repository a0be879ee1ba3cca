//! Income command implementations

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::NewIncome;

use super::{money, truncate, validation_failed};

pub fn cmd_income_list(db: &Database, limit: usize) -> Result<()> {
    let incomes = db.list_incomes()?;

    if incomes.is_empty() {
        println!("No income recorded yet. Add some with:");
        println!("  tally income add --title \"Salary\" --amount 3000");
        return Ok(());
    }

    println!();
    println!("💰 Recent Income ({} total)", incomes.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for income in incomes.iter().take(limit) {
        println!(
            "   [{:>4}] {} │ \x1b[32m{:>14}\x1b[0m │ {}",
            income.id,
            income.created_at.format("%Y-%m-%d"),
            money(income.amount),
            truncate(&income.title, 40)
        );
    }

    Ok(())
}

pub fn cmd_income_add(db: &Database, title: &str, amount: f64) -> Result<i64> {
    let valid = NewIncome::new(title, amount)
        .validate()
        .map_err(validation_failed)?;

    let id = db.insert_income(&valid).context("Failed to save income")?;

    println!(
        "✅ Recorded income {}: {} ({})",
        id,
        valid.title,
        money(valid.amount)
    );

    Ok(id)
}

pub fn cmd_income_delete(db: &Database, id: i64) -> Result<()> {
    let income = db
        .get_income(id)?
        .ok_or_else(|| anyhow::anyhow!("Income {} not found", id))?;

    db.delete_income(id)?;

    println!("🗑️  Deleted income {}:", id);
    println!(
        "   {} │ {} │ {}",
        income.created_at.format("%Y-%m-%d"),
        money(income.amount),
        truncate(&income.title, 40)
    );

    Ok(())
}
