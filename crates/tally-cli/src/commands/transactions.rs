//! Combined transaction listing

use anyhow::{anyhow, Result};
use tally_core::db::Database;
use tally_core::ledger::{build_ledger, categories_in_use, EntryKind, LedgerFilter, SortOrder};
use tally_core::models::ExpenseCategory;

use super::{money, truncate};

/// Turn the raw command-line options into a ledger filter
pub fn build_filter(
    search: Option<&str>,
    kind: Option<&str>,
    category: Option<&str>,
    sort: &str,
    asc: bool,
) -> Result<LedgerFilter> {
    let kind = kind
        .map(|k| k.parse::<EntryKind>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let category = category
        .map(|c| c.parse::<ExpenseCategory>())
        .transpose()
        .map_err(|e| anyhow!(e))?;

    Ok(LedgerFilter {
        search: search.map(str::to_string),
        kind,
        category,
        sort: sort.parse().map_err(|e: String| anyhow!(e))?,
        order: if asc { SortOrder::Asc } else { SortOrder::Desc },
    })
}

pub fn cmd_transactions(db: &Database, filter: &LedgerFilter, limit: usize) -> Result<()> {
    let expenses = db.list_expenses()?;
    let incomes = db.list_incomes()?;
    let view = build_ledger(&expenses, &incomes, filter);

    println!();
    println!("📝 Transactions");
    println!(
        "   Total income: {}   Total expenses: {}   Balance: {}",
        money(view.stats.total_income),
        money(view.stats.total_expenses),
        money(view.stats.current_balance)
    );
    println!("   ─────────────────────────────────────────────────────────────────────");

    if view.entries.is_empty() {
        println!("   No transactions match.");
        if filter.category.is_some() {
            let in_use: Vec<&str> = categories_in_use(&expenses)
                .iter()
                .map(|c| c.as_str())
                .collect();
            if !in_use.is_empty() {
                println!("   Categories with expenses: {}", in_use.join(", "));
            }
        }
        return Ok(());
    }

    for entry in view.entries.iter().take(limit) {
        let amount_str = match entry.kind {
            EntryKind::Expense => format!("\x1b[31m-{:>13}\x1b[0m", money(entry.amount)),
            EntryKind::Income => format!("\x1b[32m+{:>13}\x1b[0m", money(entry.amount)),
        };
        let category = entry.category.map(|c| c.as_str()).unwrap_or("Income");

        println!(
            "   {} │ {} │ {:18} │ {}",
            entry.created_at.format("%Y-%m-%d"),
            amount_str,
            truncate(category, 18),
            truncate(&entry.title, 30)
        );
    }

    if view.entries.len() > limit {
        println!("   … {} more", view.entries.len() - limit);
    }

    println!("   ─────────────────────────────────────────────────────────────────────");
    println!(
        "   Shown: {} entries │ in {} │ out {} │ net {}",
        view.entries.len(),
        money(view.total_income),
        money(view.total_expenses),
        money(view.net)
    );

    Ok(())
}
