//! Core command implementations and shared utilities
//!
//! - `open_db` - open the database honoring --no-encrypt
//! - `cmd_init`, `cmd_seed`, `cmd_reset`

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tally_core::db::Database;
use tracing::info;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: tally expenses add -t \"Lunch\" -a 12.50 -c Food");
    println!("  2. Or load demo data: tally seed");
    println!("  3. Start web UI: tally serve");

    Ok(())
}

pub fn cmd_seed(db: &Database) -> Result<()> {
    let counts = db
        .seed_demo_data(Utc::now())
        .context("Failed to insert demo data")?;
    info!(expenses = counts.expenses, incomes = counts.incomes, "Demo data loaded");

    println!("🌱 Loaded demo data");
    println!("   Expenses: {}", counts.expenses);
    println!("   Income:   {}", counts.incomes);
    println!();
    println!("   Try: tally report dashboard");

    Ok(())
}

pub fn cmd_reset(db_path: &Path, yes: bool, no_encrypt: bool) -> Result<()> {
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    if !yes {
        println!("⚠️  This will delete all expenses and income.");
        println!("   The audit log will be preserved.");
        println!();
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let db = open_db(db_path, no_encrypt)?;
    db.soft_reset()?;

    println!("✅ Database reset complete.");
    println!("   Cleared: expenses, income");
    println!("   Preserved: audit log");

    Ok(())
}
