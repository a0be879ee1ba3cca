//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `audit` - access log listing
//! - `core` - init, seed, reset and the shared `open_db`
//! - `expenses` - expense list/add/delete
//! - `incomes` - income list/add/delete
//! - `transactions` - combined listing with filters
//! - `reports` - stats, monthly, categories, trends, dashboard, analytics
//! - `serve` - web server

pub mod audit;
pub mod core;
pub mod expenses;
pub mod incomes;
pub mod reports;
pub mod serve;
pub mod transactions;

pub use audit::*;
pub use core::*;
pub use expenses::*;
pub use incomes::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

use tally_core::models::ValidationErrors;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with thousands separators and two decimals
pub fn money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let rounds_to_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

/// Print one line per invalid field and turn the errors into a command failure
pub fn validation_failed(errors: ValidationErrors) -> anyhow::Error {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("   ❌ {}: {}", field, message);
        }
    }
    anyhow::anyhow!("Validation failed: {}", errors)
}
