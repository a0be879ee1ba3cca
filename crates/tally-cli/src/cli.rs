//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses and income, see where the money goes
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted expense and income tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default the database is encrypted with SQLCipher using the
    /// passphrase in TALLY_DB_KEY.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Load a few months of demo expenses and income
    Seed,

    /// Manage expenses (list, add, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage income entries (list, add, delete)
    Income {
        #[command(subcommand)]
        action: Option<IncomeAction>,
    },

    /// Show expenses and income together, with search and filters
    Transactions {
        /// Only entries whose title contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only one kind: expense, income
        #[arg(short, long)]
        kind: Option<String>,

        /// Only expenses in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Sort by: date, amount, title
        #[arg(long, default_value = "date")]
        sort: String,

        /// Sort ascending (default is descending)
        #[arg(long)]
        asc: bool,

        /// Maximum number of rows to print
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Reports over all stored data
    Report {
        #[command(subcommand)]
        report: ReportType,

        /// Print the report as JSON
        #[arg(long, global = true)]
        json: bool,
    },

    /// Show recent API access from the audit log
    Audit {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only this action: view, list, get, create, delete, report
        #[arg(short, long)]
        action: Option<String>,

        /// Only this entity type, e.g. expense, income, dashboard
        #[arg(short, long)]
        entity: Option<String>,

        /// Print the entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all expenses and income (keeps the audit log)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Record an expense
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Category name, e.g. "Food" or "Bills & Utilities"
        #[arg(short, long)]
        category: String,
    },
    /// Delete an expense by ID
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// List recent income
    List {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Record income
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,
    },
    /// Delete an income entry by ID
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Totals, balance, and transaction count
    Stats {
        /// What the transaction count covers: expenses, all
        #[arg(long, default_value = "expenses")]
        count: String,
    },

    /// Month-by-month expenses, income, and savings rate
    Monthly {
        /// Number of months, ending with the current one
        #[arg(short, long, default_value = "12")]
        months: u32,
    },

    /// Spending by category
    Categories,

    /// Month-over-month change, trailing average, best month
    Trends {
        #[arg(short, long, default_value = "12")]
        months: u32,
    },

    /// The dashboard summary (last 6 months)
    Dashboard,

    /// The full analytics report (last 12 months)
    Analytics,
}
