//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Expense and income models with input validation
//! - Aggregation engine (totals, monthly series, categories, trends)
//! - Combined transaction ledger with search, filters, and sorting
//! - SQLite storage with optional SQLCipher encryption
//! - Demo data for trying things out

pub mod analytics;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod seed;

pub use analytics::{
    build_analytics, build_dashboard, compute_category_breakdown, compute_global_stats,
    compute_monthly_series, compute_spending_trends, summarize_series, AnalyticsReport,
    CategoryStat, CountMode, Dashboard, MonthlyBucket, Stats, TrendSummary,
};
pub use db::{AuditEntry, AuditQuery, Database, SeedCounts};
pub use error::{Error, Result};
pub use ledger::{build_ledger, LedgerEntry, LedgerFilter, LedgerView};
