//! Integration tests for tally-core
//!
//! These tests exercise the full record → store → report workflow.

use chrono::{DateTime, TimeZone, Utc};
use tally_core::{
    analytics::{build_analytics, build_dashboard, compute_monthly_series, ANALYTICS_MONTHS},
    db::Database,
    ledger::{build_ledger, EntryKind, LedgerFilter, SortKey, SortOrder},
    models::{ExpenseCategory, NewExpense, NewIncome},
    CountMode, Error,
};

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 30, 0).unwrap()
}

/// Three months of household records ending in June 2024
fn household_db() -> Database {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    let expenses = [
        ("Rent share", 450.0, "Other", at(2024, 4, 2)),
        ("Groceries", 120.0, "Food", at(2024, 4, 10)),
        ("Bus pass", 50.0, "Transport", at(2024, 5, 1)),
        ("Groceries", 130.0, "Food", at(2024, 5, 12)),
        ("Cinema", 30.0, "Entertainment", at(2024, 6, 3)),
        ("Groceries", 150.0, "Food", at(2024, 6, 14)),
    ];
    for (title, amount, category, when) in expenses {
        let valid = NewExpense::new(title, amount, category)
            .validate()
            .expect("valid expense");
        db.insert_expense_at(&valid, when).unwrap();
    }

    let incomes = [
        ("Salary", 1000.0, at(2024, 4, 1)),
        ("Salary", 1000.0, at(2024, 5, 1)),
        ("Salary", 1000.0, at(2024, 6, 1)),
        ("Side gig", 200.0, at(2024, 6, 20)),
    ];
    for (title, amount, when) in incomes {
        let valid = NewIncome::new(title, amount).validate().expect("valid income");
        db.insert_income_at(&valid, when).unwrap();
    }

    db
}

#[test]
fn test_dashboard_from_stored_records() {
    let db = household_db();
    let expenses = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();

    let dashboard = build_dashboard(&expenses, &incomes, at(2024, 6, 30));

    assert_eq!(dashboard.stats.total_expenses, 930.0);
    assert_eq!(dashboard.stats.total_income, 3200.0);
    assert_eq!(dashboard.stats.current_balance, 2270.0);
    // Dashboard counts expenses only
    assert_eq!(dashboard.stats.transaction_count, 6);

    assert_eq!(dashboard.monthly.len(), 6);
    let june = dashboard.monthly.last().unwrap();
    assert_eq!(june.month, "Jun");
    assert_eq!(june.amount, 180.0);
    assert_eq!(june.income, 1200.0);
    assert_eq!(june.balance, 1020.0);
    assert!((june.savings_rate - 85.0).abs() < 1e-9);

    // 180 vs 180 in May: no change
    assert_eq!(dashboard.monthly_change, 0.0);
    assert_eq!(dashboard.summary.highest, 570.0);
    assert_eq!(dashboard.summary.lowest, 0.0);

    assert_eq!(dashboard.categories[0].category, ExpenseCategory::Other);
    assert_eq!(dashboard.categories[1].category, ExpenseCategory::Food);
    assert_eq!(dashboard.categories[1].transactions, 3);
}

#[test]
fn test_analytics_from_stored_records() {
    let db = household_db();
    let expenses = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();

    let report = build_analytics(&expenses, &incomes, at(2024, 6, 30));

    assert_eq!(report.monthly.len(), ANALYTICS_MONTHS as usize);
    assert_eq!(report.monthly[0].full_month, "July 2023");
    assert_eq!(report.key_metrics.category_count, 4);
    assert_eq!(report.key_metrics.top_category, Some(ExpenseCategory::Other));

    // June keeps 85% of its income, the best month of the year
    assert_eq!(report.trends.best_savings_month.month, "Jun");
    assert!(!report.trends.is_increasing);

    let percentages: f64 = report.categories.iter().map(|c| c.percentage).sum();
    assert!((percentages - 100.0).abs() < 1e-9);
}

#[test]
fn test_series_buckets_ignore_records_outside_window() {
    let db = household_db();
    let expenses = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();

    let series = compute_monthly_series(&expenses, &incomes, 2, at(2024, 6, 30));
    assert_eq!(series.len(), 2);
    let total: f64 = series.iter().map(|b| b.amount).sum();
    assert_eq!(total, 360.0);
}

#[test]
fn test_ledger_over_stored_records() {
    let db = household_db();
    let expenses = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();

    let filter = LedgerFilter {
        search: Some("groceries".to_string()),
        sort: SortKey::Amount,
        order: SortOrder::Desc,
        ..Default::default()
    };
    let view = build_ledger(&expenses, &incomes, &filter);

    let amounts: Vec<f64> = view.entries.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![150.0, 130.0, 120.0]);
    assert!(view.entries.iter().all(|e| e.kind == EntryKind::Expense));
    assert_eq!(view.total_expenses, 400.0);
    assert_eq!(view.net, -400.0);

    // The ledger's global stats count every transaction
    assert_eq!(view.stats.transaction_count, 10);
}

#[test]
fn test_deleting_changes_the_reports() {
    let db = household_db();
    let before = db.list_expenses().unwrap();
    let rent = before.iter().find(|e| e.title == "Rent share").unwrap();

    db.delete_expense(rent.id).unwrap();
    assert!(matches!(db.delete_expense(rent.id), Err(Error::NotFound(_))));

    let after = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();
    let stats = tally_core::compute_global_stats(&after, &incomes, CountMode::All);
    assert_eq!(stats.total_expenses, 480.0);
    assert_eq!(stats.transaction_count, 9);
}

#[test]
fn test_invalid_input_never_reaches_the_store() {
    let db = Database::in_memory().unwrap();

    let errors = NewExpense::new("", -5.0, "Snacks").validate().unwrap_err();
    assert!(errors.has("title"));
    assert!(errors.has("amount"));
    assert!(errors.has("category"));

    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_seeded_demo_data_feeds_the_dashboard() {
    let db = Database::in_memory().unwrap();
    let now = Utc::now();
    db.seed_demo_data(now).unwrap();

    let expenses = db.list_expenses().unwrap();
    let incomes = db.list_incomes().unwrap();
    let dashboard = build_dashboard(&expenses, &incomes, now);

    assert!(dashboard.stats.total_income > dashboard.stats.total_expenses);
    assert!(dashboard.monthly.iter().any(|b| b.amount > 0.0));
    assert!(dashboard
        .categories
        .iter()
        .all(|c| !c.category.is_core()));
}
