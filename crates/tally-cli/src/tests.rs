//! CLI command tests

use chrono::{TimeZone, Utc};
use tally_core::db::{AuditQuery, Database};
use tally_core::ledger::{EntryKind, SortKey, SortOrder};
use tally_core::models::{ExpenseCategory, NewExpense, NewIncome};

use crate::commands::{self, money, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn seeded_db() -> Database {
    let db = setup_test_db();
    let at = |m, d| Utc.with_ymd_and_hms(2024, m, d, 9, 0, 0).unwrap();

    let lunch = NewExpense::new("Lunch", 12.5, "Food").validate().unwrap();
    db.insert_expense_at(&lunch, at(5, 2)).unwrap();
    let bus = NewExpense::new("Bus", 2.0, "Transport").validate().unwrap();
    db.insert_expense_at(&bus, at(5, 3)).unwrap();
    let salary = NewIncome::new("Salary", 1000.0).validate().unwrap();
    db.insert_income_at(&salary, at(5, 1)).unwrap();
    db
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer title here", 10), "a longe...");
    // Multi-byte characters are never split
    assert_eq!(truncate("Café au lait & croissant", 8), "Café ...");
}

#[test]
fn test_money() {
    assert_eq!(money(0.0), "0.00");
    assert_eq!(money(12.5), "12.50");
    assert_eq!(money(1234.567), "1,234.57");
    assert_eq!(money(8_500_000.0), "8,500,000.00");
    assert_eq!(money(-950.0), "-950.00");
    assert_eq!(money(-0.001), "0.00");
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_unencrypted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());
}

#[test]
fn test_cmd_seed() {
    let db = setup_test_db();
    commands::cmd_seed(&db).unwrap();
    assert!(db.count_expenses().unwrap() > 0);
    assert!(db.count_incomes().unwrap() > 0);
}

#[test]
fn test_cmd_reset_with_yes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reset.db");
    {
        let db = commands::open_db(&path, true).unwrap();
        commands::cmd_expenses_add(&db, "Lunch", 10.0, "Food").unwrap();
    }

    commands::cmd_reset(&path, true, true).unwrap();

    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_cmd_reset_missing_db() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.db");
    assert!(commands::cmd_reset(&path, true, true).is_err());
}

// ========== Expense / Income Command Tests ==========

#[test]
fn test_cmd_expenses_add_and_list() {
    let db = setup_test_db();
    let id = commands::cmd_expenses_add(&db, "Groceries", 54.3, "food").unwrap();

    let stored = db.get_expense(id).unwrap().unwrap();
    assert_eq!(stored.category, ExpenseCategory::Food);
    assert!(commands::cmd_expenses_list(&db, 20).is_ok());
}

#[test]
fn test_cmd_expenses_add_rejects_invalid_input() {
    let db = setup_test_db();
    let err = commands::cmd_expenses_add(&db, "  ", -3.0, "Groceries").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("title"));
    assert!(message.contains("amount"));
    assert!(message.contains("category"));
    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_cmd_expenses_delete() {
    let db = seeded_db();
    let id = db.list_expenses().unwrap()[0].id;

    commands::cmd_expenses_delete(&db, id).unwrap();
    assert!(db.get_expense(id).unwrap().is_none());
    assert!(commands::cmd_expenses_delete(&db, id).is_err());
}

#[test]
fn test_cmd_income_add_list_delete() {
    let db = setup_test_db();
    let id = commands::cmd_income_add(&db, "Bonus", 250.0).unwrap();
    assert!(commands::cmd_income_list(&db, 5).is_ok());

    commands::cmd_income_delete(&db, id).unwrap();
    assert_eq!(db.count_incomes().unwrap(), 0);
}

#[test]
fn test_cmd_income_add_rejects_negative_amount() {
    let db = setup_test_db();
    assert!(commands::cmd_income_add(&db, "Refund", -1.0).is_err());
}

#[test]
fn test_list_commands_on_empty_db() {
    let db = setup_test_db();
    assert!(commands::cmd_expenses_list(&db, 20).is_ok());
    assert!(commands::cmd_income_list(&db, 20).is_ok());
}

// ========== Transactions Command Tests ==========

#[test]
fn test_build_filter() {
    let filter =
        commands::build_filter(Some("lunch"), Some("expense"), Some("Food"), "amount", true)
            .unwrap();
    assert_eq!(filter.search.as_deref(), Some("lunch"));
    assert_eq!(filter.kind, Some(EntryKind::Expense));
    assert_eq!(filter.category, Some(ExpenseCategory::Food));
    assert_eq!(filter.sort, SortKey::Amount);
    assert_eq!(filter.order, SortOrder::Asc);

    let defaults = commands::build_filter(None, None, None, "date", false).unwrap();
    assert_eq!(defaults.order, SortOrder::Desc);
}

#[test]
fn test_build_filter_rejects_bad_values() {
    assert!(commands::build_filter(None, Some("transfer"), None, "date", false).is_err());
    assert!(commands::build_filter(None, None, Some("Groceries"), "date", false).is_err());
    assert!(commands::build_filter(None, None, None, "size", false).is_err());
}

#[test]
fn test_cmd_transactions() {
    let db = seeded_db();
    let filter = commands::build_filter(Some("bus"), None, None, "date", false).unwrap();
    assert!(commands::cmd_transactions(&db, &filter, 10).is_ok());
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands() {
    let db = seeded_db();
    for json in [false, true] {
        assert!(commands::cmd_report_stats(&db, "expenses", json).is_ok());
        assert!(commands::cmd_report_stats(&db, "all", json).is_ok());
        assert!(commands::cmd_report_monthly(&db, 6, json).is_ok());
        assert!(commands::cmd_report_categories(&db, json).is_ok());
        assert!(commands::cmd_report_trends(&db, 3, json).is_ok());
        assert!(commands::cmd_report_dashboard(&db, json).is_ok());
        assert!(commands::cmd_report_analytics(&db, json).is_ok());
    }
}

#[test]
fn test_report_commands_on_empty_db() {
    let db = setup_test_db();
    assert!(commands::cmd_report_dashboard(&db, false).is_ok());
    assert!(commands::cmd_report_analytics(&db, false).is_ok());
    assert!(commands::cmd_report_trends(&db, 1, false).is_ok());
}

#[test]
fn test_report_rejects_bad_arguments() {
    let db = setup_test_db();
    assert!(commands::cmd_report_stats(&db, "some", false).is_err());
    assert!(commands::cmd_report_monthly(&db, 0, false).is_err());
    assert!(commands::cmd_report_monthly(&db, commands::MAX_REPORT_MONTHS + 1, false).is_err());
    assert!(commands::cmd_report_trends(&db, 0, false).is_err());
}

// ========== Audit Tests ==========

#[test]
fn test_cmd_audit() {
    let db = seeded_db();
    commands::cmd_audit(&db, &AuditQuery::latest(10), false).unwrap();

    db.log_audit("local-dev", "view", Some("dashboard"), None, None)
        .unwrap();
    db.log_audit("api-key", "delete", Some("expense"), Some(7), Some("Lunch"))
        .unwrap();

    commands::cmd_audit(&db, &AuditQuery::latest(10), false).unwrap();
    commands::cmd_audit(&db, &AuditQuery::latest(1), true).unwrap();

    let deletes = AuditQuery {
        action: Some("delete".into()),
        ..Default::default()
    };
    commands::cmd_audit(&db, &deletes, false).unwrap();
    assert_eq!(db.recent_audit(&deletes).unwrap().len(), 1);
}
