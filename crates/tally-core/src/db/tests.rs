//! Database tests

use super::*;
use crate::models::{ExpenseCategory, NewExpense, NewIncome, ValidExpense, ValidIncome};
use chrono::TimeZone;
use rusqlite::params;

fn expense(title: &str, amount: f64, category: &str) -> ValidExpense {
    NewExpense::new(title, amount, category).validate().unwrap()
}

fn income(title: &str, amount: f64) -> ValidIncome {
    NewIncome::new(title, amount).validate().unwrap()
}

#[test]
fn test_in_memory_db_is_empty() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_expenses().unwrap().is_empty());
    assert!(db.list_incomes().unwrap().is_empty());
    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_schema_columns() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'title', 'amount', 'category', 'created_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 5);

    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('incomes') WHERE name IN ('id', 'title', 'amount', 'created_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 4);
}

#[test]
fn test_expense_crud() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_expense(&expense("Lunch", 12.5, "Food")).unwrap();
    assert!(id > 0);

    let stored = db.get_expense(id).unwrap().unwrap();
    assert_eq!(stored.title, "Lunch");
    assert_eq!(stored.amount, 12.5);
    assert_eq!(stored.category, ExpenseCategory::Food);

    db.delete_expense(id).unwrap();
    assert!(db.get_expense(id).unwrap().is_none());
    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_delete_missing_rows_is_not_found() {
    let db = Database::in_memory().unwrap();
    assert!(matches!(db.delete_expense(42), Err(Error::NotFound(_))));
    assert!(matches!(db.delete_income(42), Err(Error::NotFound(_))));
}

#[test]
fn test_lists_are_newest_first() {
    let db = Database::in_memory().unwrap();
    let at = |d| Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap();

    db.insert_income_at(&income("Old", 1.0), at(1)).unwrap();
    db.insert_income_at(&income("New", 2.0), at(9)).unwrap();
    db.insert_income_at(&income("Middle", 3.0), at(5)).unwrap();
    // Same timestamp as "Middle": the later insert wins the tie
    db.insert_income_at(&income("Middle 2", 4.0), at(5)).unwrap();

    let titles: Vec<String> = db
        .list_incomes()
        .unwrap()
        .into_iter()
        .map(|i| i.title)
        .collect();
    assert_eq!(titles, vec!["New", "Middle 2", "Middle", "Old"]);
}

#[test]
fn test_timestamps_survive_storage() {
    let db = Database::in_memory().unwrap();
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
    let id = db.insert_income_at(&income("Year end", 5.0), at).unwrap();
    assert_eq!(db.get_income(id).unwrap().unwrap().created_at, at);
}

#[test]
fn test_extended_category_round_trip() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Power", 450_000.0, "Bills & Utilities"))
        .unwrap();
    let stored = db.get_expense(id).unwrap().unwrap();
    assert_eq!(stored.category, ExpenseCategory::BillsAndUtilities);
}

#[test]
fn test_null_amount_reads_as_zero() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO expenses (title, amount, category, created_at) VALUES (?, NULL, ?, ?)",
        params!["Mystery", "Other", "2024-05-01 10:00:00"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO incomes (title, amount, created_at) VALUES (?, NULL, ?)",
        params!["Mystery", "2024-05-01 10:00:00"],
    )
    .unwrap();
    drop(conn);

    assert_eq!(db.list_expenses().unwrap()[0].amount, 0.0);
    assert_eq!(db.list_incomes().unwrap()[0].amount, 0.0);
}

#[test]
fn test_unknown_stored_category_is_invalid_data() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO expenses (title, amount, category, created_at) VALUES (?, ?, ?, ?)",
        params!["Odd", 1.0, "Groceries", "2024-05-01 10:00:00"],
    )
    .unwrap();
    drop(conn);

    assert!(matches!(db.list_expenses(), Err(Error::InvalidData(_))));
}

#[test]
fn test_soft_reset_keeps_audit_log() {
    let db = Database::in_memory().unwrap();
    db.insert_expense(&expense("Lunch", 10.0, "Food")).unwrap();
    db.insert_income(&income("Salary", 100.0)).unwrap();
    db.log_audit("cli", "create", Some("expense"), Some(1), None)
        .unwrap();

    db.soft_reset().unwrap();

    assert_eq!(db.count_expenses().unwrap(), 0);
    assert_eq!(db.count_incomes().unwrap(), 0);
    assert_eq!(db.recent_audit(&AuditQuery::latest(10)).unwrap().len(), 1);
}

#[test]
fn test_audit_log_newest_first() {
    let db = Database::in_memory().unwrap();
    db.log_audit("alice@example.com", "list", Some("expense"), None, None)
        .unwrap();
    db.log_audit("alice@example.com", "delete", Some("expense"), Some(3), Some("Lunch"))
        .unwrap();

    let entries = db.recent_audit(&AuditQuery::latest(10)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].actor, "alice@example.com");
    assert_eq!(entries[0].entity_id, Some(3));
    assert_eq!(entries[0].details.as_deref(), Some("Lunch"));
    assert!(entries[0].recorded_at <= Utc::now());

    assert_eq!(db.recent_audit(&AuditQuery::latest(1)).unwrap().len(), 1);
}

#[test]
fn test_audit_log_filters() {
    let db = Database::in_memory().unwrap();
    db.log_audit("local-dev", "view", Some("dashboard"), None, None)
        .unwrap();
    db.log_audit("local-dev", "create", Some("expense"), Some(1), None)
        .unwrap();
    db.log_audit("local-dev", "create", Some("income"), Some(1), None)
        .unwrap();

    let creates = db
        .recent_audit(&AuditQuery {
            action: Some("create".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(creates.len(), 2);
    assert!(creates.iter().all(|e| e.action == "create"));

    let incomes = db
        .recent_audit(&AuditQuery {
            action: Some("create".into()),
            entity_type: Some("income".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].entity_type.as_deref(), Some("income"));

    let none = db
        .recent_audit(&AuditQuery {
            action: Some("delete".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_audit_limit_is_clamped() {
    assert_eq!(AuditQuery::default().effective_limit(), DEFAULT_AUDIT_LIMIT);
    assert_eq!(AuditQuery::latest(0).effective_limit(), 1);
    assert_eq!(AuditQuery::latest(50_000).effective_limit(), MAX_AUDIT_LIMIT);

    let db = Database::in_memory().unwrap();
    for i in 0..3 {
        db.log_audit("cli", "view", None, Some(i), None).unwrap();
    }
    assert_eq!(db.recent_audit(&AuditQuery::latest(0)).unwrap().len(), 1);
}

#[test]
fn test_seed_demo_data() {
    let db = Database::in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    let counts = db.seed_demo_data(now).unwrap();
    assert_eq!(counts.expenses as i64, db.count_expenses().unwrap());
    assert_eq!(counts.incomes as i64, db.count_incomes().unwrap());
    assert!(db.list_expenses().unwrap().iter().all(|e| e.created_at <= now));
}

#[test]
fn test_derive_key_is_stable() {
    let a = derive_key("correct horse").unwrap();
    let b = derive_key("correct horse").unwrap();
    let c = derive_key("battery staple").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn test_encrypted_db_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secret.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path, Some("hunter2")).unwrap();
        db.insert_income(&income("Salary", 100.0)).unwrap();
    }

    let reopened = Database::new_with_key(path, Some("hunter2")).unwrap();
    assert_eq!(reopened.count_incomes().unwrap(), 1);
}
