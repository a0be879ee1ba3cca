//! Expense operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseCategory, ValidExpense};

/// Raw expense columns, before the category and timestamp are parsed
struct ExpenseRow {
    id: i64,
    title: String,
    amount: Option<f64>,
    category: String,
    created_at: String,
}

impl ExpenseRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_expense(self) -> Result<Expense> {
        let category: ExpenseCategory = self
            .category
            .parse()
            .map_err(|e: String| Error::InvalidData(format!("expense {}: {}", self.id, e)))?;

        Ok(Expense {
            id: self.id,
            title: self.title,
            amount: self.amount.unwrap_or(0.0),
            category,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

const SELECT_EXPENSE: &str = "SELECT id, title, amount, category, created_at FROM expenses";

impl Database {
    /// Store a validated expense stamped with the current time
    pub fn insert_expense(&self, expense: &ValidExpense) -> Result<i64> {
        self.insert_expense_at(expense, Utc::now())
    }

    /// Store a validated expense with an explicit creation time
    pub fn insert_expense_at(&self, expense: &ValidExpense, created_at: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (title, amount, category, created_at) VALUES (?, ?, ?, ?)",
            params![
                expense.title,
                expense.amount,
                expense.category.as_str(),
                format_datetime(&created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All expenses, newest first
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_EXPENSE
        ))?;

        let rows = stmt
            .query_map([], ExpenseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_EXPENSE),
                params![id],
                ExpenseRow::from_row,
            )
            .optional()?;

        row.map(ExpenseRow::into_expense).transpose()
    }

    /// Delete an expense, failing with `NotFound` when the id is unknown
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }

    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }
}
