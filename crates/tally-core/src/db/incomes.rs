//! Income operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, ValidIncome};

impl Database {
    pub fn insert_income(&self, income: &ValidIncome) -> Result<i64> {
        self.insert_income_at(income, Utc::now())
    }

    pub fn insert_income_at(&self, income: &ValidIncome, created_at: DateTime<Utc>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO incomes (title, amount, created_at) VALUES (?, ?, ?)",
            params![income.title, income.amount, format_datetime(&created_at)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All incomes, newest first
    pub fn list_incomes(&self) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, amount, created_at
            FROM incomes
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, amount, created_at)| {
                Ok(Income {
                    id,
                    title,
                    amount: amount.unwrap_or(0.0),
                    created_at: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }

    pub fn get_income(&self, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let row: Option<(String, Option<f64>, String)> = conn
            .query_row(
                "SELECT title, amount, created_at FROM incomes WHERE id = ?",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(title, amount, created_at)| {
            Ok(Income {
                id,
                title,
                amount: amount.unwrap_or(0.0),
                created_at: parse_datetime(&created_at)?,
            })
        })
        .transpose()
    }

    /// Delete an income, failing with `NotFound` when the id is unknown
    pub fn delete_income(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM incomes WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Income {} not found", id)));
        }
        Ok(())
    }

    pub fn count_incomes(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM incomes", [], |row| row.get(0))?)
    }
}
