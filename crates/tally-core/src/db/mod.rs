//! SQLite store for expenses, incomes, and the audit log
//!
//! Split by table:
//! - `expenses` - expense CRUD
//! - `incomes` - income CRUD
//! - `audit` - access log
//!
//! The store hands out plain snapshots; all aggregation happens in
//! [`crate::analytics`].

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::seed;

mod audit;
mod expenses;
mod incomes;

pub use audit::{AuditEntry, AuditQuery, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable holding the database passphrase
pub const DB_KEY_ENV: &str = "TALLY_DB_KEY";

/// Timestamp format used for every DATETIME column
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turn a passphrase into a hex SQLCipher key with Argon2id
///
/// The salt is fixed per application, so a database file can be moved or
/// restored anywhere and still open with the same passphrase.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this makes every existing encrypted database unreadable
    const APP_SALT: &[u8; 16] = b"tally-salt-v1-fx";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let output = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(output.as_bytes()))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored DATETIME value ("YYYY-MM-DD HH:MM:SS")
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| Error::InvalidData(format!("Bad timestamp '{}': {}", s, e)))
}

/// Pooled handle to the store
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
}

/// Rows inserted by [`Database::seed_demo_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SeedCounts {
    pub expenses: usize,
    pub incomes: usize,
}

impl Database {
    /// Open an encrypted database
    ///
    /// The passphrase comes from `TALLY_DB_KEY`; opening fails when it is not set.
    /// Use [`Database::new_unencrypted`] for local development.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} or pass --no-encrypt \
                for an unencrypted database.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Open a plaintext database
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Open a database, encrypting it when a passphrase is given
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = match passphrase {
            Some(pass) => {
                let key_pragma = format!("PRAGMA key = 'x\"{}\"';", derive_key(pass)?);
                // Every pooled connection needs the key before its first query
                let manager = manager.with_init(move |conn| conn.execute_batch(&key_pragma));
                Pool::builder().max_size(10).build(manager)?
            }
            None => Pool::builder().max_size(10).build(manager)?,
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Fresh throwaway database for tests
    ///
    /// Backed by a temp file: SQLCipher builds misbehave with `:memory:`
    /// databases shared across a pool.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().into_owned();
        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path)
    }

    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Delete every expense and income, keeping the audit log
    pub fn soft_reset(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            DELETE FROM expenses;
            DELETE FROM incomes;
            "#,
        )?;

        info!("Database soft reset complete");
        Ok(())
    }

    /// Insert the demo data set, dated relative to `reference`
    pub fn seed_demo_data(&self, reference: DateTime<Utc>) -> Result<SeedCounts> {
        let expenses = seed::demo_expenses(reference);
        let incomes = seed::demo_incomes(reference);

        for (expense, at) in &expenses {
            self.insert_expense_at(expense, *at)?;
        }
        for (income, at) in &incomes {
            self.insert_income_at(income, *at)?;
        }

        debug!(
            expenses = expenses.len(),
            incomes = incomes.len(),
            "Seeded demo data"
        );
        Ok(SeedCounts {
            expenses: expenses.len(),
            incomes: incomes.len(),
        })
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL,                -- NULL reads as 0
                category TEXT NOT NULL,     -- display name, e.g. 'Food & Dining'
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_created_at ON expenses(created_at);
            CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);

            CREATE TABLE IF NOT EXISTS incomes (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_incomes_created_at ON incomes(created_at);

            -- Every API access and mutation
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                recorded_at DATETIME NOT NULL,
                actor TEXT NOT NULL,
                action TEXT NOT NULL,
                entity_type TEXT,
                entity_id INTEGER,
                details TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_log_recorded_at ON audit_log(recorded_at);
            CREATE INDEX IF NOT EXISTS idx_audit_log_action ON audit_log(action);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
