//! SQLite persistence layer for the clinic store.

mod appointments;
mod invoices;
mod patients;
mod schema;

pub use schema::SCHEMA;

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

/// Store-level errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// Owns the single connection to the embedded store; every mutating call is
/// its own auto-committed transaction, so a returned identity is visible to
/// all subsequent reads.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema. `CREATE TABLE IF NOT EXISTS` keeps this idempotent.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Fold SQLite constraint failures into [`DbError::Constraint`].
pub(crate) fn constraint_or_sqlite(err: rusqlite::Error) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(err.to_string())
        }
        _ => DbError::Sqlite(err),
    }
}
