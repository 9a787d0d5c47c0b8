//! Pattern search over patient text fields.
//!
//! # Responsibility
//! - Compile a caller-supplied pattern case-insensitively.
//! - Filter a snapshot of all patients by unanchored match on one field.
//!
//! # Invariants
//! - A malformed pattern fails before any row is inspected.
//! - A `NULL` field value matches as if it were an empty string.

use regex::RegexBuilder;
use thiserror::Error;

use crate::db::{Database, DbError};

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Patient text field a pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Disease,
    Status,
    Name,
}

impl SearchField {
    /// Map a caller-supplied field name.
    ///
    /// Unrecognized names fall back to [`SearchField::Disease`] rather than
    /// failing, keeping the report form this search backs lenient.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "status" => Self::Status,
            "name" => Self::Name,
            _ => Self::Disease,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::Status => "status",
            Self::Name => "name",
        }
    }
}

/// Search-layer errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Caller-supplied pattern is not a valid regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single hit returned by [`search_patients`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub patient_id: i64,
    pub name: String,
}

/// Find patients whose `field` text contains a case-insensitive match for
/// `pattern`. The match is unanchored.
pub fn search_patients(
    db: &Database,
    pattern: &str,
    field: SearchField,
) -> SearchResult<Vec<SearchMatch>> {
    let rx = RegexBuilder::new(pattern).case_insensitive(true).build()?;

    // Column name comes from the enum above, never from caller input.
    let sql = format!(
        "SELECT id, name, {} FROM patients ORDER BY id",
        field.column()
    );
    let mut stmt = db.conn().prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut matches = Vec::new();
    for row in rows {
        let (patient_id, name, value) = row?;
        if rx.is_match(value.as_deref().unwrap_or("")) {
            matches.push(SearchMatch { patient_id, name });
        }
    }
    Ok(matches)
}
