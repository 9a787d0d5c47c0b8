//! Domain models for the clinic record core.

mod appointment;
mod invoice;
mod patient;

pub use appointment::*;
pub use invoice::*;
pub use patient::*;

use thiserror::Error;

/// Caller-input validation errors, detected before any store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("phone must be exactly 10 digits")]
    InvalidPhone,

    #[error("patient id is required for update")]
    MissingPatientId,

    #[error("patient {0} not found")]
    UnknownPatient(i64),

    #[error("{field} must be a finite, non-negative amount")]
    InvalidAmount { field: &'static str },
}
