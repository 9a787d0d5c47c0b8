//! Appointment model.

use serde::{Deserialize, Serialize};

/// A scheduled visit for an existing patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    /// Store-assigned identity - `None` until first persisted
    pub id: Option<i64>,
    /// Owning patient id
    pub patient_id: i64,
    /// Attending doctor name
    pub doctor: String,
    /// Date, `YYYY-MM-DD`
    pub date: String,
    /// Time, `HH:MM`
    pub time: String,
    /// Free-text notes
    pub notes: String,
}

impl Appointment {
    /// Create a new unsaved appointment with empty notes.
    pub fn new(patient_id: i64, doctor: String, date: String, time: String) -> Self {
        Self {
            id: None,
            patient_id,
            doctor,
            date,
            time,
            notes: String::new(),
        }
    }
}
