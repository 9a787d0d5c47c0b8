//! Patient model.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Patient care status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientStatus {
    New,
    FollowUp,
    Critical,
}

impl PatientStatus {
    /// Stable text stored in the `patients.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::FollowUp => "Follow-up",
            Self::Critical => "Critical",
        }
    }

    /// Parse the stored column text back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "New" => Some(Self::New),
            "Follow-up" => Some(Self::FollowUp),
            "Critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identity - `None` until first persisted
    pub id: Option<i64>,
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender as entered at the front desk
    pub gender: String,
    /// Contact phone, exactly 10 decimal digits
    pub phone: String,
    /// Free-text disease / presenting complaint
    pub disease: String,
    /// Care status
    pub status: PatientStatus,
}

impl Patient {
    /// Create a new unsaved patient with required fields.
    pub fn new(name: String, age: u32, gender: String, phone: String) -> Self {
        Self {
            id: None,
            name,
            age,
            gender,
            phone,
            disease: String::new(),
            status: PatientStatus::New,
        }
    }

    /// Check caller-supplied fields before the record reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone.len() != 10 || !self.phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(())
    }
}
