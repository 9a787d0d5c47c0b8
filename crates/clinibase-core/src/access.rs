//! Role-based authorization gate for mutating operations.
//!
//! Advisory only: the caller's role is trusted input produced by the login
//! collaborator; no credential check happens here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::{AuditEvent, AuditSink};

/// Caller role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Doctor,
    Receptionist,
}

impl Role {
    /// Stable string id used by the presentation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Doctor => "Doctor",
            Self::Receptionist => "Receptionist",
        }
    }

    /// Parse a presentation-layer role string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Admin" => Some(Self::Admin),
            "Doctor" => Some(Self::Doctor),
            "Receptionist" => Some(Self::Receptionist),
            _ => None,
        }
    }

    /// Whether this role may create or modify billing data.
    pub fn can_edit_billing(self) -> bool {
        matches!(self, Self::Admin | Self::Doctor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity asserted by the presentation layer for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub name: String,
    pub role: Role,
}

impl Caller {
    pub fn new(name: String, role: Role) -> Self {
        Self { name, role }
    }
}

/// Roles allowed to create or update patients.
pub const PATIENT_WRITE: &[Role] = &[Role::Admin, Role::Receptionist, Role::Doctor];
/// Roles allowed to create appointments.
pub const APPOINTMENT_WRITE: &[Role] = &[Role::Admin, Role::Receptionist, Role::Doctor];
/// Roles allowed to create invoices. Receptionists handle no billing.
pub const INVOICE_WRITE: &[Role] = &[Role::Admin, Role::Doctor];

/// Denial returned when a role is outside an operation's allowed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("role `{role}` is not permitted to {operation}")]
pub struct AccessDenied {
    pub role: Role,
    pub operation: String,
}

/// Check `role` against `allowed` before running `operation`.
///
/// A denial is recorded through `audit` and the gated operation must not
/// execute.
pub fn authorize(
    role: Role,
    allowed: &[Role],
    operation: &str,
    audit: &dyn AuditSink,
) -> Result<(), AccessDenied> {
    if allowed.contains(&role) {
        return Ok(());
    }

    audit.record(&AuditEvent::denied(role, operation));
    Err(AccessDenied {
        role,
        operation: operation.to_string(),
    })
}
