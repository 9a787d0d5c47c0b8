//! Structured audit events for gated operations.
//!
//! The core emits one event per authorization denial, successful mutation,
//! and post-authorization store fault. Writing events to durable storage is
//! the embedding application's job; the default sink only forwards them to
//! the `log` facade.

use log::{info, warn};
use serde::Serialize;

use crate::access::Role;

/// Outcome attached to an [`AuditEvent`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The operation ran and committed.
    Ok,
    /// The role gate rejected the caller; the operation never ran.
    Denied,
    /// The store reported a fault after authorization.
    Error,
}

impl AuditOutcome {
    /// Stable text used in emitted log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Denied => "denied",
            Self::Error => "error",
        }
    }
}

/// One observable authorization decision or mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditEvent {
    pub role: Role,
    pub operation: String,
    /// Identity of the touched entity, when one exists.
    pub entity_id: Option<i64>,
    pub outcome: AuditOutcome,
}

impl AuditEvent {
    /// Event for a committed mutation.
    pub fn ok(role: Role, operation: &str, entity_id: Option<i64>) -> Self {
        Self {
            role,
            operation: operation.to_string(),
            entity_id,
            outcome: AuditOutcome::Ok,
        }
    }

    /// Event for a denied authorization.
    pub fn denied(role: Role, operation: &str) -> Self {
        Self {
            role,
            operation: operation.to_string(),
            entity_id: None,
            outcome: AuditOutcome::Denied,
        }
    }

    /// Event for a store fault inside a gated operation.
    pub fn error(role: Role, operation: &str) -> Self {
        Self {
            role,
            operation: operation.to_string(),
            entity_id: None,
            outcome: AuditOutcome::Error,
        }
    }
}

/// Receives audit events as they happen.
pub trait AuditSink {
    fn record(&self, event: &AuditEvent);
}

impl<S: AuditSink + ?Sized> AuditSink for std::sync::Arc<S> {
    fn record(&self, event: &AuditEvent) {
        (**self).record(event);
    }
}

/// Default sink: forwards events to the `log` facade as key=value lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudit;

impl AuditSink for LogAudit {
    fn record(&self, event: &AuditEvent) {
        let id = event
            .entity_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        match event.outcome {
            AuditOutcome::Ok => info!(
                "event=audit outcome={} role={} operation={} id={}",
                event.outcome.as_str(),
                event.role,
                event.operation,
                id
            ),
            AuditOutcome::Denied | AuditOutcome::Error => warn!(
                "event=audit outcome={} role={} operation={} id={}",
                event.outcome.as_str(),
                event.role,
                event.operation,
                id
            ),
        }
    }
}
