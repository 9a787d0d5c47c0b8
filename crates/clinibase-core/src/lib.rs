//! Clinibase Core Library
//!
//! Persistence and access core for a small clinic record manager.
//!
//! # Architecture
//!
//! ```text
//! presentation layer (forms, tables, login)
//!         │  caller identity (name, role) + field values
//!         ▼
//! ┌──────────────────────────────┐
//! │ Clinic (service facade)      │
//! │   authorize → validate →     │──── audit events ──▶ AuditSink
//! │   store → record outcome     │
//! └──────────────┬───────────────┘
//!                ▼
//!        Database (SQLite)
//!   patients / appointments / invoices
//! ```
//!
//! # Core Principle
//!
//! **Every mutating operation is gated by role before it touches the store.**
//! A denied caller performs no reads or writes and leaves an audit event.
//!
//! # Modules
//!
//! - [`db`]: SQLite store adapter with idempotent schema bootstrap
//! - [`models`]: Domain types (Patient, Appointment, Invoice)
//! - [`access`]: Role tags, capability predicate and the authorization gate
//! - [`audit`]: Structured audit events and the sink seam
//! - [`search`]: Case-insensitive regex search over patient text fields

pub mod access;
pub mod audit;
pub mod db;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use access::{authorize, AccessDenied, Caller, Role};
pub use audit::{AuditEvent, AuditOutcome, AuditSink, LogAudit};
pub use db::Database;
pub use models::{Appointment, Invoice, Patient, PatientStatus, ValidationError};
pub use search::{SearchField, SearchMatch};

use std::path::Path;

use db::DbError;

// =========================================================================
// Top-Level Error Type
// =========================================================================

/// Errors surfaced to the presentation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessDenied),

    #[error("persistence error: {0}")]
    Persistence(#[from] DbError),

    #[error("invalid search pattern: {0}")]
    Pattern(#[source] regex::Error),
}

impl From<search::SearchError> for ClinicError {
    fn from(err: search::SearchError) -> Self {
        match err {
            search::SearchError::InvalidPattern(e) => ClinicError::Pattern(e),
            search::SearchError::Db(e) => ClinicError::Persistence(e),
        }
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Service facade over the clinic store.
///
/// Holds the injected store handle and audit sink; created once at process
/// start and dropped at shutdown.
pub struct Clinic {
    db: Database,
    audit: Box<dyn AuditSink>,
}

impl Clinic {
    /// Open or create the clinic store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClinicError> {
        Ok(Self::with_audit(Database::open(path)?, Box::new(LogAudit)))
    }

    /// Create an in-memory clinic (for testing).
    pub fn open_in_memory() -> Result<Self, ClinicError> {
        Ok(Self::with_audit(Database::open_in_memory()?, Box::new(LogAudit)))
    }

    /// Wrap an already-open store with a caller-provided audit sink.
    pub fn with_audit(db: Database, audit: Box<dyn AuditSink>) -> Self {
        Self { db, audit }
    }

    /// Underlying store handle (for advanced queries).
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Create a new patient, returning the store-assigned id.
    pub fn create_patient(&self, caller: &Caller, patient: &Patient) -> Result<i64, ClinicError> {
        access::authorize(
            caller.role,
            access::PATIENT_WRITE,
            "create_patient",
            self.audit.as_ref(),
        )?;
        patient.validate()?;

        let id = self
            .db
            .insert_patient(patient)
            .map_err(|err| self.fault(caller.role, "create_patient", err))?;
        self.audit
            .record(&AuditEvent::ok(caller.role, "create_patient", Some(id)));
        Ok(id)
    }

    /// Update an existing patient. `patient.id` must be present.
    pub fn update_patient(&self, caller: &Caller, patient: &Patient) -> Result<(), ClinicError> {
        access::authorize(
            caller.role,
            access::PATIENT_WRITE,
            "update_patient",
            self.audit.as_ref(),
        )?;
        let id = patient.id.ok_or(ValidationError::MissingPatientId)?;
        patient.validate()?;

        self.db
            .update_patient(id, patient)
            .map_err(|err| self.fault(caller.role, "update_patient", err))?;
        self.audit
            .record(&AuditEvent::ok(caller.role, "update_patient", Some(id)));
        Ok(())
    }

    /// Get a patient by id. A missing row is `None`, not an error.
    pub fn patient(&self, id: i64) -> Result<Option<Patient>, ClinicError> {
        Ok(self.db.get_patient(id)?)
    }

    /// List all patients, most recently created first.
    pub fn patients(&self) -> Result<Vec<Patient>, ClinicError> {
        Ok(self.db.list_patients()?)
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Create an appointment for an existing patient.
    pub fn create_appointment(
        &self,
        caller: &Caller,
        appointment: &Appointment,
    ) -> Result<i64, ClinicError> {
        access::authorize(
            caller.role,
            access::APPOINTMENT_WRITE,
            "create_appointment",
            self.audit.as_ref(),
        )?;
        self.require_patient(appointment.patient_id)?;

        let id = self
            .db
            .insert_appointment(appointment)
            .map_err(|err| self.fault(caller.role, "create_appointment", err))?;
        self.audit
            .record(&AuditEvent::ok(caller.role, "create_appointment", Some(id)));
        Ok(id)
    }

    /// List a patient's appointments, most recent first.
    pub fn appointments_for(&self, patient_id: i64) -> Result<Vec<Appointment>, ClinicError> {
        Ok(self.db.appointments_for(patient_id)?)
    }

    // =========================================================================
    // Invoice Operations
    // =========================================================================

    /// Create an invoice for an existing patient.
    pub fn create_invoice(&self, caller: &Caller, invoice: &Invoice) -> Result<i64, ClinicError> {
        access::authorize(
            caller.role,
            access::INVOICE_WRITE,
            "create_invoice",
            self.audit.as_ref(),
        )?;
        invoice.validate()?;
        self.require_patient(invoice.patient_id)?;

        let id = self
            .db
            .insert_invoice(invoice)
            .map_err(|err| self.fault(caller.role, "create_invoice", err))?;
        self.audit
            .record(&AuditEvent::ok(caller.role, "create_invoice", Some(id)));
        Ok(id)
    }

    /// List a patient's invoices, most recently created first.
    pub fn invoices_for(&self, patient_id: i64) -> Result<Vec<Invoice>, ClinicError> {
        Ok(self.db.invoices_for(patient_id)?)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Find patients whose `field` text matches `pattern`, case-insensitively.
    pub fn search(
        &self,
        pattern: &str,
        field: SearchField,
    ) -> Result<Vec<SearchMatch>, ClinicError> {
        Ok(search::search_patients(&self.db, pattern, field)?)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_patient(&self, patient_id: i64) -> Result<(), ClinicError> {
        if self.db.get_patient(patient_id)?.is_none() {
            return Err(ValidationError::UnknownPatient(patient_id).into());
        }
        Ok(())
    }

    fn fault(&self, role: Role, operation: &str, err: DbError) -> ClinicError {
        self.audit.record(&AuditEvent::error(role, operation));
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<AuditEvent>>);

    impl AuditSink for RecordingSink {
        fn record(&self, event: &AuditEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn setup_clinic() -> (Clinic, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let clinic = Clinic::with_audit(
            Database::open_in_memory().unwrap(),
            Box::new(Arc::clone(&sink)),
        );
        (clinic, sink)
    }

    fn sample_patient() -> Patient {
        Patient::new("Asha Rao".into(), 34, "Female".into(), "9876543210".into())
    }

    #[test]
    fn test_create_patient_records_audit_event() {
        let (clinic, sink) = setup_clinic();
        let caller = Caller::new("meera".into(), Role::Receptionist);

        let id = clinic.create_patient(&caller, &sample_patient()).unwrap();

        let events = sink.0.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&AuditEvent::ok(Role::Receptionist, "create_patient", Some(id)))
        );
    }

    #[test]
    fn test_invalid_phone_rejected_before_store() {
        let (clinic, _) = setup_clinic();
        let caller = Caller::new("meera".into(), Role::Receptionist);

        let mut patient = sample_patient();
        patient.phone = "12345".into();

        let err = clinic.create_patient(&caller, &patient).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Validation(ValidationError::InvalidPhone)
        ));
        assert!(clinic.patients().unwrap().is_empty());
    }

    #[test]
    fn test_update_without_id_fails_and_modifies_nothing() {
        let (clinic, _) = setup_clinic();
        let caller = Caller::new("meera".into(), Role::Receptionist);

        let id = clinic.create_patient(&caller, &sample_patient()).unwrap();

        let mut edited = sample_patient();
        edited.disease = "Typhoid".into();
        // id deliberately left as None
        let err = clinic.update_patient(&caller, &edited).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Validation(ValidationError::MissingPatientId)
        ));

        let stored = clinic.patient(id).unwrap().unwrap();
        assert_eq!(stored.disease, "");
    }

    #[test]
    fn test_update_round_trip() {
        let (clinic, _) = setup_clinic();
        let caller = Caller::new("dr.mehta".into(), Role::Doctor);

        let id = clinic.create_patient(&caller, &sample_patient()).unwrap();

        let mut edited = clinic.patient(id).unwrap().unwrap();
        edited.status = PatientStatus::Critical;
        clinic.update_patient(&caller, &edited).unwrap();

        assert_eq!(clinic.patient(id).unwrap().unwrap(), edited);
    }

    #[test]
    fn test_appointment_requires_existing_patient() {
        let (clinic, _) = setup_clinic();
        let caller = Caller::new("meera".into(), Role::Receptionist);

        let appointment =
            Appointment::new(99, "Dr. Mehta".into(), "2026-03-14".into(), "10:30".into());
        let err = clinic.create_appointment(&caller, &appointment).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Validation(ValidationError::UnknownPatient(99))
        ));
    }

    #[test]
    fn test_receptionist_cannot_create_invoice() {
        let (clinic, sink) = setup_clinic();
        let receptionist = Caller::new("meera".into(), Role::Receptionist);

        let patient_id = clinic
            .create_patient(&receptionist, &sample_patient())
            .unwrap();

        let invoice = Invoice::new(patient_id, 300.0, 0.0, 18.0);
        let err = clinic.create_invoice(&receptionist, &invoice).unwrap_err();
        assert!(matches!(err, ClinicError::Access(_)));

        // The denied operation must leave no row behind
        assert!(clinic.invoices_for(patient_id).unwrap().is_empty());
        let events = sink.0.lock().unwrap();
        assert_eq!(
            events.last(),
            Some(&AuditEvent::denied(Role::Receptionist, "create_invoice"))
        );
    }

    #[test]
    fn test_doctor_can_create_invoice() {
        let (clinic, _) = setup_clinic();
        let receptionist = Caller::new("meera".into(), Role::Receptionist);
        let doctor = Caller::new("dr.mehta".into(), Role::Doctor);

        let patient_id = clinic
            .create_patient(&receptionist, &sample_patient())
            .unwrap();

        let invoice = Invoice::new(patient_id, 300.0, 0.0, 18.0);
        let id = clinic.create_invoice(&doctor, &invoice).unwrap();

        let listed = clinic.invoices_for(patient_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, Some(id));
        assert_eq!(listed[0].total(true), 354.00);
    }

    #[test]
    fn test_negative_invoice_amount_rejected() {
        let (clinic, _) = setup_clinic();
        let doctor = Caller::new("dr.mehta".into(), Role::Doctor);

        let patient_id = clinic.create_patient(&doctor, &sample_patient()).unwrap();

        let invoice = Invoice::new(patient_id, -5.0, 0.0, 18.0);
        let err = clinic.create_invoice(&doctor, &invoice).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::Validation(ValidationError::InvalidAmount { .. })
        ));
        assert!(clinic.invoices_for(patient_id).unwrap().is_empty());
    }

    #[test]
    fn test_search_through_facade() {
        let (clinic, _) = setup_clinic();
        let caller = Caller::new("meera".into(), Role::Receptionist);

        let mut patient = sample_patient();
        patient.disease = "Covid-19".into();
        let id = clinic.create_patient(&caller, &patient).unwrap();

        let hits = clinic.search("covid|flu", SearchField::Disease).unwrap();
        assert_eq!(hits, vec![SearchMatch { patient_id: id, name: "Asha Rao".into() }]);

        let err = clinic.search("covid(", SearchField::Disease).unwrap_err();
        assert!(matches!(err, ClinicError::Pattern(_)));
    }
}
