//! Patient store operations.

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::{constraint_or_sqlite, Database, DbResult};
use crate::models::{Patient, PatientStatus};

impl Database {
    /// Insert a new patient, returning the store-assigned id.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<i64> {
        self.conn
            .execute(
                r#"
                INSERT INTO patients (name, age, gender, phone, disease, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    patient.name,
                    patient.age,
                    patient.gender,
                    patient.phone,
                    patient.disease,
                    patient.status.as_str(),
                ],
            )
            .map_err(constraint_or_sqlite)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update the patient row with the given id.
    pub fn update_patient(&self, id: i64, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE patients SET
                    name = ?2,
                    age = ?3,
                    gender = ?4,
                    phone = ?5,
                    disease = ?6,
                    status = ?7
                WHERE id = ?1
                "#,
                params![
                    id,
                    patient.name,
                    patient.age,
                    patient.gender,
                    patient.phone,
                    patient.disease,
                    patient.status.as_str(),
                ],
            )
            .map_err(constraint_or_sqlite)?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id. A missing row is `None`, not an error.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, age, gender, phone, disease, status
                FROM patients
                WHERE id = ?
                "#,
                [id],
                read_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, most recently created first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, age, gender, phone, disease, status
            FROM patients
            ORDER BY id DESC
            "#,
        )?;

        let rows = stmt.query_map([], read_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient. Appointments and invoices cascade at the store level.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn read_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let status_text: String = row.get(6)?;
    let status = PatientStatus::parse(&status_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            format!("unknown patient status `{status_text}`").into(),
        )
    })?;

    Ok(Patient {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        phone: row.get(4)?,
        disease: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_patient() -> Patient {
        let mut patient = Patient::new(
            "Asha Rao".into(),
            34,
            "Female".into(),
            "9876543210".into(),
        );
        patient.disease = "Covid-19".into();
        patient.status = PatientStatus::FollowUp;
        patient
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = setup_db();

        let patient = sample_patient();
        let id = db.insert_patient(&patient).unwrap();

        let mut expected = patient.clone();
        expected.id = Some(id);

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved, expected);
    }

    #[test]
    fn test_get_missing_patient_is_none() {
        let db = setup_db();
        assert_eq!(db.get_patient(42).unwrap(), None);
    }

    #[test]
    fn test_update_patient() {
        let db = setup_db();

        let mut patient = sample_patient();
        let id = db.insert_patient(&patient).unwrap();

        patient.status = PatientStatus::Critical;
        patient.disease = "Pneumonia".into();
        assert!(db.update_patient(id, &patient).unwrap());

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved.status, PatientStatus::Critical);
        assert_eq!(retrieved.disease, "Pneumonia");
    }

    #[test]
    fn test_update_missing_row_affects_nothing() {
        let db = setup_db();
        assert!(!db.update_patient(42, &sample_patient()).unwrap());
    }

    #[test]
    fn test_list_patients_newest_first() {
        let db = setup_db();

        let first = db.insert_patient(&sample_patient()).unwrap();
        let second = db.insert_patient(&sample_patient()).unwrap();
        let third = db.insert_patient(&sample_patient()).unwrap();

        let ids: Vec<i64> = db
            .list_patients()
            .unwrap()
            .into_iter()
            .map(|p| p.id.unwrap())
            .collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn test_delete_patient() {
        let db = setup_db();

        let id = db.insert_patient(&sample_patient()).unwrap();
        assert!(db.delete_patient(id).unwrap());
        assert_eq!(db.get_patient(id).unwrap(), None);
        assert!(!db.delete_patient(id).unwrap());
    }

    #[test]
    fn test_null_disease_reads_as_empty() {
        let db = setup_db();

        db.conn()
            .execute(
                "INSERT INTO patients (name, age, gender, phone, disease, status) \
                 VALUES ('Ravi Iyer', 51, 'Male', '9000000000', NULL, 'New')",
                [],
            )
            .unwrap();
        let id = db.conn().last_insert_rowid();

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved.disease, "");
    }
}
