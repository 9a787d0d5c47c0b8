//! Appointment store operations.

use rusqlite::{params, Row};

use super::{constraint_or_sqlite, Database, DbResult};
use crate::models::Appointment;

impl Database {
    /// Insert a new appointment, returning the store-assigned id.
    ///
    /// Referential integrity to the patient is enforced at the storage
    /// level; callers wanting a friendlier error pre-check existence.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<i64> {
        self.conn
            .execute(
                r#"
                INSERT INTO appointments (patient_id, doctor, date, time, notes)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    appointment.patient_id,
                    appointment.doctor,
                    appointment.date,
                    appointment.time,
                    appointment.notes,
                ],
            )
            .map_err(constraint_or_sqlite)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List a patient's appointments, most recent first.
    pub fn appointments_for(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, doctor, date, time, notes
            FROM appointments
            WHERE patient_id = ?
            ORDER BY date DESC, time DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], read_appointment)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn read_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: Some(row.get(0)?),
        patient_id: row.get(1)?,
        doctor: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        notes: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}
