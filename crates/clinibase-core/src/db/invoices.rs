//! Invoice store operations.

use rusqlite::{params, Row};

use super::{constraint_or_sqlite, Database, DbResult};
use crate::models::Invoice;

impl Database {
    /// Insert a new invoice, returning the store-assigned id.
    pub fn insert_invoice(&self, invoice: &Invoice) -> DbResult<i64> {
        self.conn
            .execute(
                r#"
                INSERT INTO invoices (patient_id, consultation_fee, medicines_total, tax_pct, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    invoice.patient_id,
                    invoice.consultation_fee,
                    invoice.medicines_total,
                    invoice.tax_pct,
                    invoice.created_at,
                ],
            )
            .map_err(constraint_or_sqlite)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List a patient's invoices, most recently created first.
    pub fn invoices_for(&self, patient_id: i64) -> DbResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, consultation_fee, medicines_total, tax_pct, created_at
            FROM invoices
            WHERE patient_id = ?
            ORDER BY id DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], read_invoice)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn read_invoice(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: Some(row.get(0)?),
        patient_id: row.get(1)?,
        consultation_fee: row.get(2)?,
        medicines_total: row.get(3)?,
        tax_pct: row.get(4)?,
        created_at: row.get(5)?,
    })
}
