//! Invoice model and payable-total computation.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// An invoice raised against a patient visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    /// Store-assigned identity - `None` until first persisted
    pub id: Option<i64>,
    /// Owning patient id
    pub patient_id: i64,
    /// Consultation fee (currency amount)
    pub consultation_fee: f64,
    /// Medicines total (currency amount)
    pub medicines_total: f64,
    /// Tax rate in percent
    pub tax_pct: f64,
    /// Set once at construction; the store never changes it
    pub created_at: String,
}

impl Invoice {
    /// Create a new unsaved invoice, stamping `created_at` now.
    pub fn new(patient_id: i64, consultation_fee: f64, medicines_total: f64, tax_pct: f64) -> Self {
        Self {
            id: None,
            patient_id,
            consultation_fee,
            medicines_total,
            tax_pct,
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Payable total rounded to two decimals.
    ///
    /// With `include_tax` the subtotal is grossed up by `tax_pct`; without it
    /// the bare subtotal is returned.
    pub fn total(&self, include_tax: bool) -> f64 {
        let subtotal = self.consultation_fee + self.medicines_total;
        if include_tax {
            round2(subtotal * (1.0 + self.tax_pct / 100.0))
        } else {
            round2(subtotal)
        }
    }

    /// Check caller-supplied amounts before the record reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("consultation fee", self.consultation_fee),
            ("medicines total", self.medicines_total),
            ("tax percentage", self.tax_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidAmount { field });
            }
        }
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_with_and_without_tax() {
        let invoice = Invoice::new(1, 300.0, 0.0, 18.0);
        assert_eq!(invoice.total(true), 354.00);
        assert_eq!(invoice.total(false), 300.00);
    }

    #[test]
    fn test_total_rounds_to_two_decimals() {
        let invoice = Invoice::new(1, 333.33, 66.67, 12.5);
        assert_eq!(invoice.total(false), 400.00);
        assert_eq!(invoice.total(true), 450.00);

        let odd = Invoice::new(1, 0.10, 0.03, 7.0);
        assert_eq!(odd.total(true), 0.14);
    }

    #[test]
    fn test_zero_tax_totals_match() {
        let invoice = Invoice::new(1, 120.50, 30.25, 0.0);
        assert_eq!(invoice.total(true), invoice.total(false));
    }

    #[test]
    fn test_validate_rejects_bad_amounts() {
        let mut invoice = Invoice::new(1, 300.0, 0.0, 18.0);
        assert!(invoice.validate().is_ok());

        invoice.consultation_fee = -1.0;
        assert_eq!(
            invoice.validate(),
            Err(ValidationError::InvalidAmount {
                field: "consultation fee"
            })
        );

        invoice.consultation_fee = 300.0;
        invoice.medicines_total = f64::NAN;
        assert!(invoice.validate().is_err());

        invoice.medicines_total = 0.0;
        invoice.tax_pct = f64::INFINITY;
        assert!(invoice.validate().is_err());
    }
}
