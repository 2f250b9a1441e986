//! Transaction models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{TransactionId, TransactionKind};
use crate::error::{FinanzasError, Result, ValidationError};

/// Timestamp layouts the server is known to emit, most specific first.
const FECHA_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A recorded money movement, as returned by the server.
///
/// Transactions are immutable from the client's point of view: they are
/// only ever created, listed and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Timestamp, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`.
    pub fecha: String,
    /// Free-text label.
    pub concepto: String,
    /// Amount (>= 0).
    pub monto: f64,
    /// Income or expense.
    pub tipo: TransactionKind,
}

impl Transaction {
    /// Parses [`Transaction::fecha`].
    ///
    /// # Errors
    ///
    /// Returns [`FinanzasError::DataFormat`] if the value does not match
    /// either known layout.
    #[inline]
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let mut last_err = None;
        for format in FECHA_FORMATS {
            match NaiveDateTime::parse_from_str(&self.fecha, format) {
                Ok(ts) => return Ok(ts),
                Err(err) => last_err = Some(err),
            }
        }
        Err(FinanzasError::DataFormat {
            id: self.id,
            field: "fecha",
            value: self.fecha.clone(),
            reason: last_err.map_or_else(|| "empty value".to_owned(), |err| err.to_string()),
        })
    }

    /// Returns the calendar day of [`Transaction::fecha`].
    ///
    /// # Errors
    ///
    /// Returns [`FinanzasError::DataFormat`] if the timestamp is malformed.
    #[inline]
    pub fn date(&self) -> Result<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    /// Returns [`Transaction::monto`] once it is known to be a finite,
    /// non-negative amount.
    ///
    /// # Errors
    ///
    /// Returns [`FinanzasError::DataFormat`] for negative, NaN or infinite
    /// amounts.
    #[inline]
    pub fn amount(&self) -> Result<f64> {
        let reason = if !self.monto.is_finite() {
            "amount is not a finite number"
        } else if self.monto < 0.0_f64 {
            "amount is negative"
        } else {
            return Ok(self.monto);
        };
        Err(FinanzasError::DataFormat {
            id: self.id,
            field: "monto",
            value: self.monto.to_string(),
            reason: reason.to_owned(),
        })
    }

    /// Returns the time-of-day portion of [`Transaction::fecha`] as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns [`FinanzasError::DataFormat`] if the timestamp is malformed.
    #[inline]
    pub fn time_of_day(&self) -> Result<String> {
        self.timestamp().map(|ts| ts.format("%H:%M").to_string())
    }
}

/// Payload for creating a transaction.
///
/// The server assigns `id` and `fecha`, so neither is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Free-text label.
    pub concepto: String,
    /// Amount (>= 0).
    pub monto: f64,
    /// Income or expense.
    pub tipo: TransactionKind,
}

impl NewTransaction {
    /// Builds a payload from raw form field values.
    ///
    /// # Errors
    ///
    /// Returns [`FinanzasError::Validation`] if the concept is blank, the
    /// amount is not a finite non-negative number, or the type is neither
    /// `ingreso` nor `egreso`.
    #[inline]
    pub fn from_form(concepto: &str, monto: &str, tipo: &str) -> Result<Self> {
        let concepto = concepto.trim();
        if concepto.is_empty() {
            return Err(ValidationError::EmptyConcept.into());
        }
        let monto = monto
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0_f64)
            .ok_or_else(|| ValidationError::InvalidAmount(monto.trim().to_owned()))?;
        let tipo = tipo
            .parse::<TransactionKind>()
            .map_err(|_err| ValidationError::UnknownKind(tipo.trim().to_owned()))?;

        Ok(Self {
            concepto: concepto.to_owned(),
            monto,
            tipo,
        })
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOutcome {
    /// The server removed the transaction.
    Deleted,
    /// The server did not know the identifier. Nothing changed.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(fecha: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            fecha: fecha.to_owned(),
            concepto: "Salary".to_owned(),
            monto: 1000.0,
            tipo: TransactionKind::Ingreso,
        }
    }

    #[test]
    fn deserialize_server_transaction() {
        let json = r#"{
            "id": 12,
            "concepto": "Almuerzo",
            "monto": 35000.0,
            "tipo": "egreso",
            "fecha": "2024-03-02 13:45:10"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, TransactionId::new(12));
        assert_eq!(tx.tipo, TransactionKind::Egreso);
        assert!((tx.monto - 35000.0).abs() < f64::EPSILON);
        assert_eq!(tx.time_of_day().unwrap(), "13:45");
    }

    #[test]
    fn timestamp_accepts_minutes_only() {
        let ts = tx("2024-01-05 10:00").timestamp().unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(tx("2024-01-05 10:00").time_of_day().unwrap(), "10:00");
    }

    #[test]
    fn timestamp_rejects_malformed_fecha() {
        for bad in ["", "2024-01-05", "2024-13-05 10:00", "05/01/2024 10:00", "ayer"] {
            let err = tx(bad).timestamp().unwrap_err();
            assert!(
                matches!(err, FinanzasError::DataFormat { ref value, .. } if value == bad),
                "expected DataFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn amount_rejects_negative_and_non_finite() {
        let mut bad = tx("2024-01-05 10:00");
        for monto in [-10.0, f64::NAN, f64::INFINITY] {
            bad.monto = monto;
            let err = bad.amount().unwrap_err();
            assert!(matches!(
                err,
                FinanzasError::DataFormat { id, field: "monto", .. } if id == TransactionId::new(1)
            ));
        }
        bad.monto = 0.0;
        assert!(bad.amount().unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn list_with_unrecognised_tipo_still_decodes() {
        let json = r#"[
            {"id": 1, "concepto": "Sueldo", "monto": 100.0, "tipo": "ingreso", "fecha": "2024-01-05 10:00:00"},
            {"id": 2, "concepto": "Super", "monto": 40.0, "tipo": "Egreso", "fecha": "2024-01-05 11:00:00"},
            {"id": 3, "concepto": "Bus", "monto": 5.0, "tipo": "gasto", "fecha": "2024-01-05 12:00:00"}
        ]"#;
        let txs: Vec<Transaction> = serde_json::from_str(json).unwrap();
        let kinds: Vec<TransactionKind> = txs.iter().map(|t| t.tipo).collect();
        assert_eq!(
            kinds,
            [TransactionKind::Ingreso, TransactionKind::Egreso, TransactionKind::Egreso]
        );
    }

    #[test]
    fn new_transaction_serializes_without_id_or_fecha() {
        let payload = NewTransaction::from_form(" Lunch ", "50", "egreso").unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"concepto": "Lunch", "monto": 50.0, "tipo": "egreso"})
        );
    }

    #[test]
    fn from_form_rejects_bad_fields() {
        assert!(matches!(
            NewTransaction::from_form("  ", "10", "ingreso"),
            Err(FinanzasError::Validation(ValidationError::EmptyConcept))
        ));
        assert!(matches!(
            NewTransaction::from_form("Bus", "-3", "egreso"),
            Err(FinanzasError::Validation(ValidationError::InvalidAmount(_)))
        ));
        assert!(matches!(
            NewTransaction::from_form("Bus", "diez", "egreso"),
            Err(FinanzasError::Validation(ValidationError::InvalidAmount(_)))
        ));
        assert!(matches!(
            NewTransaction::from_form("Bus", "10", "transfer"),
            Err(FinanzasError::Validation(ValidationError::UnknownKind(_)))
        ));
    }
}
