//! Enumeration types for constrained API values.

use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a money movement.
///
/// On the wire only `ingreso` is income. The server stores `tipo` as free
/// text, so every other value decodes as [`TransactionKind::Egreso`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Income (`ingreso`).
    Ingreso,
    /// Expense (`egreso`).
    Egreso,
}

impl TransactionKind {
    /// Returns the wire name (`ingreso` / `egreso`).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingreso => "ingreso",
            Self::Egreso => "egreso",
        }
    }

    /// Classifies a raw wire value: `ingreso` is income, anything else is
    /// an expense.
    #[inline]
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "ingreso" => Self::Ingreso,
            "egreso" => Self::Egreso,
            other => {
                tracing::warn!(tipo = other, "unrecognised transaction type, counted as egreso");
                Self::Egreso
            }
        }
    }

    /// Returns `true` for [`TransactionKind::Ingreso`].
    #[inline]
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(self, Self::Ingreso)
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

impl core::fmt::Display for TransactionKind {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingreso" => Ok(Self::Ingreso),
            "egreso" => Ok(Self::Egreso),
            other => Err(format!("unknown transaction type {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serde_ingreso() {
        let json = serde_json::to_string(&TransactionKind::Ingreso).unwrap();
        assert_eq!(json, r#""ingreso""#);
        let deserialized: TransactionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, TransactionKind::Ingreso);
    }

    #[test]
    fn kind_serde_egreso() {
        let deserialized: TransactionKind = serde_json::from_str(r#""egreso""#).unwrap();
        assert_eq!(deserialized, TransactionKind::Egreso);
    }

    #[test]
    fn unknown_wire_value_counts_as_egreso() {
        for raw in [r#""Egreso""#, r#""gasto""#, r#""Ingreso""#, r#""""#] {
            let kind: TransactionKind = serde_json::from_str(raw).unwrap();
            assert_eq!(kind, TransactionKind::Egreso, "{raw}");
        }
    }

    #[test]
    fn wire_value_must_still_be_a_string() {
        assert!(serde_json::from_str::<TransactionKind>("1").is_err());
    }

    #[test]
    fn kind_from_str_is_case_insensitive() {
        assert_eq!("Ingreso".parse::<TransactionKind>(), Ok(TransactionKind::Ingreso));
        assert_eq!(" EGRESO ".parse::<TransactionKind>(), Ok(TransactionKind::Egreso));
        assert!("gasto".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn kind_display_matches_wire_name() {
        assert_eq!(TransactionKind::Egreso.to_string(), "egreso");
        assert!(TransactionKind::Ingreso.is_income());
        assert!(!TransactionKind::Egreso.is_income());
    }
}
