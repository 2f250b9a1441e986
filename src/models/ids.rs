//! Newtype wrapper for transaction identifiers.
//!
//! Keeps server-assigned identifiers from being mixed up with amounts or
//! other integers at compile time.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Creates a new identifier from the given value.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner value.
    #[inline]
    #[must_use]
    pub const fn as_inner(&self) -> &i64 {
        &self.0
    }

    /// Consumes the wrapper and returns the inner value.
    #[inline]
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for TransactionId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for TransactionId {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl core::str::FromStr for TransactionId {
    type Err = core::num::ParseIntError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_serde_roundtrip() {
        let id = TransactionId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn transaction_id_display() {
        assert_eq!(TransactionId::new(99).to_string(), "99");
    }

    #[test]
    fn transaction_id_from_str() {
        let id: TransactionId = " 17 ".parse().unwrap();
        assert_eq!(id.into_inner(), 17);
        assert!("abc".parse::<TransactionId>().is_err());
    }

    #[test]
    fn id_from_inner() {
        let id: TransactionId = 42_i64.into();
        assert_eq!(*id.as_inner(), 42);
    }
}
