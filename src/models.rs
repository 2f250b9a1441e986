//! Data models for finanzas API entities.
//!
//! Wire types exchanged with the server plus the [`TransactionId`]
//! newtype and the [`TransactionKind`] enumeration.

mod enums;
mod ids;
mod import;
mod transaction;

pub use chrono::{NaiveDate, NaiveDateTime};
pub use enums::TransactionKind;
pub use ids::TransactionId;
pub use import::{ApiErrorBody, CsvUpload, ImportSuccess};
pub use transaction::{DeleteOutcome, NewTransaction, Transaction};
