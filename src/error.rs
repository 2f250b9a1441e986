//! Error types for the finanzas client library.

use crate::format::Locale;
use crate::models::TransactionId;

/// All errors that can occur when using the finanzas client.
#[derive(Debug, thiserror::Error)]
pub enum FinanzasError {
    /// HTTP transport failed (connection refused, reset, bad TLS, ...).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered a load, create or delete with a non-success
    /// status.
    #[error("server error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or the server's `error` field.
        message: String,
    },

    /// The server rejected a CSV import.
    #[error("import failed (HTTP {status}): {message}")]
    Import {
        /// HTTP status code.
        status: u16,
        /// The server's `error` field.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A transaction carried a field the aggregates cannot use: a
    /// timestamp that is not `YYYY-MM-DD HH:MM[:SS]`, or an amount that is
    /// negative or not finite.
    #[error("transaction {id}: malformed {field} {value:?}: {reason}")]
    DataFormat {
        /// Identifier of the offending transaction.
        id: TransactionId,
        /// Wire name of the offending field (`fecha`, `monto`).
        field: &'static str,
        /// The raw value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// Input was rejected locally before any request was made.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading a file from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local validation failures. None of these reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An import was requested without a file.
    #[error("no CSV file selected")]
    MissingFile,
    /// The concept field is blank.
    #[error("concept must not be empty")]
    EmptyConcept,
    /// The amount is not a finite non-negative number.
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
    /// The type is neither `ingreso` nor `egreso`.
    #[error("unknown transaction type {0:?}")]
    UnknownKind(String),
}

impl ValidationError {
    /// Returns the alert text for this failure.
    #[inline]
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match (&*self, locale) {
            (&Self::MissingFile, Locale::EsPy) => "Por favor selecciona un archivo CSV".to_owned(),
            (&Self::EmptyConcept, Locale::EsPy) => "El concepto no puede estar vacío".to_owned(),
            (&Self::InvalidAmount(ref raw), Locale::EsPy) => format!("Monto inválido: {raw}"),
            (&Self::UnknownKind(ref raw), Locale::EsPy) => {
                format!("Tipo desconocido: {raw} (use ingreso o egreso)")
            }
            (&Self::MissingFile, Locale::En) => "Please select a CSV file".to_owned(),
            (&(Self::EmptyConcept | Self::InvalidAmount(_) | Self::UnknownKind(_)), Locale::En) => {
                format!("Invalid input: {self}")
            }
        }
    }
}

/// Coarse classification of a [`FinanzasError`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally; nothing was sent.
    Validation,
    /// The server answered with an error.
    Server,
    /// The request never completed.
    Network,
    /// The server answered with data that could not be understood.
    DataFormat,
}

impl FinanzasError {
    /// Returns the presentation class of this error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Network(_) => ErrorKind::Network,
            Self::Api { .. } | Self::Import { .. } => ErrorKind::Server,
            Self::Serialization(_) | Self::DataFormat { .. } => ErrorKind::DataFormat,
            Self::Validation(_) | Self::Io(_) => ErrorKind::Validation,
        }
    }

    /// Returns the text shown to the user in an alert.
    ///
    /// Import failures repeat the server's message verbatim.
    #[inline]
    #[must_use]
    pub fn user_message(&self, locale: Locale) -> String {
        match *self {
            Self::Validation(ref err) => err.message(locale),
            Self::Import { ref message, .. } => format!("Error: {message}"),
            Self::Api { status, ref message } => match locale {
                Locale::EsPy => format!("El servidor respondió {status}: {message}"),
                Locale::En => format!("The server answered {status}: {message}"),
            },
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Network(_) => match locale {
                Locale::EsPy => "No se pudo conectar con el servidor".to_owned(),
                Locale::En => "Could not reach the server".to_owned(),
            },
            Self::Io(ref err) => format!("{err}"),
            Self::Serialization(_) | Self::DataFormat { .. } => match locale {
                Locale::EsPy => format!("Datos inválidos del servidor: {self}"),
                Locale::En => format!("Invalid data from the server: {self}"),
            },
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FinanzasError>;
