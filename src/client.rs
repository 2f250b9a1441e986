//! HTTP client for the finanzas API.
//!
//! Provides both async and blocking client variants behind feature flags.

use crate::models::ApiErrorBody;

/// Base URL of a locally running finanzas server.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5600";

/// Transactions collection path.
const TRANSACTIONS_PATH: &str = "/api/transacciones";

/// CSV import path.
const IMPORT_PATH: &str = "/api/importar-csv";

/// Multipart field carrying the CSV file.
const IMPORT_FIELD: &str = "file";

/// Extracts a human-readable message from an error response body.
///
/// Prefers the `error` field of a JSON body, then the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "unknown error".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}

/// Generates a finanzas client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing).
            base_url: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`FinanzasError::Network`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .map_or_else(
                        || DEFAULT_BASE_URL.to_owned(),
                        |url| url.trim_end_matches('/').to_owned(),
                    );
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL, without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder { base_url: None }
            }

            /// Returns the API base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Fetches every transaction via `GET /api/transacciones`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_transactions(&self) -> Result<Vec<Transaction>> {
                let url = format!("{}{TRANSACTIONS_PATH}", self.base_url);
                tracing::trace!(url = %url, "sending GET request");
                let response: $resp_type = self.http.get(&url).send() $( .$await_ext )? ?;
                let transactions: Vec<Transaction> =
                    Self::read_json(response) $( .$await_ext )? ?;
                tracing::debug!(count = transactions.len(), "fetched transactions");
                Ok(transactions)
            }

            /// Creates a transaction via `POST /api/transacciones`.
            ///
            /// Returns the stored transaction with its server-assigned `id`
            /// and `fecha`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_transaction(
                &self,
                transaction: &NewTransaction,
            ) -> Result<Transaction> {
                tracing::debug!(tipo = %transaction.tipo, "creating transaction");
                self.post_json(TRANSACTIONS_PATH, transaction) $( .$await_ext )?
            }

            /// Deletes a transaction via `DELETE /api/transacciones/{id}`.
            ///
            /// An unknown identifier (HTTP 404) is reported as
            /// [`DeleteOutcome::NotFound`], not as an error.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns any other non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_transaction(
                &self,
                id: TransactionId,
            ) -> Result<DeleteOutcome> {
                let url = format!("{}{TRANSACTIONS_PATH}/{id}", self.base_url);
                tracing::trace!(url = %url, "sending DELETE request");
                let response: $resp_type = self.http.delete(&url).send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(DeleteOutcome::Deleted)
                } else if status == StatusCode::NOT_FOUND {
                    tracing::warn!("transaction not found on server");
                    Ok(DeleteOutcome::NotFound)
                } else {
                    let body = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    Err(FinanzasError::Api {
                        status: status.as_u16(),
                        message: error_message(&body),
                    })
                }
            }

            /// Uploads a CSV file via `POST /api/importar-csv` as multipart
            /// field `file`.
            ///
            /// # Errors
            ///
            /// Returns [`FinanzasError::Import`] with the server's message if
            /// the server rejects the file, or another error if the request
            /// fails or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(file_name = %upload.file_name))]
            pub $($async_kw)? fn import_csv(&self, upload: &CsvUpload) -> Result<ImportSuccess> {
                let url = format!("{}{IMPORT_PATH}", self.base_url);
                tracing::trace!(url = %url, bytes = upload.bytes.len(), "sending multipart POST request");
                let part = Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str("text/csv")?;
                let form = Form::new().part(IMPORT_FIELD, part);
                let response: $resp_type = self
                    .http
                    .post(&url)
                    .multipart(form)
                    .send()
                    $( .$await_ext )?
                    ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                let body = response.text() $( .$await_ext )? ?;
                if status.is_success() {
                    serde_json::from_str(&body).map_err(FinanzasError::from)
                } else {
                    Err(FinanzasError::Import {
                        status: status.as_u16(),
                        message: error_message(&body),
                    })
                }
            }

            /// Sends a JSON POST request and deserializes the response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn post_json<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                path: &str,
                request: &Req,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending POST request");
                let response: $resp_type = self
                    .http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(request)
                    .send()
                    $( .$await_ext )?
                    ?;
                Self::read_json(response) $( .$await_ext )?
            }

            /// Checks the status and deserializes a JSON body.
            $($async_kw)? fn read_json<Resp: serde::de::DeserializeOwned>(
                response: $resp_type,
            ) -> Result<Resp> {
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(FinanzasError::from)
                } else {
                    let body = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    let message = error_message(&body);
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(FinanzasError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_uses_default_base_url() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url(), DEFAULT_BASE_URL);
            }

            #[test]
            fn builder_custom_base_url() {
                let client = $client::builder()
                    .base_url("http://localhost:8080")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080");
            }

            #[test]
            fn builder_strips_trailing_slash() {
                let client = $client::builder()
                    .base_url("http://localhost:8080/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080");
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the finanzas API.

    use reqwest::StatusCode;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::multipart::{Form, Part};

    use super::{DEFAULT_BASE_URL, IMPORT_FIELD, IMPORT_PATH, TRANSACTIONS_PATH, error_message};
    use crate::error::{FinanzasError, Result};
    use crate::models::{
        CsvUpload, DeleteOutcome, ImportSuccess, NewTransaction, Transaction, TransactionId,
    };

    define_client! {
        client_name: FinanzasClient,
        builder_name: FinanzasClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the finanzas API.\n\nUse [`FinanzasClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`FinanzasClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the finanzas API.

    use reqwest::StatusCode;
    use reqwest::blocking::multipart::{Form, Part};
    use reqwest::header::CONTENT_TYPE;

    use super::{DEFAULT_BASE_URL, IMPORT_FIELD, IMPORT_PATH, TRANSACTIONS_PATH, error_message};
    use crate::error::{FinanzasError, Result};
    use crate::models::{
        CsvUpload, DeleteOutcome, ImportSuccess, NewTransaction, Transaction, TransactionId,
    };

    define_client! {
        client_name: FinanzasBlockingClient,
        builder_name: FinanzasBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the finanzas API.\n\nUse [`FinanzasBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`FinanzasBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{FinanzasClient, FinanzasClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{FinanzasBlockingClient, FinanzasBlockingClientBuilder};

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(error_message(r#"{"error": "No encontrada"}"#), "No encontrada");
    }

    #[test]
    fn error_message_falls_back_to_text() {
        assert_eq!(error_message("  Internal Server Error \n"), "Internal Server Error");
        assert_eq!(error_message(""), "unknown error");
    }
}
