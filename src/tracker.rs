//! High-level tracker view: load, render and mutate.
//!
//! Combines the low-level HTTP client with the aggregator, the renderer
//! and a [`crate::chart::ChartSlot`]. Every successful mutation is followed by a full
//! reload; nothing but the live chart is kept between loads.

use crate::view::ViewModel;

/// Default render target of the chart.
pub const DEFAULT_CHART_TARGET: &str = "graficoBalance";

/// Interactive yes/no gate asked before destructive operations.
///
/// Any `Fn(&str) -> bool` closure works, which keeps tests free of real
/// prompts.
pub trait Confirm {
    /// Shows `prompt` and returns `true` if the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    #[inline]
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a successful CSV import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Server-supplied summary message.
    pub message: String,
    /// The view after the post-import reload.
    pub view: ViewModel,
}

/// Generates a tracker (async or blocking) with builder, operations, and tests.
macro_rules! define_tracker {
    (
        tracker_name: $tracker:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        tracker_doc: $tracker_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: ChartSurface> {
            /// Base URL override.
            base_url: Option<String>,
            /// Display locale.
            locale: Locale,
            /// Chart drawing backend.
            surface: S,
            /// Chart render target.
            chart_target: String,
        }

        impl<S: ChartSurface> $builder<S> {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the display locale.
            #[inline]
            #[must_use]
            pub fn locale(mut self, locale: Locale) -> Self {
                self.locale = locale;
                self
            }

            /// Sets the chart render target.
            #[inline]
            #[must_use]
            pub fn chart_target<T: Into<String>>(mut self, target: T) -> Self {
                self.chart_target = target.into();
                self
            }

            /// Builds the tracker.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::FinanzasError::Network`] if the HTTP
            /// client fails to build.
            #[inline]
            pub fn build(self) -> Result<$tracker<S>> {
                let mut http_builder = <$http_client>::builder();
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                let client = http_builder.build()?;

                Ok($tracker {
                    client,
                    locale: self.locale,
                    chart: ChartSlot::new(self.surface, self.chart_target),
                })
            }
        }

        #[doc = $tracker_doc]
        #[derive(Debug)]
        pub struct $tracker<S: ChartSurface> {
            /// Low-level HTTP client.
            client: $http_client,
            /// Display locale.
            locale: Locale,
            /// The single live chart.
            chart: ChartSlot<S>,
        }

        impl<S: ChartSurface> $tracker<S> {
            /// Creates a new builder drawing charts on `surface`.
            #[inline]
            #[must_use]
            pub fn builder(surface: S) -> $builder<S> {
                $builder {
                    base_url: None,
                    locale: Locale::default(),
                    surface,
                    chart_target: DEFAULT_CHART_TARGET.to_owned(),
                }
            }

            /// Returns the display locale.
            #[inline]
            #[must_use]
            pub const fn locale(&self) -> Locale {
                self.locale
            }

            /// Returns the chart slot.
            #[inline]
            #[must_use]
            pub const fn chart(&self) -> &ChartSlot<S> {
                &self.chart
            }

            /// Returns the low-level HTTP client.
            #[inline]
            #[must_use]
            pub const fn client(&self) -> &$http_client {
                &self.client
            }

            /// Fetches every transaction, recomputes all aggregates, redraws
            /// the chart and returns the new view.
            ///
            /// On failure nothing is redrawn.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails, the body cannot be
            /// parsed, a transaction has a malformed `fecha`, or the chart
            /// surface fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn load(&mut self) -> Result<ViewModel> {
                let transactions = self.client.list_transactions() $( .$await_ext )? ?;
                let summary = summarize(&transactions)?;
                let view = render(&summary, self.locale)?;
                self.chart.draw(&view.chart)?;
                tracing::debug!(
                    transactions = transactions.len(),
                    days = summary.daily.len(),
                    months = summary.monthly.len(),
                    "view reloaded"
                );
                Ok(view)
            }

            /// Submits a new transaction and reloads.
            ///
            /// # Errors
            ///
            /// Returns an error if the create request or the reload fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create(&mut self, transaction: &NewTransaction) -> Result<ViewModel> {
                let created = self.client.create_transaction(transaction) $( .$await_ext )? ?;
                tracing::info!(id = %created.id, "transaction created");
                self.load() $( .$await_ext )?
            }

            /// Deletes a transaction after asking `confirm`, then reloads.
            ///
            /// Returns `Ok(None)` without touching the network if the user
            /// declines. An identifier the server does not know still
            /// triggers the reload.
            ///
            /// # Errors
            ///
            /// Returns an error if the delete request or the reload fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete<C: Confirm + ?Sized>(
                &mut self,
                id: TransactionId,
                confirm: &C,
            ) -> Result<Option<ViewModel>> {
                if !confirm.confirm(self.locale.delete_prompt()) {
                    tracing::debug!("deletion declined");
                    return Ok(None);
                }
                match self.client.delete_transaction(id) $( .$await_ext )? ? {
                    DeleteOutcome::Deleted => tracing::info!("transaction deleted"),
                    DeleteOutcome::NotFound => tracing::info!("transaction was already gone"),
                }
                self.load() $( .$await_ext )? .map(Some)
            }

            /// Uploads a CSV file and reloads on success.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::MissingFile`] without any request
            /// if `upload` is `None`, [`crate::error::FinanzasError::Import`] with the
            /// server's message if the server rejects the file (no reload
            /// happens), or an error if the request or the reload fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn import_csv(&mut self, upload: Option<&CsvUpload>) -> Result<ImportReport> {
                let upload = upload.ok_or(ValidationError::MissingFile)?;
                let accepted = self.client.import_csv(upload) $( .$await_ext )? ?;
                tracing::info!(message = %accepted.mensaje, "import accepted");
                let view = self.load() $( .$await_ext )? ?;
                Ok(ImportReport {
                    message: accepted.mensaje,
                    view,
                })
            }
        }

    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_tracker {
    //! Async tracker.

    use crate::aggregate::summarize;
    use crate::chart::{ChartSlot, ChartSurface};
    use crate::client::FinanzasClient;
    use crate::error::{Result, ValidationError};
    use crate::format::Locale;
    use crate::models::{CsvUpload, DeleteOutcome, NewTransaction, TransactionId};
    use crate::view::{ViewModel, render};

    use super::{Confirm, DEFAULT_CHART_TARGET, ImportReport};

    define_tracker! {
        tracker_name: Tracker,
        builder_name: TrackerBuilder,
        http_client: FinanzasClient,
        tracker_doc: "Async tracker view over the finanzas API.\n\nUse [`Tracker::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Tracker`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_tracker {
    //! Blocking tracker.

    use crate::aggregate::summarize;
    use crate::chart::{ChartSlot, ChartSurface};
    use crate::client::FinanzasBlockingClient;
    use crate::error::{Result, ValidationError};
    use crate::format::Locale;
    use crate::models::{CsvUpload, DeleteOutcome, NewTransaction, TransactionId};
    use crate::view::{ViewModel, render};

    use super::{Confirm, DEFAULT_CHART_TARGET, ImportReport};

    define_tracker! {
        tracker_name: TrackerBlocking,
        builder_name: TrackerBlockingBuilder,
        http_client: FinanzasBlockingClient,
        tracker_doc: "Blocking tracker view over the finanzas API.\n\nUse [`TrackerBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`TrackerBlocking`].",
    }
}

#[cfg(feature = "async")]
pub use async_tracker::{Tracker, TrackerBuilder};
#[cfg(feature = "blocking")]
pub use blocking_tracker::{TrackerBlocking, TrackerBlockingBuilder};
