//! Transaction aggregation: daily groups, monthly buckets and grand totals.
//!
//! Everything here is a pure function of the transaction list. Nothing is
//! cached between loads; every reload recomputes from scratch.

use std::collections::HashMap;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::Locale;
use crate::models::{Transaction, TransactionKind};

/// Income and expense accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of income amounts.
    pub ingresos: f64,
    /// Sum of expense amounts.
    pub egresos: f64,
}

impl Totals {
    /// Adds one amount to the accumulator matching `kind`.
    #[inline]
    pub fn add(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Ingreso => self.ingresos += amount,
            TransactionKind::Egreso => self.egresos += amount,
        }
    }

    /// Income minus expense. May be negative.
    #[inline]
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.ingresos - self.egresos
    }
}

/// All transactions sharing one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGroup {
    /// The shared day.
    pub date: NaiveDate,
    /// Transactions of that day in server order.
    pub transactions: Vec<Transaction>,
}

impl DailyGroup {
    /// Group key: the `YYYY-MM-DD` date portion of `fecha`.
    #[inline]
    #[must_use]
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Zero-based month (January = 0).
    pub month0: u32,
}

impl MonthKey {
    /// Returns the month containing `date`.
    #[inline]
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Returns `"<MonthName> <Year>"` in the given locale.
    #[inline]
    #[must_use]
    pub fn label(&self, locale: Locale) -> String {
        let name = locale.month_name(self.month0).unwrap_or("?");
        format!("{name} {}", self.year)
    }
}

/// Income and expense sums of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// The month.
    pub month: MonthKey,
    /// Sums of the month.
    pub totals: Totals,
}

/// Everything the renderer needs, derived from one transaction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Grand totals.
    pub totals: Totals,
    /// Day groups, most recent day first.
    pub daily: Vec<DailyGroup>,
    /// Month buckets in order of first appearance.
    pub monthly: Vec<MonthlyBucket>,
}

/// Aggregates a flat transaction list.
///
/// Day groups are sorted by descending date; transactions within a day
/// keep their input order. Month buckets keep the order in which their
/// month first appears in the input.
///
/// # Errors
///
/// Returns [`crate::error::FinanzasError::DataFormat`] for the first
/// transaction whose `fecha` cannot be parsed or whose `monto` is negative
/// or not finite. No partial summary is produced.
#[inline]
#[tracing::instrument(skip_all, fields(count = transactions.len()))]
pub fn summarize(transactions: &[Transaction]) -> Result<Summary> {
    let mut totals = Totals::default();
    let mut daily: Vec<DailyGroup> = Vec::new();
    let mut day_index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut monthly: Vec<MonthlyBucket> = Vec::new();
    let mut month_index: HashMap<MonthKey, usize> = HashMap::new();

    for tx in transactions {
        let date = tx.date()?;
        let amount = tx.amount()?;
        totals.add(tx.tipo, amount);

        let day_slot = *day_index.entry(date).or_insert_with(|| {
            daily.push(DailyGroup {
                date,
                transactions: Vec::new(),
            });
            daily.len().saturating_sub(1)
        });
        if let Some(group) = daily.get_mut(day_slot) {
            group.transactions.push(tx.clone());
        }

        let month = MonthKey::of(date);
        let month_slot = *month_index.entry(month).or_insert_with(|| {
            monthly.push(MonthlyBucket {
                month,
                totals: Totals::default(),
            });
            monthly.len().saturating_sub(1)
        });
        if let Some(bucket) = monthly.get_mut(month_slot) {
            bucket.totals.add(tx.tipo, amount);
        }
    }

    daily.sort_by(|a, b| b.date.cmp(&a.date));
    tracing::debug!(
        days = daily.len(),
        months = monthly.len(),
        "aggregated transactions"
    );

    Ok(Summary {
        totals,
        daily,
        monthly,
    })
}
