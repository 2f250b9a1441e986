//! Pure rendering of aggregates into a display-ready [`ViewModel`].
//!
//! No I/O happens here. A front-end applies the view model to whatever it
//! draws on (a terminal, an HTML page, a JSON consumer).

use serde::{Deserialize, Serialize};

use crate::aggregate::Summary;
use crate::chart::BarChart;
use crate::error::Result;
use crate::format::Locale;
use crate::models::{TransactionId, TransactionKind};

/// Colour class of an amount or badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Income (green).
    Success,
    /// Expense (red).
    Danger,
}

impl From<TransactionKind> for Tone {
    #[inline]
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Ingreso => Self::Success,
            TransactionKind::Egreso => Self::Danger,
        }
    }
}

/// One transaction line of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// Identifier bound to the row's delete action.
    pub id: TransactionId,
    /// `HH:MM`.
    pub time: String,
    /// Concept text.
    pub concepto: String,
    /// Signed, formatted amount (`+$1.000`, `-$50`).
    pub amount: String,
    /// Colour of the amount and badge.
    pub tone: Tone,
    /// Badge text (`ingreso` / `egreso`).
    pub badge: String,
}

/// A row of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum TableRow {
    /// Header opening a day group.
    DateHeader {
        /// `YYYY-MM-DD`.
        date: String,
    },
    /// A transaction of the current day group.
    Entry(EntryRow),
}

/// Formatted grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsView {
    /// Income total.
    pub ingresos: String,
    /// Expense total.
    pub egresos: String,
    /// Balance (may start with `-`).
    pub balance: String,
    /// Whether the balance is below zero.
    pub balance_negative: bool,
}

/// One line of the monthly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    /// `"<MonthName> <Year>"`.
    pub label: String,
    /// Formatted income of the month.
    pub ingresos: String,
    /// Formatted expense of the month.
    pub egresos: String,
}

/// Everything a front-end needs to draw one full view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    /// Locale used for every string below.
    pub locale: Locale,
    /// Grand totals.
    pub totals: TotalsView,
    /// Transaction table, grouped by day, newest day first.
    pub rows: Vec<TableRow>,
    /// Monthly summary list.
    pub monthly: Vec<MonthlyEntry>,
    /// Income vs. expense chart.
    pub chart: BarChart,
}

impl ViewModel {
    /// Returns `true` when there are no transactions to list.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the transaction rows only, skipping day headers.
    #[inline]
    pub fn entries(&self) -> impl Iterator<Item = &EntryRow> {
        self.rows.iter().filter_map(|row| match *row {
            TableRow::Entry(ref entry) => Some(entry),
            TableRow::DateHeader { .. } => None,
        })
    }
}

/// Renders a summary.
///
/// # Errors
///
/// Returns [`crate::error::FinanzasError::DataFormat`] if a transaction's
/// time of day cannot be extracted. Summaries built by
/// [`crate::aggregate::summarize`] have already been validated.
#[inline]
pub fn render(summary: &Summary, locale: Locale) -> Result<ViewModel> {
    let balance = summary.totals.balance();
    let totals = TotalsView {
        ingresos: locale.format_currency(summary.totals.ingresos),
        egresos: locale.format_currency(summary.totals.egresos),
        balance: locale.format_currency(balance),
        balance_negative: balance < 0.0_f64,
    };

    let mut rows = Vec::new();
    for group in &summary.daily {
        rows.push(TableRow::DateHeader { date: group.key() });
        for tx in &group.transactions {
            rows.push(TableRow::Entry(EntryRow {
                id: tx.id,
                time: tx.time_of_day()?,
                concepto: tx.concepto.clone(),
                amount: locale.format_signed(tx.monto, tx.tipo),
                tone: Tone::from(tx.tipo),
                badge: tx.tipo.as_str().to_owned(),
            }));
        }
    }

    let monthly = summary
        .monthly
        .iter()
        .map(|bucket| MonthlyEntry {
            label: bucket.month.label(locale),
            ingresos: locale.format_currency(bucket.totals.ingresos),
            egresos: locale.format_currency(bucket.totals.egresos),
        })
        .collect();

    Ok(ViewModel {
        locale,
        totals,
        rows,
        monthly,
        chart: BarChart::from_totals(&summary.totals, locale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::models::Transaction;

    fn tx(id: i64, fecha: &str, concepto: &str, monto: f64, tipo: TransactionKind) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            fecha: fecha.to_owned(),
            concepto: concepto.to_owned(),
            monto,
            tipo,
        }
    }

    #[test]
    fn renders_salary_and_lunch() {
        let summary = summarize(&[
            tx(1, "2024-01-05 10:00", "Salary", 1000.0, TransactionKind::Ingreso),
            tx(2, "2024-01-05 12:00", "Lunch", 50.0, TransactionKind::Egreso),
        ])
        .unwrap();
        let view = render(&summary, Locale::EsPy).unwrap();

        assert_eq!(
            view.totals,
            TotalsView {
                ingresos: "$1.000".to_owned(),
                egresos: "$50".to_owned(),
                balance: "$950".to_owned(),
                balance_negative: false,
            }
        );

        assert_eq!(
            view.rows,
            vec![
                TableRow::DateHeader {
                    date: "2024-01-05".to_owned()
                },
                TableRow::Entry(EntryRow {
                    id: TransactionId::new(1),
                    time: "10:00".to_owned(),
                    concepto: "Salary".to_owned(),
                    amount: "+$1.000".to_owned(),
                    tone: Tone::Success,
                    badge: "ingreso".to_owned(),
                }),
                TableRow::Entry(EntryRow {
                    id: TransactionId::new(2),
                    time: "12:00".to_owned(),
                    concepto: "Lunch".to_owned(),
                    amount: "-$50".to_owned(),
                    tone: Tone::Danger,
                    badge: "egreso".to_owned(),
                }),
            ]
        );

        assert_eq!(
            view.monthly,
            vec![MonthlyEntry {
                label: "Enero 2024".to_owned(),
                ingresos: "$1.000".to_owned(),
                egresos: "$50".to_owned(),
            }]
        );
        assert_eq!(view.entries().count(), 2);
    }

    #[test]
    fn empty_summary_renders_valid_empty_view() {
        let view = render(&Summary::default(), Locale::En).unwrap();
        assert!(view.is_empty());
        assert!(view.monthly.is_empty());
        assert_eq!(view.totals.ingresos, "$0");
        assert_eq!(view.totals.egresos, "$0");
        assert_eq!(view.totals.balance, "$0");
        assert!(!view.totals.balance_negative);
        assert_eq!(view.chart.bars.len(), 2);
        assert!(view.chart.bars.iter().all(|bar| bar.value.abs() < f64::EPSILON));
    }

    #[test]
    fn negative_balance_is_flagged() {
        let summary = summarize(&[
            tx(1, "2024-06-01 08:00", "Sueldo", 100.0, TransactionKind::Ingreso),
            tx(2, "2024-06-01 09:00", "Alquiler", 2500.0, TransactionKind::Egreso),
        ])
        .unwrap();
        let view = render(&summary, Locale::EsPy).unwrap();
        assert_eq!(view.totals.balance, "-$2.400");
        assert!(view.totals.balance_negative);
    }

    #[test]
    fn each_day_gets_one_header_in_descending_order() {
        let summary = summarize(&[
            tx(1, "2024-01-01 08:00", "a", 1.0, TransactionKind::Ingreso),
            tx(2, "2024-01-03 08:00", "b", 1.0, TransactionKind::Ingreso),
            tx(3, "2024-01-01 09:00", "c", 1.0, TransactionKind::Egreso),
        ])
        .unwrap();
        let view = render(&summary, Locale::En).unwrap();
        let headers: Vec<&str> = view
            .rows
            .iter()
            .filter_map(|row| match *row {
                TableRow::DateHeader { ref date } => Some(date.as_str()),
                TableRow::Entry(_) => None,
            })
            .collect();
        assert_eq!(headers, ["2024-01-03", "2024-01-01"]);
        let ids: Vec<i64> = view.entries().map(|e| e.id.into_inner()).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn view_model_serializes_rows_with_tag() {
        let summary = summarize(&[tx(
            9,
            "2024-01-05 10:00",
            "Salary",
            1000.0,
            TransactionKind::Ingreso,
        )])
        .unwrap();
        let view = render(&summary, Locale::EsPy).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["rows"][0]["row"], "date_header");
        assert_eq!(json["rows"][1]["row"], "entry");
        assert_eq!(json["rows"][1]["id"], 9);
        assert_eq!(json["rows"][1]["tone"], "success");
        assert_eq!(json["locale"], "es-py");
    }
}
