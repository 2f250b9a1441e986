//! Locale-aware number, currency and month formatting.
//!
//! The tracker records amounts in guaraníes, so the default locale
//! follows the Paraguayan Spanish convention: `.` groups thousands and
//! `,` separates decimals (`1.234,5`).

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Serialize};

use crate::models::TransactionKind;

/// Currency prefix shown before every amount.
const CURRENCY_PREFIX: &str = "$";

/// Maximum number of fraction digits shown.
const MAX_FRACTION_DIGITS: u8 = 3;

/// `10^MAX_FRACTION_DIGITS`, used to round before formatting.
const FRACTION_SCALE: f64 = 1000.0;

/// Spanish month names, January first.
const MESES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// English month names, January first.
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Display locale for labels, month names and number grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Paraguayan Spanish (`es-PY`).
    #[default]
    EsPy,
    /// English.
    En,
}

impl Locale {
    /// Returns the twelve month names, January at index 0.
    #[inline]
    #[must_use]
    pub const fn month_names(self) -> &'static [&'static str; 12] {
        match self {
            Self::EsPy => &MESES,
            Self::En => &MONTHS,
        }
    }

    /// Returns the name of a zero-based month (January = 0).
    #[inline]
    #[must_use]
    pub fn month_name(self, month0: u32) -> Option<&'static str> {
        usize::try_from(month0)
            .ok()
            .and_then(|idx| self.month_names().get(idx).copied())
    }

    /// Label of the income bar and totals.
    #[inline]
    #[must_use]
    pub const fn income_label(self) -> &'static str {
        match self {
            Self::EsPy => "Ingresos",
            Self::En => "Income",
        }
    }

    /// Label of the expense bar and totals.
    #[inline]
    #[must_use]
    pub const fn expense_label(self) -> &'static str {
        match self {
            Self::EsPy => "Egresos",
            Self::En => "Expense",
        }
    }

    /// Label of the balance total.
    #[inline]
    #[must_use]
    pub const fn balance_label(self) -> &'static str {
        match self {
            Self::EsPy | Self::En => "Balance",
        }
    }

    /// Label of the chart's single dataset.
    #[inline]
    #[must_use]
    pub const fn chart_dataset_label(self) -> &'static str {
        match self {
            Self::EsPy => "Total en GS",
            Self::En => "Total in GS",
        }
    }

    /// Prompt shown before a deletion.
    #[inline]
    #[must_use]
    pub const fn delete_prompt(self) -> &'static str {
        match self {
            Self::EsPy => "¿Estás seguro de eliminar este registro?",
            Self::En => "Are you sure you want to delete this record?",
        }
    }

    /// Column headings of the transaction table.
    #[inline]
    #[must_use]
    pub const fn table_headers(self) -> [&'static str; 5] {
        match self {
            Self::EsPy => ["Hora", "Concepto", "Monto", "Tipo", "Id"],
            Self::En => ["Time", "Concept", "Amount", "Type", "Id"],
        }
    }

    /// Heading of the monthly summary.
    #[inline]
    #[must_use]
    pub const fn monthly_title(self) -> &'static str {
        match self {
            Self::EsPy => "Resumen mensual",
            Self::En => "Monthly summary",
        }
    }

    /// Shown instead of the table when there is nothing to list.
    #[inline]
    #[must_use]
    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::EsPy => "No hay transacciones.",
            Self::En => "No transactions.",
        }
    }

    /// Shown when a deletion is declined.
    #[inline]
    #[must_use]
    pub const fn cancelled_message(self) -> &'static str {
        match self {
            Self::EsPy => "Cancelado.",
            Self::En => "Cancelled.",
        }
    }

    /// Progress text while transactions load.
    #[inline]
    #[must_use]
    pub const fn loading_message(self) -> &'static str {
        match self {
            Self::EsPy => "Cargando transacciones...",
            Self::En => "Loading transactions...",
        }
    }

    /// Progress text while a transaction is saved.
    #[inline]
    #[must_use]
    pub const fn saving_message(self) -> &'static str {
        match self {
            Self::EsPy => "Guardando...",
            Self::En => "Saving...",
        }
    }

    /// Progress text while a CSV file uploads.
    #[inline]
    #[must_use]
    pub const fn importing_message(self) -> &'static str {
        match self {
            Self::EsPy => "Importando...",
            Self::En => "Importing...",
        }
    }

    /// Decimal mark written by this locale's formatter.
    const fn decimal_mark(self) -> char {
        match self {
            Self::EsPy => ',',
            Self::En => '.',
        }
    }

    /// Shared grouping formatter of this locale. A `.` thousands separator
    /// makes `numfmt` switch the decimal mark to `,`.
    fn formatter(self) -> Option<&'static Formatter> {
        static ES_PY: OnceLock<Option<Formatter>> = OnceLock::new();
        static EN: OnceLock<Option<Formatter>> = OnceLock::new();

        let (cell, thousands) = match self {
            Self::EsPy => (&ES_PY, '.'),
            Self::En => (&EN, ','),
        };
        cell.get_or_init(|| {
            Formatter::new()
                .separator(thousands)
                .ok()
                .map(|fmt| fmt.precision(Precision::Decimals(MAX_FRACTION_DIGITS)))
        })
        .as_ref()
    }

    /// Formats a number with grouping and up to three fraction digits,
    /// dropping trailing zeros (`1234.5` → `1.234,5` in `es-PY`).
    #[inline]
    #[must_use]
    pub fn format_number(self, value: f64) -> String {
        // numfmt truncates extra digits, so round first.
        let rounded = (value * FRACTION_SCALE).round() / FRACTION_SCALE;
        if rounded.abs() < f64::EPSILON {
            return "0".to_owned();
        }
        let magnitude = rounded.abs();
        let formatted = self
            .formatter()
            .map_or_else(|| magnitude.to_string(), |fmt| fmt.fmt_string(magnitude));

        // numfmt always writes a fraction ("1,000.0").
        let decimal = self.decimal_mark();
        let trimmed = match formatted.split_once(decimal) {
            Some((int_part, frac_part)) => {
                let frac_part = frac_part.trim_end_matches('0');
                if frac_part.is_empty() {
                    int_part.to_owned()
                } else {
                    format!("{int_part}{decimal}{frac_part}")
                }
            }
            None => formatted,
        };

        if rounded < 0.0_f64 {
            format!("-{trimmed}")
        } else {
            trimmed
        }
    }

    /// Formats an amount with the currency prefix; negatives put the sign
    /// before the prefix (`-$950`).
    #[inline]
    #[must_use]
    pub fn format_currency(self, value: f64) -> String {
        let number = self.format_number(value);
        match number.strip_prefix('-') {
            Some(abs) => format!("-{CURRENCY_PREFIX}{abs}"),
            None => format!("{CURRENCY_PREFIX}{number}"),
        }
    }

    /// Formats a transaction amount with a `+` for income and `-` for
    /// expense.
    #[inline]
    #[must_use]
    pub fn format_signed(self, amount: f64, kind: TransactionKind) -> String {
        let sign = if kind.is_income() { '+' } else { '-' };
        format!("{sign}{CURRENCY_PREFIX}{}", self.format_number(amount.abs()))
    }
}

impl core::fmt::Display for Locale {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match *self {
            Self::EsPy => "es-PY",
            Self::En => "en",
        })
    }
}

impl core::str::FromStr for Locale {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "es-py" | "es" => Ok(Self::EsPy),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(format!("unsupported locale {other:?} (use es-py or en)")),
        }
    }
}
