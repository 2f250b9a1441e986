//! Income vs. expense bar chart and its drawing lifecycle.
//!
//! [`BarChart`] is plain data. Drawing it is delegated to a
//! [`ChartSurface`], and [`ChartSlot`] owns the single live chart of one
//! render target: the previous chart is always destroyed before a new one
//! is created, so redraws never stack charts on top of each other.

use serde::{Deserialize, Serialize};

use crate::aggregate::Totals;
use crate::error::Result;
use crate::format::Locale;

/// Fill colour of the income bar.
const INCOME_FILL: &str = "rgba(40, 167, 69, 0.7)";
/// Border colour of the income bar.
const INCOME_BORDER: &str = "#28a745";
/// Fill colour of the expense bar.
const EXPENSE_FILL: &str = "rgba(220, 53, 69, 0.7)";
/// Border colour of the expense bar.
const EXPENSE_BORDER: &str = "#dc3545";

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Category label.
    pub label: String,
    /// Bar height.
    pub value: f64,
    /// Fill colour (CSS).
    pub fill: String,
    /// Border colour (CSS).
    pub border: String,
}

/// Two-bar categorical chart: income and expense grand totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Dataset label, e.g. `Total en GS`.
    pub dataset_label: String,
    /// Always `[income, expense]`.
    pub bars: [Bar; 2],
    /// The value axis starts at zero.
    pub begin_at_zero: bool,
}

impl BarChart {
    /// Builds the chart from grand totals.
    #[inline]
    #[must_use]
    pub fn from_totals(totals: &Totals, locale: Locale) -> Self {
        Self {
            dataset_label: locale.chart_dataset_label().to_owned(),
            bars: [
                Bar {
                    label: locale.income_label().to_owned(),
                    value: totals.ingresos,
                    fill: INCOME_FILL.to_owned(),
                    border: INCOME_BORDER.to_owned(),
                },
                Bar {
                    label: locale.expense_label().to_owned(),
                    value: totals.egresos,
                    fill: EXPENSE_FILL.to_owned(),
                    border: EXPENSE_BORDER.to_owned(),
                },
            ],
            begin_at_zero: true,
        }
    }

    /// Largest bar value, or zero.
    #[inline]
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.value)
            .fold(0.0_f64, f64::max)
    }
}

/// Something that can draw a [`BarChart`] into a named target and later
/// destroy what it drew.
pub trait ChartSurface: core::fmt::Debug {
    /// Handle to one live chart.
    type Handle: core::fmt::Debug;

    /// Draws `chart` into `target` and returns the live chart's handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot draw.
    fn create(&mut self, target: &str, chart: &BarChart) -> Result<Self::Handle>;

    /// Destroys a chart previously returned by [`ChartSurface::create`].
    fn destroy(&mut self, handle: Self::Handle);
}

/// Owner of the one live chart of a render target.
///
/// The slot is the only place a chart handle lives. [`ChartSlot::draw`]
/// destroys the current chart before creating the next one, and dropping
/// the slot destroys whatever is still live.
#[derive(Debug)]
pub struct ChartSlot<S: ChartSurface> {
    /// Drawing backend.
    surface: S,
    /// Render target identifier.
    target: String,
    /// The live chart, if any.
    current: Option<S::Handle>,
}

impl<S: ChartSurface> ChartSlot<S> {
    /// Creates an empty slot for `target`.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(surface: S, target: T) -> Self {
        Self {
            surface,
            target: target.into(),
            current: None,
        }
    }

    /// Replaces the live chart with `chart`.
    ///
    /// The old chart is destroyed first even if creating the new one
    /// fails; in that case the slot is left empty.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if drawing fails.
    #[inline]
    pub fn draw(&mut self, chart: &BarChart) -> Result<()> {
        self.clear();
        let handle = self.surface.create(&self.target, chart)?;
        tracing::trace!(target_id = %self.target, "chart created");
        self.current = Some(handle);
        Ok(())
    }

    /// Destroys the live chart, if any.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(handle) = self.current.take() {
            tracing::trace!(target_id = %self.target, "chart destroyed");
            self.surface.destroy(handle);
        }
    }

    /// Returns `true` while a chart is live.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the render target identifier.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the drawing backend.
    #[inline]
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: ChartSurface> Drop for ChartSlot<S> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

/// Surface that keeps nothing on screen; handles are sequence numbers.
///
/// Useful for headless consumers that only want the [`crate::view::ViewModel`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NullSurface {
    /// Number of charts created so far.
    created: u64,
    /// Number of charts destroyed so far.
    destroyed: u64,
}

impl NullSurface {
    /// Number of charts currently live.
    #[inline]
    #[must_use]
    pub const fn live(&self) -> u64 {
        self.created.saturating_sub(self.destroyed)
    }
}

impl ChartSurface for NullSurface {
    type Handle = u64;

    #[inline]
    fn create(&mut self, _target: &str, _chart: &BarChart) -> Result<Self::Handle> {
        self.created = self.created.saturating_add(1);
        Ok(self.created)
    }

    #[inline]
    fn destroy(&mut self, _handle: Self::Handle) {
        self.destroyed = self.destroyed.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::{FinanzasError, ValidationError};

    /// Surface that tracks live charts per target.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        /// Live handles by target.
        live: HashMap<String, Vec<u32>>,
        /// Next handle.
        next: u32,
        /// Fail the next `create` call.
        fail_next: bool,
    }

    impl ChartSurface for RecordingSurface {
        type Handle = (String, u32);

        fn create(&mut self, target: &str, _chart: &BarChart) -> Result<Self::Handle> {
            if self.fail_next {
                self.fail_next = false;
                return Err(FinanzasError::Validation(ValidationError::MissingFile));
            }
            self.next += 1;
            self.live
                .entry(target.to_owned())
                .or_default()
                .push(self.next);
            Ok((target.to_owned(), self.next))
        }

        fn destroy(&mut self, handle: Self::Handle) {
            let (target, id) = handle;
            if let Some(ids) = self.live.get_mut(&target) {
                ids.retain(|live| *live != id);
            }
        }
    }

    impl RecordingSurface {
        fn live_on(&self, target: &str) -> usize {
            self.live.get(target).map_or(0, Vec::len)
        }
    }

    fn totals(ingresos: f64, egresos: f64) -> Totals {
        Totals { ingresos, egresos }
    }

    #[test]
    fn chart_from_totals_has_two_bars() {
        let chart = BarChart::from_totals(&totals(1000.0, 50.0), Locale::EsPy);
        assert_eq!(chart.dataset_label, "Total en GS");
        let [income, expense] = &chart.bars;
        assert_eq!(income.label, "Ingresos");
        assert_eq!(expense.label, "Egresos");
        assert!((income.value - 1000.0).abs() < f64::EPSILON);
        assert!((expense.value - 50.0).abs() < f64::EPSILON);
        assert_eq!(income.border, "#28a745");
        assert_eq!(expense.border, "#dc3545");
        assert!(chart.begin_at_zero);
        assert!((chart.max_value() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_totals_still_give_two_zero_bars() {
        let chart = BarChart::from_totals(&Totals::default(), Locale::En);
        assert_eq!(chart.bars.len(), 2);
        assert!(chart.bars.iter().all(|bar| bar.value.abs() < f64::EPSILON));
        assert!(chart.max_value().abs() < f64::EPSILON);
    }

    #[test]
    fn redraw_never_leaves_two_charts() {
        let mut slot = ChartSlot::new(RecordingSurface::default(), "graficoBalance");
        let chart = BarChart::from_totals(&totals(1.0, 2.0), Locale::EsPy);

        slot.draw(&chart).unwrap();
        slot.draw(&chart).unwrap();
        assert_eq!(slot.surface().live_on("graficoBalance"), 1);
        assert!(slot.is_live());

        slot.draw(&chart).unwrap();
        assert_eq!(slot.surface().live_on("graficoBalance"), 1);
    }

    #[test]
    fn failed_draw_leaves_slot_empty() {
        let mut slot = ChartSlot::new(RecordingSurface::default(), "graficoBalance");
        let chart = BarChart::from_totals(&totals(1.0, 2.0), Locale::EsPy);
        slot.draw(&chart).unwrap();

        slot.surface.fail_next = true;
        assert!(slot.draw(&chart).is_err());
        assert!(!slot.is_live());
        assert_eq!(slot.surface().live_on("graficoBalance"), 0);
    }

    #[test]
    fn clear_releases_chart() {
        let mut slot = ChartSlot::new(NullSurface::default(), "c");
        let chart = BarChart::from_totals(&Totals::default(), Locale::En);
        slot.draw(&chart).unwrap();
        assert_eq!(slot.surface().live(), 1);
        slot.clear();
        assert_eq!(slot.surface().live(), 0);
        slot.clear();
        assert_eq!(slot.surface().live(), 0);
        assert_eq!(slot.target(), "c");
    }
}
