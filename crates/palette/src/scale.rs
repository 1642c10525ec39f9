use crate::color::{Rgb, GREEN, NEUTRAL, RED, YELLOW};
use core_types::{Column, ColumnKind, Dataset, MetricId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Quantization of the distance to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bands {
    /// Width of one band. Zero disables banding.
    pub step: f64,
    /// Distance at which the color saturates.
    pub cap: f64,
}

impl Bands {
    pub const fn new(step: f64, cap: f64) -> Self {
        Self { step, cap }
    }

    fn is_active(&self) -> bool {
        self.step.is_finite() && self.step > 0.0 && self.cap.is_finite() && self.cap > 0.0
    }

    /// Floors `diff` to a whole band and expresses it as a fraction of `cap`.
    fn quantize(&self, diff: f64, cap: f64) -> f64 {
        if cap <= 0.0 {
            return 0.0;
        }
        let d = diff.max(0.0).min(cap);
        let q = (d / self.step).floor() * self.step;
        (q / cap).clamp(0.0, 1.0)
    }
}

/// A diverging red-yellow-green scale for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    /// The value drawn in the pivot color. Midpoint of `[min, max]` when unset.
    pub pivot: Option<f64>,
    /// Lower values are better (e.g. volatility).
    pub reverse: bool,
    pub bands: Option<Bands>,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            pivot: None,
            reverse: false,
            bands: None,
        }
    }

    /// A scale for a column without any finite value. Maps everything to neutral.
    pub fn degenerate() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    pub fn with_pivot(mut self, pivot: f64) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_bands(mut self, bands: Bands) -> Self {
        self.bands = Some(bands);
        self
    }

    /// Maps a value to its color.
    ///
    /// Missing values and scales without a finite range are neutral. A scale
    /// whose range is a single point paints everything in the pivot color.
    pub fn color_for(&self, value: Option<f64>) -> Rgb {
        let Some(mut v) = value.filter(|v| v.is_finite()) else {
            return NEUTRAL;
        };
        if !self.min.is_finite() || !self.max.is_finite() {
            return NEUTRAL;
        }

        let (mut min, mut max) = (self.min, self.max);
        let mut pivot = self.pivot.filter(|p| p.is_finite());
        if self.reverse {
            v = -v;
            (min, max) = (-self.max, -self.min);
            pivot = pivot.map(|p| -p);
        }
        let pivot = pivot.unwrap_or((min + max) / 2.0).min(max).max(min);

        if max == min {
            return YELLOW;
        }

        match self.bands.filter(Bands::is_active) {
            Some(bands) => Self::banded(v, min, max, pivot, bands),
            None => Self::continuous(v, min, max, pivot),
        }
    }

    fn banded(v: f64, min: f64, max: f64, pivot: f64, bands: Bands) -> Rgb {
        let cap_below = bands.cap.min((pivot - min).max(0.0));
        let cap_above = bands.cap.min((max - pivot).max(0.0));

        if v <= pivot {
            YELLOW.mix(RED, bands.quantize(pivot - v, cap_below))
        } else {
            YELLOW.mix(GREEN, bands.quantize(v - pivot, cap_above))
        }
    }

    fn continuous(v: f64, min: f64, max: f64, pivot: f64) -> Rgb {
        if v <= pivot {
            let span = pivot - min;
            let t = if span == 0.0 { 1.0 } else { ((v - min) / span).clamp(0.0, 1.0) };
            RED.mix(YELLOW, t)
        } else {
            let span = max - pivot;
            let t = if span == 0.0 { 1.0 } else { ((v - pivot) / span).clamp(0.0, 1.0) };
            YELLOW.mix(GREEN, t)
        }
    }
}

/// The fixed band policy of a column, `None` when it has no bands.
pub fn band_policy(column: &Column) -> Option<Bands> {
    match column.metric_id() {
        Some(MetricId::AnnualisedTotal) => Some(Bands::new(0.02, 0.10)),
        Some(MetricId::AnnualisedExcess) => Some(Bands::new(0.0, 0.05)),
        Some(MetricId::Sharpe) => Some(Bands::new(0.10, 0.50)),
        Some(MetricId::Vol) => Some(Bands::new(0.02, 0.20)),
        Some(MetricId::MaxDd) => Some(Bands::new(0.05, 0.30)),
        None => match column.kind {
            ColumnKind::Return => Some(Bands::new(0.0, 0.15)),
            ColumnKind::Metric => None,
        },
    }
}

/// Builds the scale of one column from the dataset's values.
///
/// Excess return and Sharpe pivot at zero; every other column pivots at the
/// reference asset's own value, or the midpoint when it has none.
pub fn scale_for_column(dataset: &Dataset, column: &Column) -> ColorScale {
    let values: Vec<f64> = dataset.assets.iter().filter_map(|a| a.value(&column.id)).collect();
    if values.is_empty() {
        return ColorScale::degenerate();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let metric = column.metric_id();
    let pivot = match metric {
        Some(MetricId::AnnualisedExcess) | Some(MetricId::Sharpe) => Some(0.0),
        _ => dataset.reference_asset().and_then(|a| a.value(&column.id)),
    };

    let mut scale = ColorScale::new(min, max);
    scale.pivot = Some(pivot.unwrap_or((min + max) / 2.0));
    scale.reverse = metric == Some(MetricId::Vol);
    scale.bands = band_policy(column);
    scale
}

/// Builds the scale of every column, keyed by column id.
pub fn build_scales(dataset: &Dataset) -> BTreeMap<String, ColorScale> {
    let scales: BTreeMap<String, ColorScale> = dataset
        .columns
        .iter()
        .map(|column| (column.id.clone(), scale_for_column(dataset, column)))
        .collect();

    tracing::debug!(columns = scales.len(), "Built color scales.");

    scales
}
