//! # Return Map Layout
//!
//! Converts per-column rankings into vertical pixel offsets.
//!
//! Three display modes are supported:
//!
//! - **Stacked:** every column is a dense list of cards in ranked order.
//! - **Zero:** positive values sit above a shared zero line, negative values
//!   below it, missing values at the bottom.
//! - **Asset:** every column is shifted so the chosen reference asset sits on
//!   one shared row; other assets are placed by their rank distance to it.
//!
//! The engine is a pure function of the dataset and the chosen mode. It holds
//! no state between calls.

use core_types::{Asset, Dataset, DisplayMode};
use ranking::{rank_all, Ranking};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Default card height in pixels.
pub const CARD_H: f64 = 44.0;
/// Default vertical gap between two cards in pixels.
pub const GAP: f64 = 8.0;

/// The vertical placement of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLayout {
    pub column_id: String,
    /// Asset id -> top offset in pixels.
    pub offsets: BTreeMap<String, f64>,
    /// Y coordinate of the zero (or reference) line, if the column has one.
    pub baseline: Option<f64>,
}

impl ColumnLayout {
    pub fn offset(&self, asset_id: &str) -> Option<f64> {
        self.offsets.get(asset_id).copied()
    }
}

/// The complete layout description of a render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// The mode that was actually applied.
    pub mode: DisplayMode,
    pub columns: Vec<ColumnLayout>,
    /// Total content height in pixels.
    pub height: f64,
}

impl Layout {
    pub fn column(&self, column_id: &str) -> Option<&ColumnLayout> {
        self.columns.iter().find(|c| c.column_id == column_id)
    }

    pub fn offset(&self, column_id: &str, asset_id: &str) -> Option<f64> {
        self.column(column_id).and_then(|c| c.offset(asset_id))
    }
}

/// Computes layouts for a fixed card geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    card_height: f64,
    gap: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(CARD_H, GAP)
    }
}

impl LayoutEngine {
    pub fn new(card_height: f64, gap: f64) -> Self {
        Self { card_height, gap }
    }

    pub fn card_height(&self) -> f64 {
        self.card_height
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Distance between the tops of two consecutive cards.
    pub fn pitch(&self) -> f64 {
        self.card_height + self.gap
    }

    /// Computes the layout of every column of `dataset`.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The assets and columns to place.
    /// * `mode` - The requested display mode.
    /// * `reference_asset_id` - The asset to align on in `DisplayMode::Asset`.
    ///   Ignored by the other modes.
    pub fn compute(&self, dataset: &Dataset, mode: DisplayMode, reference_asset_id: Option<&str>) -> Layout {
        let rankings = rank_all(dataset);
        self.compute_ranked(dataset, &rankings, mode, reference_asset_id)
    }

    /// Same as `compute`, reusing rankings the caller already has.
    pub fn compute_ranked(
        &self,
        dataset: &Dataset,
        rankings: &[Ranking],
        mode: DisplayMode,
        reference_asset_id: Option<&str>,
    ) -> Layout {
        let layout = match mode {
            DisplayMode::Stacked => self.stacked(dataset, rankings),
            DisplayMode::Zero => self.zero(dataset, rankings),
            DisplayMode::Asset => match reference_asset_id.filter(|id| dataset.contains_asset(id)) {
                Some(reference) => self.relative(dataset, rankings, reference),
                None => {
                    tracing::warn!(
                        reference = ?reference_asset_id,
                        "Reference asset is not part of the dataset; using the stacked layout."
                    );
                    self.stacked(dataset, rankings)
                }
            },
        };

        tracing::debug!(
            mode = %layout.mode,
            columns = layout.columns.len(),
            height = layout.height,
            "Computed layout."
        );

        layout
    }

    fn stacked(&self, dataset: &Dataset, rankings: &[Ranking]) -> Layout {
        Layout {
            mode: DisplayMode::Stacked,
            columns: rankings.iter().map(|r| self.stacked_column(r)).collect(),
            height: self.stacked_height(dataset.assets.len()),
        }
    }

    fn stacked_column(&self, ranking: &Ranking) -> ColumnLayout {
        let offsets = ranking
            .order
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx as f64 * self.pitch()))
            .collect();

        ColumnLayout {
            column_id: ranking.column_id.clone(),
            offsets,
            baseline: None,
        }
    }

    fn zero(&self, dataset: &Dataset, rankings: &[Ranking]) -> Layout {
        let assets: HashMap<&str, &Asset> = dataset.assets.iter().map(|a| (a.id.as_str(), a)).collect();

        let mut rows: Vec<(&str, Vec<(&str, i64)>)> = Vec::with_capacity(rankings.len());
        let mut bounds: Option<(i64, i64)> = None;

        for ranking in rankings {
            let column_id = ranking.column_id.as_str();
            let mut positives: Vec<(&str, f64)> = Vec::new();
            let mut negatives: Vec<(&str, f64)> = Vec::new();
            let mut missing: Vec<&str> = Vec::new();

            for id in ranking.order.iter().map(String::as_str) {
                match assets.get(id).and_then(|a| a.value(column_id)) {
                    Some(v) if v >= 0.0 => positives.push((id, v)),
                    Some(v) => negatives.push((id, v)),
                    None => missing.push(id),
                }
            }

            // Zero mode always reads top-down from the largest value.
            positives.sort_by(|a, b| b.1.total_cmp(&a.1));
            negatives.sort_by(|a, b| b.1.total_cmp(&a.1));

            let n_pos = positives.len() as i64;
            let n_neg = negatives.len() as i64;

            let mut column_rows = Vec::with_capacity(ranking.len());
            for (idx, (id, _)) in positives.iter().enumerate() {
                column_rows.push((*id, idx as i64 - n_pos));
            }
            for (idx, (id, _)) in negatives.iter().enumerate() {
                column_rows.push((*id, idx as i64 + 1));
            }
            for (idx, id) in missing.iter().enumerate() {
                column_rows.push((*id, n_neg + 1 + idx as i64));
            }

            for (_, row) in &column_rows {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(*row), hi.max(*row)),
                    None => (*row, *row),
                });
            }

            rows.push((column_id, column_rows));
        }

        let (min, max) = bounds.unwrap_or((0, 0));
        let baseline = self.baseline(min);

        let columns = rows
            .into_iter()
            .map(|(column_id, column_rows)| ColumnLayout {
                column_id: column_id.to_string(),
                offsets: column_rows
                    .into_iter()
                    .map(|(id, row)| (id.to_string(), (row - min) as f64 * self.pitch()))
                    .collect(),
                baseline: Some(baseline),
            })
            .collect();

        Layout {
            mode: DisplayMode::Zero,
            columns,
            height: self.span_height(min, max),
        }
    }

    fn relative(&self, dataset: &Dataset, rankings: &[Ranking], reference: &str) -> Layout {
        let anchors: Vec<Option<usize>> = rankings.iter().map(|r| r.position(reference)).collect();

        let (mut min, mut max) = (0i64, 0i64);
        for (ranking, anchor) in rankings.iter().zip(&anchors) {
            let Some(anchor) = anchor else { continue };
            for idx in 0..ranking.len() {
                let rel = idx as i64 - *anchor as i64;
                min = min.min(rel);
                max = max.max(rel);
            }
        }

        let baseline = self.baseline(min);
        let mut fell_back = false;

        let columns = rankings
            .iter()
            .zip(&anchors)
            .map(|(ranking, anchor)| match anchor {
                Some(anchor) => ColumnLayout {
                    column_id: ranking.column_id.clone(),
                    offsets: ranking
                        .order
                        .iter()
                        .enumerate()
                        .map(|(idx, id)| {
                            let rel = idx as i64 - *anchor as i64;
                            (id.clone(), (rel - min) as f64 * self.pitch())
                        })
                        .collect(),
                    baseline: Some(baseline),
                },
                None => {
                    tracing::debug!(
                        column = %ranking.column_id,
                        reference,
                        "Reference asset is not ranked in this column; stacking it."
                    );
                    fell_back = true;
                    self.stacked_column(ranking)
                }
            })
            .collect();

        let mut height = self.span_height(min, max);
        if fell_back {
            height = height.max(self.stacked_height(dataset.assets.len()));
        }

        Layout {
            mode: DisplayMode::Asset,
            columns,
            height,
        }
    }

    fn stacked_height(&self, rows: usize) -> f64 {
        (rows as f64 * self.pitch() - self.gap).max(0.0)
    }

    fn span_height(&self, min: i64, max: i64) -> f64 {
        (max - min + 1) as f64 * self.pitch() - self.gap
    }

    fn baseline(&self, min: i64) -> f64 {
        (0 - min) as f64 * self.pitch() - self.gap / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Column;
    use pretty_assertions::assert_eq;

    const P: f64 = CARD_H + GAP;

    fn dataset(rows: &[(&str, Option<f64>)]) -> Dataset {
        let assets = rows
            .iter()
            .map(|(id, v)| Asset::new(*id, *id).with_value("2021", *v))
            .collect();
        Dataset::new(assets, vec![Column::returns("2021", "2021", None)]).expect("valid dataset")
    }

    #[test]
    fn pitch_adds_card_height_and_gap() {
        assert_eq!(LayoutEngine::default().pitch(), 52.0);
        assert_eq!(LayoutEngine::new(30.0, 2.0).pitch(), 32.0);
    }

    #[test]
    fn stacked_offsets_form_a_dense_permutation() {
        let data = dataset(&[("a", Some(0.1)), ("b", None), ("c", Some(-0.2)), ("d", Some(0.4))]);
        let layout = LayoutEngine::default().compute(&data, DisplayMode::Stacked, None);

        let mut offsets: Vec<f64> = layout.columns[0].offsets.values().copied().collect();
        offsets.sort_by(f64::total_cmp);

        assert_eq!(offsets, vec![0.0, P, 2.0 * P, 3.0 * P]);
        assert_eq!(layout.columns[0].baseline, None);
        assert_eq!(layout.height, 4.0 * P - GAP);
    }

    #[test]
    fn empty_dataset_has_zero_height() {
        let data = dataset(&[]);
        let engine = LayoutEngine::default();

        assert_eq!(engine.compute(&data, DisplayMode::Stacked, None).height, 0.0);

        let zero = engine.compute(&data, DisplayMode::Zero, None);
        assert_eq!(zero.height, P - GAP);
        assert_eq!(zero.columns[0].baseline, Some(-GAP / 2.0));
    }

    #[test]
    fn zero_mode_places_all_negative_column_below_the_line() {
        let data = dataset(&[("a", Some(-0.1)), ("b", Some(-0.3))]);
        let layout = LayoutEngine::default().compute(&data, DisplayMode::Zero, None);

        // Rows 1 and 2; min is 1 so the zero line sits above the first card.
        assert_eq!(layout.offset("2021", "a"), Some(0.0));
        assert_eq!(layout.offset("2021", "b"), Some(P));
        assert_eq!(layout.columns[0].baseline, Some(-P - GAP / 2.0));
        assert_eq!(layout.height, 2.0 * P - GAP);
    }

    #[test]
    fn zero_counts_as_a_positive_value() {
        let data = dataset(&[("neg", Some(-0.05)), ("flat", Some(0.0))]);
        let layout = LayoutEngine::default().compute(&data, DisplayMode::Zero, None);
        let baseline = layout.columns[0].baseline.expect("zero mode has a baseline");

        assert!(layout.offset("2021", "flat").expect("placed") < baseline);
        assert!(layout.offset("2021", "neg").expect("placed") > baseline);
    }

    #[test]
    fn asset_mode_without_reference_is_stacked() {
        let data = dataset(&[("a", Some(0.1)), ("b", Some(0.2))]);
        let engine = LayoutEngine::default();

        let none = engine.compute(&data, DisplayMode::Asset, None);
        let unknown = engine.compute(&data, DisplayMode::Asset, Some("nope"));
        let stacked = engine.compute(&data, DisplayMode::Stacked, None);

        assert_eq!(none, stacked);
        assert_eq!(unknown, stacked);
    }

    #[test]
    fn unknown_mode_string_renders_stacked() {
        let data = dataset(&[("a", Some(0.1)), ("b", Some(0.2))]);
        let layout = LayoutEngine::default().compute(&data, DisplayMode::from_name("diagonal"), None);
        assert_eq!(layout.mode, DisplayMode::Stacked);
    }

    #[test]
    fn column_missing_the_reference_falls_back_to_stacked() {
        let data = dataset(&[("a", Some(0.3)), ("b", Some(0.2)), ("c", Some(0.1))]);
        let rankings = vec![
            Ranking { column_id: "2021".into(), order: vec!["a".into(), "b".into(), "c".into()] },
            Ranking { column_id: "partial".into(), order: vec!["b".into(), "c".into()] },
        ];

        let layout = LayoutEngine::default().compute_ranked(&data, &rankings, DisplayMode::Asset, Some("a"));

        let partial = layout.column("partial").expect("column laid out");
        assert_eq!(partial.baseline, None);
        assert_eq!(partial.offset("b"), Some(0.0));
        assert_eq!(partial.offset("c"), Some(P));
        // The relative span (0..2) equals the stacked height here.
        assert_eq!(layout.height, 3.0 * P - GAP);
        assert_eq!(layout.column("2021").and_then(|c| c.baseline), Some(-GAP / 2.0));
    }

    #[test]
    fn asset_mode_height_spans_relative_rows() {
        let data = dataset(&[("top", Some(0.3)), ("mid", Some(0.2)), ("low", Some(0.1))]);
        let layout = LayoutEngine::default().compute(&data, DisplayMode::Asset, Some("low"));

        // Relative rows -2..0.
        assert_eq!(layout.offset("2021", "top"), Some(0.0));
        assert_eq!(layout.offset("2021", "low"), Some(2.0 * P));
        assert_eq!(layout.columns[0].baseline, Some(2.0 * P - GAP / 2.0));
        assert_eq!(layout.height, 3.0 * P - GAP);
    }
}
