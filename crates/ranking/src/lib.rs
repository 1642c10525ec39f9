//! # Return Map Ranking
//!
//! Orders the assets of every column: best value first, missing values last,
//! ties and missing values kept in their input order.

use core_types::{Asset, Column, Dataset, SortDirection};
use std::cmp::Ordering;
use std::collections::HashMap;

/// The ranked order of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub column_id: String,
    /// Asset ids, best first.
    pub order: Vec<String>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Zero-based rank of an asset, `None` if it is not part of the ranking.
    pub fn position(&self, asset_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == asset_id)
    }

    /// Asset id -> rank, for repeated lookups.
    pub fn positions(&self) -> HashMap<&str, usize> {
        self.order
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), idx))
            .collect()
    }
}

/// Ranks the assets of one column.
///
/// Finite values are ordered by the column's sort direction (descending for
/// every built-in column); assets without a finite value follow all others.
/// The sort is stable, so ties keep their input order.
pub fn rank_assets(assets: &[Asset], column: &Column) -> Ranking {
    let mut entries: Vec<(&str, Option<f64>)> = assets
        .iter()
        .map(|a| (a.id.as_str(), a.value(&column.id)))
        .collect();

    entries.sort_by(|a, b| compare(a.1, b.1, column.sort));

    Ranking {
        column_id: column.id.clone(),
        order: entries.into_iter().map(|(id, _)| id.to_string()).collect(),
    }
}

/// Ranks every column of a dataset, in column order.
pub fn rank_all(dataset: &Dataset) -> Vec<Ranking> {
    let rankings: Vec<Ranking> = dataset
        .columns
        .iter()
        .map(|column| rank_assets(&dataset.assets, column))
        .collect();

    tracing::debug!(columns = rankings.len(), assets = dataset.assets.len(), "Ranked all columns.");

    rankings
}

fn compare(a: Option<f64>, b: Option<f64>, sort: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = match sort {
                SortDirection::Descending => b.partial_cmp(&a),
                SortDirection::Ascending => a.partial_cmp(&b),
            };
            ordering.unwrap_or(Ordering::Equal)
        }
    }
}
