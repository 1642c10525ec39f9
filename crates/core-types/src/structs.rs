use crate::enums::{ColumnKind, DisplayMode, HighlightMode, MetricId, SortDirection};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One security of the comparison, with its value for every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable identity, unique within a dataset.
    pub id: String,
    pub display: String,
    /// The name the metrics table uses for this asset.
    pub source_name: String,
    /// Category label, empty when the registry has none.
    pub class: String,
    pub asset_color: Option<String>,
    pub class_color: Option<String>,
    /// Column id -> value. `None` marks a missing or unparseable cell.
    pub values: BTreeMap<String, Option<f64>>,
}

impl Asset {
    pub fn new<I: Into<String>, D: Into<String>>(id: I, display: D) -> Self {
        let display = display.into();
        Self {
            id: id.into(),
            source_name: display.clone(),
            display,
            class: String::new(),
            asset_color: None,
            class_color: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_class<S: Into<String>>(mut self, class: S) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_value<S: Into<String>>(mut self, column_id: S, value: Option<f64>) -> Self {
        self.values.insert(column_id.into(), value);
        self
    }

    /// The finite value of a column, if any.
    pub fn value(&self, column_id: &str) -> Option<f64> {
        self.values
            .get(column_id)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    pub fn set_value(&mut self, column_id: &str, value: Option<f64>) {
        self.values.insert(column_id.to_string(), value);
    }
}

/// A ranked column of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
    pub sort: SortDirection,
    /// The raw header this column was read from, when there is one.
    pub source: Option<String>,
}

impl Column {
    /// A yearly (or partial-year) return column.
    pub fn returns<I: Into<String>, L: Into<String>>(id: I, label: L, source: Option<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnKind::Return,
            sort: SortDirection::Descending,
            source,
        }
    }

    pub fn metric(metric: MetricId) -> Self {
        Self {
            id: metric.id().to_string(),
            label: metric.default_label().to_string(),
            kind: ColumnKind::Metric,
            sort: SortDirection::Descending,
            source: None,
        }
    }

    pub fn metric_id(&self) -> Option<MetricId> {
        match self.kind {
            ColumnKind::Metric => MetricId::from_id(&self.id),
            ColumnKind::Return => None,
        }
    }

    pub fn is_metric(&self, metric: MetricId) -> bool {
        self.metric_id() == Some(metric)
    }
}

/// A complete snapshot of assets and columns for one geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub assets: Vec<Asset>,
    pub columns: Vec<Column>,
    /// Id of the risk-free asset, when it was found among the assets.
    pub reference_asset_id: Option<String>,
    /// Configured name of the risk-free asset (e.g. "CDI").
    pub reference_name: String,
    pub risk_free_annualised: Option<f64>,
    pub period_text: Option<String>,
    pub subtitle: String,
}

impl Dataset {
    /// Builds a dataset, giving every asset an entry for every column.
    ///
    /// Fails when two assets or two columns share an id.
    pub fn new(mut assets: Vec<Asset>, columns: Vec<Column>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(CoreError::DuplicateColumn(column.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(CoreError::DuplicateAsset(asset.id.clone()));
            }
        }

        for asset in &mut assets {
            for column in &columns {
                asset.values.entry(column.id.clone()).or_insert(None);
            }
        }

        Ok(Self {
            assets,
            columns,
            reference_asset_id: None,
            reference_name: String::new(),
            risk_free_annualised: None,
            period_text: None,
            subtitle: String::new(),
        })
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn contains_asset(&self, id: &str) -> bool {
        self.asset(id).is_some()
    }

    pub fn reference_asset(&self) -> Option<&Asset> {
        self.reference_asset_id
            .as_deref()
            .and_then(|id| self.asset(id))
    }
}

/// Everything the viewer chose for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderInput {
    pub geography: String,
    pub display_mode: DisplayMode,
    pub highlight_mode: HighlightMode,
    pub reference_asset_id: Option<String>,
}

impl RenderInput {
    pub fn new<S: Into<String>>(geography: S) -> Self {
        Self {
            geography: geography.into(),
            display_mode: DisplayMode::default(),
            highlight_mode: HighlightMode::default(),
            reference_asset_id: None,
        }
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_highlight_mode(mut self, mode: HighlightMode) -> Self {
        self.highlight_mode = mode;
        self
    }

    pub fn with_reference_asset<S: Into<String>>(mut self, id: S) -> Self {
        self.reference_asset_id = Some(id.into());
        self
    }
}
