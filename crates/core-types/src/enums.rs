use serde::{Deserialize, Serialize};
use std::fmt;

/// How the cards of each column are positioned vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DisplayMode {
    /// Cards occupy consecutive slots in ranked order.
    #[default]
    Stacked,
    /// Positive values above a shared zero line, negatives below it.
    Zero,
    /// Cards placed by rank distance to a reference asset.
    Asset,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Stacked => "stacked",
            DisplayMode::Zero => "zero",
            DisplayMode::Asset => "asset",
        }
    }

    /// Resolves a mode name. Unknown names fall back to `Stacked`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "stacked" => DisplayMode::Stacked,
            "zero" => DisplayMode::Zero,
            "asset" => DisplayMode::Asset,
            other => {
                tracing::warn!(mode = other, "Unknown display mode, falling back to stacked.");
                DisplayMode::Stacked
            }
        }
    }
}

impl From<String> for DisplayMode {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which attribute drives the background color of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum HighlightMode {
    #[default]
    Class,
    Asset,
    Return,
}

impl HighlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightMode::Class => "class",
            HighlightMode::Asset => "asset",
            HighlightMode::Return => "return",
        }
    }

    /// Resolves a highlight name. Unknown names fall back to `Class`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "class" => HighlightMode::Class,
            "asset" => HighlightMode::Asset,
            "return" => HighlightMode::Return,
            other => {
                tracing::warn!(highlight = other, "Unknown highlight mode, falling back to class.");
                HighlightMode::Class
            }
        }
    }
}

impl From<String> for HighlightMode {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// A calendar year (or partial year) of returns.
    Return,
    /// One of the fixed summary metrics.
    Metric,
}

/// Ranking direction of a column. Every built-in column ranks descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

/// The fixed summary metrics, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    AnnualisedExcess,
    AnnualisedTotal,
    Vol,
    Sharpe,
    MaxDd,
}

impl MetricId {
    pub const ALL: [MetricId; 5] = [
        MetricId::AnnualisedExcess,
        MetricId::AnnualisedTotal,
        MetricId::Vol,
        MetricId::Sharpe,
        MetricId::MaxDd,
    ];

    /// The column id used as key in `Asset::values`.
    pub fn id(&self) -> &'static str {
        match self {
            MetricId::AnnualisedExcess => "annualised_excess",
            MetricId::AnnualisedTotal => "annualised_total",
            MetricId::Vol => "vol",
            MetricId::Sharpe => "sharpe",
            MetricId::MaxDd => "max_dd",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            MetricId::AnnualisedExcess => "Ann. (RF+)",
            MetricId::AnnualisedTotal => "Ann. Total",
            MetricId::Vol => "Vol.",
            MetricId::Sharpe => "Sharpe",
            MetricId::MaxDd => "Max DD",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }
}
