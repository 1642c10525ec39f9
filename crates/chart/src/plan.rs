use crate::format::format_value;
use configuration::Locale;
use core_types::{ColumnKind, Dataset, DisplayMode, HighlightMode, RenderInput};
use layout::LayoutEngine;
use palette::{build_scales, card_fill, class_label, ClassColors, ColorScale, Fill};
use serde::Serialize;

/// One asset drawn in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub asset_id: String,
    pub display: String,
    pub class: String,
    pub value: Option<f64>,
    pub formatted: String,
    /// Offset of the card's top edge from the top of the column, in pixels.
    pub top: f64,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartColumn {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
    pub baseline: Option<f64>,
    pub scale: ColorScale,
    /// Cards ordered top to bottom.
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendChip {
    pub label: String,
    pub fill: Fill,
}

/// What the legend row shows for the chosen highlight mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Legend {
    /// Per-asset colors would not fit a legend.
    None,
    Gradient { below: String, above: String },
    Classes { chips: Vec<LegendChip> },
}

/// Everything a renderer needs to draw the map without further numeric work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub subtitle: String,
    /// The mode that was actually applied.
    pub display_mode: DisplayMode,
    pub highlight_mode: HighlightMode,
    pub reference_asset_id: Option<String>,
    pub card_height: f64,
    pub height: f64,
    pub legend: Legend,
    pub columns: Vec<ChartColumn>,
}

impl ChartPlan {
    /// Lays out and colors every card of `dataset`.
    ///
    /// An unknown (or absent) reference asset is replaced by the first asset,
    /// so asset mode always has something to align on when the dataset is
    /// not empty.
    pub fn build(dataset: &Dataset, input: &RenderInput, engine: &LayoutEngine, locale: Locale) -> Self {
        let reference = resolve_reference(dataset, input.reference_asset_id.as_deref());
        let layout = engine.compute(dataset, input.display_mode, reference);
        let scales = build_scales(dataset);
        let classes = ClassColors::from_assets(&dataset.assets);

        let columns = dataset
            .columns
            .iter()
            .map(|column| {
                let placement = layout.column(&column.id);
                let scale = scales.get(&column.id).copied().unwrap_or_else(ColorScale::degenerate);

                let mut cards: Vec<Card> = dataset
                    .assets
                    .iter()
                    .map(|asset| {
                        let value = asset.value(&column.id);
                        Card {
                            asset_id: asset.id.clone(),
                            display: asset.display.clone(),
                            class: class_label(asset).to_string(),
                            value,
                            formatted: format_value(column, value, locale),
                            top: placement.and_then(|p| p.offset(&asset.id)).unwrap_or(0.0),
                            fill: card_fill(input.highlight_mode, asset, value, Some(&scale), &classes),
                        }
                    })
                    .collect();
                cards.sort_by(|a, b| a.top.total_cmp(&b.top));

                ChartColumn {
                    id: column.id.clone(),
                    label: column.label.clone(),
                    kind: column.kind,
                    baseline: placement.and_then(|p| p.baseline),
                    scale,
                    cards,
                }
            })
            .collect();

        let plan = Self {
            subtitle: dataset.subtitle.clone(),
            display_mode: layout.mode,
            highlight_mode: input.highlight_mode,
            reference_asset_id: reference.map(str::to_string),
            card_height: engine.card_height(),
            height: layout.height,
            legend: legend(input.highlight_mode, dataset, &classes),
            columns,
        };

        tracing::debug!(
            mode = %plan.display_mode,
            highlight = %plan.highlight_mode,
            columns = plan.columns.len(),
            "Chart plan built."
        );

        plan
    }

    pub fn column(&self, id: &str) -> Option<&ChartColumn> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// The requested reference asset if the dataset has it, else the first asset.
pub fn resolve_reference<'a>(dataset: &'a Dataset, requested: Option<&str>) -> Option<&'a str> {
    if let Some(id) = requested {
        if let Some(asset) = dataset.asset(id) {
            return Some(asset.id.as_str());
        }
        tracing::warn!(reference = id, "Unknown reference asset; using the first asset.");
    }
    dataset.assets.first().map(|a| a.id.as_str())
}

fn legend(mode: HighlightMode, dataset: &Dataset, classes: &ClassColors) -> Legend {
    match mode {
        HighlightMode::Return => Legend::Gradient {
            below: format!("Below {}", dataset.reference_name),
            above: format!("Above {}", dataset.reference_name),
        },
        HighlightMode::Asset => Legend::None,
        HighlightMode::Class => Legend::Classes {
            chips: classes
                .iter()
                .map(|(label, fill)| LegendChip {
                    label: label.to_string(),
                    fill: fill.clone(),
                })
                .collect(),
        },
    }
}
