use crate::color::{class_color, Fill, NEUTRAL};
use crate::scale::ColorScale;
use core_types::{Asset, HighlightMode};

/// Label used for assets without a class.
pub const UNCLASSIFIED: &str = "Unclassified";

/// The class an asset is grouped under for coloring.
pub fn class_label(asset: &Asset) -> &str {
    match asset.class.trim() {
        "" => UNCLASSIFIED,
        class => class,
    }
}

fn explicit(color: Option<&str>) -> Option<&str> {
    color.map(str::trim).filter(|c| !c.is_empty())
}

/// One fill per class, in the order the classes first appear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassColors {
    entries: Vec<(String, Fill)>,
}

impl ClassColors {
    /// Collects class fills from the assets.
    ///
    /// An explicit class color from the registry wins over the hashed one; when
    /// several assets of a class carry one, the last one seen is kept.
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut entries: Vec<(String, Fill)> = Vec::new();

        for asset in assets {
            let class = class_label(asset);
            let preferred = explicit(asset.class_color.as_deref());

            match entries.iter_mut().find(|(label, _)| label.as_str() == class) {
                Some(entry) => {
                    if let Some(color) = preferred {
                        entry.1 = Fill::Css(color.to_string());
                    }
                }
                None => {
                    let fill = match preferred {
                        Some(color) => Fill::Css(color.to_string()),
                        None => class_color(class),
                    };
                    entries.push((class.to_string(), fill));
                }
            }
        }

        Self { entries }
    }

    pub fn get(&self, class: &str) -> Option<&Fill> {
        self.entries.iter().find(|(label, _)| label.as_str() == class).map(|(_, fill)| fill)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fill)> {
        self.entries.iter().map(|(label, fill)| (label.as_str(), fill))
    }
}

/// The background of one card.
///
/// # Arguments
///
/// * `mode` - What the viewer chose to highlight.
/// * `asset` - The asset on the card.
/// * `value` - The asset's value in the card's column.
/// * `scale` - The column's color scale, used in `HighlightMode::Return`.
/// * `classes` - Class fills of the whole dataset.
pub fn card_fill(
    mode: HighlightMode,
    asset: &Asset,
    value: Option<f64>,
    scale: Option<&ColorScale>,
    classes: &ClassColors,
) -> Fill {
    match mode {
        HighlightMode::Class => classes
            .get(class_label(asset))
            .cloned()
            .unwrap_or_else(|| class_color(class_label(asset))),
        HighlightMode::Asset => match explicit(asset.asset_color.as_deref()) {
            Some(color) => Fill::Css(color.to_string()),
            None => Fill::Rgb(NEUTRAL),
        },
        HighlightMode::Return => Fill::Rgb(scale.map_or(NEUTRAL, |s| s.color_for(value))),
    }
}
