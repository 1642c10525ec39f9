use core_types::{DisplayMode, HighlightMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one folder per geography.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub display: Display,
    /// Geography key (e.g. "br") -> its dataset settings.
    #[serde(default = "default_geographies")]
    pub geographies: BTreeMap<String, Geography>,
}

/// Contains parameters for laying out and formatting the cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Display {
    /// Height of one card in pixels.
    #[serde(default = "default_card_height")]
    pub card_height: f64,
    /// Vertical space between two cards in pixels.
    #[serde(default = "default_gap")]
    pub gap: f64,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub default_mode: DisplayMode,
    #[serde(default)]
    pub default_highlight: HighlightMode,
}

/// Number formatting conventions for card values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `12,3%` and `1.234,56`.
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// `12.3%` and `1,234.56`.
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn decimal_separator(&self) -> char {
        match self {
            Locale::PtBr => ',',
            Locale::EnUs => '.',
        }
    }

    pub fn thousands_separator(&self) -> char {
        match self {
            Locale::PtBr => '.',
            Locale::EnUs => ',',
        }
    }
}

/// Contains the dataset settings of one geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    /// Human readable name shown in the subtitle (e.g. "Brasil").
    pub label: String,
    /// Folder under `data_dir` holding the two CSV files.
    pub folder: String,
    /// Name of the risk-free asset as written in the metrics table (e.g. "CDI").
    pub reference_asset: String,
    pub currency: String,
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,
    #[serde(default = "default_registry_file")]
    pub registry_file: String,
}

impl Geography {
    pub fn new(label: &str, folder: &str, reference_asset: &str, currency: &str) -> Self {
        Self {
            label: label.to_string(),
            folder: folder.to_string(),
            reference_asset: reference_asset.to_string(),
            currency: currency.to_string(),
            metrics_file: default_metrics_file(),
            registry_file: default_registry_file(),
        }
    }
}

impl Config {
    /// Looks up a geography by key.
    pub fn geography(&self, key: &str) -> Result<&Geography, ConfigError> {
        self.geographies
            .get(key)
            .ok_or_else(|| ConfigError::UnknownGeography(key.to_string()))
    }

    /// Checks that the loaded values can actually drive a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.display.card_height.is_finite() && self.display.card_height > 0.0) {
            return Err(ConfigError::ValidationError(
                "display.card_height must be greater than 0".to_string(),
            ));
        }
        if !(self.display.gap.is_finite() && self.display.gap >= 0.0) {
            return Err(ConfigError::ValidationError(
                "display.gap must not be negative".to_string(),
            ));
        }
        if self.geographies.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one geography must be configured".to_string(),
            ));
        }
        for (key, geography) in &self.geographies {
            if geography.reference_asset.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "geographies.{key}.reference_asset must not be empty"
                )));
            }
            if geography.folder.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "geographies.{key}.folder must not be empty"
                )));
            }
        }
        Ok(())
    }
}

// --- Default Implementations ---
// These reproduce the two datasets the map ships with, so an absent
// `config.toml` still works.

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            display: Display::default(),
            geographies: default_geographies(),
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self {
            card_height: default_card_height(),
            gap: default_gap(),
            locale: Locale::default(),
            default_mode: DisplayMode::default(),
            default_highlight: HighlightMode::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_card_height() -> f64 {
    44.0
}

fn default_gap() -> f64 {
    8.0
}

fn default_metrics_file() -> String {
    "CSV_Quantum.csv".to_string()
}

fn default_registry_file() -> String {
    "asset_registry.csv".to_string()
}

fn default_geographies() -> BTreeMap<String, Geography> {
    let mut geographies = BTreeMap::new();
    geographies.insert("br".to_string(), Geography::new("Brasil", "br", "CDI", "BRL"));
    geographies.insert("ex".to_string(), Geography::new("Exterior", "ex", "SOFR", "USD"));
    geographies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_ship_both_geographies() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let br = config.geography("br").expect("br is configured");
        assert_eq!(br.reference_asset, "CDI");
        assert_eq!(br.currency, "BRL");
        assert_eq!(br.metrics_file, "CSV_Quantum.csv");

        let ex = config.geography("ex").expect("ex is configured");
        assert_eq!(ex.reference_asset, "SOFR");
    }

    #[test]
    fn unknown_geography_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.geography("jp"),
            Err(ConfigError::UnknownGeography(key)) if key == "jp"
        ));
    }

    #[test]
    fn validation_rejects_bad_display_values() {
        let mut config = Config::default();
        config.display.card_height = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.display.gap = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn validation_rejects_blank_reference_asset() {
        let mut config = Config::default();
        if let Some(br) = config.geographies.get_mut("br") {
            br.reference_asset = "  ".to_string();
        }
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn locale_separators() {
        assert_eq!(Locale::PtBr.decimal_separator(), ',');
        assert_eq!(Locale::PtBr.thousands_separator(), '.');
        assert_eq!(Locale::EnUs.decimal_separator(), '.');
        assert_eq!(Locale::EnUs.thousands_separator(), ',');
    }
}
