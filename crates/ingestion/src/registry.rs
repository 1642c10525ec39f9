use crate::table::Table;
use core_types::text::normalize;
use std::collections::HashMap;

const ID_FIELDS: &[&str] = &["id"];
const SOURCE_NAME_FIELDS: &[&str] = &["source_name", "quantum_name", "quantumName", "quantum", "quantum name"];
const DISPLAY_FIELDS: &[&str] = &["asset", "display", "name"];
const CLASS_FIELDS: &[&str] = &["class", "asset_class", "assetClass"];
const ASSET_COLOR_FIELDS: &[&str] = &["asset_color", "color", "assetColor"];
const CLASS_COLOR_FIELDS: &[&str] = &["class_color", "classColor"];

/// Separates a ticker from the rest of a metrics-table name ("Fund X - ABCD3").
const TICKER_SEPARATOR: &str = " - ";

/// Curated metadata for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub id: String,
    pub display: String,
    /// The name the metrics table uses, empty when the registry has none.
    pub source_name: String,
    pub class: String,
    pub asset_color: Option<String>,
    pub class_color: Option<String>,
}

/// The asset registry, indexed by normalized source and display names.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    by_source: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl Registry {
    /// Builds the registry from its table. Later rows win on name clashes.
    pub fn from_table(table: &Table) -> Self {
        let mut registry = Self::default();

        for (line, record) in table.records().enumerate() {
            let source_name = record.first_of(SOURCE_NAME_FIELDS).unwrap_or_default();
            let display = record.first_of(DISPLAY_FIELDS).unwrap_or_default();
            let class = record.first_of(CLASS_FIELDS).unwrap_or_default();

            let id = match record.first_of(ID_FIELDS) {
                Some(id) => id.to_string(),
                None => [source_name, display, class]
                    .into_iter()
                    .find(|v| !v.is_empty())
                    .map(normalize)
                    .unwrap_or_default(),
            };
            if id.is_empty() {
                tracing::debug!(row = line + 2, "Skipping registry row without identity.");
                continue;
            }

            let display = if display.is_empty() { source_name } else { display };
            registry.insert(RegistryEntry {
                id,
                display: display.to_string(),
                source_name: source_name.to_string(),
                class: class.to_string(),
                asset_color: record.first_of(ASSET_COLOR_FIELDS).map(str::to_string),
                class_color: record.first_of(CLASS_COLOR_FIELDS).map(str::to_string),
            });
        }

        tracing::debug!(entries = registry.len(), "Asset registry loaded.");
        registry
    }

    fn insert(&mut self, entry: RegistryEntry) {
        let idx = self.entries.len();
        let source_key = normalize(&entry.source_name);
        let display_key = normalize(&entry.display);
        if !source_key.is_empty() {
            self.by_source.insert(source_key, idx);
        }
        if !display_key.is_empty() {
            self.by_display.insert(display_key, idx);
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Finds the entry for a metrics-table name.
    ///
    /// Tries the source name, then the display name, then the ticker after
    /// the last `" - "` against display names. Matching ignores case and
    /// accents.
    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }

        let idx = self
            .by_source
            .get(&key)
            .or_else(|| self.by_display.get(&key))
            .or_else(|| {
                let (_, ticker) = name.rsplit_once(TICKER_SEPARATOR)?;
                self.by_display.get(&normalize(ticker))
            })?;

        self.entries.get(*idx)
    }
}
