use crate::error::IngestError;
use crate::registry::Registry;
use crate::table::{Record, Table};
use analytics::{excess_label, ColumnExtractor, ExtractedColumns, MetricDeriver};
use configuration::Geography;
use core_types::text::{normalize, parse_locale_number};
use core_types::{Asset, Dataset, MetricId};
use std::collections::HashSet;

/// Headers that hold the asset name in the metrics table.
const NAME_FIELDS: &[&str] = &["Nome", "Name", "nome", "name", "Asset"];

/// Merges a metrics table with the asset registry into a `Dataset`.
#[derive(Default)]
pub struct DatasetAssembler {
    extractor: ColumnExtractor,
    deriver: MetricDeriver,
}

impl DatasetAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the dataset of one geography.
    ///
    /// # Arguments
    ///
    /// * `metrics` - One row per asset, raw metric headers as columns.
    /// * `registry` - Display names, classes and colors keyed by asset name.
    /// * `geography` - Supplies the risk-free asset name and the subtitle label.
    ///
    /// # Returns
    ///
    /// A `Result` containing the dataset with derived excess return and
    /// Sharpe ratio, or an `IngestError` when the assets cannot form a
    /// consistent dataset.
    pub fn assemble(
        &self,
        metrics: &Table,
        registry: &Registry,
        geography: &Geography,
    ) -> Result<Dataset, IngestError> {
        let mut columns = self.extractor.extract(&metrics.header);

        let mut assets = Vec::with_capacity(metrics.len());
        let mut taken: HashSet<String> = HashSet::new();
        let mut matched = 0usize;

        for (line, record) in metrics.records().enumerate() {
            let Some(name) = record.first_of(NAME_FIELDS) else {
                tracing::debug!(row = line + 2, "Skipping metrics row without a name.");
                continue;
            };

            let mut asset = match registry.lookup(name) {
                Some(entry) => {
                    matched += 1;
                    let mut asset = Asset::new(entry.id.clone(), entry.display.clone()).with_class(entry.class.clone());
                    asset.asset_color = entry.asset_color.clone();
                    asset.class_color = entry.class_color.clone();
                    asset
                }
                None => Asset::new(normalize(name), name),
            };
            asset.source_name = name.to_string();

            read_values(&mut asset, &record, &columns);

            if taken.contains(&asset.id) {
                let unique = unique_id(&asset.id, &taken);
                tracing::warn!(id = %asset.id, renamed = %unique, "Duplicate asset id renamed.");
                asset.id = unique;
            }

            taken.insert(asset.id.clone());
            assets.push(asset);
        }

        if matched < assets.len() {
            tracing::info!(
                unmatched = assets.len() - matched,
                "Assets without a registry entry use their metrics-table name."
            );
        }

        let reference = self.deriver.derive(&mut assets, &geography.reference_asset);

        relabel_excess(&mut columns, &geography.reference_asset);
        let period_text = columns
            .annualised_source
            .as_deref()
            .and_then(|header| self.extractor.period_text(header));

        let mut dataset = Dataset::new(assets, columns.all())?;
        dataset.reference_asset_id = reference.asset_id;
        dataset.risk_free_annualised = reference.annualised;
        dataset.reference_name = geography.reference_asset.clone();
        dataset.subtitle = subtitle(geography, period_text.as_deref());
        dataset.period_text = period_text;

        Ok(dataset)
    }
}

/// First `<id>-<n>`, counting from 2, that no earlier asset holds.
fn unique_id(id: &str, taken: &HashSet<String>) -> String {
    (2..)
        .map(|n| format!("{id}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| id.to_string())
}

fn read_values(asset: &mut Asset, record: &Record<'_>, columns: &ExtractedColumns) {
    for column in &columns.return_columns {
        let value = column
            .source
            .as_deref()
            .and_then(|source| record.get(source))
            .and_then(parse_locale_number);
        asset.set_value(&column.id, value);
    }

    for metric in [MetricId::AnnualisedTotal, MetricId::Vol, MetricId::MaxDd] {
        let value = columns
            .source_for(metric)
            .and_then(|source| record.get(source))
            .and_then(parse_locale_number);
        asset.set_value(metric.id(), value);
    }
}

fn relabel_excess(columns: &mut ExtractedColumns, reference_name: &str) {
    for column in columns.metric_columns.iter_mut() {
        if column.is_metric(MetricId::AnnualisedExcess) {
            column.label = excess_label(reference_name);
        }
    }
}

/// `"<label> • Period: <period> • RF: <risk-free>"`, without the period part
/// when it is unknown.
pub fn subtitle(geography: &Geography, period_text: Option<&str>) -> String {
    match period_text {
        Some(period) => format!(
            "{} • Period: {} • RF: {}",
            geography.label, period, geography.reference_asset
        ),
        None => format!("{} • RF: {}", geography.label, geography.reference_asset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{read_table, DELIMITER};
    use pretty_assertions::assert_eq;

    const METRICS: &str = "\
Nome;Retorno - diária (2021);Retorno - diária (2022);Retorno anualizado (04/01/2021 até 30/12/2022);Volatilidade;Drawdown máximo
CDI;4,4;12,4;8,2;0,1;0
Ibovespa - IBOV;-11,9;4,7;-3,9;22,5;-27,1
Fundo Sem Cadastro;1.234,5;;x;10;-5
";

    const REGISTRY: &str = "\
quantum_name;asset;class;asset_color;class_color
CDI;CDI;Renda Fixa;#222222;
;IBOV;Ações;;#ff9900
";

    fn tables() -> (Table, Registry) {
        let metrics = read_table(METRICS.as_bytes(), DELIMITER).expect("valid metrics");
        let registry = Registry::from_table(&read_table(REGISTRY.as_bytes(), DELIMITER).expect("valid registry"));
        (metrics, registry)
    }

    fn brasil() -> Geography {
        Geography::new("Brasil", "br", "CDI", "BRL")
    }

    #[test]
    fn merges_registry_metadata_into_assets() {
        let (metrics, registry) = tables();
        let dataset = DatasetAssembler::new().assemble(&metrics, &registry, &brasil()).expect("assembled");

        let ids: Vec<&str> = dataset.assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cdi", "ibov", "fundo sem cadastro"]);

        let ibov = dataset.asset("ibov").expect("matched by ticker");
        assert_eq!(ibov.display, "IBOV");
        assert_eq!(ibov.source_name, "Ibovespa - IBOV");
        assert_eq!(ibov.class, "Ações");
        assert_eq!(ibov.class_color.as_deref(), Some("#ff9900"));

        let unknown = dataset.asset("fundo sem cadastro").expect("unmatched row kept");
        assert_eq!(unknown.display, "Fundo Sem Cadastro");
        assert_eq!(unknown.class, "");
        assert_eq!(unknown.asset_color, None);
    }

    #[test]
    fn parses_values_and_derives_metrics() {
        let (metrics, registry) = tables();
        let dataset = DatasetAssembler::new().assemble(&metrics, &registry, &brasil()).expect("assembled");

        let ids: Vec<&str> = dataset.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["2021", "2022", "annualised_excess", "annualised_total", "vol", "sharpe", "max_dd"]
        );

        let fund = dataset.asset("fundo sem cadastro").expect("present");
        assert_eq!(fund.value("2021"), Some(1234.5));
        assert_eq!(fund.value("2022"), None);
        assert_eq!(fund.value("annualised_total"), None);
        assert_eq!(fund.value("annualised_excess"), None);

        let ibov = dataset.asset("ibov").expect("present");
        assert_eq!(ibov.value("max_dd"), Some(-27.1));
        let excess = ibov.value("annualised_excess").expect("derived");
        assert!((excess - (-12.1)).abs() < 1e-9);
        let sharpe = ibov.value("sharpe").expect("derived");
        assert!((sharpe - (-12.1 / 22.5)).abs() < 1e-9);

        assert_eq!(dataset.reference_asset_id.as_deref(), Some("cdi"));
        assert_eq!(dataset.risk_free_annualised, Some(8.2));
    }

    #[test]
    fn labels_and_subtitle_name_the_risk_free_asset() {
        let (metrics, registry) = tables();
        let dataset = DatasetAssembler::new().assemble(&metrics, &registry, &brasil()).expect("assembled");

        assert_eq!(dataset.column("annualised_excess").map(|c| c.label.as_str()), Some("Ann. (CDI+)"));
        assert_eq!(dataset.period_text.as_deref(), Some("04/01/2021 até 30/12/2022"));
        assert_eq!(dataset.subtitle, "Brasil • Period: 04/01/2021 até 30/12/2022 • RF: CDI");
        assert_eq!(dataset.reference_name, "CDI");
    }

    #[test]
    fn subtitle_omits_an_unknown_period() {
        assert_eq!(subtitle(&brasil(), None), "Brasil • RF: CDI");
    }

    #[test]
    fn duplicate_ids_get_a_numeric_suffix() {
        let metrics = read_table("Nome;Retorno - diária (2020)\nCDI;1\ncdi;2\nCdí;3\n".as_bytes(), DELIMITER)
            .expect("valid metrics");
        let dataset = DatasetAssembler::new()
            .assemble(&metrics, &Registry::default(), &brasil())
            .expect("assembled");

        let ids: Vec<&str> = dataset.assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cdi", "cdi-2", "cdi-3"]);
    }

    #[test]
    fn renamed_ids_skip_ids_already_in_use() {
        let metrics = read_table("Nome;Retorno - diária (2020)\nA;1\nA;2\na-2;3\nA;4\n".as_bytes(), DELIMITER)
            .expect("valid metrics");
        let dataset = DatasetAssembler::new()
            .assemble(&metrics, &Registry::default(), &brasil())
            .expect("colliding ids still assemble");

        let ids: Vec<&str> = dataset.assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a-2", "a-2-2", "a-3"]);
        assert_eq!(dataset.asset("a-2-2").and_then(|a| a.value("2020")), Some(3.0));
    }

    #[test]
    fn missing_reference_leaves_derived_metrics_empty() {
        let (metrics, registry) = tables();
        let geography = Geography::new("Exterior", "ex", "SOFR", "USD");
        let dataset = DatasetAssembler::new().assemble(&metrics, &registry, &geography).expect("assembled");

        assert_eq!(dataset.reference_asset_id, None);
        assert!(dataset.assets.iter().all(|a| a.value("sharpe").is_none()));
    }
}
