use chrono::{Datelike, NaiveDate};
use core_types::text::normalize;
use core_types::{Column, MetricId};
use regex::Regex;

/// Sort key for return columns whose id carries no year.
const NO_YEAR: u32 = 9999;

/// The columns recognised in a metrics table header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedColumns {
    /// Yearly return columns, oldest first.
    pub return_columns: Vec<Column>,
    /// The five fixed metric columns, always present.
    pub metric_columns: Vec<Column>,
    pub annualised_source: Option<String>,
    pub volatility_source: Option<String>,
    pub drawdown_source: Option<String>,
    /// A return header covering several years. Not ranked.
    pub total_period_source: Option<String>,
}

impl ExtractedColumns {
    /// Return columns followed by metric columns, in display order.
    pub fn all(&self) -> Vec<Column> {
        self.return_columns
            .iter()
            .chain(self.metric_columns.iter())
            .cloned()
            .collect()
    }

    /// The raw header a metric is read from. Derived metrics have none.
    pub fn source_for(&self, metric: MetricId) -> Option<&str> {
        match metric {
            MetricId::AnnualisedTotal => self.annualised_source.as_deref(),
            MetricId::Vol => self.volatility_source.as_deref(),
            MetricId::MaxDd => self.drawdown_source.as_deref(),
            MetricId::AnnualisedExcess | MetricId::Sharpe => None,
        }
    }
}

/// Classifies raw metrics-table headers into typed columns.
pub struct ColumnExtractor {
    /// "Return - daily (" / "Retorno - diária (" on the normalised header.
    re_return_header: Regex,
    /// "(2016)"
    re_year: Regex,
    /// "(02/06/2015 até 31/12/2015)"
    re_range: Regex,
    re_first_year: Regex,
    re_parenthesised: Regex,
}

impl Default for ColumnExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnExtractor {
    pub fn new() -> Self {
        Self {
            // A broken encoding turns "diária" into "diria", hence the optional letter.
            re_return_header: Regex::new(r"^(?:return|retorno)\s*-\s*(?:daily|di.?ria)\s*\(")
                .expect("static return header pattern"),
            re_year: Regex::new(r"\((\d{4})\)").expect("static year pattern"),
            re_range: Regex::new(r"\((\d{2}/\d{2}/\d{4}).*?(\d{2}/\d{2}/\d{4})\)")
                .expect("static date range pattern"),
            re_first_year: Regex::new(r"(\d{4})").expect("static year key pattern"),
            re_parenthesised: Regex::new(r"\((.*?)\)").expect("static parenthesis pattern"),
        }
    }

    /// Classifies every header. Unrecognised headers are ignored; this never fails.
    pub fn extract<S: AsRef<str>>(&self, headers: &[S]) -> ExtractedColumns {
        let mut out = ExtractedColumns::default();

        for header in headers {
            let raw = header.as_ref().trim();
            let normalized = normalize(raw);

            if self.re_return_header.is_match(&normalized) {
                if let Some(caps) = self.re_year.captures(raw) {
                    let year = caps[1].to_string();
                    push_return_column(&mut out.return_columns, Column::returns(year.clone(), year, Some(raw.to_string())));
                    continue;
                }

                if let Some(caps) = self.re_range.captures(raw) {
                    let start = &caps[1];
                    let end = &caps[2];
                    let start_year = &start[start.len() - 4..];
                    let end_year = &end[end.len() - 4..];

                    if start_year == end_year {
                        let marker = if is_full_calendar_year(start, end) { "" } else { "*" };
                        let label = format!("{end_year}{marker}");
                        push_return_column(
                            &mut out.return_columns,
                            Column::returns(label.clone(), label, Some(raw.to_string())),
                        );
                    } else {
                        out.total_period_source = Some(raw.to_string());
                    }
                    continue;
                }
            }

            if out.annualised_source.is_none() && is_annualised_return(&normalized) {
                out.annualised_source = Some(raw.to_string());
                continue;
            }
            if out.volatility_source.is_none()
                && (normalized.contains("volatility") || normalized.contains("volatilidade"))
            {
                out.volatility_source = Some(raw.to_string());
                continue;
            }
            if out.drawdown_source.is_none() && normalized.contains("drawdown") {
                out.drawdown_source = Some(raw.to_string());
            }
        }

        out.return_columns.sort_by_key(|c| self.year_key(&c.id));

        out.metric_columns = MetricId::ALL
            .into_iter()
            .map(|metric| {
                let mut column = Column::metric(metric);
                column.source = out.source_for(metric).map(str::to_string);
                column
            })
            .collect();

        tracing::debug!(
            returns = out.return_columns.len(),
            annualised = out.annualised_source.is_some(),
            volatility = out.volatility_source.is_some(),
            drawdown = out.drawdown_source.is_some(),
            "Columns extracted."
        );

        out
    }

    /// The first parenthesised text of a header, e.g. the period of the
    /// annualised return column.
    pub fn period_text(&self, header: &str) -> Option<String> {
        self.re_parenthesised
            .captures(header)
            .map(|caps| caps[1].trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn year_key(&self, id: &str) -> u32 {
        self.re_first_year
            .captures(id)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(NO_YEAR)
    }
}

/// The label of the excess return column, named after the risk-free asset.
pub fn excess_label(reference_name: &str) -> String {
    format!("Ann. ({reference_name}+)")
}

fn push_return_column(columns: &mut Vec<Column>, column: Column) {
    if columns.iter().any(|c| c.id == column.id) {
        tracing::warn!(column = %column.id, "Duplicate return column ignored.");
        return;
    }
    columns.push(column);
}

fn is_annualised_return(normalized: &str) -> bool {
    let annualised = ["annualized", "annualised", "anualizado"]
        .iter()
        .any(|word| normalized.contains(word));
    let returns = normalized.contains("return") || normalized.contains("retorno");
    annualised && returns
}

/// A range is a full year only if it starts on 01/01 and ends on 31/12.
fn is_full_calendar_year(start: &str, end: &str) -> bool {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok();
    match (parse(start), parse(end)) {
        (Some(s), Some(e)) => s.month() == 1 && s.day() == 1 && e.month() == 12 && e.day() == 31,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ColumnKind;
    use pretty_assertions::assert_eq;

    fn ids(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn recognises_yearly_and_partial_year_headers() {
        let headers = [
            "Nome",
            "Return - daily (2017)",
            "Return - daily (2016)",
            "Return - daily (02/06/2015 until 31/12/2015)",
            "Return - daily (01/01/2024 until 30/09/2024)",
        ];
        let out = ColumnExtractor::new().extract(&headers);

        assert_eq!(ids(&out.return_columns), vec!["2015*", "2016", "2017", "2024*"]);
        assert!(out.return_columns.iter().all(|c| c.kind == ColumnKind::Return));
        assert_eq!(
            out.return_columns[0].source.as_deref(),
            Some("Return - daily (02/06/2015 until 31/12/2015)")
        );
    }

    #[test]
    fn full_year_range_has_no_marker() {
        let out = ColumnExtractor::new().extract(&["Return - daily (01/01/2019 até 31/12/2019)"]);
        assert_eq!(ids(&out.return_columns), vec!["2019"]);
    }

    #[test]
    fn only_one_end_on_the_year_boundary_is_partial() {
        let out = ColumnExtractor::new().extract(&[
            "Return - daily (01/01/2020 até 30/12/2020)",
            "Return - daily (02/01/2021 até 31/12/2021)",
        ]);
        assert_eq!(ids(&out.return_columns), vec!["2020*", "2021*"]);
    }

    #[test]
    fn multi_year_range_is_the_total_period() {
        let header = "Return - daily (02/06/2015 até 31/12/2024)";
        let out = ColumnExtractor::new().extract(&[header]);
        assert!(out.return_columns.is_empty());
        assert_eq!(out.total_period_source.as_deref(), Some(header));
    }

    #[test]
    fn portuguese_and_mis_encoded_headers_are_recognised() {
        let out = ColumnExtractor::new().extract(&[
            "Retorno - diária (2018)",
            "Retorno - di\u{FFFD}ria (2019)",
            "Retorno - Anualizado (02/06/2015 até 31/12/2024)",
            "Volatilidade - anualizada",
            "Máximo Drawdown",
        ]);
        assert_eq!(ids(&out.return_columns), vec!["2018", "2019"]);
        assert_eq!(
            out.annualised_source.as_deref(),
            Some("Retorno - Anualizado (02/06/2015 até 31/12/2024)")
        );
        assert_eq!(out.volatility_source.as_deref(), Some("Volatilidade - anualizada"));
        assert_eq!(out.drawdown_source.as_deref(), Some("Máximo Drawdown"));
    }

    #[test]
    fn first_metric_candidate_wins() {
        let out = ColumnExtractor::new().extract(&[
            "Annualized Return (2015-2024)",
            "Annualised return (other)",
            "Volatility 1y",
            "Volatility 3y",
        ]);
        assert_eq!(out.annualised_source.as_deref(), Some("Annualized Return (2015-2024)"));
        assert_eq!(out.volatility_source.as_deref(), Some("Volatility 1y"));
    }

    #[test]
    fn metric_columns_are_always_present_in_fixed_order() {
        let out = ColumnExtractor::new().extract::<&str>(&[]);
        assert!(out.return_columns.is_empty());
        assert_eq!(
            ids(&out.metric_columns),
            vec!["annualised_excess", "annualised_total", "vol", "sharpe", "max_dd"]
        );
        assert!(out.metric_columns.iter().all(|c| c.source.is_none()));
    }

    #[test]
    fn metric_columns_remember_their_source() {
        let out = ColumnExtractor::new().extract(&["Max drawdown"]);
        let max_dd = out.metric_columns.iter().find(|c| c.id == "max_dd").expect("max_dd");
        assert_eq!(max_dd.source.as_deref(), Some("Max drawdown"));
    }

    #[test]
    fn duplicate_years_keep_the_first_header() {
        let out = ColumnExtractor::new().extract(&["Return - daily (2016)", "Retorno - diária (2016)"]);
        assert_eq!(out.return_columns.len(), 1);
        assert_eq!(out.return_columns[0].source.as_deref(), Some("Return - daily (2016)"));
    }

    #[test]
    fn all_lists_returns_before_metrics() {
        let out = ColumnExtractor::new().extract(&["Return - daily (2016)"]);
        let all = out.all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].id, "2016");
        assert_eq!(all[1].id, "annualised_excess");
    }

    #[test]
    fn period_text_reads_the_first_parenthesis() {
        let extractor = ColumnExtractor::new();
        assert_eq!(
            extractor.period_text("Retorno anualizado (02/06/2015 até 31/12/2024)").as_deref(),
            Some("02/06/2015 até 31/12/2024")
        );
        assert_eq!(extractor.period_text("Annualized return"), None);
        assert_eq!(extractor.period_text("Annualized return ()"), None);
    }

    #[test]
    fn excess_label_names_the_risk_free_asset() {
        assert_eq!(excess_label("CDI"), "Ann. (CDI+)");
    }
}
