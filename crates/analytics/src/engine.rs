use core_types::text::normalize;
use core_types::{Asset, MetricId};

/// The risk-free asset as resolved by `MetricDeriver::derive`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceMetrics {
    /// Id of the risk-free asset, `None` when no asset matched its name.
    pub asset_id: Option<String>,
    /// Its annualised total return.
    pub annualised: Option<f64>,
}

/// A stateless calculator for the metrics derived from the risk-free asset.
#[derive(Debug, Default)]
pub struct MetricDeriver {}

impl MetricDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the asset whose source or display name matches `reference_name`,
    /// ignoring case and accents.
    pub fn find_reference<'a>(&self, assets: &'a [Asset], reference_name: &str) -> Option<&'a Asset> {
        let key = normalize(reference_name);
        if key.is_empty() {
            return None;
        }
        assets
            .iter()
            .find(|a| normalize(&a.source_name) == key || normalize(&a.display) == key)
    }

    /// Adds `annualised_excess` and `sharpe` to every asset in place.
    ///
    /// # Arguments
    ///
    /// * `assets` - Assets carrying their parsed `annualised_total` and `vol`.
    /// * `reference_name` - Configured name of the risk-free asset (e.g. "CDI").
    ///
    /// # Returns
    ///
    /// The resolved risk-free asset. When it is not found every excess and
    /// Sharpe value is `None`.
    pub fn derive(&self, assets: &mut [Asset], reference_name: &str) -> ReferenceMetrics {
        let reference = match self.find_reference(assets, reference_name) {
            Some(asset) => ReferenceMetrics {
                asset_id: Some(asset.id.clone()),
                annualised: asset.value(MetricId::AnnualisedTotal.id()),
            },
            None => {
                tracing::warn!(
                    reference = reference_name,
                    "Risk-free asset not found; excess return and Sharpe are unavailable."
                );
                ReferenceMetrics::default()
            }
        };

        for asset in assets.iter_mut() {
            let total = asset.value(MetricId::AnnualisedTotal.id());
            let vol = asset.value(MetricId::Vol.id());

            let excess = match (total, reference.annualised) {
                (Some(total), Some(rf)) => Some(total - rf),
                _ => None,
            };
            let sharpe = match (excess, vol) {
                (Some(excess), Some(vol)) if vol != 0.0 => Some(excess / vol),
                _ => None,
            };

            asset.set_value(MetricId::AnnualisedExcess.id(), excess.filter(|v| v.is_finite()));
            asset.set_value(MetricId::Sharpe.id(), sharpe.filter(|v| v.is_finite()));
        }

        tracing::debug!(
            reference = ?reference.asset_id,
            risk_free = ?reference.annualised,
            assets = assets.len(),
            "Derived excess return and Sharpe."
        );

        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, total: Option<f64>, vol: Option<f64>) -> Asset {
        Asset::new(id, id.to_uppercase())
            .with_value("annualised_total", total)
            .with_value("vol", vol)
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-12)
    }

    #[test]
    fn derives_excess_and_sharpe_against_the_reference() {
        let mut assets = vec![
            asset("cdi", Some(0.10), Some(0.01)),
            asset("ibov", Some(0.15), Some(0.25)),
        ];

        let reference = MetricDeriver::new().derive(&mut assets, "CDI");

        assert_eq!(reference.asset_id.as_deref(), Some("cdi"));
        assert_eq!(reference.annualised, Some(0.10));
        assert!(approx(assets[1].value("annualised_excess"), 0.05));
        assert!(approx(assets[1].value("sharpe"), 0.2));
        assert!(approx(assets[0].value("annualised_excess"), 0.0));
        assert!(approx(assets[0].value("sharpe"), 0.0));
    }

    #[test]
    fn reference_match_ignores_case_and_accents() {
        let mut assets = vec![Asset::new("x", "Crédito Privado")];
        let deriver = MetricDeriver::new();
        assert!(deriver.find_reference(&assets, "credito privado").is_some());
        assert!(deriver.find_reference(&assets, "").is_none());

        assets[0].source_name = "CDI - Taxa".to_string();
        assets[0].display = "Taxa".to_string();
        assert!(deriver.find_reference(&assets, "cdi - taxa").is_some());
    }

    #[test]
    fn missing_reference_nulls_every_derived_value() {
        let mut assets = vec![asset("ibov", Some(0.15), Some(0.25))];

        let reference = MetricDeriver::new().derive(&mut assets, "CDI");

        assert_eq!(reference, ReferenceMetrics::default());
        assert_eq!(assets[0].values.get("annualised_excess"), Some(&None));
        assert_eq!(assets[0].values.get("sharpe"), Some(&None));
    }

    #[test]
    fn sharpe_requires_a_non_zero_volatility() {
        let mut assets = vec![
            asset("cdi", Some(0.10), Some(0.0)),
            asset("flat", Some(0.12), Some(0.0)),
            asset("novol", Some(0.12), None),
            asset("nototal", None, Some(0.2)),
        ];

        MetricDeriver::new().derive(&mut assets, "cdi");

        assert!(approx(assets[1].value("annualised_excess"), 0.02));
        assert_eq!(assets[1].value("sharpe"), None);
        assert_eq!(assets[2].value("sharpe"), None);
        assert_eq!(assets[3].value("annualised_excess"), None);
        assert_eq!(assets[3].value("sharpe"), None);
    }

    #[test]
    fn reference_without_annualised_return_nulls_excess() {
        let mut assets = vec![asset("cdi", None, Some(0.01)), asset("ibov", Some(0.15), Some(0.25))];

        let reference = MetricDeriver::new().derive(&mut assets, "cdi");

        assert_eq!(reference.asset_id.as_deref(), Some("cdi"));
        assert_eq!(reference.annualised, None);
        assert_eq!(assets[1].value("annualised_excess"), None);
    }
}
