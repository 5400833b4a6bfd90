//! Aggregate statistics over one cycle's results.

use crate::scoring::{CompanyRecord, FortificationBand, ProductTestSummary, VarianceFlag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl ScoreStatistics {
    /// `None` for an empty input. Non-finite values are ignored.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub company_count: usize,
    pub final_score: Option<ScoreStatistics>,
    pub self_reported_total: Option<ScoreStatistics>,
    pub validated_total: Option<ScoreStatistics>,
    pub expert_total: Option<ScoreStatistics>,
    pub product_test_score: Option<ScoreStatistics>,
    pub variance_pairs: usize,
    pub flagged_variance_pairs: usize,
    /// Product tests per compliance band, keyed by band label.
    pub band_distribution: BTreeMap<String, usize>,
    pub diagnostic_count: usize,
}

impl CycleSummary {
    pub fn build(
        companies: &[CompanyRecord],
        variance_flags: &[VarianceFlag],
        product_tests: &[ProductTestSummary],
        diagnostic_count: usize,
    ) -> Self {
        let stats = |f: fn(&CompanyRecord) -> f64| ScoreStatistics::from_values(companies.iter().map(f));

        let band_distribution = product_tests.iter().fold(BTreeMap::new(), |mut acc, test| {
            *acc.entry(test.compliance_band.label().to_string())
                .or_insert(0) += 1;
            acc
        });

        Self {
            company_count: companies.len(),
            final_score: stats(|c| c.final_score),
            self_reported_total: stats(|c| c.self_reported_total),
            validated_total: stats(|c| c.validated_total),
            expert_total: stats(|c| c.expert_total),
            product_test_score: ScoreStatistics::from_values(
                companies.iter().filter_map(|c| c.pt_score),
            ),
            variance_pairs: variance_flags.len(),
            flagged_variance_pairs: variance_flags.iter().filter(|f| f.exceeded_threshold).count(),
            band_distribution,
            diagnostic_count,
        }
    }

    pub fn band_count(&self, band: FortificationBand) -> usize {
        self.band_distribution.get(band.label()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_odd_count() {
        let stats = ScoreStatistics::from_values([3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn statistics_of_even_count() {
        let stats = ScoreStatistics::from_values([10.0, 40.0, 20.0, 30.0]).unwrap();
        assert_eq!(stats.median, 25.0);
        assert_eq!(stats.mean, 25.0);
    }

    #[test]
    fn statistics_ignore_non_finite() {
        let stats = ScoreStatistics::from_values([f64::NAN, 5.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert!(ScoreStatistics::from_values(Vec::<f64>::new()).is_none());
    }
}
