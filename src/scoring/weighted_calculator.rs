//! Channel totals and product-test score resolution.
//!
//! Pillar contributions arrive already expressed as weighted points. The
//! calculator groups them into a [`PillarMatrix`], sums each channel across
//! the five pillars, and picks the product-test score path dictated by the
//! food vehicle. Nothing here rescales values: validated, product-test and
//! expert contributions leave in the same units they arrived in.

use crate::core::{CategoryScore, Channel, Pillar, ProductTestResult};
use crate::scoring::diagnostics::{DiagnosticKind, Diagnostics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coerce a possibly non-finite value to zero for summation.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Per-company grid of pillar × channel scores.
///
/// `None` marks a cell no row reported. Unknown cells stay distinguishable for
/// display but add nothing to channel totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PillarMatrix {
    cells: [[Option<f64>; 3]; 5],
}

impl PillarMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pillar: Pillar, channel: Channel) -> Option<f64> {
        self.cells[pillar.index()][channel.index()]
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, pillar: Pillar, channel: Channel, value: f64) -> Self {
        self.cells[pillar.index()][channel.index()] = Some(value);
        self
    }

    fn accumulate(&mut self, pillar: Pillar, channel: Channel, value: f64) {
        let cell = &mut self.cells[pillar.index()][channel.index()];
        *cell = Some(cell.unwrap_or(0.0) + value);
    }

    /// Sum of known pillar values for one channel; unknown cells count as zero.
    pub fn channel_total(&self, channel: Channel) -> f64 {
        Pillar::ALL
            .iter()
            .map(|p| self.get(*p, channel).map(finite_or_zero).unwrap_or(0.0))
            .sum()
    }

    /// True when at least one pillar has a value for `channel`.
    pub fn has_any(&self, channel: Channel) -> bool {
        Pillar::ALL.iter().any(|p| self.get(*p, channel).is_some())
    }

    /// True when every pillar has a value for `channel`.
    pub fn is_complete(&self, channel: Channel) -> bool {
        Pillar::ALL.iter().all(|p| self.get(*p, channel).is_some())
    }

    pub fn to_map(&self) -> BTreeMap<Pillar, BTreeMap<Channel, Option<f64>>> {
        Pillar::ALL
            .iter()
            .map(|pillar| {
                let by_channel = Channel::ALL
                    .iter()
                    .map(|channel| (*channel, self.get(*pillar, *channel)))
                    .collect();
                (*pillar, by_channel)
            })
            .collect()
    }
}

/// Channel sums for one company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTotals {
    pub self_reported: f64,
    pub validated: f64,
    pub expert: f64,
}

impl ChannelTotals {
    pub fn from_matrix(matrix: &PillarMatrix) -> Self {
        Self {
            self_reported: matrix.channel_total(Channel::SelfReported),
            validated: matrix.channel_total(Channel::Validated),
            expert: matrix.channel_total(Channel::ExpertPanel),
        }
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::SelfReported => self.self_reported,
            Channel::Validated => self.validated,
            Channel::ExpertPanel => self.expert,
        }
    }
}

/// Which product-test field supplied the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTestPath {
    AflatoxinAdjusted,
    Fortification,
}

/// Resolved product-test score for one brand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductTestResolution {
    pub score: f64,
    pub path: ProductTestPath,
    /// The selected field was missing or non-finite and was coerced to zero.
    pub coerced: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScoreCalculator;

impl WeightedScoreCalculator {
    /// Group one company's category scores into a matrix.
    ///
    /// Several rows for the same pillar and channel (sub-categories) are summed.
    /// A cell that ends up outside `0..=max_weight` is clamped and reported.
    pub fn pillar_matrix<'a>(
        company_id: &str,
        scores: impl IntoIterator<Item = &'a CategoryScore>,
        diagnostics: &mut Diagnostics,
    ) -> PillarMatrix {
        let mut matrix = PillarMatrix::new();
        for score in scores {
            matrix.accumulate(score.pillar, score.channel, finite_or_zero(score.raw_value));
        }

        for pillar in Pillar::ALL {
            for channel in Channel::ALL {
                let Some(value) = matrix.get(pillar, channel) else {
                    continue;
                };
                let clamped = value.clamp(0.0, pillar.max_weight());
                if clamped != value {
                    diagnostics.record(
                        DiagnosticKind::ClampedValue,
                        Some(company_id),
                        format!(
                            "{} {} value {:.2} clamped to {:.2}",
                            pillar, channel, value, clamped
                        ),
                    );
                    matrix.cells[pillar.index()][channel.index()] = Some(clamped);
                }
            }
        }
        matrix
    }

    pub fn channel_totals(matrix: &PillarMatrix) -> ChannelTotals {
        ChannelTotals::from_matrix(matrix)
    }

    /// Pick the product-test score by vehicle capability, never by which fields
    /// happen to be populated.
    pub fn resolve_product_test(test: &ProductTestResult) -> ProductTestResolution {
        let (raw, path) = if test.food_vehicle.requires_aflatoxin() {
            (test.aflatoxin_adjusted_score, ProductTestPath::AflatoxinAdjusted)
        } else {
            (test.fortification_score, ProductTestPath::Fortification)
        };
        match raw.filter(|v| v.is_finite()) {
            Some(score) => ProductTestResolution {
                score,
                path,
                coerced: false,
            },
            None => ProductTestResolution {
                score: 0.0,
                path,
                coerced: true,
            },
        }
    }

    /// Resolve every brand and record a diagnostic for each coerced score.
    pub fn resolve_product_tests(
        tests: &[ProductTestResult],
        diagnostics: &mut Diagnostics,
    ) -> Vec<ProductTestResolution> {
        tests
            .iter()
            .map(|test| {
                let resolution = Self::resolve_product_test(test);
                if resolution.coerced {
                    let kind = match resolution.path {
                        ProductTestPath::AflatoxinAdjusted => {
                            DiagnosticKind::MissingAflatoxinAdjustedScore
                        }
                        ProductTestPath::Fortification => DiagnosticKind::MissingFortificationScore,
                    };
                    diagnostics.record(
                        kind,
                        Some(&test.company_id),
                        format!("brand {} ({})", test.brand_id, test.food_vehicle),
                    );
                }
                resolution
            })
            .collect()
    }

    /// Company-level product-test score: the mean over its brands, or `None`
    /// when the company has no product tests in the cycle.
    pub fn company_product_test_score(resolutions: &[ProductTestResolution]) -> Option<f64> {
        if resolutions.is_empty() {
            return None;
        }
        let sum: f64 = resolutions.iter().map(|r| r.score).sum();
        Some(sum / resolutions.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FoodVehicle;

    fn score(pillar: Pillar, channel: Channel, value: f64) -> CategoryScore {
        CategoryScore {
            company_id: "c-1".into(),
            pillar,
            channel,
            raw_value: value,
            cycle_id: "2024".into(),
        }
    }

    fn product_test(
        vehicle: FoodVehicle,
        fortification: Option<f64>,
        adjusted: Option<f64>,
    ) -> ProductTestResult {
        ProductTestResult {
            company_id: "c-1".into(),
            brand_id: "b-1".into(),
            brand_name: None,
            food_vehicle: vehicle,
            nutrient_results: vec![],
            aflatoxin_value: None,
            aflatoxin_max_permitted: None,
            fortification_score: fortification,
            aflatoxin_adjusted_score: adjusted,
            weighted_compliance: None,
        }
    }

    #[test]
    fn validated_total_sums_pillars() {
        let values = [12.0, 20.0, 22.0, 8.0, 20.0];
        let scores: Vec<_> = Pillar::ALL
            .iter()
            .zip(values)
            .map(|(p, v)| score(*p, Channel::Validated, v))
            .collect();
        let mut diagnostics = Diagnostics::new();
        let matrix = WeightedScoreCalculator::pillar_matrix("c-1", &scores, &mut diagnostics);

        let totals = WeightedScoreCalculator::channel_totals(&matrix);
        assert_eq!(totals.validated, 82.0);
        assert_eq!(totals.self_reported, 0.0);
        assert!(matrix.is_complete(Channel::Validated));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_pillars_contribute_zero() {
        let scores = vec![
            score(Pillar::Pms, Channel::ExpertPanel, 4.0),
            score(Pillar::Glc, Channel::ExpertPanel, 6.5),
        ];
        let mut diagnostics = Diagnostics::new();
        let matrix = WeightedScoreCalculator::pillar_matrix("c-1", &scores, &mut diagnostics);

        assert_eq!(matrix.channel_total(Channel::ExpertPanel), 10.5);
        assert_eq!(matrix.get(Pillar::Pe, Channel::ExpertPanel), None);
        assert!(!matrix.is_complete(Channel::ExpertPanel));
    }

    #[test]
    fn sub_category_rows_accumulate_then_clamp() {
        let scores = vec![
            score(Pillar::Pe, Channel::SelfReported, 7.0),
            score(Pillar::Pe, Channel::SelfReported, 6.0),
        ];
        let mut diagnostics = Diagnostics::new();
        let matrix = WeightedScoreCalculator::pillar_matrix("c-1", &scores, &mut diagnostics);

        assert_eq!(matrix.get(Pillar::Pe, Channel::SelfReported), Some(10.0));
        assert_eq!(diagnostics.of_kind(DiagnosticKind::ClampedValue).count(), 1);
    }

    #[test]
    fn maize_takes_aflatoxin_adjusted_path() {
        let test = product_test(FoodVehicle::Maize, Some(18.0), Some(22.0));
        let resolution = WeightedScoreCalculator::resolve_product_test(&test);
        assert_eq!(resolution.score, 22.0);
        assert_eq!(resolution.path, ProductTestPath::AflatoxinAdjusted);
        assert!(!resolution.coerced);
    }

    #[test]
    fn wheat_ignores_populated_adjusted_score() {
        let test = product_test(FoodVehicle::Wheat, Some(18.0), Some(22.0));
        let resolution = WeightedScoreCalculator::resolve_product_test(&test);
        assert_eq!(resolution.score, 18.0);
        assert_eq!(resolution.path, ProductTestPath::Fortification);
    }

    #[test]
    fn maize_without_adjusted_score_is_zero_not_fallback() {
        let tests = vec![product_test(FoodVehicle::Maize, Some(18.0), None)];
        let mut diagnostics = Diagnostics::new();
        let resolutions = WeightedScoreCalculator::resolve_product_tests(&tests, &mut diagnostics);

        assert_eq!(resolutions[0].score, 0.0);
        assert!(resolutions[0].coerced);
        assert_eq!(
            diagnostics
                .of_kind(DiagnosticKind::MissingAflatoxinAdjustedScore)
                .count(),
            1
        );
    }

    #[test]
    fn company_score_is_mean_of_brands() {
        let resolutions = vec![
            ProductTestResolution {
                score: 20.0,
                path: ProductTestPath::Fortification,
                coerced: false,
            },
            ProductTestResolution {
                score: 25.0,
                path: ProductTestPath::Fortification,
                coerced: false,
            },
        ];
        assert_eq!(
            WeightedScoreCalculator::company_product_test_score(&resolutions),
            Some(22.5)
        );
        assert_eq!(WeightedScoreCalculator::company_product_test_score(&[]), None);
    }

    #[test]
    fn to_map_exposes_every_cell() {
        let matrix = PillarMatrix::new().with(Pillar::Pim, Channel::Validated, 9.0);
        let map = matrix.to_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map[&Pillar::Pim][&Channel::Validated], Some(9.0));
        assert_eq!(map[&Pillar::Pim][&Channel::SelfReported], None);
    }
}
