//! Raw snapshot rows as delivered by the data-fetch layer.

use super::lenient;
use crate::errors::{FortimapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to score one or more cycles.
///
/// Rows without their own `cycle_id` belong to the snapshot-level `cycle_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient::text")]
    pub cycle_id: Option<String>,
    #[serde(default)]
    pub scores: Vec<RawScoreRow>,
    #[serde(default, alias = "productTests")]
    pub product_tests: Vec<RawProductTestRow>,
}

/// One category score row for one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScoreRow {
    #[serde(default, deserialize_with = "lenient::text", alias = "companyId")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "companyName")]
    pub company_name: Option<String>,
    /// Free-text category or pillar label.
    #[serde(default, deserialize_with = "lenient::text", alias = "pillar")]
    pub category: Option<String>,
    /// Channel code: SAT, IVC or IEG.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::text",
        alias = "channel"
    )]
    pub channel_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "sizeCategory")]
    pub size_category: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text", alias = "cycleId")]
    pub cycle_id: Option<String>,
}

impl RawScoreRow {
    /// `value` when present, otherwise `score`.
    pub fn points(&self) -> Option<f64> {
        self.value.or(self.score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMicroNutrient {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", alias = "expectedValue")]
    pub expected_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNutrientResult {
    #[serde(default, rename = "microNutrient", alias = "micro_nutrient")]
    pub micro_nutrient: Option<RawMicroNutrient>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        alias = "percentageCompliance"
    )]
    pub percentage_compliance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFortification {
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(
        default,
        rename = "overallKMFIWeightedScore",
        alias = "overall_kmfi_weighted_score",
        deserialize_with = "lenient::number"
    )]
    pub overall_weighted_score: Option<f64>,
    #[serde(
        default,
        rename = "weightedCompliance",
        alias = "weighted_compliance",
        deserialize_with = "lenient::number"
    )]
    pub weighted_compliance: Option<f64>,
}

/// One brand's laboratory product-test row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProductTestRow {
    #[serde(default, deserialize_with = "lenient::text", alias = "companyId")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "brandId")]
    pub brand_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "brandName")]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", alias = "foodVehicle")]
    pub food_vehicle: Option<String>,
    #[serde(default)]
    pub results: Vec<RawNutrientResult>,
    #[serde(default)]
    pub fortification: Option<RawFortification>,
    #[serde(
        default,
        rename = "aflatoxinValue",
        alias = "aflatoxin_value",
        deserialize_with = "lenient::number"
    )]
    pub aflatoxin_value: Option<f64>,
    #[serde(
        default,
        alias = "aflatoxinMaxPermitted",
        deserialize_with = "lenient::number"
    )]
    pub aflatoxin_max_permitted: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text", alias = "cycleId")]
    pub cycle_id: Option<String>,
}

impl Snapshot {
    pub fn from_json_str(contents: &str) -> Result<Snapshot> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Snapshot> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FortimapError::file_system("Failed to read snapshot", path, e))?;
        let snapshot = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            scores = snapshot.scores.len(),
            product_tests = snapshot.product_tests.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Distinct cycle identifiers in first-seen order.
    pub fn cycle_ids(&self) -> Vec<String> {
        let row_cycles = self
            .scores
            .iter()
            .map(|r| r.cycle_id.as_ref())
            .chain(self.product_tests.iter().map(|r| r.cycle_id.as_ref()));

        let mut ids: Vec<String> = Vec::new();
        for cycle in row_cycles {
            if let Some(id) = cycle.or(self.cycle_id.as_ref()) {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        if ids.is_empty() {
            if let Some(id) = &self.cycle_id {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Rows that name no cycle in a snapshot that names none either.
    pub fn unassigned_row_count(&self) -> usize {
        if self.cycle_id.is_some() {
            return 0;
        }
        let scores = self.scores.iter().filter(|r| r.cycle_id.is_none()).count();
        let tests = self.product_tests.iter().filter(|r| r.cycle_id.is_none()).count();
        scores + tests
    }

    /// Cycle a row belongs to, falling back to the snapshot cycle.
    pub fn row_cycle<'a>(&'a self, row_cycle: Option<&'a String>) -> Option<&'a str> {
        row_cycle.or(self.cycle_id.as_ref()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_mixed_field_types() {
        let snapshot = Snapshot::from_json_str(indoc! {r#"
            {
              "cycle_id": 2024,
              "scores": [
                {"company_id": 17, "category": "SAT Public Engagement", "type": "SAT",
                 "score": "8.5", "weight": 10, "active": "true"}
              ],
              "product_tests": [
                {"company_id": "17", "brand_id": 3, "food_vehicle": "Maize Flour",
                 "results": [{"microNutrient": {"name": "Iron", "unit": "mg/kg", "expected_value": 40},
                              "value": 30, "percentage_compliance": 75}],
                 "fortification": {"score": 18, "overallKMFIWeightedScore": "22"},
                 "aflatoxinValue": 4, "aflatoxin_max_permitted": 10}
              ]
            }
        "#})
        .unwrap();

        assert_eq!(snapshot.cycle_id.as_deref(), Some("2024"));
        let row = &snapshot.scores[0];
        assert_eq!(row.company_id.as_deref(), Some("17"));
        assert_eq!(row.points(), Some(8.5));
        assert_eq!(row.active, Some(true));

        let test = &snapshot.product_tests[0];
        assert_eq!(test.brand_id.as_deref(), Some("3"));
        let fortification = test.fortification.as_ref().unwrap();
        assert_eq!(fortification.overall_weighted_score, Some(22.0));
        assert_eq!(test.results[0].percentage_compliance, Some(75.0));
        assert_eq!(test.aflatoxin_max_permitted, Some(10.0));
    }

    #[test]
    fn value_takes_precedence_over_score() {
        let row = RawScoreRow {
            score: Some(3.0),
            value: Some(4.0),
            ..RawScoreRow::default()
        };
        assert_eq!(row.points(), Some(4.0));
    }

    #[test]
    fn cycle_ids_in_first_seen_order() {
        let snapshot = Snapshot {
            cycle_id: Some("base".into()),
            scores: vec![
                RawScoreRow {
                    cycle_id: Some("2023".into()),
                    ..RawScoreRow::default()
                },
                RawScoreRow::default(),
                RawScoreRow {
                    cycle_id: Some("2023".into()),
                    ..RawScoreRow::default()
                },
            ],
            product_tests: vec![],
        };
        assert_eq!(snapshot.cycle_ids(), vec!["2023".to_string(), "base".to_string()]);
    }

    #[test]
    fn empty_snapshot_uses_top_level_cycle() {
        let snapshot = Snapshot::from_json_str(r#"{"cycle_id": "2025"}"#).unwrap();
        assert_eq!(snapshot.cycle_ids(), vec!["2025".to_string()]);
        assert!(snapshot.scores.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Snapshot::from_json_str("[not json").is_err());
    }
}
