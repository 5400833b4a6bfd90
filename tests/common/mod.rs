// Shared fixtures for fortimap integration tests
#![allow(dead_code)]

use fortimap::scoring::VarianceThresholds;
use fortimap::{EngineSettings, RowFilter, Snapshot};
use indoc::indoc;

/// One company, five validated pillars (82 points), one maize brand with an
/// aflatoxin-adjusted overall of 22 and plain fortification of 18, expert 16.
pub const SCENARIO_SNAPSHOT: &str = indoc! {r#"
    {
      "cycle_id": "2024",
      "scores": [
        {"company_id": "c1", "company_name": "Crescent Mills", "tier": "TIER_1", "size_category": "large",
         "category": "Personnel & Management Systems", "type": "IVC", "score": 12, "weight": 15},
        {"company_id": "c1", "category": "Production, Continuous Improvement & Innovation", "type": "IVC", "score": "20"},
        {"company_id": "c1", "category": "Procurement & Inputs Management", "type": "IVC", "score": 22},
        {"company_id": "c1", "category": "Public Engagement", "type": "SAT(V)", "score": 8},
        {"company_id": "c1", "category": "Government & Legislation Compliance", "type": "IVC", "value": 20},
        {"company_id": "c1", "category": "Personnel & Management Systems", "type": "IEG", "score": 6},
        {"company_id": "c1", "category": "Procurement & Inputs Management", "type": "IEG", "score": 10},
        {"company_id": "c1", "category": "Personnel & Management Systems", "type": "SAT", "score": 15},
        {"company_id": "c1", "category": "Production, Continuous Improvement & Innovation", "type": "SAT", "score": 25}
      ],
      "product_tests": [
        {"company_id": "c1", "brand_id": "c1-maize", "brand_name": "Golden Meal", "food_vehicle": "Maize Flour",
         "results": [
           {"microNutrient": {"name": "Vitamin A", "unit": "mg/kg", "expected_value": 2}, "value": 1.8, "percentage_compliance": 90},
           {"microNutrient": {"name": "Iron", "unit": "mg/kg", "expected_value": 40}, "value": 30, "percentage_compliance": 75}
         ],
         "fortification": {"score": 18, "overallKMFIWeightedScore": 22, "weightedCompliance": 82.5},
         "aflatoxinValue": 4, "aflatoxin_max_permitted": 10}
      ]
    }
"#};

pub fn scenario_snapshot() -> Snapshot {
    Snapshot::from_json_str(SCENARIO_SNAPSHOT).expect("scenario snapshot parses")
}

pub fn default_settings() -> EngineSettings {
    EngineSettings::new(
        VarianceThresholds {
            self_vs_validated_points: 10.0,
            validated_vs_expert_points: 10.0,
            pillar_percent: 5.0,
        },
        RowFilter::default(),
    )
}

/// Snapshot of `count` companies with identical validated scores.
pub fn tied_snapshot(count: usize) -> Snapshot {
    let scores: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"company_id": "co-{i}", "category": "PMS", "type": "IVC", "score": 10}}"#
            )
        })
        .collect();
    Snapshot::from_json_str(&format!(
        r#"{{"cycle_id": "2024", "scores": [{}]}}"#,
        scores.join(",")
    ))
    .expect("tied snapshot parses")
}
