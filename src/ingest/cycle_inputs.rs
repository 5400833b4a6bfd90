//! Conversion of raw snapshot rows into domain inputs for one cycle.
//!
//! This is where the permissive policy is applied: rows that cannot be used
//! are skipped, missing numbers become zero, and each decision is written to
//! the cycle's [`Diagnostics`].

use super::snapshot::{RawProductTestRow, RawScoreRow, Snapshot};
use crate::core::{CategoryScore, Channel, CompanyMeta, FoodVehicle, NutrientResult, ProductTestResult};
use crate::scoring::{CategoryMatch, CategoryNormalizer, DiagnosticKind, Diagnostics};
use std::collections::HashMap;

/// Row filters applied before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Keep rows explicitly marked `active = false`.
    pub include_inactive: bool,
}

impl RowFilter {
    fn keeps(&self, active: Option<bool>) -> bool {
        self.include_inactive || active.unwrap_or(true)
    }
}

/// Treatment of rows that carry no cycle id in a snapshot without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedRows {
    /// The caller named the cycle, so such rows belong to it.
    Adopt,
    /// Dropped, each with a [`DiagnosticKind::MissingCycleId`] record.
    Skip,
}

/// Domain inputs for one cycle, companies in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleInputs {
    pub cycle_id: String,
    pub companies: Vec<CompanyMeta>,
    pub category_scores: Vec<CategoryScore>,
    pub product_tests: Vec<ProductTestResult>,
}

impl CycleInputs {
    /// Category scores of one company.
    pub fn scores_for<'a>(&'a self, company_id: &'a str) -> impl Iterator<Item = &'a CategoryScore> {
        self.category_scores
            .iter()
            .filter(move |s| s.company_id == company_id)
    }

    pub fn product_tests_for(&self, company_id: &str) -> Vec<ProductTestResult> {
        self.product_tests
            .iter()
            .filter(|t| t.company_id == company_id)
            .cloned()
            .collect()
    }
}

/// Tracks companies in the order they first appear.
#[derive(Default)]
struct CompanyRegistry {
    order: Vec<CompanyMeta>,
    index: HashMap<String, usize>,
}

impl CompanyRegistry {
    fn touch(&mut self, id: &str, name: Option<&str>, tier: Option<&str>, size: Option<&str>) {
        let idx = match self.index.get(id) {
            Some(idx) => *idx,
            None => {
                self.order.push(CompanyMeta::new(id));
                self.index.insert(id.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        self.order[idx].absorb(name, tier, size);
    }
}

/// Collect the rows of `cycle_id` from `snapshot`.
pub fn collect_cycle_inputs(
    snapshot: &Snapshot,
    cycle_id: &str,
    filter: RowFilter,
    unassigned: UnassignedRows,
    diagnostics: &mut Diagnostics,
) -> CycleInputs {
    let mut registry = CompanyRegistry::default();
    let mut category_scores = Vec::new();
    let mut product_tests = Vec::new();

    let mut in_cycle = |row_cycle: Option<&String>, describe: &dyn Fn() -> String| {
        match (snapshot.row_cycle(row_cycle), unassigned) {
            (Some(row_cycle), _) => row_cycle == cycle_id,
            (None, UnassignedRows::Adopt) => true,
            (None, UnassignedRows::Skip) => {
                diagnostics.record(DiagnosticKind::MissingCycleId, None, describe());
                false
            }
        }
    };

    let scores: Vec<&RawScoreRow> = snapshot
        .scores
        .iter()
        .filter(|r| filter.keeps(r.active))
        .filter(|r| {
            in_cycle(r.cycle_id.as_ref(), &|| {
                format!(
                    "score row {} {:?}",
                    r.company_id.as_deref().unwrap_or("?"),
                    r.category.as_deref().unwrap_or("")
                )
            })
        })
        .collect();
    let tests: Vec<&RawProductTestRow> = snapshot
        .product_tests
        .iter()
        .filter(|r| filter.keeps(r.active))
        .filter(|r| {
            in_cycle(r.cycle_id.as_ref(), &|| {
                format!(
                    "product test {} brand {}",
                    r.company_id.as_deref().unwrap_or("?"),
                    r.brand_id.as_deref().unwrap_or("?")
                )
            })
        })
        .collect();

    for row in scores {
        let Some(company_id) = row.company_id.as_deref() else {
            diagnostics.record(
                DiagnosticKind::MissingCompanyId,
                None,
                format!("score row {:?}", row.category.as_deref().unwrap_or("")),
            );
            continue;
        };
        registry.touch(
            company_id,
            row.company_name.as_deref(),
            row.tier.as_deref(),
            row.size_category.as_deref(),
        );
        if let Some(score) = category_score(row, company_id, cycle_id, diagnostics) {
            category_scores.push(score);
        }
    }

    for row in tests {
        let Some(company_id) = row.company_id.as_deref() else {
            diagnostics.record(
                DiagnosticKind::MissingCompanyId,
                None,
                format!("product test brand {}", row.brand_id.as_deref().unwrap_or("?")),
            );
            continue;
        };
        registry.touch(company_id, row.company_name.as_deref(), None, None);
        product_tests.push(product_test(row, company_id, product_tests.len()));
    }

    CycleInputs {
        cycle_id: cycle_id.to_string(),
        companies: registry.order,
        category_scores,
        product_tests,
    }
}

fn category_score(
    row: &RawScoreRow,
    company_id: &str,
    cycle_id: &str,
    diagnostics: &mut Diagnostics,
) -> Option<CategoryScore> {
    let label = row.category.as_deref().unwrap_or("");
    let pillar = match CategoryNormalizer::normalize(label) {
        CategoryMatch::Pillar(pillar) => pillar,
        CategoryMatch::Unmapped => {
            diagnostics.record(DiagnosticKind::UnmappedCategory, Some(company_id), label);
            return None;
        }
    };

    let code = row.channel_type.as_deref().unwrap_or("");
    let Some(channel) = Channel::from_code(code) else {
        diagnostics.record(
            DiagnosticKind::UnknownChannel,
            Some(company_id),
            format!("type {:?} on {}", code, pillar),
        );
        return None;
    };

    let raw_value = match row.points() {
        Some(points) => points,
        None => {
            diagnostics.record(
                DiagnosticKind::MissingValue,
                Some(company_id),
                format!("{} {}", pillar, channel),
            );
            0.0
        }
    };

    if let Some(weight) = row.weight {
        if (weight - pillar.max_weight()).abs() > f64::EPSILON {
            diagnostics.record(
                DiagnosticKind::WeightMismatch,
                Some(company_id),
                format!(
                    "{} {} weight {} differs from pillar weight {}",
                    pillar,
                    channel,
                    weight,
                    pillar.max_weight()
                ),
            );
        }
    }

    Some(CategoryScore {
        company_id: company_id.to_string(),
        pillar,
        channel,
        raw_value,
        cycle_id: cycle_id.to_string(),
    })
}

fn product_test(row: &RawProductTestRow, company_id: &str, position: usize) -> ProductTestResult {
    let fortification = row.fortification.clone().unwrap_or_default();
    let nutrient_results = row
        .results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let micro = result.micro_nutrient.clone().unwrap_or_default();
            NutrientResult {
                nutrient_name: micro.name.unwrap_or_else(|| format!("nutrient-{}", idx + 1)),
                value: result.value,
                unit: micro.unit,
                expected_value: micro.expected_value,
                percent_compliance: result.percentage_compliance,
            }
        })
        .collect();

    ProductTestResult {
        company_id: company_id.to_string(),
        brand_id: row
            .brand_id
            .clone()
            .unwrap_or_else(|| format!("{}-brand-{}", company_id, position + 1)),
        brand_name: row.brand_name.clone(),
        food_vehicle: row
            .food_vehicle
            .as_deref()
            .map(FoodVehicle::from_label)
            .unwrap_or(FoodVehicle::Other),
        nutrient_results,
        aflatoxin_value: row.aflatoxin_value,
        aflatoxin_max_permitted: row.aflatoxin_max_permitted,
        fortification_score: fortification.score,
        aflatoxin_adjusted_score: fortification.overall_weighted_score,
        weighted_compliance: fortification.weighted_compliance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pillar;
    use crate::ingest::snapshot::RawFortification;

    fn row(company: &str, category: &str, channel: &str, value: Option<f64>) -> RawScoreRow {
        RawScoreRow {
            company_id: Some(company.into()),
            category: Some(category.into()),
            channel_type: Some(channel.into()),
            value,
            ..RawScoreRow::default()
        }
    }

    fn collect(snap: &Snapshot, diagnostics: &mut Diagnostics) -> CycleInputs {
        collect_cycle_inputs(
            snap,
            "2024",
            RowFilter::default(),
            UnassignedRows::Adopt,
            diagnostics,
        )
    }

    fn snapshot(scores: Vec<RawScoreRow>) -> Snapshot {
        Snapshot {
            cycle_id: Some("2024".into()),
            scores,
            product_tests: vec![],
        }
    }

    #[test]
    fn companies_keep_first_seen_order() {
        let snap = snapshot(vec![
            row("b", "Public Engagement", "SAT", Some(5.0)),
            row("a", "Public Engagement", "SAT", Some(5.0)),
            row("b", "Personnel", "IVC", Some(5.0)),
        ]);
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        let ids: Vec<&str> = inputs.companies.iter().map(|c| c.company_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(inputs.scores_for("b").count(), 2);
    }

    #[test]
    fn unmapped_and_unknown_rows_are_dropped_with_diagnostics() {
        let snap = snapshot(vec![
            row("a", "Misc", "SAT", Some(5.0)),
            row("a", "Public Engagement", "XYZ", Some(5.0)),
            row("a", "Public Engagement", "IEG", Some(2.0)),
        ]);
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        assert_eq!(inputs.category_scores.len(), 1);
        assert_eq!(inputs.category_scores[0].pillar, Pillar::Pe);
        assert_eq!(diagnostics.unmapped_labels(), vec!["Misc"]);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnknownChannel).count(), 1);
        // the company still exists even if all its rows were unusable
        assert_eq!(inputs.companies.len(), 1);
    }

    #[test]
    fn missing_value_becomes_zero() {
        let snap = snapshot(vec![row("a", "PMS", "SAT", None)]);
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        assert_eq!(inputs.category_scores[0].raw_value, 0.0);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::MissingValue).count(), 1);
    }

    #[test]
    fn inactive_rows_are_filtered_unless_requested() {
        let mut inactive = row("a", "PMS", "SAT", Some(3.0));
        inactive.active = Some(false);
        let snap = snapshot(vec![inactive]);

        let mut diagnostics = Diagnostics::new();
        let default = collect(&snap, &mut diagnostics);
        assert!(default.companies.is_empty());

        let all = collect_cycle_inputs(
            &snap,
            "2024",
            RowFilter {
                include_inactive: true,
            },
            UnassignedRows::Adopt,
            &mut diagnostics,
        );
        assert_eq!(all.category_scores.len(), 1);
    }

    #[test]
    fn rows_from_other_cycles_are_ignored() {
        let mut other = row("a", "PMS", "SAT", Some(3.0));
        other.cycle_id = Some("2023".into());
        let snap = snapshot(vec![other, row("b", "PMS", "SAT", Some(4.0))]);
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        assert_eq!(inputs.companies.len(), 1);
        assert_eq!(inputs.companies[0].company_id, "b");
    }

    #[test]
    fn product_test_fields_are_mapped() {
        let snap = Snapshot {
            cycle_id: Some("2024".into()),
            scores: vec![],
            product_tests: vec![RawProductTestRow {
                company_id: Some("a".into()),
                food_vehicle: Some("Maize Flour".into()),
                fortification: Some(RawFortification {
                    score: Some(18.0),
                    overall_weighted_score: Some(22.0),
                    weighted_compliance: None,
                }),
                ..RawProductTestRow::default()
            }],
        };
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        let test = &inputs.product_tests[0];
        assert_eq!(test.food_vehicle, FoodVehicle::Maize);
        assert_eq!(test.brand_id, "a-brand-1");
        assert_eq!(test.aflatoxin_adjusted_score, Some(22.0));
        assert_eq!(test.fortification_score, Some(18.0));
    }

    #[test]
    fn named_cycle_adopts_rows_without_cycle_id() {
        let snap = Snapshot {
            cycle_id: None,
            scores: vec![row("a", "PMS", "IVC", Some(12.0))],
            product_tests: vec![],
        };
        let mut diagnostics = Diagnostics::new();
        let inputs = collect(&snap, &mut diagnostics);

        assert_eq!(inputs.category_scores.len(), 1);
        assert_eq!(inputs.category_scores[0].cycle_id, "2024");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn skipped_rows_without_cycle_id_are_reported() {
        let mut dated = row("a", "PMS", "IVC", Some(12.0));
        dated.cycle_id = Some("2024".into());
        let snap = Snapshot {
            cycle_id: None,
            scores: vec![dated, row("b", "PMS", "IVC", Some(9.0))],
            product_tests: vec![RawProductTestRow {
                company_id: Some("b".into()),
                ..RawProductTestRow::default()
            }],
        };
        let mut diagnostics = Diagnostics::new();
        let inputs = collect_cycle_inputs(
            &snap,
            "2024",
            RowFilter::default(),
            UnassignedRows::Skip,
            &mut diagnostics,
        );

        assert_eq!(inputs.companies.len(), 1);
        assert_eq!(inputs.companies[0].company_id, "a");
        assert_eq!(diagnostics.of_kind(DiagnosticKind::MissingCycleId).count(), 2);
    }
}
