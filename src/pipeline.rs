//! Cycle computation: snapshot rows in, [`CycleReport`] out.
//!
//! Everything below `compute_cycle` is pure. The only parallelism is across
//! cycles in [`compute_all_cycles`]; a single cycle is computed sequentially so
//! company order and tie-breaks stay deterministic.

use crate::ingest::{collect_cycle_inputs, CycleInputs, RowFilter, Snapshot, UnassignedRows};
use crate::report::{CycleReport, CycleSummary};
use crate::scoring::{
    CompanyScorecard, CompositeIndexRanker, Diagnostics, ProductTestSummary,
    TriangulationAggregator, VarianceAnalyzer, VarianceThresholds, WeightedScoreCalculator,
};
use rayon::prelude::*;

/// Settings that influence scoring, resolved from configuration and flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub variance: VarianceThresholds,
    pub row_filter: RowFilter,
}

impl EngineSettings {
    pub fn new(variance: VarianceThresholds, row_filter: RowFilter) -> Self {
        Self {
            variance,
            row_filter,
        }
    }
}

/// Score one named cycle of `snapshot`. Rows that carry no cycle id, in a
/// snapshot that names none, belong to it. An unknown cycle with no such rows
/// yields an empty report.
pub fn compute_cycle(cycle_id: &str, snapshot: &Snapshot, settings: &EngineSettings) -> CycleReport {
    score_cycle(cycle_id, snapshot, settings, UnassignedRows::Adopt)
}

fn score_cycle(
    cycle_id: &str,
    snapshot: &Snapshot,
    settings: &EngineSettings,
    unassigned: UnassignedRows,
) -> CycleReport {
    let span = tracing::info_span!("compute_cycle", cycle = cycle_id);
    let _guard = span.enter();

    let mut diagnostics = Diagnostics::new();
    let inputs = collect_cycle_inputs(
        snapshot,
        cycle_id,
        settings.row_filter,
        unassigned,
        &mut diagnostics,
    );
    let report = compute_from_inputs(inputs, &settings.variance, diagnostics);

    if !report.diagnostics.is_empty() {
        tracing::warn!(
            cycle = cycle_id,
            diagnostics = report.diagnostics.len(),
            unmapped = report.diagnostics.unmapped_labels().len(),
            "Cycle scored with data-quality diagnostics"
        );
    }
    tracing::info!(
        cycle = cycle_id,
        companies = report.companies.len(),
        flagged = report.flagged_count(),
        "Cycle scored"
    );
    report
}

/// Score already-collected domain inputs.
pub fn compute_from_inputs(
    inputs: CycleInputs,
    thresholds: &VarianceThresholds,
    mut diagnostics: Diagnostics,
) -> CycleReport {
    let mut scorecards = Vec::with_capacity(inputs.companies.len());
    let mut variance_flags = Vec::new();
    let mut triangulation = Vec::with_capacity(inputs.companies.len());
    let mut product_tests = Vec::new();

    for meta in &inputs.companies {
        let company_id = meta.company_id.as_str();
        let matrix = WeightedScoreCalculator::pillar_matrix(
            company_id,
            inputs.scores_for(company_id),
            &mut diagnostics,
        );
        let totals = WeightedScoreCalculator::channel_totals(&matrix);

        let tests = inputs.product_tests_for(company_id);
        let resolutions = WeightedScoreCalculator::resolve_product_tests(&tests, &mut diagnostics);
        let pt_score = WeightedScoreCalculator::company_product_test_score(&resolutions);
        product_tests.extend(
            tests
                .iter()
                .zip(&resolutions)
                .map(|(test, resolution)| ProductTestSummary::from_result(test, resolution)),
        );

        variance_flags.extend(VarianceAnalyzer::company_flags(
            company_id, &matrix, &totals, thresholds,
        ));
        triangulation.push(TriangulationAggregator::aggregate(
            company_id,
            meta.display_name(),
            &matrix,
        ));
        scorecards.push(CompanyScorecard::new(meta.clone(), matrix, pt_score));
    }

    let companies = CompositeIndexRanker::rank(scorecards);
    let summary = CycleSummary::build(
        &companies,
        &variance_flags,
        &product_tests,
        diagnostics.len(),
    );

    CycleReport {
        cycle_id: inputs.cycle_id,
        companies,
        variance_flags,
        triangulation,
        product_tests,
        summary,
        diagnostics,
    }
}

/// Score every cycle present in `snapshot`, in first-seen cycle order.
///
/// Rows without any cycle id cannot be attributed here; each cycle report
/// lists them as [`DiagnosticKind::MissingCycleId`](crate::scoring::DiagnosticKind).
pub fn compute_all_cycles(snapshot: &Snapshot, settings: &EngineSettings) -> Vec<CycleReport> {
    let unassigned = snapshot.unassigned_row_count();
    if unassigned > 0 {
        tracing::warn!(
            rows = unassigned,
            "Rows without a cycle id skipped; name a cycle to score them"
        );
    }
    snapshot
        .cycle_ids()
        .par_iter()
        .map(|cycle_id| score_cycle(cycle_id, snapshot, settings, UnassignedRows::Skip))
        .collect()
}
