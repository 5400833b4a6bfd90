//! Results of scoring one assessment cycle.

pub mod flat;
pub mod summary;

pub use flat::{
    format_optional_score, format_score, format_statistic, FlatTable, ReportTable, UNKNOWN_CELL,
};
pub use summary::{CycleSummary, ScoreStatistics};

use crate::scoring::{
    CompanyRecord, Diagnostics, ProductTestSummary, TriangulationRecord, VarianceFlag,
};
use serde::{Deserialize, Serialize};

/// Everything computed for one cycle.
///
/// `companies` is in rank order; `triangulation` and `variance_flags` follow
/// company input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub companies: Vec<CompanyRecord>,
    pub variance_flags: Vec<VarianceFlag>,
    pub triangulation: Vec<TriangulationRecord>,
    pub product_tests: Vec<ProductTestSummary>,
    pub summary: CycleSummary,
    pub diagnostics: Diagnostics,
}

impl CycleReport {
    /// Report for a cycle with no usable rows.
    pub fn empty(cycle_id: impl Into<String>) -> Self {
        Self {
            cycle_id: cycle_id.into(),
            companies: Vec::new(),
            variance_flags: Vec::new(),
            triangulation: Vec::new(),
            product_tests: Vec::new(),
            summary: CycleSummary::build(&[], &[], &[], 0),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn company(&self, company_id: &str) -> Option<&CompanyRecord> {
        self.companies.iter().find(|c| c.company_id == company_id)
    }

    pub fn triangulation_for(&self, company_id: &str) -> Option<&TriangulationRecord> {
        self.triangulation
            .iter()
            .find(|r| r.company_id == company_id)
    }

    pub fn flags_for<'a>(&'a self, company_id: &'a str) -> impl Iterator<Item = &'a VarianceFlag> {
        self.variance_flags
            .iter()
            .filter(move |f| f.company_id == company_id)
    }

    pub fn flagged_count(&self) -> usize {
        self.summary.flagged_variance_pairs
    }
}
