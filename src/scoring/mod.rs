//! The scoring and reconciliation engine.
//!
//! Components, leaves first: category normalization, weighted channel totals,
//! bands, variance flags, the composite ranking, and triangulation records.
//! Every function here is pure; none of them can fail.

pub mod bands;
pub mod category_normalizer;
pub mod composite_ranker;
pub mod diagnostics;
pub mod triangulation;
pub mod variance;
pub mod weighted_calculator;

pub use bands::{percent_for_band, ComplianceBands, FortificationBand, NarrativeScale, SubRange};
pub use category_normalizer::{CategoryMatch, CategoryNormalizer, CATEGORY_RULES};
pub use composite_ranker::{final_score, CompanyRecord, CompanyScorecard, CompositeIndexRanker};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use product_tests::ProductTestSummary;
pub use triangulation::{slot_labels, TriangulationAggregator, TriangulationCell, TriangulationRecord};
pub use variance::{VarianceAnalyzer, VarianceFlag, VarianceThresholds};
pub use weighted_calculator::{
    finite_or_zero, ChannelTotals, PillarMatrix, ProductTestPath, ProductTestResolution,
    WeightedScoreCalculator,
};
