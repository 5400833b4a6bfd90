// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod ingest;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    CategoryScore, Channel, CompanyMeta, FoodVehicle, NutrientResult, Pillar, ProductTestResult,
};

pub use crate::errors::{FortimapError, Result};

pub use crate::ingest::{collect_cycle_inputs, CycleInputs, RowFilter, Snapshot, UnassignedRows};

pub use crate::io::output::{create_writer, OutputFormat, ReportWriter};

pub use crate::pipeline::{compute_all_cycles, compute_cycle, compute_from_inputs, EngineSettings};

pub use crate::report::{CycleReport, CycleSummary, FlatTable, ReportTable};

pub use crate::scoring::{
    CategoryMatch, CategoryNormalizer, ComplianceBands, CompanyRecord, CompositeIndexRanker,
    Diagnostic, DiagnosticKind, Diagnostics, FortificationBand, NarrativeScale, PillarMatrix,
    TriangulationAggregator, TriangulationRecord, VarianceAnalyzer, VarianceFlag,
    VarianceThresholds, WeightedScoreCalculator,
};
