//! Snapshot ingestion: raw upstream rows to per-cycle domain inputs.

pub mod cycle_inputs;
pub mod lenient;
pub mod snapshot;

pub use cycle_inputs::{collect_cycle_inputs, CycleInputs, RowFilter, UnassignedRows};
pub use snapshot::{
    RawFortification, RawMicroNutrient, RawNutrientResult, RawProductTestRow, RawScoreRow,
    Snapshot,
};
