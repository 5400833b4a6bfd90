//! Data-quality diagnostics collected while scoring a cycle.
//!
//! Coercions (missing numbers to zero, unmapped labels dropped) keep the
//! numeric output backward compatible. Every coercion is also recorded here so
//! upstream data problems stay visible. Recording a diagnostic never changes a
//! computed score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Row without a usable company identifier; the row was dropped.
    MissingCompanyId,
    /// Row without a cycle id while scoring every cycle; the row was dropped.
    MissingCycleId,
    /// Category label matched no pillar rule; excluded from aggregation.
    UnmappedCategory,
    /// Channel `type` code was not SAT, IVC or IEG; the row was dropped.
    UnknownChannel,
    /// Numeric score missing or non-finite; treated as zero.
    MissingValue,
    /// Value outside the pillar's 0..=max range; clamped.
    ClampedValue,
    /// Row weight disagrees with the pillar's fixed maximum weight.
    WeightMismatch,
    /// Aflatoxin-adjusted score required by the vehicle but absent; treated as zero.
    MissingAflatoxinAdjustedScore,
    /// Fortification score absent; treated as zero.
    MissingFortificationScore,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::MissingCompanyId => "missing_company_id",
            DiagnosticKind::MissingCycleId => "missing_cycle_id",
            DiagnosticKind::UnmappedCategory => "unmapped_category",
            DiagnosticKind::UnknownChannel => "unknown_channel",
            DiagnosticKind::MissingValue => "missing_value",
            DiagnosticKind::ClampedValue => "clamped_value",
            DiagnosticKind::WeightMismatch => "weight_mismatch",
            DiagnosticKind::MissingAflatoxinAdjustedScore => "missing_aflatoxin_adjusted_score",
            DiagnosticKind::MissingFortificationScore => "missing_fortification_score",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub company_id: Option<String>,
    pub detail: String,
}

/// Ordered list of diagnostics for one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        company_id: Option<&str>,
        detail: impl Into<String>,
    ) {
        let detail = detail.into();
        tracing::debug!(kind = %kind, company = company_id.unwrap_or("-"), "{}", detail);
        self.entries.push(Diagnostic {
            kind,
            company_id: company_id.map(str::to_string),
            detail,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn counts_by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        self.entries.iter().fold(BTreeMap::new(), |mut acc, d| {
            *acc.entry(d.kind).or_insert(0) += 1;
            acc
        })
    }

    /// Distinct unmapped labels in first-seen order.
    pub fn unmapped_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for diagnostic in self.of_kind(DiagnosticKind::UnmappedCategory) {
            if !labels.contains(&diagnostic.detail.as_str()) {
                labels.push(&diagnostic.detail);
            }
        }
        labels
    }
}
