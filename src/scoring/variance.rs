//! Cross-channel variance flags.
//!
//! The analyzer only measures and flags; it never corrects a score. Every
//! comparison takes its threshold from the caller because the conventions
//! differ between comparisons (points out of a channel total versus
//! percentage points of a pillar maximum).

use crate::core::{Channel, Pillar};
use crate::scoring::weighted_calculator::{finite_or_zero, ChannelTotals, PillarMatrix};
use serde::{Deserialize, Serialize};

/// Deltas are rounded to this many steps per point before the threshold test.
const DELTA_RESOLUTION: f64 = 1e9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceFlag {
    pub company_id: String,
    pub metric_pair_label: String,
    pub metric_a: f64,
    pub metric_b: f64,
    pub delta: f64,
    pub threshold: f64,
    pub exceeded_threshold: bool,
}

/// Thresholds for the standard per-company comparisons.
///
/// There is intentionally no `Default`: the values come from configuration
/// or from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceThresholds {
    /// Points, SAT total vs IVC total.
    pub self_vs_validated_points: f64,
    /// Points, IVC total vs IEG total.
    pub validated_vs_expert_points: f64,
    /// Percentage points of pillar maximum, per-pillar SAT vs IVC.
    pub pillar_percent: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VarianceAnalyzer;

impl VarianceAnalyzer {
    /// `delta = |a - b|`, flagged when `delta >= threshold`.
    ///
    /// Non-finite metrics are read as zero.
    pub fn compare(
        company_id: &str,
        label: impl Into<String>,
        metric_a: f64,
        metric_b: f64,
        threshold: f64,
    ) -> VarianceFlag {
        let a = finite_or_zero(metric_a);
        let b = finite_or_zero(metric_b);
        let delta = ((a - b).abs() * DELTA_RESOLUTION).round() / DELTA_RESOLUTION;
        VarianceFlag {
            company_id: company_id.to_string(),
            metric_pair_label: label.into(),
            metric_a: a,
            metric_b: b,
            delta,
            threshold,
            exceeded_threshold: delta >= threshold,
        }
    }

    /// Like [`compare`](Self::compare) but skips the pair when either side is
    /// unknown.
    pub fn compare_known(
        company_id: &str,
        label: impl Into<String>,
        metric_a: Option<f64>,
        metric_b: Option<f64>,
        threshold: f64,
    ) -> Option<VarianceFlag> {
        match (metric_a, metric_b) {
            (Some(a), Some(b)) => Some(Self::compare(company_id, label, a, b, threshold)),
            _ => None,
        }
    }

    /// Standard comparisons for one company, in a fixed order: the two total
    /// comparisons, then each pillar's SAT vs IVC in pillar order.
    ///
    /// A channel with no rows at all has an unknown total, so its total
    /// comparisons are skipped like any other unknown pair.
    pub fn company_flags(
        company_id: &str,
        matrix: &PillarMatrix,
        totals: &ChannelTotals,
        thresholds: &VarianceThresholds,
    ) -> Vec<VarianceFlag> {
        let total = |channel| matrix.has_any(channel).then(|| totals.get(channel));

        let mut flags: Vec<VarianceFlag> = [
            Self::compare_known(
                company_id,
                "SAT vs IVC total",
                total(Channel::SelfReported),
                total(Channel::Validated),
                thresholds.self_vs_validated_points,
            ),
            Self::compare_known(
                company_id,
                "IVC vs IEG total",
                total(Channel::Validated),
                total(Channel::ExpertPanel),
                thresholds.validated_vs_expert_points,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();

        flags.extend(Pillar::ALL.iter().filter_map(|pillar| {
            let percent = |channel| {
                matrix
                    .get(*pillar, channel)
                    .map(|points| pillar.percent_of_max(points))
            };
            Self::compare_known(
                company_id,
                format!("{} SAT vs IVC (%)", pillar),
                percent(Channel::SelfReported),
                percent(Channel::Validated),
                thresholds.pillar_percent,
            )
        }));

        flags
    }

    pub fn flagged(flags: &[VarianceFlag]) -> impl Iterator<Item = &VarianceFlag> {
        flags.iter().filter(|f| f.exceeded_threshold)
    }
}
