//! Composite index and stable ranking.
//!
//! The final index is `validated + product test + expert`. The self-reported
//! total travels along for display but never enters the composite. Ranking is
//! a stable descending sort: equal scores keep their input order, which is
//! the only tie-break.

use crate::core::{Channel, CompanyMeta, Pillar};
use crate::scoring::weighted_calculator::{finite_or_zero, ChannelTotals, PillarMatrix};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// `validated_total + pt_score + expert_total`, with non-finite or missing
/// parts read as zero.
pub fn final_score(validated_total: f64, pt_score: Option<f64>, expert_total: f64) -> f64 {
    finite_or_zero(validated_total)
        + pt_score.map(finite_or_zero).unwrap_or(0.0)
        + finite_or_zero(expert_total)
}

/// Scored company before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyScorecard {
    pub meta: CompanyMeta,
    pub matrix: PillarMatrix,
    pub totals: ChannelTotals,
    pub pt_score: Option<f64>,
}

impl CompanyScorecard {
    pub fn new(meta: CompanyMeta, matrix: PillarMatrix, pt_score: Option<f64>) -> Self {
        let totals = ChannelTotals::from_matrix(&matrix);
        Self {
            meta,
            matrix,
            totals,
            pt_score,
        }
    }

    pub fn final_score(&self) -> f64 {
        final_score(self.totals.validated, self.pt_score, self.totals.expert)
    }
}

/// Ranked, immutable snapshot of one company in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_id: String,
    pub name: String,
    pub tier: Option<String>,
    pub size_category: Option<String>,
    pub pillar_scores: BTreeMap<Pillar, BTreeMap<Channel, Option<f64>>>,
    pub self_reported_total: f64,
    pub validated_total: f64,
    pub expert_total: f64,
    pub pt_score: Option<f64>,
    pub final_score: f64,
    pub rank: usize,
}

impl CompanyRecord {
    pub fn pillar_score(&self, pillar: Pillar, channel: Channel) -> Option<f64> {
        self.pillar_scores
            .get(&pillar)
            .and_then(|by_channel| by_channel.get(&channel))
            .copied()
            .flatten()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeIndexRanker;

impl CompositeIndexRanker {
    /// Sort descending by final score and assign 1-based ranks.
    ///
    /// `slice::sort_by` is stable, so ties keep input order.
    pub fn rank(scorecards: Vec<CompanyScorecard>) -> Vec<CompanyRecord> {
        let mut scored: Vec<(f64, CompanyScorecard)> = scorecards
            .into_iter()
            .map(|card| (card.final_score(), card))
            .collect();
        scored.sort_by(|(a, _), (b, _)| compare_desc(*a, *b));

        scored
            .into_iter()
            .enumerate()
            .map(|(idx, (final_score, card))| CompanyRecord {
                name: card.meta.display_name().to_string(),
                company_id: card.meta.company_id,
                tier: card.meta.tier,
                size_category: card.meta.size_category,
                pillar_scores: card.matrix.to_map(),
                self_reported_total: card.totals.self_reported,
                validated_total: card.totals.validated,
                expert_total: card.totals.expert,
                pt_score: card.pt_score,
                final_score,
                rank: idx + 1,
            })
            .collect()
    }
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, validated: f64, pt: Option<f64>, expert: f64) -> CompanyScorecard {
        let matrix = PillarMatrix::new()
            .with(Pillar::Pms, Channel::Validated, validated)
            .with(Pillar::Pms, Channel::ExpertPanel, expert)
            .with(Pillar::Pms, Channel::SelfReported, 15.0);
        CompanyScorecard::new(CompanyMeta::new(id), matrix, pt)
    }

    #[test]
    fn scenario_final_score() {
        assert_eq!(final_score(82.0, Some(22.0), 16.0), 120.0);
    }

    #[test]
    fn self_reported_total_is_excluded() {
        let card = card("a", 10.0, Some(5.0), 3.0);
        assert_eq!(card.totals.self_reported, 15.0);
        assert_eq!(card.final_score(), 18.0);
    }

    #[test]
    fn missing_product_test_contributes_zero() {
        assert_eq!(final_score(10.0, None, 2.0), 12.0);
        assert_eq!(final_score(f64::NAN, Some(f64::INFINITY), 2.0), 2.0);
    }

    #[test]
    fn ranks_descending_with_stable_ties() {
        let records = CompositeIndexRanker::rank(vec![
            card("first-tie", 10.0, Some(5.0), 0.0),
            card("top", 14.0, Some(20.0), 4.0),
            card("second-tie", 10.0, None, 5.0),
            card("bottom", 1.0, None, 0.0),
        ]);

        let order: Vec<&str> = records.iter().map(|r| r.company_id.as_str()).collect();
        assert_eq!(order, vec!["top", "first-tie", "second-tie", "bottom"]);
        let ranks: Vec<usize> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn record_exposes_pillar_scores() {
        let records = CompositeIndexRanker::rank(vec![card("a", 12.0, None, 3.0)]);
        assert_eq!(
            records[0].pillar_score(Pillar::Pms, Channel::Validated),
            Some(12.0)
        );
        assert_eq!(records[0].pillar_score(Pillar::Pe, Channel::Validated), None);
    }
}
