//! Fixed 18-slot cross-channel comparison per company.
//!
//! Slots 0..15 hold the (SAT, IVC, IEG) triple of each pillar in pillar order;
//! slots 15..18 hold the three channel totals. A missing pillar value is kept
//! as [`TriangulationCell::Unknown`] for display while the totals treat it as
//! zero.

use crate::core::{Channel, Pillar};
use crate::scoring::weighted_calculator::{ChannelTotals, PillarMatrix};
use serde::{Deserialize, Serialize};

pub const PILLAR_SLOTS: usize = 15;
pub const TOTAL_SLOTS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum TriangulationCell {
    Known(f64),
    Unknown,
}

impl TriangulationCell {
    pub fn value(self) -> Option<f64> {
        match self {
            TriangulationCell::Known(v) => Some(v),
            TriangulationCell::Unknown => None,
        }
    }

    /// Contribution to a sum; unknown reads as zero.
    pub fn summable(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl From<Option<f64>> for TriangulationCell {
    fn from(value: Option<f64>) -> Self {
        value
            .map(TriangulationCell::Known)
            .unwrap_or(TriangulationCell::Unknown)
    }
}

impl From<TriangulationCell> for Option<f64> {
    fn from(cell: TriangulationCell) -> Self {
        cell.value()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationRecord {
    pub company_id: String,
    pub company_name: String,
    pub cells: [TriangulationCell; PILLAR_SLOTS],
    pub totals: ChannelTotals,
}

impl TriangulationRecord {
    pub fn cell(&self, pillar: Pillar, channel: Channel) -> TriangulationCell {
        self.cells[pillar.index() * 3 + channel.index()]
    }

    /// All 18 slots, totals last.
    pub fn slots(&self) -> [TriangulationCell; TOTAL_SLOTS] {
        let mut slots = [TriangulationCell::Unknown; TOTAL_SLOTS];
        slots[..PILLAR_SLOTS].copy_from_slice(&self.cells);
        for channel in Channel::ALL {
            slots[PILLAR_SLOTS + channel.index()] =
                TriangulationCell::Known(self.totals.get(channel));
        }
        slots
    }
}

/// Column headings matching [`TriangulationRecord::slots`].
pub fn slot_labels() -> Vec<String> {
    Pillar::ALL
        .iter()
        .flat_map(|pillar| {
            Channel::ALL
                .iter()
                .map(move |channel| format!("{} {}", pillar, channel))
        })
        .chain(Channel::ALL.iter().map(|channel| format!("TOTAL {}", channel)))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TriangulationAggregator;

impl TriangulationAggregator {
    pub fn aggregate(company_id: &str, company_name: &str, matrix: &PillarMatrix) -> TriangulationRecord {
        let mut cells = [TriangulationCell::Unknown; PILLAR_SLOTS];
        for pillar in Pillar::ALL {
            for channel in Channel::ALL {
                cells[pillar.index() * 3 + channel.index()] = matrix.get(pillar, channel).into();
            }
        }

        let total = |channel: Channel| -> f64 {
            Pillar::ALL
                .iter()
                .map(|p| cells[p.index() * 3 + channel.index()].summable())
                .sum()
        };
        let totals = ChannelTotals {
            self_reported: total(Channel::SelfReported),
            validated: total(Channel::Validated),
            expert: total(Channel::ExpertPanel),
        };

        TriangulationRecord {
            company_id: company_id.to_string(),
            company_name: company_name.to_string(),
            cells,
            totals,
        }
    }
}
