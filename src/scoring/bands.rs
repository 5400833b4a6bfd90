//! Qualitative fortification bands.
//!
//! Two tables exist and they are deliberately separate types:
//!
//! - [`ComplianceBands`] classifies a 0-100 compliance percentage.
//! - [`NarrativeScale`] classifies a weighted score on a 20- or 30-point
//!   scale into the same five labels using equal sub-ranges.
//!
//! [`percent_for_band`] decides which percentage a product test is banded on.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FortificationBand {
    #[serde(rename = "Fully Fortified")]
    FullyFortified,
    #[serde(rename = "Adequately Fortified")]
    AdequatelyFortified,
    #[serde(rename = "Partly Fortified")]
    PartlyFortified,
    #[serde(rename = "Inadequately Fortified")]
    InadequatelyFortified,
    #[serde(rename = "Not Fortified")]
    NotFortified,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl FortificationBand {
    pub fn label(self) -> &'static str {
        match self {
            FortificationBand::FullyFortified => "Fully Fortified",
            FortificationBand::AdequatelyFortified => "Adequately Fortified",
            FortificationBand::PartlyFortified => "Partly Fortified",
            FortificationBand::InadequatelyFortified => "Inadequately Fortified",
            FortificationBand::NotFortified => "Not Fortified",
            FortificationBand::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for FortificationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compliance-percentage table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceBands;

impl ComplianceBands {
    pub const FULLY: f64 = 100.0;
    pub const ADEQUATELY: f64 = 80.0;
    pub const PARTLY: f64 = 51.0;
    pub const INADEQUATELY: f64 = 31.0;

    pub fn classify(percent: f64) -> FortificationBand {
        if !percent.is_finite() {
            FortificationBand::NotAvailable
        } else if percent >= Self::FULLY {
            FortificationBand::FullyFortified
        } else if percent >= Self::ADEQUATELY {
            FortificationBand::AdequatelyFortified
        } else if percent >= Self::PARTLY {
            FortificationBand::PartlyFortified
        } else if percent >= Self::INADEQUATELY {
            FortificationBand::InadequatelyFortified
        } else {
            FortificationBand::NotFortified
        }
    }

    /// Classify an optional percentage; `None` reads as "N/A".
    pub fn classify_opt(percent: Option<f64>) -> FortificationBand {
        percent
            .map(Self::classify)
            .unwrap_or(FortificationBand::NotAvailable)
    }
}

/// Weighted-score scales used for narrative bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeScale {
    /// Expert-panel contribution, 0-20 points.
    TwentyPoint,
    /// Product-test contribution, 0-30 points.
    ThirtyPoint,
}

/// Half-open `[lower, upper)` score range for one band. The top band is the
/// single point `max` and has `upper == lower`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubRange {
    pub lower: f64,
    pub upper: f64,
    pub band: FortificationBand,
}

impl NarrativeScale {
    pub fn max(self) -> f64 {
        match self {
            NarrativeScale::TwentyPoint => 20.0,
            NarrativeScale::ThirtyPoint => 30.0,
        }
    }

    /// Sub-ranges from lowest to highest.
    pub fn sub_ranges(self) -> [SubRange; 5] {
        let max = self.max();
        let step = max / 4.0;
        [
            SubRange {
                lower: 0.0,
                upper: step,
                band: FortificationBand::NotFortified,
            },
            SubRange {
                lower: step,
                upper: step * 2.0,
                band: FortificationBand::InadequatelyFortified,
            },
            SubRange {
                lower: step * 2.0,
                upper: step * 3.0,
                band: FortificationBand::PartlyFortified,
            },
            SubRange {
                lower: step * 3.0,
                upper: max,
                band: FortificationBand::AdequatelyFortified,
            },
            SubRange {
                lower: max,
                upper: max,
                band: FortificationBand::FullyFortified,
            },
        ]
    }

    pub fn classify(self, score: f64) -> FortificationBand {
        if !score.is_finite() {
            return FortificationBand::NotAvailable;
        }
        self.sub_ranges()
            .iter()
            .rev()
            .find(|range| score >= range.lower)
            .map(|range| range.band)
            .unwrap_or(FortificationBand::NotFortified)
    }
}

/// Full-scale value of the product-test "overall" score.
pub const OVERALL_SCORE_SCALE: f64 = 30.0;

/// Percentage a product test is banded on.
///
/// Tries, in order: the mean of the finite nutrient compliance percentages, a
/// weighted compliance score already within 0-100, and finally the 0-30
/// overall score rescaled to a percentage. Returns `None` when nothing usable
/// exists, which bands as "N/A".
pub fn percent_for_band(
    compliances: impl IntoIterator<Item = f64>,
    weighted_percent: Option<f64>,
    overall_score: Option<f64>,
) -> Option<f64> {
    let (sum, count) = compliances
        .into_iter()
        .filter(|p| p.is_finite())
        .fold((0.0, 0usize), |(sum, count), p| (sum + p, count + 1));
    if count > 0 {
        return Some(sum / count as f64);
    }

    if let Some(weighted) = weighted_percent.filter(|w| w.is_finite() && (0.0..=100.0).contains(w))
    {
        return Some(weighted);
    }

    overall_score
        .filter(|o| o.is_finite())
        .map(|o| o / OVERALL_SCORE_SCALE * 100.0)
}
