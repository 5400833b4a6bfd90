//! Assessment pillars and the channels that score them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five weighted assessment categories.
///
/// Declaration order is the canonical display order used by every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pillar {
    /// Personnel & Management Systems
    Pms,
    /// Production, Continuous Improvement & Innovation
    Pcii,
    /// Procurement & Inputs Management
    Pim,
    /// Public Engagement
    Pe,
    /// Government & Legislation Compliance
    Glc,
}

const PMS_WEIGHT: f64 = 15.0;
const PCII_WEIGHT: f64 = 25.0;
const PIM_WEIGHT: f64 = 25.0;
const PE_WEIGHT: f64 = 10.0;
const GLC_WEIGHT: f64 = 25.0;

const _: () = assert!(
    PMS_WEIGHT + PCII_WEIGHT + PIM_WEIGHT + PE_WEIGHT + GLC_WEIGHT == 100.0,
    "pillar weights must sum to exactly 100"
);

impl Pillar {
    pub const ALL: [Pillar; 5] = [
        Pillar::Pms,
        Pillar::Pcii,
        Pillar::Pim,
        Pillar::Pe,
        Pillar::Glc,
    ];

    /// Maximum weighted points this pillar can contribute.
    pub fn max_weight(self) -> f64 {
        match self {
            Pillar::Pms => PMS_WEIGHT,
            Pillar::Pcii => PCII_WEIGHT,
            Pillar::Pim => PIM_WEIGHT,
            Pillar::Pe => PE_WEIGHT,
            Pillar::Glc => GLC_WEIGHT,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Pillar::Pms => "PMS",
            Pillar::Pcii => "PCII",
            Pillar::Pim => "PIM",
            Pillar::Pe => "PE",
            Pillar::Glc => "GLC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Pms => "Personnel & Management Systems",
            Pillar::Pcii => "Production, Continuous Improvement & Innovation",
            Pillar::Pim => "Procurement & Inputs Management",
            Pillar::Pe => "Public Engagement",
            Pillar::Glc => "Government & Legislation Compliance",
        }
    }

    /// Position in [`Pillar::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Express a weighted-point value as a percentage of this pillar's maximum.
    pub fn percent_of_max(self, points: f64) -> f64 {
        points / self.max_weight() * 100.0
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Who produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Self-Assessment Tool (SAT)
    SelfReported,
    /// Independent Validation Check (IVC, also written "SAT(V)")
    Validated,
    /// Industry Expert Group (IEG)
    ExpertPanel,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::SelfReported,
        Channel::Validated,
        Channel::ExpertPanel,
    ];

    /// Resolve an upstream `type` code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Channel> {
        let normalized: String = code
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "SAT" => Some(Channel::SelfReported),
            "IVC" | "SAT(V)" | "SATV" => Some(Channel::Validated),
            "IEG" => Some(Channel::ExpertPanel),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Channel::SelfReported => "SAT",
            Channel::Validated => "IVC",
            Channel::ExpertPanel => "IEG",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_weights_sum_to_one_hundred() {
        let total: f64 = Pillar::ALL.iter().map(|p| p.max_weight()).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn pillar_index_matches_all_order() {
        for (idx, pillar) in Pillar::ALL.iter().enumerate() {
            assert_eq!(pillar.index(), idx);
        }
    }

    #[test]
    fn channel_codes_resolve() {
        assert_eq!(Channel::from_code("SAT"), Some(Channel::SelfReported));
        assert_eq!(Channel::from_code(" ivc "), Some(Channel::Validated));
        assert_eq!(Channel::from_code("SAT (V)"), Some(Channel::Validated));
        assert_eq!(Channel::from_code("IEG"), Some(Channel::ExpertPanel));
        assert_eq!(Channel::from_code("PT"), None);
    }

    #[test]
    fn pillar_serializes_as_code() {
        let json = serde_json::to_string(&Pillar::Pcii).unwrap();
        assert_eq!(json, "\"PCII\"");
        let json = serde_json::to_string(&Channel::ExpertPanel).unwrap();
        assert_eq!(json, "\"EXPERT_PANEL\"");
    }

    #[test]
    fn percent_of_max_uses_pillar_weight() {
        assert_eq!(Pillar::Pe.percent_of_max(5.0), 50.0);
        assert_eq!(Pillar::Pms.percent_of_max(15.0), 100.0);
    }
}
