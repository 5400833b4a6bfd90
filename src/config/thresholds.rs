use crate::scoring::VarianceThresholds;
use serde::{Deserialize, Serialize};

/// Variance thresholds as configured in `.fortimap.toml`.
///
/// ```toml
/// [variance]
/// total_points_threshold = 10.0     # SAT vs IVC total, points
/// expert_points_threshold = 10.0    # IVC vs IEG total, points
/// pillar_percent_threshold = 5.0    # per-pillar SAT vs IVC, percentage points
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceConfig {
    #[serde(default = "default_total_points_threshold")]
    pub total_points_threshold: f64,

    #[serde(default = "default_expert_points_threshold")]
    pub expert_points_threshold: f64,

    #[serde(default = "default_pillar_percent_threshold")]
    pub pillar_percent_threshold: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            total_points_threshold: default_total_points_threshold(),
            expert_points_threshold: default_expert_points_threshold(),
            pillar_percent_threshold: default_pillar_percent_threshold(),
        }
    }
}

impl VarianceConfig {
    // Pure function: Check if a threshold is usable
    pub fn is_valid_threshold(threshold: f64) -> bool {
        threshold.is_finite() && threshold >= 0.0
    }

    pub fn validate_threshold(threshold: f64, name: &str) -> Result<(), String> {
        if Self::is_valid_threshold(threshold) {
            Ok(())
        } else {
            Err(format!(
                "{} threshold must be a finite, non-negative number (got {})",
                name, threshold
            ))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        Self::validate_threshold(self.total_points_threshold, "Total points")?;
        Self::validate_threshold(self.expert_points_threshold, "Expert points")?;
        Self::validate_threshold(self.pillar_percent_threshold, "Pillar percent")?;
        Ok(())
    }

    /// Thresholds in the shape the variance analyzer takes.
    pub fn thresholds(&self) -> VarianceThresholds {
        VarianceThresholds {
            self_vs_validated_points: self.total_points_threshold,
            validated_vs_expert_points: self.expert_points_threshold,
            pillar_percent: self.pillar_percent_threshold,
        }
    }
}

pub fn default_total_points_threshold() -> f64 {
    10.0
}
pub fn default_expert_points_threshold() -> f64 {
    10.0
}
pub fn default_pillar_percent_threshold() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(VarianceConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = VarianceConfig {
            pillar_percent_threshold: -1.0,
            ..VarianceConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("Pillar percent"));
    }

    #[test]
    fn thresholds_map_one_to_one() {
        let config = VarianceConfig {
            total_points_threshold: 12.0,
            expert_points_threshold: 8.0,
            pillar_percent_threshold: 4.0,
        };
        let thresholds = config.thresholds();
        assert_eq!(thresholds.self_vs_validated_points, 12.0);
        assert_eq!(thresholds.validated_vs_expert_points, 8.0);
        assert_eq!(thresholds.pillar_percent, 4.0);
    }
}
