use serde::{Deserialize, Serialize};

use super::thresholds::VarianceConfig;
use crate::ingest::RowFilter;

/// Root configuration structure for fortimap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FortimapConfig {
    /// Variance thresholds for cross-channel flags
    #[serde(default)]
    pub variance: Option<VarianceConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Row filters
    #[serde(default)]
    pub filters: Option<FilterConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// One of "terminal", "json", "csv"
    pub default_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include_inactive: bool,
}

impl FortimapConfig {
    pub fn variance(&self) -> VarianceConfig {
        self.variance.clone().unwrap_or_default()
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter {
            include_inactive: self
                .filters
                .as_ref()
                .map(|f| f.include_inactive)
                .unwrap_or(false),
        }
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|o| o.default_format.as_deref())
    }
}

/// Contents written by `fortimap init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# Fortimap Configuration

[variance]
# SAT total vs IVC total, in points
total_points_threshold = 10.0
# IVC total vs IEG total, in points
expert_points_threshold = 10.0
# Per-pillar SAT vs IVC, in percentage points of the pillar maximum
pillar_percent_threshold = 5.0

[output]
default_format = "terminal"

[filters]
include_inactive = false
"#;
