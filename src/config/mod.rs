// Sub-modules
mod core;
mod loader;
mod thresholds;

// Re-export core types
pub use self::core::{FilterConfig, FortimapConfig, OutputConfig, DEFAULT_CONFIG_TOML};

// Re-export threshold types
pub use thresholds::{
    default_expert_points_threshold, default_pillar_percent_threshold,
    default_total_points_threshold, VarianceConfig,
};

// Re-export loader functions
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
