use std::fs;
use std::path::{Path, PathBuf};

use super::core::FortimapConfig;
use super::thresholds::VarianceConfig;
use crate::errors::{FortimapError, Result};

pub const CONFIG_FILE_NAME: &str = ".fortimap.toml";

/// Parse and validate config from a TOML string.
///
/// Invalid variance thresholds are replaced by defaults with a warning rather
/// than failing the whole run.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<FortimapConfig, String> {
    let mut config = toml::from_str::<FortimapConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(ref variance) = config.variance {
        if let Err(e) = variance.validate() {
            log::warn!("Invalid variance thresholds: {}. Using defaults.", e);
            config.variance = Some(VarianceConfig::default());
        }
    }

    if let Some(format) = config.default_format() {
        if !matches!(format, "terminal" | "json" | "csv") {
            log::warn!("Unknown output.default_format {:?}. Ignoring.", format);
            if let Some(output) = config.output.as_mut() {
                output.default_format = None;
            }
        }
    }

    Ok(config)
}

/// A discovered config that cannot be read or parsed is skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<FortimapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // absence is the normal case during discovery
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.fortimap.toml`.
pub fn load_config_from(start: PathBuf) -> FortimapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FortimapConfig::default()
        })
}

pub fn load_config() -> FortimapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            FortimapConfig::default()
        }
    }
}

/// Load an explicitly named config file. Unlike discovery, a missing or
/// malformed file is an error here.
pub fn load_config_from_path(path: &Path) -> Result<FortimapConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FortimapError::file_system("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(FortimapError::config)
}
