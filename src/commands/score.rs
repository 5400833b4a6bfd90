use crate::config::{self, FortimapConfig};
use crate::ingest::Snapshot;
use crate::io::{self, OutputFormat};
use crate::pipeline::{compute_all_cycles, compute_cycle, EngineSettings};
use crate::report::{CycleReport, ReportTable};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct ScoreConfig {
    pub snapshot: PathBuf,
    pub cycle: Option<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub table: Option<ReportTable>,
    pub config: Option<PathBuf>,
    pub include_inactive: bool,
    pub plain: bool,
}

pub fn handle_score(score_config: ScoreConfig) -> Result<()> {
    let file_config = load_file_config(&score_config)?;
    let settings = engine_settings(&file_config, score_config.include_inactive);

    let snapshot = Snapshot::load(&score_config.snapshot).with_context(|| {
        format!(
            "Failed to load snapshot {}",
            score_config.snapshot.display()
        )
    })?;

    let reports = compute_reports(&snapshot, score_config.cycle.as_deref(), &settings);
    if reports.iter().all(|r| r.companies.is_empty()) {
        log::warn!("No scorable rows found in {}", score_config.snapshot.display());
    }

    let format = resolve_format(score_config.format, &file_config);
    if score_config.plain {
        colored::control::set_override(false);
    }

    let destination = io::open_destination(score_config.output.as_deref()).with_context(|| {
        format!(
            "Failed to open output {}",
            score_config
                .output
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdout".to_string())
        )
    })?;
    let mut writer = io::create_writer(format, score_config.table, score_config.plain, destination);
    writer
        .write_reports(&reports)
        .context("Failed to write report")?;

    if let Some(path) = &score_config.output {
        tracing::info!(path = %path.display(), "Report written");
    }
    Ok(())
}

fn load_file_config(score_config: &ScoreConfig) -> Result<FortimapConfig> {
    match &score_config.config {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Command-line flags widen the configured row filter, never narrow it.
pub fn engine_settings(file_config: &FortimapConfig, include_inactive: bool) -> EngineSettings {
    let mut row_filter = file_config.row_filter();
    row_filter.include_inactive |= include_inactive;
    EngineSettings::new(file_config.variance().thresholds(), row_filter)
}

pub fn resolve_format(flag: Option<OutputFormat>, file_config: &FortimapConfig) -> OutputFormat {
    flag.or_else(|| {
        file_config
            .default_format()
            .and_then(OutputFormat::from_config_name)
    })
    .unwrap_or(OutputFormat::Terminal)
}

/// A named cycle yields exactly one report, empty if the cycle is unknown.
pub fn compute_reports(
    snapshot: &Snapshot,
    cycle: Option<&str>,
    settings: &EngineSettings,
) -> Vec<CycleReport> {
    match cycle {
        Some(cycle_id) => vec![compute_cycle(cycle_id, snapshot, settings)],
        None => compute_all_cycles(snapshot, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_format_wins_over_config() {
        let file_config = config::parse_and_validate_config("[output]\ndefault_format = \"json\"\n")
            .unwrap();
        assert_eq!(
            resolve_format(Some(OutputFormat::Csv), &file_config),
            OutputFormat::Csv
        );
        assert_eq!(resolve_format(None, &file_config), OutputFormat::Json);
        assert_eq!(
            resolve_format(None, &FortimapConfig::default()),
            OutputFormat::Terminal
        );
    }

    #[test]
    fn include_inactive_flag_widens_filter() {
        let settings = engine_settings(&FortimapConfig::default(), true);
        assert!(settings.row_filter.include_inactive);
        assert_eq!(settings.variance.pillar_percent, 5.0);
    }

    #[test]
    fn named_cycle_yields_one_report() {
        let snapshot = Snapshot::from_json_str(r#"{"scores": []}"#).unwrap();
        let settings = engine_settings(&FortimapConfig::default(), false);
        let reports = compute_reports(&snapshot, Some("2030"), &settings);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cycle_id, "2030");
        assert!(compute_reports(&snapshot, None, &settings).is_empty());
    }
}
