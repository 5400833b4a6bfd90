use fortimap::config::{load_config_from, load_config_from_path, CONFIG_FILE_NAME};
use fortimap::scoring::VarianceThresholds;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

#[test]
fn configured_thresholds_reach_the_analyzer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        indoc! {r#"
            [variance]
            total_points_threshold = 15.0
            expert_points_threshold = 12.5
            pillar_percent_threshold = 2.0
        "#},
    )
    .unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(
        config.variance().thresholds(),
        VarianceThresholds {
            self_vs_validated_points: 15.0,
            validated_vs_expert_points: 12.5,
            pillar_percent: 2.0,
        }
    );
}

#[test]
fn malformed_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[variance\ntotal_points_threshold = ").unwrap();
    assert!(load_config_from_path(&path).is_err());
}

#[test]
fn discovery_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(dir.path().to_path_buf());
    assert_eq!(config.variance().total_points_threshold, 10.0);
    assert!(!config.row_filter().include_inactive);
}

#[test]
fn malformed_discovered_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
    let config = load_config_from(dir.path().to_path_buf());
    assert_eq!(config.variance().pillar_percent_threshold, 5.0);
}
