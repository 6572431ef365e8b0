//! Tests for configuration loading and validation

use std::io::Write;
use tempfile::NamedTempFile;
use weekly_cases::config::DEFAULT_IQR_FACTOR;
use weekly_cases::{Grouping, OutlierConfig, PipelineConfig, SeriesError, Sex};

#[test]
fn test_yaml_configuration() {
    let yaml = r"
agrupa: region
region: Noroeste
tratamiento_outliers:
  IQR: true
  columnas: [Incremento_hombres, Incremento_mujeres]
region_map:
  Sonora: Noroeste
  Sinaloa: Noroeste
  Morelos: Centro
";
    let config = PipelineConfig::from_yaml_str(yaml).unwrap();

    assert_eq!(config.grouping, Grouping::Region);
    assert_eq!(config.target_region.as_deref(), Some("Noroeste"));
    assert!(config.outliers.enabled);
    assert_eq!(config.outliers.factor, DEFAULT_IQR_FACTOR);
    assert_eq!(config.outliers.sexes().unwrap(), vec![Sex::Male, Sex::Female]);
    assert_eq!(config.region_map.len(), 3);
    assert_eq!(config.target_states(), vec!["Sinaloa", "Sonora"]);
    assert!(config.to_string().contains("Target States: Sinaloa, Sonora"));
}

#[test]
fn test_json_configuration_with_defaults() {
    let config = PipelineConfig::from_json_str(r#"{"agrupa": "sexo"}"#).unwrap();

    assert_eq!(config, PipelineConfig::by_sex());
    assert_eq!(config.outliers, OutlierConfig::default());
}

#[test]
fn test_region_grouping_requires_target() {
    let err = PipelineConfig::from_json_str(r#"{"agrupa": "region"}"#).unwrap_err();

    assert!(matches!(err, SeriesError::ConfigError(_)));
}

#[test]
fn test_unknown_outlier_column_is_rejected_when_enabled() {
    let json = r#"{"agrupa": "sexo", "tratamiento_outliers": {"IQR": true, "columnas": ["Casos"]}}"#;
    let err = PipelineConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, SeriesError::UnknownColumn(name) if name == "Casos"));

    // Ignored while the treatment is disabled
    let json = r#"{"agrupa": "sexo", "tratamiento_outliers": {"IQR": false, "columnas": ["Casos"]}}"#;
    assert!(PipelineConfig::from_json_str(json).is_ok());
}

#[test]
fn test_negative_factor_is_rejected() {
    let config = PipelineConfig::by_sex().with_outliers(
        OutlierConfig::iqr([Sex::Male.increment_column()]).with_factor(-1.0),
    );

    assert!(matches!(config.validate(), Err(SeriesError::ConfigError(_))));
}

#[test]
fn test_unknown_grouping_is_accepted() {
    let config = PipelineConfig::from_yaml_str("agrupa: edad").unwrap();

    assert_eq!(config.grouping, Grouping::Unknown("edad".to_string()));
}

#[test]
fn test_malformed_document_is_a_config_error() {
    let err = PipelineConfig::from_yaml_str("agrupa: [sexo").unwrap_err();
    assert!(matches!(err, SeriesError::ConfigError(_)));
}

#[test]
fn test_load_from_path_by_extension() {
    let mut file = NamedTempFile::with_suffix(".yml").unwrap();
    writeln!(file, "agrupa: sexo").unwrap();
    let config = PipelineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.grouping, Grouping::Sex);

    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "agrupa = 'sexo'").unwrap();
    let err = PipelineConfig::from_path(file.path()).unwrap_err();
    assert!(matches!(err, SeriesError::ConfigError(_)));
}

#[test]
fn test_display_lists_settings() {
    let config = PipelineConfig::by_sex();
    let text = config.to_string();

    assert!(text.contains("Grouping: sexo"));
    assert!(text.contains("IQR Treatment: false"));
}

#[test]
fn test_target_without_states_still_loads() {
    let yaml = "agrupa: region\nregion: Sureste\nregion_map:\n  Sonora: Noroeste\n";

    let config = PipelineConfig::from_yaml_str(yaml).unwrap();

    assert!(config.target_states().is_empty());
    assert!(PipelineConfig::by_sex().target_states().is_empty());
}
