//! Configuration for the weekly case pipeline.
//!
//! The configuration keeps the keys used by the reporting agency's tooling
//! (`agrupa`, `region`, `tratamiento_outliers`, `region_map`) and is validated
//! once at load time so the pipeline stages never inspect untyped values.

use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Result, SeriesError};
use crate::models::Sex;

/// Default IQR multiplier for outlier bounding
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;

/// Aggregation dimension selected by `agrupa`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Grouping {
    /// National series per sex, grouped by date
    Sex,
    /// Series per state, mapped to macro-regions
    Region,
    /// Any other value; aggregation logs a warning and yields nothing
    Unknown(String),
}

impl From<String> for Grouping {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "sexo" => Self::Sex,
            "region" => Self::Region,
            _ => Self::Unknown(value),
        }
    }
}

impl From<&str> for Grouping {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sex => write!(f, "sexo"),
            Self::Region => write!(f, "region"),
            Self::Unknown(value) => write!(f, "{value}"),
        }
    }
}

fn default_factor() -> f64 {
    DEFAULT_IQR_FACTOR
}

/// Outlier treatment options (`tratamiento_outliers`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutlierConfig {
    /// Whether IQR clipping is applied at all
    #[serde(rename = "IQR", default)]
    pub enabled: bool,
    /// Increment columns to clip, by output column name
    #[serde(rename = "columnas", default)]
    pub columns: Vec<String>,
    /// Multiplier applied to the interquartile range
    #[serde(default = "default_factor")]
    pub factor: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            columns: Vec::new(),
            factor: DEFAULT_IQR_FACTOR,
        }
    }
}

impl OutlierConfig {
    /// Enable IQR clipping for the given increment columns
    #[must_use]
    pub fn iqr<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            columns: columns.into_iter().map(Into::into).collect(),
            factor: DEFAULT_IQR_FACTOR,
        }
    }

    /// Set the IQR multiplier
    #[must_use]
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Resolve the configured column names to sex selectors
    pub fn sexes(&self) -> Result<Vec<Sex>> {
        self.columns
            .iter()
            .map(|column| {
                Sex::from_increment_column(column)
                    .ok_or_else(|| SeriesError::UnknownColumn(column.clone()))
            })
            .collect()
    }
}

/// Lookup from state name to macro-region name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RegionMap(BTreeMap<String, String>);

impl RegionMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a state to a macro-region
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>, macro_region: impl Into<String>) -> Self {
        self.insert(state, macro_region);
        self
    }

    /// Insert a state, replacing any previous assignment
    pub fn insert(&mut self, state: impl Into<String>, macro_region: impl Into<String>) {
        self.0.insert(state.into(), macro_region.into());
    }

    /// Macro-region of a state, if mapped
    #[must_use]
    pub fn macro_region(&self, state: &str) -> Option<&str> {
        self.0.get(state).map(String::as_str)
    }

    /// Distinct macro-region names, sorted
    #[must_use]
    pub fn macro_regions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// States assigned to a macro-region
    pub fn states_of<'a>(&'a self, macro_region: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, region)| region.as_str() == macro_region)
            .map(|(state, _)| state.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Macro-region listed as a name plus its member states (`regiones` form)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MacroRegionDef {
    /// Macro-region name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Member states
    #[serde(rename = "estados", default)]
    pub states: Vec<String>,
}

/// Configuration for the weekly case pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineConfig {
    /// Aggregation dimension
    #[serde(rename = "agrupa")]
    pub grouping: Grouping,
    /// Macro-region selected for the single-region view
    #[serde(rename = "region", default)]
    pub target_region: Option<String>,
    /// Outlier treatment
    #[serde(rename = "tratamiento_outliers", default)]
    pub outliers: OutlierConfig,
    /// State to macro-region lookup
    #[serde(default)]
    pub region_map: RegionMap,
    #[serde(rename = "regiones", default)]
    regions: Vec<MacroRegionDef>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grouping: Grouping::Sex,
            target_region: None,
            outliers: OutlierConfig::default(),
            region_map: RegionMap::default(),
            regions: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Configuration aggregating nationally by sex
    #[must_use]
    pub fn by_sex() -> Self {
        Self::default()
    }

    /// Configuration aggregating by state and macro-region
    #[must_use]
    pub fn by_region(target_region: impl Into<String>, region_map: RegionMap) -> Self {
        Self {
            grouping: Grouping::Region,
            target_region: Some(target_region.into()),
            region_map,
            ..Self::default()
        }
    }

    /// Set the outlier treatment
    #[must_use]
    pub fn with_outliers(mut self, outliers: OutlierConfig) -> Self {
        self.outliers = outliers;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| SeriesError::config(format!("invalid YAML configuration: {e}")))?;
        config.finish()
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| SeriesError::config(format!("invalid JSON configuration: {e}")))?;
        config.finish()
    }

    /// Load a configuration file, choosing the format from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(SeriesError::config(format!(
                "unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// States mapped to the configured target macro-region, sorted
    #[must_use]
    pub fn target_states(&self) -> Vec<&str> {
        self.target_region
            .as_deref()
            .map(|target| self.region_map.states_of(target).collect())
            .unwrap_or_default()
    }

    fn finish(mut self) -> Result<Self> {
        for def in std::mem::take(&mut self.regions) {
            for state in def.states {
                self.region_map.insert(state, def.name.clone());
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the cross-field rules of the configuration
    pub fn validate(&self) -> Result<()> {
        if self.grouping == Grouping::Region && self.target_region.is_none() {
            return Err(SeriesError::config(
                "'region' is required when 'agrupa' is 'region'",
            ));
        }

        if !self.outliers.factor.is_finite() || self.outliers.factor < 0.0 {
            return Err(SeriesError::config(format!(
                "IQR factor must be a finite non-negative number, got {}",
                self.outliers.factor
            )));
        }

        if self.outliers.enabled {
            self.outliers.sexes()?;
        }

        if self.grouping == Grouping::Region && self.target_states().is_empty() {
            warn!(
                "No state in the region map belongs to macro-region '{}'",
                self.target_region.as_deref().unwrap_or_default()
            );
        }

        Ok(())
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Grouping: {}", self.grouping)?;
        if let Some(region) = &self.target_region {
            writeln!(f, "  Target Region: {region}")?;
        }
        writeln!(f, "  IQR Treatment: {}", self.outliers.enabled)?;
        if self.outliers.enabled {
            writeln!(f, "  IQR Columns: {}", self.outliers.columns.join(", "))?;
            writeln!(f, "  IQR Factor: {}", self.outliers.factor)?;
        }
        writeln!(f, "  Mapped States: {}", self.region_map.len())?;
        if self.grouping == Grouping::Region {
            writeln!(f, "  Target States: {}", self.target_states().join(", "))?;
        }
        Ok(())
    }
}
