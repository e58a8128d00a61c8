use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filter::Threshold;
use crate::recognize::EntityLabel;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cograph.toml";

/// Everything one pipeline run needs, passed explicitly to each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_threshold")]
    pub threshold: i64,
    #[serde(default = "default_entity_label")]
    pub entity_label: String,
    #[serde(default = "default_text_column")]
    pub text_column: String,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub eigenvector: EigenvectorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            entity_label: default_entity_label(),
            text_column: default_text_column(),
            parallel: false,
            sample: SampleConfig::default(),
            eigenvector: EigenvectorConfig::default(),
        }
    }
}

/// Downsampling applied to oversized inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Inputs with more records than this are downsampled.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    /// Random sample size for oversized CSV inputs.
    #[serde(default = "default_csv_sample")]
    pub csv_sample: usize,
    /// Leading lines dropped from oversized TXT inputs.
    #[serde(default = "default_txt_skip")]
    pub txt_skip: usize,
    /// Lines kept from oversized TXT inputs.
    #[serde(default = "default_txt_take")]
    pub txt_take: usize,
    /// Seed for reproducible CSV sampling.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            csv_sample: default_csv_sample(),
            txt_skip: default_txt_skip(),
            txt_take: default_txt_take(),
            seed: None,
        }
    }
}

/// Power-iteration bounds for eigenvector centrality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
        }
    }
}

impl PipelineConfig {
    /// Check every field a stage will rely on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] or [`Error::InvalidLabel`] for the
    /// first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        self.threshold()?;
        self.label()?;
        if self.text_column.trim().is_empty() {
            return Err(Error::InvalidArgument("text_column must not be empty".into()));
        }
        if self.sample.max_records == 0 || self.sample.csv_sample == 0 || self.sample.txt_take == 0
        {
            return Err(Error::InvalidArgument(
                "sample.max_records, sample.csv_sample and sample.txt_take must be > 0".into(),
            ));
        }
        if self.eigenvector.max_iter == 0 {
            return Err(Error::InvalidArgument("eigenvector.max_iter must be > 0".into()));
        }
        if !(self.eigenvector.tolerance.is_finite() && self.eigenvector.tolerance > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "eigenvector.tolerance must be a positive number, got {}",
                self.eigenvector.tolerance
            )));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a negative threshold.
    pub fn threshold(&self) -> Result<Threshold, Error> {
        Threshold::new(self.threshold)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidLabel`] for an empty label.
    pub fn label(&self) -> Result<EntityLabel, Error> {
        EntityLabel::new(&self.entity_label)
    }
}

/// Load a pipeline config file; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<PipelineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_threshold() -> i64 {
    500
}

fn default_entity_label() -> String {
    "PERSON".to_string()
}

fn default_text_column() -> String {
    "text".to_string()
}

const fn default_max_records() -> usize {
    1500
}

const fn default_csv_sample() -> usize {
    1000
}

const fn default_txt_skip() -> usize {
    100
}

const fn default_txt_take() -> usize {
    1000
}

const fn default_max_iter() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    1e-6
}
