use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DataVisError, Result};

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "datavis.toml";

/// Runtime settings. Every field has a default, so an absent or partial
/// `datavis.toml` is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Dataset loaded at startup.
    pub input: PathBuf,
    /// Directory receiving charts and reports.
    pub output_dir: PathBuf,
    pub dpi: u32,
    pub histogram_bins: usize,
    /// Minimum `|r|` for a pair to be listed in the report.
    pub correlation_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("sample_data.csv"),
            output_dir: PathBuf::from("plots"),
            dpi: 300,
            histogram_bins: 8,
            correlation_threshold: 0.7,
        }
    }
}

impl Settings {
    /// Load `datavis.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            log::info!("Using configuration from {}", path.display());
            Self::from_file(&path)
        } else {
            log::debug!("No {CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(DataVisError::Config("dpi must be greater than 0".into()));
        }
        if self.histogram_bins == 0 {
            return Err(DataVisError::Config(
                "histogram_bins must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(DataVisError::Config(format!(
                "correlation_threshold must be within [0, 1], got {}",
                self.correlation_threshold
            )));
        }
        Ok(())
    }
}
