use anyhow::{anyhow, Context, Result};
use ecsa_fees::GuidelineDataset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration for the calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Guideline dataset file (TOML or JSON). The built-in 2025 guideline is
    /// used when unset. Relative paths resolve against the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print the per-category input allocations
    #[serde(default = "default_true")]
    pub show_inputs: bool,

    /// Print the stage breakdown under each category
    #[serde(default = "default_true")]
    pub show_stages: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_inputs: true,
            show_stages: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory used by `calculate --export` when no directory is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Pretty-print result.json
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            pretty_json: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load config from a file, falling back to defaults if it is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !Self::exists(path) {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let mut config = Self::load(path)?;
        if let (Some(dataset), Some(base)) = (config.dataset.as_ref(), path.parent()) {
            if dataset.is_relative() {
                config.dataset = Some(base.join(dataset));
            }
        }
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}

/// Get the default config directory path
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ecsa-calc"))
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("config.toml"))
}

/// Load a guideline dataset, or the built-in 2025 guideline when `path` is
/// `None`.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
pub fn load_dataset(path: Option<&Path>) -> Result<GuidelineDataset> {
    let Some(path) = path else {
        return GuidelineDataset::ecsa_2025().context("Built-in guideline dataset is invalid");
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset from {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let dataset = if is_json {
        GuidelineDataset::from_json_str(&contents)
    } else {
        GuidelineDataset::from_toml_str(&contents)
    };

    dataset.with_context(|| format!("Invalid dataset in {}", path.display()))
}
