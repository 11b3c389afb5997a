//! CLI command implementations.
//!
//! These modules implement the user-facing CLI commands and legitimately
//! use stdout for output.

#![allow(clippy::print_stdout)]

pub mod calculate;
pub mod check_dataset;
pub mod init;
pub mod tables;

use anyhow::Result;
use ecsa_fees::GuidelineDataset;
use std::path::Path;

use crate::config::{load_dataset, Config};

/// Load the config and the dataset it selects. `dataset` overrides the
/// config's dataset path.
fn load_context(
    config_path: &Path,
    dataset: Option<&Path>,
) -> Result<(Config, GuidelineDataset)> {
    let config = Config::load_or_default(config_path)?;
    let dataset_path = dataset.or(config.dataset.as_deref());

    let dataset = load_dataset(dataset_path)?;
    let source = match dataset_path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };
    tracing::debug!(
        dataset = %dataset.name(),
        source = %source,
        "Loaded guideline dataset"
    );

    Ok((config, dataset))
}
