use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::export::{result_json, write_export};
use crate::report::Report;
use crate::request::RequestFile;

/// Flags of the calculate command
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub json: bool,

    /// `Some(None)` exports to the configured directory.
    pub export: Option<Option<PathBuf>>,

    pub force: bool,
}

/// Run the calculate command
pub fn run(
    config_path: &Path,
    dataset_path: Option<&Path>,
    request_path: &Path,
    options: Options,
) -> Result<()> {
    let (config, dataset) = super::load_context(config_path, dataset_path)?;

    let input = RequestFile::load(request_path)?.into_input()?;

    let issues = input.readiness(&dataset);
    if !issues.is_empty() {
        for issue in &issues {
            warn!("{}", issue);
        }
        if !options.force {
            bail!(
                "Request {} is not ready ({} issue(s)). Use --force to calculate anyway.",
                request_path.display(),
                issues.len()
            );
        }
    }

    let result = dataset.calculate(&input);
    info!(
        "Calculated {} categor{} from {}",
        result.categories.len(),
        if result.categories.len() == 1 { "y" } else { "ies" },
        request_path.display()
    );
    for category in result.advisories() {
        if let Some(note) = &category.advisory_note {
            warn!("Table {}: {}", category.table_id, note);
        }
    }

    if options.json {
        println!("{}", result_json(&dataset, &input, &result, true)?);
    } else {
        let report = Report::new(&dataset, &input, &result)
            .with_options(config.report.clone());
        print!("{report}");
    }

    if let Some(export) = options.export {
        let Some(dir) = export.or_else(|| config.export.directory.clone()) else {
            bail!("No export directory given and none configured (export.directory)");
        };
        let pretty = config.export.pretty_json;
        let written = write_export(&dir, &dataset, &input, &result, pretty)?;
        info!("Exported {} files to {}", written.len(), dir.display());
    }

    Ok(())
}
