use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Run the check-dataset command
pub fn run(config_path: &Path, dataset_path: Option<&Path>) -> Result<()> {
    // Loading validates; any structural problem surfaces as an error here.
    let (_, dataset) = super::load_context(config_path, dataset_path)?;
    info!("Dataset is valid");

    let brackets: usize = dataset.tables().iter().map(|t| t.brackets.len()).sum();
    let factors: usize = dataset.factor_sets().iter().map(|s| s.factors.len()).sum();

    println!("Dataset: {}", dataset.name());
    println!(
        "Minimum project value: {}",
        ecsa_fees::format_currency(dataset.minimum_project_value())
    );
    println!("Tables: {} ({} brackets)", dataset.tables().len(), brackets);
    println!(
        "Factor sets: {} ({} factors)",
        dataset.factor_sets().len(),
        factors
    );
    println!("Stage sets: {}", dataset.stage_sets().len());

    Ok(())
}
