use anyhow::{bail, Result};
use ecsa_fees::{
    format_currency, format_multiplier, format_percent, GuidelineDataset, TableDefinition,
};
use std::path::Path;

/// Run the tables command
pub fn run(
    config_path: &Path,
    dataset_path: Option<&Path>,
    table_id: Option<&str>,
) -> Result<()> {
    let (_, dataset) = super::load_context(config_path, dataset_path)?;

    let tables: Vec<&TableDefinition> = match table_id {
        Some(id) => match dataset.table(id) {
            Some(table) => vec![table],
            None => bail!("Unknown table '{}' in {}", id, dataset.name()),
        },
        None => dataset.tables().iter().collect(),
    };

    println!("{}", dataset.name());
    println!(
        "Minimum project value: {}",
        format_currency(dataset.minimum_project_value())
    );

    for table in tables {
        print!("\n{}", describe_table(&dataset, table));
    }

    Ok(())
}

/// Reference data of one table: brackets, factors and stage weights.
pub fn describe_table(dataset: &GuidelineDataset, table: &TableDefinition) -> String {
    let mut out = format!("Table {}: {}\n", table.id, table.name);
    if let Some(description) = &table.description {
        out.push_str(&format!("  {description}\n"));
    }

    out.push_str(&format!(
        "  {:>20} {:>20} {:>20} {:>8}\n",
        "From", "Up to", "Primary fee", "Rate"
    ));
    for bracket in &table.brackets {
        let max = bracket
            .max
            .map_or_else(|| "and above".to_string(), format_currency);
        out.push_str(&format!(
            "  {:>20} {:>20} {:>20} {:>8}\n",
            format_currency(bracket.min),
            max,
            format_currency(bracket.primary_fee),
            format_percent(bracket.secondary_rate)
        ));
    }

    if let Some(set) = dataset.factors_for_table(&table.id) {
        out.push_str(&format!("  Adjustment factors ({})\n", set.key));
        for factor in &set.factors {
            out.push_str(&format!(
                "    {:<52} {}\n",
                factor.name,
                format_multiplier(factor.multiplier)
            ));
        }
    }

    if let Some(set) = dataset.stages_for_table(&table.id) {
        out.push_str(&format!("  Stages ({})\n", set.key));
        for stage in &set.stages {
            out.push_str(&format!(
                "    {:<52} {}\n",
                stage.stage,
                format_percent(stage.weight)
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_table() {
        let dataset = GuidelineDataset::ecsa_2025().unwrap();
        let table = dataset.table("1").unwrap();
        let text = describe_table(&dataset, table);

        assert!(text.starts_with("Table 1: Civil & Structural Engineering"));
        assert!(text.contains("R 1 050 000.00"));
        assert!(text.contains("R 178 500.00"));
        assert!(text.contains("17%"));
        assert!(text.contains("and above"));
        assert!(text.contains("Adjustment factors (2A)"));
        assert!(text.contains("Rural roads"));
        assert!(text.contains("0.850"));
    }

    #[test]
    fn test_finite_top_bracket_has_upper_bound() {
        let dataset = GuidelineDataset::ecsa_2025().unwrap();
        let table = dataset.table("7").unwrap();
        let text = describe_table(&dataset, table);

        assert!(!text.contains("and above"));
        assert!(text.contains("R 630 000 000.00"));
    }
}
