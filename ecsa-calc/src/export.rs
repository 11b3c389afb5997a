//! Workbook-style export of a calculation.
//!
//! Writes one CSV file per sheet plus the full result as JSON:
//!
//! | File               | Contents                                      |
//! |--------------------|-----------------------------------------------|
//! | `inputs.csv`       | Input method, total cost, per-table allocation |
//! | `calculations.csv` | Per-category fee figures                      |
//! | `stages.csv`       | Stage amounts per category                    |
//! | `result.json`      | Inputs and [`CalculationResult`]              |

use anyhow::{Context, Result};
use ecsa_fees::{
    format_currency, format_multiplier, format_percent, CalculationInput, CalculationResult,
    GuidelineDataset, InputMethod,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const INPUTS_FILE: &str = "inputs.csv";
pub const CALCULATIONS_FILE: &str = "calculations.csv";
pub const STAGES_FILE: &str = "stages.csv";
pub const RESULT_FILE: &str = "result.json";

const CALCULATION_HEADERS: [&str; 9] = [
    "Table",
    "Allocated Cost",
    "Primary Fee",
    "Secondary Fee",
    "Basic Fee",
    "Adjustment Factor",
    "Discount %",
    "Final Fee",
    "Applied Factors",
];

const STAGE_HEADERS: [&str; 4] = ["Table", "Stage", "Percentage", "Amount"];

#[derive(Serialize)]
struct ExportDocument<'a> {
    guideline: &'a str,
    input: &'a CalculationInput,
    result: &'a CalculationResult,
}

/// Write all export files into `dir`, creating it if needed.
///
/// Returns the paths written, in sheet order.
pub fn write_export(
    dir: &Path,
    dataset: &GuidelineDataset,
    input: &CalculationInput,
    result: &CalculationResult,
    pretty_json: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let files = [
        (INPUTS_FILE, inputs_sheet(dataset, input)),
        (CALCULATIONS_FILE, calculations_sheet(result)),
        (STAGES_FILE, stages_sheet(result)),
        (RESULT_FILE, result_json(dataset, input, result, pretty_json)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Inputs and result as one JSON document.
pub fn result_json(
    dataset: &GuidelineDataset,
    input: &CalculationInput,
    result: &CalculationResult,
    pretty: bool,
) -> Result<String> {
    let document = ExportDocument {
        guideline: dataset.name(),
        input,
        result,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    json.context("Failed to serialize result")
}

/// The "Inputs" sheet.
pub fn inputs_sheet(dataset: &GuidelineDataset, input: &CalculationInput) -> String {
    let total_cost = if input.method == InputMethod::Total && input.total_cost != 0.0 {
        format_currency(input.total_cost)
    } else {
        "Not specified".to_string()
    };

    let mut rows = vec![
        vec!["ECSA Fee Calculator Inputs".to_string()],
        vec![format!("Guideline: {}", dataset.name())],
        vec![String::new()],
        vec!["Input method".to_string(), input.method.describe().to_string()],
        vec!["Total project cost".to_string(), total_cost],
        vec![String::new()],
        vec!["Category allocations".to_string()],
    ];

    for table in dataset.tables() {
        let share = match input.method {
            InputMethod::Total => format_percent(input.percentage(&table.id)),
            InputMethod::Category => String::new(),
        };
        rows.push(vec![
            format!("{}: {}", table.id, table.name),
            share,
            format_currency(input.allocated_cost(&table.id)),
        ]);
    }

    to_csv(&rows)
}

/// The "Calculations" sheet.
pub fn calculations_sheet(result: &CalculationResult) -> String {
    let mut rows = vec![CALCULATION_HEADERS.map(String::from).to_vec()];

    for category in &result.categories {
        let factors = if category.applied_factors.is_empty() {
            "None".to_string()
        } else {
            category.applied_factors.join(", ")
        };
        rows.push(vec![
            format!("{}: {}", category.table_id, category.table_name),
            format_currency(category.allocated_cost),
            format_currency(category.primary_fee),
            format_currency(category.secondary_fee),
            format_currency(category.basic_fee),
            format_multiplier(category.compound_multiplier),
            format!("{:.2}%", category.discount_percent),
            format_currency(category.final_fee),
            factors,
        ]);
    }

    to_csv(&rows)
}

/// The "Stages" sheet.
pub fn stages_sheet(result: &CalculationResult) -> String {
    let mut rows = vec![STAGE_HEADERS.map(String::from).to_vec()];

    for breakdown in &result.stage_breakdowns {
        for stage in breakdown.iter() {
            rows.push(vec![
                breakdown.table_id.clone(),
                stage.stage.clone(),
                format_percent(stage.weight),
                format_currency(stage.amount),
            ]);
        }
    }

    to_csv(&rows)
}

fn to_csv(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|field| escape_field(field)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field per RFC 4180 when it contains a delimiter, quote or newline.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
