//! Plain text rendering of a calculation.

use ecsa_fees::{
    format_currency, format_multiplier, format_percent, CalculationInput, CalculationResult,
    GuidelineDataset, InputMethod,
};
use std::fmt;

use crate::config::ReportConfig;

const LABEL_WIDTH: usize = 24;

/// A calculation ready to be printed.
pub struct Report<'a> {
    dataset: &'a GuidelineDataset,
    input: &'a CalculationInput,
    result: &'a CalculationResult,
    options: ReportConfig,
}

impl<'a> Report<'a> {
    pub fn new(
        dataset: &'a GuidelineDataset,
        input: &'a CalculationInput,
        result: &'a CalculationResult,
    ) -> Self {
        Self {
            dataset,
            input,
            result,
            options: ReportConfig::default(),
        }
    }

    pub fn with_options(mut self, options: ReportConfig) -> Self {
        self.options = options;
        self
    }

    fn write_inputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Category allocations")?;
        for table in self.dataset.tables() {
            let cost = self.input.allocated_cost(&table.id);
            let share = match self.input.method {
                InputMethod::Total => format_percent(self.input.percentage(&table.id)),
                InputMethod::Category => String::new(),
            };
            writeln!(
                f,
                "  {:<44} {:>8} {:>20}",
                format!("{}: {}", table.id, table.name),
                share,
                format_currency(cost)
            )?;
        }
        writeln!(f)
    }

    fn write_categories(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in &self.result.categories {
            writeln!(f, "Table {}: {}", category.table_id, category.table_name)?;
            line(f, "Allocated cost", &format_currency(category.allocated_cost))?;
            line(f, "Primary fee", &format_currency(category.primary_fee))?;
            line(f, "Secondary fee", &format_currency(category.secondary_fee))?;
            line(f, "Basic fee", &format_currency(category.basic_fee))?;

            let factors = if category.applied_factors.is_empty() {
                "None".to_string()
            } else {
                category.applied_factors.join(", ")
            };
            line(f, "Adjustment factors", &factors)?;
            let multiplier = format_multiplier(category.compound_multiplier);
            line(f, "Adjustment multiplier", &multiplier)?;
            line(f, "Discount", &format_percent(category.discount_percent))?;
            line(f, "Final fee", &format_currency(category.final_fee))?;

            if let Some(note) = &category.advisory_note {
                writeln!(f, "  Note: {note}")?;
            }

            if self.options.show_stages {
                if let Some(breakdown) = self.result.stage_breakdown(&category.table_id) {
                    writeln!(f, "  Stages")?;
                    for stage in breakdown.iter() {
                        writeln!(
                            f,
                            "    {:<44} {:>6} {:>20}",
                            stage.stage,
                            format_percent(stage.weight),
                            format_currency(stage.amount)
                        )?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {:<width$} {value}", format!("{label}:"), width = LABEL_WIDTH)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ECSA Fee Calculation")?;
        writeln!(f, "Guideline: {}", self.dataset.name())?;
        writeln!(f, "Input method: {}", self.input.method.describe())?;
        if self.input.method == InputMethod::Total {
            writeln!(f, "Total project cost: {}", format_currency(self.input.total_cost))?;
        }
        writeln!(f)?;

        if self.options.show_inputs {
            self.write_inputs(f)?;
        }

        if self.result.is_empty() {
            writeln!(f, "No category has a cost allocated.")?;
            return Ok(());
        }

        self.write_categories(f)?;

        let totals = &self.result.totals;
        writeln!(f, "Totals")?;
        line(f, "Fees before discount", &format_currency(totals.undiscounted_sum))?;
        line(f, "Fees after discount", &format_currency(totals.discounted_sum))?;
        let overall = format_percent(totals.overall_discount_percent);
        line(f, "Overall discount", &overall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> GuidelineDataset {
        GuidelineDataset::ecsa_2025().unwrap()
    }

    #[test]
    fn test_report_lists_category_figures() {
        let dataset = dataset();
        let input = CalculationInput::category()
            .with_cost("1", 1_500_000.0)
            .with_factor("1", "Rural roads")
            .with_discount("1", 10.0);
        let result = dataset.calculate(&input);

        let text = Report::new(&dataset, &input, &result).to_string();
        assert!(text.contains("Table 1: Civil & Structural Engineering"));
        assert!(text.contains("R 255 000.00"));
        assert!(text.contains("Rural roads"));
        assert!(text.contains("0.850"));
        assert!(text.contains("10%"));
        assert!(text.contains("Inception"));
        assert!(text.contains("Overall discount:"));
        assert!(!text.contains("Total project cost"));
    }

    #[test]
    fn test_report_shows_advisory_note() {
        let dataset = dataset();
        let input = CalculationInput::category().with_cost("3", 900_000.0);
        let result = dataset.calculate(&input);

        let text = Report::new(&dataset, &input, &result).to_string();
        assert!(text.contains("Note: Projects under R1,000,000"));
        assert!(text.contains("Adjustment factors:      None"));
    }

    #[test]
    fn test_report_options_hide_sections() {
        let dataset = dataset();
        let input = CalculationInput::total(2_100_000.0).with_percentage("4", 100.0);
        let result = dataset.calculate(&input);

        let options = ReportConfig {
            show_inputs: false,
            show_stages: false,
        };
        let text = Report::new(&dataset, &input, &result)
            .with_options(options)
            .to_string();
        assert!(text.contains("Total project cost: R 2 100 000.00"));
        assert!(!text.contains("Category allocations"));
        assert!(!text.contains("Stages"));
    }

    #[test]
    fn test_empty_result() {
        let dataset = dataset();
        let input = CalculationInput::category();
        let result = dataset.calculate(&input);

        let text = Report::new(&dataset, &input, &result).to_string();
        assert!(text.contains("No category has a cost allocated."));
        assert!(!text.contains("Totals"));
    }
}
