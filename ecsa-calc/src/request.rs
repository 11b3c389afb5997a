//! Calculation request files.
//!
//! A request is a small TOML document describing one calculation:
//!
//! ```toml
//! method = "total"
//! total_cost = "R 20 000 000"
//!
//! [percentages]
//! 1 = 60
//! 6 = 40
//!
//! [discounts]
//! 1 = 10
//!
//! [factors]
//! 1 = ["Rural roads"]
//! ```
//!
//! Amounts may be written as numbers or as free-form text, which is read
//! with [`ecsa_fees::parse_number`].

use anyhow::{Context, Result};
use ecsa_fees::{parse_number, CalculationInput, InputMethod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// A number, or text containing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn value(&self) -> Result<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => Ok(parse_number(text)?),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// On-disk form of a [`CalculationInput`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestFile {
    #[serde(default)]
    pub method: InputMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Amount>,

    /// Share of the total cost per table id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub percentages: BTreeMap<String, Amount>,

    /// Direct cost per table id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub costs: BTreeMap<String, Amount>,

    /// Discount percentage per table id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub discounts: BTreeMap<String, Amount>,

    /// Selected adjustment factor names per table id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub factors: BTreeMap<String, Vec<String>>,
}

impl RequestFile {
    /// Load a request from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse request from {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save request to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize request")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write request to {}", path.display()))
    }

    /// Resolve all amounts into a [`CalculationInput`].
    pub fn into_input(self) -> Result<CalculationInput> {
        let total_cost = match &self.total_cost {
            Some(amount) => amount.value().context("Invalid total_cost")?,
            None => 0.0,
        };

        let mut selected_factors = BTreeMap::new();
        for (table_id, names) in self.factors {
            selected_factors.insert(table_id, names.into_iter().collect());
        }

        Ok(CalculationInput {
            method: self.method,
            total_cost,
            percentages: resolve_amounts("percentages", self.percentages)?,
            costs: resolve_amounts("costs", self.costs)?,
            discounts: resolve_amounts("discounts", self.discounts)?,
            selected_factors,
        })
    }

    /// Build a request holding the values of `input`.
    pub fn from_input(input: &CalculationInput) -> Self {
        let amounts = |values: &BTreeMap<String, f64>| {
            values
                .iter()
                .map(|(table_id, value)| (table_id.clone(), Amount::from(*value)))
                .collect()
        };

        Self {
            method: input.method,
            total_cost: (input.method == InputMethod::Total).then_some(input.total_cost.into()),
            percentages: amounts(&input.percentages),
            costs: amounts(&input.costs),
            discounts: amounts(&input.discounts),
            factors: input
                .selected_factors
                .iter()
                .map(|(table_id, names)| {
                    let names = names.iter().cloned().collect();
                    (table_id.clone(), names)
                })
                .collect(),
        }
    }

    /// Starter request written by `init`.
    pub fn example() -> Self {
        let input = CalculationInput::total(20_000_000.0)
            .with_percentage("1", 60.0)
            .with_percentage("6", 40.0)
            .with_discount("1", 10.0)
            .with_factor("1", "Rural roads");
        Self::from_input(&input)
    }
}

fn resolve_amounts(
    section: &str,
    amounts: BTreeMap<String, Amount>,
) -> Result<BTreeMap<String, f64>> {
    amounts
        .into_iter()
        .map(|(table_id, amount)| {
            let value = amount.value().with_context(|| {
                format!("Invalid value in [{section}] for table {table_id}")
            })?;
            Ok((table_id, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_amounts_accept_numbers_and_text() {
        let request = RequestFile::parse(
            r#"
method = "category"

[costs]
1 = 1500000
2 = "R 4,550,000.00"
7 = 2.5e6
"#,
        )
        .unwrap();

        let input = request.into_input().unwrap();
        assert_eq!(input.method, InputMethod::Category);
        assert_eq!(input.costs["1"], 1_500_000.0);
        assert_eq!(input.costs["2"], 4_550_000.0);
        assert_eq!(input.costs["7"], 2_500_000.0);
        assert_eq!(input.total_cost, 0.0);
    }

    #[test]
    fn test_defaults_to_total_method() {
        let request = RequestFile::parse("total_cost = \"R 20 000 000\"\n").unwrap();
        let input = request.into_input().unwrap();
        assert_eq!(input.method, InputMethod::Total);
        assert_eq!(input.total_cost, 20_000_000.0);
        assert!(input.percentages.is_empty());
    }

    #[test]
    fn test_factors_are_deduplicated() {
        let request = RequestFile::parse(
            r#"
[factors]
1 = ["Rural roads", "Rural roads", "Duplication of works"]
"#,
        )
        .unwrap();

        let input = request.into_input().unwrap();
        assert_eq!(input.selected_factors["1"].len(), 2);
    }

    #[test]
    fn test_malformed_amount_names_the_table() {
        let request = RequestFile::parse("[discounts]\n3 = \"1.2.3\"\n").unwrap();
        let err = request.into_input().unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("[discounts]"));
        assert!(message.contains("table 3"));
        assert!(message.contains("Malformed amount"));
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(RequestFile::parse("method = \"hourly\"\n").is_err());
    }

    #[test]
    fn test_request_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("request.toml");

        let request = RequestFile::example();
        request.save(&path).unwrap();

        let loaded = RequestFile::load(&path).unwrap();
        assert_eq!(loaded, request);

        let input = loaded.into_input().unwrap();
        assert_eq!(input.total_cost, 20_000_000.0);
        assert_eq!(input.percentages["1"], 60.0);
        assert!(input.selected_factors["1"].contains("Rural roads"));
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from(1500.5).to_string(), "1500.5");
        assert_eq!(Amount::Text("R 1 000".to_string()).to_string(), "R 1 000");
    }
}
