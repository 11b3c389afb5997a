//! Guideline reference data: fee tables, adjustment factors and stage weights.
//!
//! A [`GuidelineDataset`] is immutable once built. All cross references
//! (table → stage set, table → factor set) and all authoring invariants
//! (contiguous brackets, stage weights summing to 100) are checked once in
//! [`GuidelineDataset::new`]; the calculator relies on them afterwards and
//! never re-validates.
//!
//! ## Bracket layout
//!
//! ```text
//! [min_0, max_0) [min_1 = max_0, max_1) ... [min_n, max_n | unbounded)
//! ```
//!
//! Only the final bracket may be unbounded. A final bracket with a finite
//! `max` is allowed: costs at or above it simply fall outside the table.

use std::collections::HashSet;

use crate::error::{DatasetError, DatasetResult};

/// Tolerance used when checking that stage weights add up to 100%.
pub const STAGE_WEIGHT_TOLERANCE: f64 = 1e-6;

/// One graduated cost range of a fee table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeBracket {
    /// Inclusive lower bound of the cost range.
    pub min: f64,

    /// Exclusive upper bound. `None` means unbounded above.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub max: Option<f64>,

    /// Flat fee charged for any cost inside the bracket.
    pub primary_fee: f64,

    /// Marginal rate, in percent, applied to the cost above `min`.
    pub secondary_rate: f64,
}

impl FeeBracket {
    /// Create a bracket with a finite upper bound.
    pub const fn new(min: f64, max: f64, primary_fee: f64, secondary_rate: f64) -> Self {
        Self {
            min,
            max: Some(max),
            primary_fee,
            secondary_rate,
        }
    }

    /// Create a bracket that is unbounded above.
    pub const fn open(min: f64, primary_fee: f64, secondary_rate: f64) -> Self {
        Self {
            min,
            max: None,
            primary_fee,
            secondary_rate,
        }
    }

    /// Whether `cost` falls inside `[min, max)`.
    pub fn contains(&self, cost: f64) -> bool {
        cost >= self.min && self.max.map_or(true, |max| cost < max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// A published fee table for one engineering category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDefinition {
    /// Stable table identifier (e.g. `"1"`).
    pub id: String,

    /// Display name of the category.
    pub name: String,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,

    /// Key of the adjustment factor set that applies to this table.
    /// Several tables may share one set.
    pub factor_set: String,

    /// Key of the stage weight set used to split this table's fee.
    pub stage_set: String,

    /// Brackets in ascending order of `min`.
    pub brackets: Vec<FeeBracket>,
}

impl TableDefinition {
    /// Find the bracket containing `cost`.
    ///
    /// Returns `None` when the cost is below the first bracket or at/above the
    /// bound of a finite final bracket.
    pub fn find_bracket(&self, cost: f64) -> Option<&FeeBracket> {
        self.brackets.iter().find(|bracket| bracket.contains(cost))
    }

    fn validate(&self) -> DatasetResult<()> {
        if self.brackets.is_empty() {
            return Err(DatasetError::EmptyTable(self.id.clone()));
        }

        let last = self.brackets.len() - 1;
        for (index, bracket) in self.brackets.iter().enumerate() {
            let range_ok = bracket.min.is_finite()
                && bracket.primary_fee.is_finite()
                && bracket.secondary_rate.is_finite()
                && bracket.max.map_or(true, |max| max > bracket.min);
            if !range_ok {
                return Err(DatasetError::InvalidBracketRange {
                    table_id: self.id.clone(),
                    index,
                });
            }

            if index == last {
                continue;
            }
            match bracket.max {
                None => {
                    return Err(DatasetError::UnboundedBracketNotLast {
                        table_id: self.id.clone(),
                        index,
                    })
                }
                Some(max) if max != self.brackets[index + 1].min => {
                    return Err(DatasetError::NonContiguousBrackets {
                        table_id: self.id.clone(),
                        index,
                    })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// A named multiplier describing a project characteristic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjustmentFactor {
    pub name: String,

    /// Multiplier applied to the basic fee (e.g. 0.85, 1.25).
    pub multiplier: f64,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub note: Option<String>,
}

impl AdjustmentFactor {
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            multiplier,
            note: None,
        }
    }
}

/// The adjustment factors a group of tables may select from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorSet {
    pub key: String,
    pub factors: Vec<AdjustmentFactor>,
}

impl FactorSet {
    /// Look up a factor by exact name.
    pub fn get(&self, name: &str) -> Option<&AdjustmentFactor> {
        self.factors.iter().find(|factor| factor.name == name)
    }

    fn validate(&self) -> DatasetResult<()> {
        let mut seen = HashSet::new();
        for factor in &self.factors {
            if !seen.insert(factor.name.as_str()) {
                return Err(DatasetError::DuplicateFactor {
                    set: self.key.clone(),
                    name: factor.name.clone(),
                });
            }
            if !factor.multiplier.is_finite() {
                return Err(DatasetError::InvalidMultiplier {
                    set: self.key.clone(),
                    name: factor.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Share of the fee attributed to one delivery stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageWeight {
    pub stage: String,

    /// Percentage of the final fee (0-100).
    pub weight: f64,
}

impl StageWeight {
    pub fn new(stage: impl Into<String>, weight: f64) -> Self {
        Self {
            stage: stage.into(),
            weight,
        }
    }
}

/// Ordered stage weights for a family of projects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageWeightSet {
    pub key: String,
    pub stages: Vec<StageWeight>,
}

impl StageWeightSet {
    /// Weight of a stage by name.
    pub fn weight(&self, stage: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.stages.iter().map(|entry| entry.weight).sum()
    }

    fn validate(&self) -> DatasetResult<()> {
        if self.stages.is_empty() {
            return Err(DatasetError::EmptyStageSet(self.key.clone()));
        }
        let total = self.total_weight();
        if !total.is_finite() || (total - 100.0).abs() > STAGE_WEIGHT_TOLERANCE {
            return Err(DatasetError::StageWeightsNotHundred {
                key: self.key.clone(),
                total,
            });
        }
        Ok(())
    }
}

/// Raw, unvalidated dataset contents.
///
/// This is the shape datasets are authored in (Rust literals, TOML or JSON).
/// Turn it into a [`GuidelineDataset`] with [`GuidelineDataset::new`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetDefinition {
    /// Human readable title of the guideline (gazette reference etc.).
    pub name: String,

    /// Costs below this value are not covered by the brackets.
    #[cfg_attr(feature = "serde", serde(default = "default_minimum_project_value"))]
    pub minimum_project_value: f64,

    /// Tables in presentation order. The calculator visits them in this order.
    pub tables: Vec<TableDefinition>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub factor_sets: Vec<FactorSet>,

    pub stage_sets: Vec<StageWeightSet>,
}

#[cfg(feature = "serde")]
fn default_minimum_project_value() -> f64 {
    crate::fee::MIN_PROJECT_VALUE
}

/// Validated, read-only guideline reference data.
///
/// Cheap to share: it is `Send + Sync` and never mutated after construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "DatasetDefinition"))]
pub struct GuidelineDataset {
    name: String,
    minimum_project_value: f64,
    tables: Vec<TableDefinition>,
    factor_sets: Vec<FactorSet>,
    stage_sets: Vec<StageWeightSet>,
}

impl GuidelineDataset {
    /// Validate a dataset definition.
    pub fn new(definition: DatasetDefinition) -> DatasetResult<Self> {
        let DatasetDefinition {
            name,
            minimum_project_value,
            tables,
            factor_sets,
            stage_sets,
        } = definition;

        if !(minimum_project_value.is_finite() && minimum_project_value > 0.0) {
            return Err(DatasetError::InvalidMinimumProjectValue(
                minimum_project_value,
            ));
        }

        let mut factor_keys = HashSet::new();
        for set in &factor_sets {
            if !factor_keys.insert(set.key.as_str()) {
                return Err(DatasetError::DuplicateFactorSet(set.key.clone()));
            }
            set.validate()?;
        }

        let mut stage_keys = HashSet::new();
        for set in &stage_sets {
            if !stage_keys.insert(set.key.as_str()) {
                return Err(DatasetError::DuplicateStageSet(set.key.clone()));
            }
            set.validate()?;
        }

        let mut table_ids = HashSet::new();
        for table in &tables {
            if !table_ids.insert(table.id.as_str()) {
                return Err(DatasetError::DuplicateTable(table.id.clone()));
            }
            table.validate()?;
            if !stage_keys.contains(table.stage_set.as_str()) {
                return Err(DatasetError::MissingStageSet {
                    table_id: table.id.clone(),
                    stage_set: table.stage_set.clone(),
                });
            }
            if !factor_keys.contains(table.factor_set.as_str()) {
                return Err(DatasetError::MissingFactorSet {
                    table_id: table.id.clone(),
                    factor_set: table.factor_set.clone(),
                });
            }
        }

        tracing::debug!(
            dataset = %name,
            tables = tables.len(),
            factor_sets = factor_sets.len(),
            stage_sets = stage_sets.len(),
            "guideline dataset validated"
        );

        Ok(Self {
            name,
            minimum_project_value,
            tables,
            factor_sets,
            stage_sets,
        })
    }

    /// Parse and validate a dataset authored in TOML.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(contents: &str) -> DatasetResult<Self> {
        let definition: DatasetDefinition =
            toml::from_str(contents).map_err(|err| DatasetError::Parse(err.to_string()))?;
        Self::new(definition)
    }

    /// Parse and validate a dataset authored in JSON.
    #[cfg(feature = "serde")]
    pub fn from_json_str(contents: &str) -> DatasetResult<Self> {
        let definition: DatasetDefinition = serde_json::from_str(contents)
            .map_err(|err| DatasetError::Parse(err.to_string()))?;
        Self::new(definition)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Global threshold below which costs get an advisory instead of a fee.
    pub fn minimum_project_value(&self) -> f64 {
        self.minimum_project_value
    }

    /// All tables, in dataset order.
    pub fn tables(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn table(&self, table_id: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|table| table.id == table_id)
    }

    pub fn factor_sets(&self) -> &[FactorSet] {
        &self.factor_sets
    }

    pub fn factor_set(&self, key: &str) -> Option<&FactorSet> {
        self.factor_sets.iter().find(|set| set.key == key)
    }

    /// The factor set a table selects from.
    pub fn factors_for_table(&self, table_id: &str) -> Option<&FactorSet> {
        self.table(table_id)
            .and_then(|table| self.factor_set(&table.factor_set))
    }

    pub fn stage_sets(&self) -> &[StageWeightSet] {
        &self.stage_sets
    }

    pub fn stage_set(&self, key: &str) -> Option<&StageWeightSet> {
        self.stage_sets.iter().find(|set| set.key == key)
    }

    /// The stage weights used to split a table's fee.
    pub fn stages_for_table(&self, table_id: &str) -> Option<&StageWeightSet> {
        self.table(table_id)
            .and_then(|table| self.stage_set(&table.stage_set))
    }

    /// Convert back into an editable definition.
    pub fn into_definition(self) -> DatasetDefinition {
        DatasetDefinition {
            name: self.name,
            minimum_project_value: self.minimum_project_value,
            tables: self.tables,
            factor_sets: self.factor_sets,
            stage_sets: self.stage_sets,
        }
    }
}

impl TryFrom<DatasetDefinition> for GuidelineDataset {
    type Error = DatasetError;

    fn try_from(definition: DatasetDefinition) -> DatasetResult<Self> {
        Self::new(definition)
    }
}
