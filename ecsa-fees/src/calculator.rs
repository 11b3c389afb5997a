//! Fee calculation across all guideline categories.
//!
//! [`calculate_fees`] visits every table of the dataset in order, derives the
//! cost allocated to it, and for each category with a nonzero allocation runs
//! bracket lookup → adjustment/discount → stage split. Categories with no
//! allocation are left out of the result entirely.
//!
//! Categories never observe each other; totals are plain sums, so the result
//! does not depend on evaluation order.

use std::collections::{BTreeMap, BTreeSet};

use displaydoc::Display;

use crate::adjustment::{apply_discount, compound_multiplier, resolve_factors};
use crate::dataset::GuidelineDataset;
use crate::fee::{compute_basic_fee, AdvisoryNote};
use crate::stages::{allocate_stages, StageBreakdown};

/// Tolerance on the sum of percentages for the total-cost method.
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// How category costs are supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputMethod {
    /// One project cost split across categories by percentage.
    #[default]
    Total,

    /// A direct cost per category.
    Category,
}

impl InputMethod {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Total => "Total project cost with percentages",
            Self::Category => "Direct category cost capture",
        }
    }
}

/// Caller-supplied inputs for one calculation. All maps are keyed by table id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalculationInput {
    pub method: InputMethod,

    /// Project cost used with [`InputMethod::Total`].
    pub total_cost: f64,

    /// Share of `total_cost` per table, in percent.
    pub percentages: BTreeMap<String, f64>,

    /// Direct cost per table, used with [`InputMethod::Category`].
    pub costs: BTreeMap<String, f64>,

    /// Discount per table, in percent.
    pub discounts: BTreeMap<String, f64>,

    /// Requested adjustment factor names per table.
    pub selected_factors: BTreeMap<String, BTreeSet<String>>,
}

impl CalculationInput {
    /// Inputs for the total-cost method.
    pub fn total(total_cost: f64) -> Self {
        Self {
            method: InputMethod::Total,
            total_cost,
            ..Default::default()
        }
    }

    /// Inputs for the per-category method.
    pub fn category() -> Self {
        Self {
            method: InputMethod::Category,
            ..Default::default()
        }
    }

    pub fn with_percentage(mut self, table_id: impl Into<String>, percent: f64) -> Self {
        self.percentages.insert(table_id.into(), percent);
        self
    }

    pub fn with_cost(mut self, table_id: impl Into<String>, cost: f64) -> Self {
        self.costs.insert(table_id.into(), cost);
        self
    }

    pub fn with_discount(mut self, table_id: impl Into<String>, percent: f64) -> Self {
        self.discounts.insert(table_id.into(), percent);
        self
    }

    pub fn with_factor(mut self, table_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.selected_factors
            .entry(table_id.into())
            .or_default()
            .insert(name.into());
        self
    }

    /// Cost attributed to a table under the selected method. Unset is zero.
    pub fn allocated_cost(&self, table_id: &str) -> f64 {
        match self.method {
            InputMethod::Total => self.total_cost * self.percentage(table_id) / 100.0,
            InputMethod::Category => self.costs.get(table_id).copied().unwrap_or(0.0),
        }
    }

    /// Share of the total cost given to a table. Unset is zero.
    pub fn percentage(&self, table_id: &str) -> f64 {
        self.percentages.get(table_id).copied().unwrap_or(0.0)
    }

    pub fn discount(&self, table_id: &str) -> f64 {
        self.discounts.get(table_id).copied().unwrap_or(0.0)
    }

    /// Sum of percentages over the dataset's tables.
    pub fn total_percentage(&self, dataset: &GuidelineDataset) -> f64 {
        dataset
            .tables()
            .iter()
            .filter_map(|table| self.percentages.get(&table.id))
            .sum()
    }

    /// Check whether these inputs are ready to be calculated.
    ///
    /// The calculator itself accepts any input; this reports what a form
    /// would refuse to submit. An empty list means ready.
    pub fn readiness(&self, dataset: &GuidelineDataset) -> Vec<InputIssue> {
        let mut issues = Vec::new();

        let keys: BTreeSet<&String> = self
            .percentages
            .keys()
            .chain(self.costs.keys())
            .chain(self.discounts.keys())
            .chain(self.selected_factors.keys())
            .collect();
        for key in keys {
            if dataset.table(key).is_none() {
                issues.push(InputIssue::UnknownTable(key.clone()));
            }
        }

        match self.method {
            InputMethod::Total => {
                if self.total_cost.is_nan() || self.total_cost <= 0.0 {
                    issues.push(InputIssue::MissingTotalCost);
                }
                let total = self.total_percentage(dataset);
                if !total.is_finite() || (total - 100.0).abs() >= PERCENTAGE_TOLERANCE {
                    issues.push(InputIssue::PercentagesDoNotSumToHundred(total));
                }
            }
            InputMethod::Category => {
                let any_cost = dataset
                    .tables()
                    .iter()
                    .any(|table| self.allocated_cost(&table.id) > 0.0);
                if !any_cost {
                    issues.push(InputIssue::NoCategoryCosts);
                }
            }
        }

        issues
    }
}

/// Reason an input would not be accepted for calculation.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum InputIssue {
    /// A total project cost greater than zero is required
    MissingTotalCost,

    /// Category percentages add up to {0}%, expected 100%
    PercentagesDoNotSumToHundred(f64),

    /// No category has a cost greater than zero
    NoCategoryCosts,

    /// Unknown table id: {0}
    UnknownTable(String),
}

/// Fee figures for one category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeComputation {
    pub table_id: String,
    pub table_name: String,
    pub allocated_cost: f64,
    pub primary_fee: f64,
    pub secondary_fee: f64,
    pub basic_fee: f64,

    /// Factor names that survived filtering, in factor-set order.
    pub applied_factors: Vec<String>,
    pub compound_multiplier: f64,
    pub discount_percent: f64,
    pub final_fee: f64,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub advisory_note: Option<AdvisoryNote>,
}

impl FeeComputation {
    /// Fee after adjustment, before discount.
    pub fn adjusted_fee(&self) -> f64 {
        self.basic_fee * self.compound_multiplier
    }
}

/// Sums over all included categories.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Totals {
    /// Σ basic_fee × compound_multiplier.
    pub undiscounted_sum: f64,

    /// Σ final_fee.
    pub discounted_sum: f64,

    /// Effective discount over all categories, 0 when nothing was charged.
    pub overall_discount_percent: f64,
}

impl Totals {
    fn from_sums(undiscounted_sum: f64, discounted_sum: f64) -> Self {
        let overall_discount_percent = if undiscounted_sum > 0.0 {
            (undiscounted_sum - discounted_sum) / undiscounted_sum * 100.0
        } else {
            0.0
        };
        Self {
            undiscounted_sum,
            discounted_sum,
            overall_discount_percent,
        }
    }
}

/// Complete output of one calculation.
///
/// Only categories with a nonzero allocation appear; both `categories` and
/// `stage_breakdowns` follow dataset order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculationResult {
    pub categories: Vec<FeeComputation>,
    pub stage_breakdowns: Vec<StageBreakdown>,
    pub totals: Totals,
}

impl CalculationResult {
    pub fn category(&self, table_id: &str) -> Option<&FeeComputation> {
        self.categories.iter().find(|c| c.table_id == table_id)
    }

    pub fn stage_breakdown(&self, table_id: &str) -> Option<&StageBreakdown> {
        self.stage_breakdowns.iter().find(|b| b.table_id == table_id)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories that carry an advisory note.
    pub fn advisories(&self) -> impl Iterator<Item = &FeeComputation> {
        self.categories.iter().filter(|c| c.advisory_note.is_some())
    }
}

/// Compute the fee of a single table for an already allocated cost.
pub fn calculate_category(
    dataset: &GuidelineDataset,
    table_id: &str,
    allocated_cost: f64,
    discount_percent: f64,
    requested_factors: &BTreeSet<String>,
) -> Option<(FeeComputation, StageBreakdown)> {
    let table = dataset.table(table_id)?;

    let fee = compute_basic_fee(table, allocated_cost, dataset.minimum_project_value());
    let applied_factors = resolve_factors(dataset, table_id, requested_factors);
    let multiplier = compound_multiplier(dataset, table_id, applied_factors.as_slice());
    let final_fee = apply_discount(fee.basic_fee, multiplier, discount_percent);
    let breakdown = allocate_stages(dataset, table_id, final_fee);

    let computation = FeeComputation {
        table_id: table.id.clone(),
        table_name: table.name.clone(),
        allocated_cost,
        primary_fee: fee.primary_fee,
        secondary_fee: fee.secondary_fee,
        basic_fee: fee.basic_fee,
        applied_factors,
        compound_multiplier: multiplier,
        discount_percent,
        final_fee,
        advisory_note: fee.advisory_note,
    };

    Some((computation, breakdown))
}

/// Calculate fees for every category with a nonzero allocation.
pub fn calculate_fees(dataset: &GuidelineDataset, input: &CalculationInput) -> CalculationResult {
    let no_factors = BTreeSet::new();
    let mut result = CalculationResult::default();
    let mut undiscounted_sum = 0.0;
    let mut discounted_sum = 0.0;

    for table in dataset.tables() {
        let allocated_cost = input.allocated_cost(&table.id);
        // Unset, zero and NaN allocations are all skipped.
        if allocated_cost == 0.0 || allocated_cost.is_nan() {
            continue;
        }

        let requested = input.selected_factors.get(&table.id).unwrap_or(&no_factors);
        let Some((computation, breakdown)) = calculate_category(
            dataset,
            &table.id,
            allocated_cost,
            input.discount(&table.id),
            requested,
        ) else {
            continue;
        };

        tracing::debug!(
            table = %computation.table_id,
            cost = computation.allocated_cost,
            basic_fee = computation.basic_fee,
            multiplier = computation.compound_multiplier,
            final_fee = computation.final_fee,
            advisory = computation.advisory_note.is_some(),
            "category fee computed"
        );

        undiscounted_sum += computation.adjusted_fee();
        discounted_sum += computation.final_fee;
        result.categories.push(computation);
        result.stage_breakdowns.push(breakdown);
    }

    result.totals = Totals::from_sums(undiscounted_sum, discounted_sum);

    tracing::debug!(
        categories = result.categories.len(),
        undiscounted = result.totals.undiscounted_sum,
        discounted = result.totals.discounted_sum,
        "fee calculation complete"
    );

    result
}

impl GuidelineDataset {
    /// Shorthand for [`calculate_fees`] against this dataset.
    pub fn calculate(&self, input: &CalculationInput) -> CalculationResult {
        calculate_fees(self, input)
    }
}
