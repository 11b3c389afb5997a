//! Splitting a category fee across project delivery stages.

use crate::dataset::GuidelineDataset;

/// Amount attributed to one stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageAllocation {
    pub stage: String,

    /// Stage weight in percent.
    pub weight: f64,

    pub amount: f64,
}

/// Ordered stage amounts for one table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageBreakdown {
    pub table_id: String,
    pub stages: Vec<StageAllocation>,
}

impl StageBreakdown {
    /// Amount allocated to `stage`, if the stage exists.
    pub fn amount(&self, stage: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.amount)
    }

    /// Sum of all stage amounts. Equals the final fee up to rounding.
    pub fn total(&self) -> f64 {
        self.stages.iter().map(|entry| entry.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageAllocation> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Split `final_fee` by the table's stage weights.
///
/// No remainder correction is applied. An unknown table yields an empty
/// breakdown.
pub fn allocate_stages(
    dataset: &GuidelineDataset,
    table_id: &str,
    final_fee: f64,
) -> StageBreakdown {
    let stages = dataset
        .stages_for_table(table_id)
        .map(|set| {
            set.stages
                .iter()
                .map(|entry| StageAllocation {
                    stage: entry.stage.clone(),
                    weight: entry.weight,
                    amount: final_fee * entry.weight / 100.0,
                })
                .collect()
        })
        .unwrap_or_default();

    StageBreakdown {
        table_id: table_id.to_string(),
        stages,
    }
}
