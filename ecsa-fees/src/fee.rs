//! Basic fee computation from a fee table.
//!
//! ## Fee Formula
//!
//! ```text
//! primary   = bracket.primary_fee
//! secondary = (cost - bracket.min) × bracket.secondary_rate / 100
//! basic     = primary + secondary
//! ```
//!
//! where `bracket` is the unique bracket with `min ≤ cost < max`.
//!
//! Costs below the guideline minimum, or costs that no bracket covers, are not
//! errors: they produce a zero fee carrying an [`AdvisoryNote`].

use std::fmt;

use crate::dataset::TableDefinition;
use crate::format::group_digits;

/// Published minimum project value (R1,000,000).
///
/// Below this the guideline recommends a lump-sum or time-based fee.
pub const MIN_PROJECT_VALUE: f64 = 1_000_000.0;

/// Annotation explaining why a category fee is outside guideline coverage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AdvisoryNote {
    /// The allocated cost is below the guideline's minimum project value.
    BelowMinimumProjectValue { minimum: f64 },

    /// No bracket of the table covers the allocated cost.
    OutsideBrackets,
}

impl fmt::Display for AdvisoryNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimumProjectValue { minimum } => write!(
                f,
                "Projects under R{} should be negotiated on a lump sum or time basis.",
                group_digits(&format!("{minimum:.0}"), ',')
            ),
            Self::OutsideBrackets => f.write_str("Cost falls outside of the configured brackets."),
        }
    }
}

/// Result of a bracket lookup for one category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicFee {
    /// Flat component of the matched bracket.
    pub primary_fee: f64,

    /// Marginal component on the cost above the bracket floor.
    pub secondary_fee: f64,

    /// `primary_fee + secondary_fee`.
    pub basic_fee: f64,

    pub advisory_note: Option<AdvisoryNote>,
}

impl BasicFee {
    fn advisory(note: AdvisoryNote) -> Self {
        Self {
            primary_fee: 0.0,
            secondary_fee: 0.0,
            basic_fee: 0.0,
            advisory_note: Some(note),
        }
    }

    /// Whether the guideline brackets produced this fee.
    pub fn is_covered(&self) -> bool {
        self.advisory_note.is_none()
    }
}

/// Compute the basic fee for `allocated_cost` against `table`.
///
/// # Arguments
/// * `table` - Fee table of the category
/// * `allocated_cost` - Project cost attributed to the category
/// * `minimum_project_value` - Global threshold below which no bracket applies
pub fn compute_basic_fee(
    table: &TableDefinition,
    allocated_cost: f64,
    minimum_project_value: f64,
) -> BasicFee {
    if allocated_cost < minimum_project_value {
        return BasicFee::advisory(AdvisoryNote::BelowMinimumProjectValue {
            minimum: minimum_project_value,
        });
    }

    let Some(bracket) = table.find_bracket(allocated_cost) else {
        tracing::debug!(
            table = %table.id,
            cost = allocated_cost,
            "cost not covered by any bracket"
        );
        return BasicFee::advisory(AdvisoryNote::OutsideBrackets);
    };

    let primary_fee = bracket.primary_fee;
    let secondary_fee = (allocated_cost - bracket.min) * (bracket.secondary_rate / 100.0);

    BasicFee {
        primary_fee,
        secondary_fee,
        basic_fee: primary_fee + secondary_fee,
        advisory_note: None,
    }
}
