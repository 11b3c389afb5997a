//! Engineering fee calculation from the ECSA bracketed-fee guideline.
//!
//! The guideline publishes, per engineering category, a table of cost
//! brackets. Each bracket carries a flat (primary) fee and a marginal
//! (secondary) rate on the cost above the bracket floor:
//!
//! ```text
//! basic_fee = primary_fee + (cost - bracket.min) × secondary_rate / 100
//! final_fee = basic_fee × Π(adjustment factors) × (1 - discount / 100)
//! stage_fee = final_fee × stage_weight / 100
//! ```
//!
//! ## Components
//!
//! | Module       | Responsibility                                        |
//! |--------------|-------------------------------------------------------|
//! | `dataset`    | Validated reference data (tables, factors, stages)    |
//! | `fee`        | Bracket lookup and basic fee                          |
//! | `adjustment` | Factor filtering, compound multiplier, discount       |
//! | `stages`     | Split of a final fee across delivery stages           |
//! | `calculator` | Orchestration over all categories and totals          |
//! | `format`     | Currency/percent display and lenient number parsing   |
//!
//! ## Totality
//!
//! Calculation never fails. Costs below the guideline minimum or outside the
//! configured brackets yield a zero fee with an [`AdvisoryNote`]; unknown
//! factor names are dropped; an empty input yields an empty result with zero
//! totals. Only building a [`GuidelineDataset`] can fail, with a
//! [`DatasetError`].

pub mod adjustment;
pub mod calculator;
pub mod dataset;
pub mod error;
pub mod fee;
pub mod format;
pub mod stages;

mod guideline_2025;

pub use adjustment::{apply_discount, compound_multiplier, resolve_factors};
pub use calculator::{
    calculate_category, calculate_fees, CalculationInput, CalculationResult, FeeComputation,
    InputIssue, InputMethod, Totals,
};
pub use dataset::{
    AdjustmentFactor, DatasetDefinition, FactorSet, FeeBracket, GuidelineDataset, StageWeight,
    StageWeightSet, TableDefinition,
};
pub use error::{DatasetError, DatasetResult, ParseAmountError};
pub use fee::{compute_basic_fee, AdvisoryNote, BasicFee, MIN_PROJECT_VALUE};
pub use format::{format_currency, format_multiplier, format_percent, parse_number};
pub use guideline_2025::GUIDELINE_NAME;
pub use stages::{allocate_stages, StageAllocation, StageBreakdown};
