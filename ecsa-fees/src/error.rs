//! Error types for guideline datasets and numeric input.

use displaydoc::Display;
use thiserror::Error;

/// Structural problems found while building a guideline dataset.
///
/// These are startup-time configuration errors: a dataset that fails
/// validation is never handed to the calculator.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum DatasetError {
    /// Minimum project value must be a positive finite number, got {0}
    InvalidMinimumProjectValue(f64),

    /// Table {0} has no fee brackets
    EmptyTable(String),

    /// Duplicate table id: {0}
    DuplicateTable(String),

    /// Duplicate factor set key: {0}
    DuplicateFactorSet(String),

    /// Duplicate stage set key: {0}
    DuplicateStageSet(String),

    /// Table {table_id} bracket {index} has an invalid cost range
    InvalidBracketRange { table_id: String, index: usize },

    /// Table {table_id} bracket {index} is unbounded but is not the last bracket
    UnboundedBracketNotLast { table_id: String, index: usize },

    /// Table {table_id} bracket {index} does not end where the next bracket starts
    NonContiguousBrackets { table_id: String, index: usize },

    /// Table {table_id} refers to missing stage set {stage_set}
    MissingStageSet { table_id: String, stage_set: String },

    /// Table {table_id} refers to missing factor set {factor_set}
    MissingFactorSet { table_id: String, factor_set: String },

    /// Factor set {set} lists {name} more than once
    DuplicateFactor { set: String, name: String },

    /// Factor {name} in set {set} has an invalid multiplier
    InvalidMultiplier { set: String, name: String },

    /// Stage set {0} has no stages
    EmptyStageSet(String),

    /// Stage set {key} weights sum to {total}, expected 100
    StageWeightsNotHundred { key: String, total: f64 },

    /// Failed to parse dataset: {0}
    Parse(String),
}

/// Failure to read a number out of free-form text.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    /// Malformed amount: '{0}'
    Malformed(String),
}

/// Result type for dataset construction.
pub type DatasetResult<T> = Result<T, DatasetError>;
