//! ECSA fee calculator front end.
//!
//! Loads configuration, guideline datasets and calculation requests from
//! disk, runs them through [`ecsa_fees`] and renders or exports the result.

#![deny(clippy::print_stdout)]

pub mod config;
pub mod export;
pub mod report;
pub mod request;

// Subcommand handlers for the binary
pub mod commands;
