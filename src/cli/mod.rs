// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Command-line interface for `generate-predictions`.
//!
//! This module contains argument parsing, the logging setup used by the
//! binary, and the prediction loop over input files.

// Modules
/// CLI arguments.
pub mod args;

/// Logging subscriber construction and fatal error reporting.
pub mod logging;

/// Prediction logic.
pub mod predict;
