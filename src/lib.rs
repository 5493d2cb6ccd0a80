// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Model Predict
//!
//! Load a trained linear model from a JSON model file and generate predictions
//! for feature files in common machine-learning text formats.
//!
//! ## Features
//!
//! - **Linear Estimators** - Logistic regression, linear SVMs, SGD, ridge, lasso and friends
//! - **Probabilities** - Positive-class probability output, optionally thresholded to 0/1
//! - **Feature Encoders** - Explicit vocabularies or signed feature hashing
//! - **Many Formats** - ARFF, CSV, TSV, JSON lines, LibSVM and MegaM
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use model_predict::{Predictor, PredictorConfig};
//! use model_predict::readers::{Format, ReaderOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let predictor = Predictor::load("model.json", PredictorConfig::new())?;
//!     let data = Format::Csv.reader("test.csv", ReaderOptions::new()).read()?;
//!
//!     for prediction in predictor.predict(&data)? {
//!         println!("{prediction}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Probability of the positive class for every example
//! generate-predictions model.json test.csv
//!
//! # 0/1 indicators, several files, no "Loading..." messages
//! generate-predictions model.json a.jsonlines b.libsvm --threshold 0.5 --quiet
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`predictor`] | Turns model output into predictions |
//! | [`model`] | Model trait, capabilities and the linear [`Learner`] |
//! | [`model_file`] | JSON model file format and validation |
//! | [`readers`] | Feature file readers, chosen by suffix |
//! | [`vectorizer`] | Feature name to column encoding |
//! | [`results`] | Prediction values |
//! | [`cli`] | Command-line interface |

// Modules
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod model_file;
pub mod model_type;
pub mod predictor;
pub mod readers;
pub mod results;
pub mod utils;
pub mod vectorizer;

// Re-export main types for convenience
pub use config::PredictorConfig;
pub use error::{PredictError, Result};
pub use features::{Example, FeatureMap, FeatureSet, Label};
pub use model::{Capabilities, Learner, Model, ModelOutput, RawOutput};
pub use model_type::{ModelFamily, ModelType};
pub use predictor::Predictor;
pub use results::Prediction;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
