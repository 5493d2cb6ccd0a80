// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! On-disk model format.
//!
//! A model file is a JSON document describing a trained linear estimator:
//!
//! ```json
//! {
//!   "model_type": "LogisticRegression",
//!   "probability": true,
//!   "label_list": ["neg", "pos"],
//!   "feature_encoder": {"type": "vocabulary", "vocabulary": {"f1": 0, "f2": 1}},
//!   "scaler": {"mean": [0.0, 1.0], "scale": [1.0, 2.0]},
//!   "coef": [[0.5, -1.25]],
//!   "intercept": [0.1]
//! }
//! ```
//!
//! [`ModelFile::validate`] checks that the pieces agree with each other before
//! a [`Learner`](crate::model::Learner) is built from them.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PredictError, Result};
use crate::features::Label;
use crate::model_type::{ModelFamily, ModelType};

/// Parsed model file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    /// Estimator name, e.g. `LogisticRegression`.
    pub model_type: String,
    /// Whether the model was trained to output probabilities.
    #[serde(default)]
    pub probability: bool,
    /// Ordered class labels. Required for classifiers.
    #[serde(default)]
    pub label_list: Option<Vec<Label>>,
    /// How feature names map to columns.
    pub feature_encoder: FeatureEncoderSpec,
    /// Optional standardization applied before the linear model.
    #[serde(default)]
    pub scaler: Option<ScalerSpec>,
    /// Coefficient matrix, one row per output.
    pub coef: Vec<Vec<f64>>,
    /// Intercept per output.
    #[serde(default)]
    pub intercept: Vec<f64>,
    /// How multi-class scores become probabilities. Defaults per estimator,
    /// see [`ModelFile::multi_class()`].
    #[serde(default)]
    pub multi_class: Option<MultiClass>,
}

/// Multi-class probability scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all class scores.
    Multinomial,
    /// Independent sigmoid per class, normalized to sum to one.
    Ovr,
}

/// Serialized feature encoder.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureEncoderSpec {
    /// Explicit feature name to column mapping.
    Vocabulary {
        /// Name to column mapping.
        vocabulary: HashMap<String, usize>,
    },
    /// Hashing trick with a fixed number of columns.
    Hashing {
        /// Number of columns.
        n_features: usize,
        /// Flip values whose hash is negative.
        #[serde(default = "default_alternate_sign")]
        alternate_sign: bool,
    },
}

const fn default_alternate_sign() -> bool {
    true
}

/// Serialized standardization parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerSpec {
    /// Per-column mean subtracted before scaling.
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    /// Per-column divisor.
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl ModelFile {
    /// Read and parse a model file.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] if the file cannot be read or is
    /// not a valid model description.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PredictError::ModelLoadError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            PredictError::ModelLoadError(msg) => {
                PredictError::ModelLoadError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a model description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] on malformed JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| PredictError::ModelLoadError(format!("Invalid model file: {e}")))
    }

    /// Parsed estimator type.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] for unknown estimator names.
    pub fn parsed_model_type(&self) -> Result<ModelType> {
        self.model_type
            .parse()
            .map_err(|e| PredictError::ModelLoadError(format!("{e}")))
    }

    /// Number of feature columns the encoder produces.
    #[must_use]
    pub fn n_features(&self) -> usize {
        match &self.feature_encoder {
            FeatureEncoderSpec::Vocabulary { vocabulary } => {
                vocabulary.values().max().map_or(0, |&max| max + 1)
            }
            FeatureEncoderSpec::Hashing { n_features, .. } => *n_features,
        }
    }

    /// Multi-class scheme, falling back to multinomial for
    /// `LogisticRegression` and one-vs-rest for everything else.
    #[must_use]
    pub fn multi_class(&self, model_type: ModelType) -> MultiClass {
        self.multi_class.unwrap_or(match model_type {
            ModelType::LogisticRegression => MultiClass::Multinomial,
            _ => MultiClass::Ovr,
        })
    }

    /// Check that the pieces of the model file agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] describing the first problem found.
    pub fn validate(&self) -> Result<ModelType> {
        let model_type = self.parsed_model_type()?;

        if self.probability && !model_type.supports_probability() {
            return Err(load_error(format!(
                "{model_type} cannot produce probabilities"
            )));
        }

        if self.multi_class == Some(MultiClass::Multinomial)
            && model_type != ModelType::LogisticRegression
        {
            return Err(load_error(format!(
                "{model_type} does not support multinomial probabilities"
            )));
        }

        if let FeatureEncoderSpec::Hashing { n_features: 0, .. } = self.feature_encoder {
            return Err(load_error("hashing encoder needs n_features > 0"));
        }

        let expected_rows = match model_type.family() {
            ModelFamily::Regression => 1,
            ModelFamily::Classification => {
                let labels = self.label_list.as_ref().ok_or_else(|| {
                    load_error(format!("{model_type} model is missing label_list"))
                })?;
                if labels.len() < 2 {
                    return Err(load_error("label_list needs at least two classes"));
                }
                let mut seen = HashSet::new();
                for label in labels {
                    if !seen.insert(label.to_string()) {
                        return Err(load_error(format!("duplicate label '{label}' in label_list")));
                    }
                }
                if labels.len() == 2 { 1 } else { labels.len() }
            }
        };

        if self.coef.len() != expected_rows {
            return Err(load_error(format!(
                "coef has {} rows, expected {expected_rows}",
                self.coef.len()
            )));
        }

        let n_features = self.n_features();
        if let Some(row) = self.coef.iter().find(|row| row.len() != n_features) {
            return Err(load_error(format!(
                "coef row has {} columns, feature encoder produces {n_features}",
                row.len()
            )));
        }

        if !self.intercept.is_empty() && self.intercept.len() != expected_rows {
            return Err(load_error(format!(
                "intercept has {} values, expected {expected_rows}",
                self.intercept.len()
            )));
        }

        if let Some(scaler) = &self.scaler {
            for (name, values) in [("mean", &scaler.mean), ("scale", &scaler.scale)] {
                if let Some(values) = values
                    && values.len() != n_features
                {
                    return Err(load_error(format!(
                        "scaler {name} has {} values, expected {n_features}",
                        values.len()
                    )));
                }
            }
        }

        Ok(model_type)
    }
}

fn load_error(msg: impl Into<String>) -> PredictError {
    PredictError::ModelLoadError(msg.into())
}
