// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model loading and inference.
//!
//! The [`Model`] trait is the seam between prediction post-processing and
//! whatever produced the trained estimator. [`Learner`] is the implementation
//! backed by a JSON model file (see [`crate::model_file`]).

use std::path::Path;

use ndarray::{Array1, Array2, ArrayD, Axis, Ix1, Ix2};
use tracing::debug;

use crate::error::{PredictError, Result};
use crate::features::{FeatureSet, Label};
use crate::model_file::{FeatureEncoderSpec, ModelFile, MultiClass};
use crate::model_type::{ModelFamily, ModelType};
use crate::utils::{argmax, ovr_normalize_in_place, sigmoid, softmax_in_place};
use crate::vectorizer::{FeatureHasher, SparseRow, Vectorizer, Vocabulary};

/// What a loaded model can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The model outputs a probability per class.
    pub supports_probability: bool,
    /// Regression or classification.
    pub family: ModelFamily,
    /// The model encodes features with the hashing trick.
    pub uses_feature_hashing: bool,
}

/// Model output as produced by an estimator, before normalization.
///
/// Class predictions may arrive either as a flat vector of indices or as a
/// one-column matrix; [`RawOutput::normalize`] turns both into plain indices.
#[derive(Debug, Clone)]
pub enum RawOutput {
    /// Per-class probabilities with shape (`n_examples`, `n_classes`).
    Probabilities(Array2<f64>),
    /// Continuous predictions with shape (`n_examples`,).
    Values(Array1<f64>),
    /// Class indices, shape (`n_examples`,) or (`n_examples`, 1).
    ClassIndices(ArrayD<f64>),
}

/// Normalized model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Per-class probabilities with shape (`n_examples`, `n_classes`).
    Probabilities(Array2<f64>),
    /// Continuous predictions.
    Values(Array1<f64>),
    /// Indices into the model's label list.
    ClassIndices(Vec<usize>),
}

impl ModelOutput {
    /// Number of examples covered by this output.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Probabilities(p) => p.nrows(),
            Self::Values(v) => v.len(),
            Self::ClassIndices(i) => i.len(),
        }
    }

    /// Whether the output covers no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the output kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Probabilities(_) => "probabilities",
            Self::Values(_) => "values",
            Self::ClassIndices(_) => "class indices",
        }
    }
}

impl RawOutput {
    /// Normalize raw output into [`ModelOutput`].
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::PredictionError`] if class indices are not a flat
    /// or single-column array, or contain negative or non-integral values.
    pub fn normalize(self) -> Result<ModelOutput> {
        match self {
            Self::Probabilities(p) => Ok(ModelOutput::Probabilities(p)),
            Self::Values(v) => Ok(ModelOutput::Values(v)),
            Self::ClassIndices(raw) => {
                let flat = match raw.ndim() {
                    1 => raw.into_dimensionality::<Ix1>().map_err(shape_error)?,
                    2 if raw.shape()[1] == 1 => raw
                        .into_dimensionality::<Ix2>()
                        .map_err(shape_error)?
                        .index_axis_move(Axis(1), 0),
                    _ => {
                        return Err(PredictError::PredictionError(format!(
                            "class output must be flat or a single column, got shape {:?}",
                            raw.shape()
                        )));
                    }
                };
                flat.iter()
                    .map(|&v| class_index(v))
                    .collect::<Result<Vec<_>>>()
                    .map(ModelOutput::ClassIndices)
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn class_index(value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(PredictError::PredictionError(format!(
            "invalid class index {value}"
        )))
    }
}

fn shape_error(err: ndarray::ShapeError) -> PredictError {
    PredictError::PredictionError(format!("unexpected class output shape: {err}"))
}

/// A trained estimator that can score a [`FeatureSet`].
pub trait Model {
    /// What this model produces.
    fn capabilities(&self) -> Capabilities;

    /// Class labels in index order. Empty for regressors.
    fn label_list(&self) -> &[Label];

    /// Run the estimator and return its raw output.
    ///
    /// `feature_hashing` tells the model which feature encoding the caller
    /// expects it to apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be scored by this model.
    fn predict_raw(&self, data: &FeatureSet, feature_hashing: bool) -> Result<RawOutput>;

    /// Run the estimator and normalize its output.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Model::predict_raw`] and [`RawOutput::normalize`].
    fn predict(&self, data: &FeatureSet, feature_hashing: bool) -> Result<ModelOutput> {
        self.predict_raw(data, feature_hashing)?.normalize()
    }
}

/// Linear model loaded from a model file.
///
/// Standardization, when present, is folded into the coefficients at load
/// time so inference only touches non-zero features.
///
/// # Example
///
/// ```no_run
/// use model_predict::{FeatureSet, Learner, Model};
///
/// let learner = Learner::from_file("model.json").unwrap();
/// let output = learner.predict(&FeatureSet::new("empty"), false).unwrap();
/// assert!(output.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Learner {
    model_type: ModelType,
    probability: bool,
    multi_class: MultiClass,
    label_list: Vec<Label>,
    vectorizer: Vectorizer,
    /// Shape (`n_outputs`, `n_features`).
    coef: Array2<f64>,
    /// Shape (`n_outputs`,).
    intercept: Array1<f64>,
}

impl Learner {
    /// Load a learner from a model file.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] if the file is missing, is not
    /// valid JSON, or describes an inconsistent model.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let learner = Self::from_model_file(ModelFile::from_path(path)?).map_err(|e| match e {
            PredictError::ModelLoadError(msg) => {
                PredictError::ModelLoadError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        debug!(
            "Loaded {} model from {} ({} features)",
            learner.model_type,
            path.display(),
            learner.n_features()
        );
        Ok(learner)
    }

    /// Build a learner from a parsed model file.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] if validation fails.
    pub fn from_model_file(file: ModelFile) -> Result<Self> {
        let model_type = file.validate()?;
        let multi_class = file.multi_class(model_type);
        let n_features = file.n_features();
        let n_outputs = file.coef.len();

        let flat: Vec<f64> = file.coef.into_iter().flatten().collect();
        let mut coef = Array2::from_shape_vec((n_outputs, n_features), flat)
            .map_err(|e| PredictError::ModelLoadError(format!("bad coef shape: {e}")))?;
        let mut intercept = if file.intercept.is_empty() {
            Array1::zeros(n_outputs)
        } else {
            Array1::from_vec(file.intercept)
        };

        if let Some(scaler) = file.scaler {
            fold_scaler(
                &mut coef,
                &mut intercept,
                scaler.mean.as_deref(),
                scaler.scale.as_deref(),
            );
        }

        let vectorizer = match file.feature_encoder {
            FeatureEncoderSpec::Vocabulary { vocabulary } => {
                Vectorizer::Vocabulary(Vocabulary::new(vocabulary))
            }
            FeatureEncoderSpec::Hashing {
                n_features,
                alternate_sign,
            } => Vectorizer::Hashing(FeatureHasher::new(n_features, alternate_sign)?),
        };

        Ok(Self {
            model_type,
            probability: file.probability,
            multi_class,
            label_list: file.label_list.unwrap_or_default(),
            vectorizer,
            coef,
            intercept,
        })
    }

    /// Estimator type.
    #[must_use]
    pub const fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// Whether the model outputs probabilities.
    #[must_use]
    pub const fn probability(&self) -> bool {
        self.probability
    }

    /// Multi-class probability scheme.
    #[must_use]
    pub const fn multi_class(&self) -> MultiClass {
        self.multi_class
    }

    /// Feature encoder.
    #[must_use]
    pub const fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    /// Linear scores with shape (`n_examples`, `n_outputs`).
    fn decision_function(&self, rows: &[SparseRow]) -> Array2<f64> {
        let mut scores = Array2::zeros((rows.len(), self.coef.nrows()));
        for (mut out, row) in scores.outer_iter_mut().zip(rows) {
            for (k, score) in out.iter_mut().enumerate() {
                let weights = self.coef.row(k);
                *score = self.intercept[k]
                    + row
                        .iter()
                        .filter(|&&(col, _)| col < weights.len())
                        .map(|&(col, value)| weights[col] * value)
                        .sum::<f64>();
            }
        }
        scores
    }

    fn probabilities(&self, scores: Array2<f64>) -> Array2<f64> {
        if scores.ncols() == 1 {
            let n = scores.nrows();
            let mut probs = Array2::zeros((n, 2));
            for (i, &s) in scores.column(0).iter().enumerate() {
                let p = sigmoid(s);
                probs[[i, 0]] = 1.0 - p;
                probs[[i, 1]] = p;
            }
            return probs;
        }

        let mut probs = scores;
        for mut row in probs.outer_iter_mut() {
            if let Some(values) = row.as_slice_mut() {
                match self.multi_class {
                    MultiClass::Multinomial => softmax_in_place(values),
                    MultiClass::Ovr => ovr_normalize_in_place(values),
                }
            }
        }
        probs
    }

    #[allow(clippy::cast_precision_loss)]
    fn class_indices(scores: &Array2<f64>) -> Array1<f64> {
        if scores.ncols() == 1 {
            scores.column(0).mapv(|s| if s > 0.0 { 1.0 } else { 0.0 })
        } else {
            scores
                .outer_iter()
                .map(|row| {
                    row.as_slice()
                        .and_then(argmax)
                        .unwrap_or_default() as f64
                })
                .collect()
        }
    }
}

impl Model for Learner {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_probability: self.probability,
            family: self.model_type.family(),
            uses_feature_hashing: self.vectorizer.is_hashing(),
        }
    }

    fn label_list(&self) -> &[Label] {
        &self.label_list
    }

    fn predict_raw(&self, data: &FeatureSet, feature_hashing: bool) -> Result<RawOutput> {
        if feature_hashing != self.vectorizer.is_hashing() {
            return Err(PredictError::PredictionError(format!(
                "feature hashing requested = {feature_hashing}, but the model {} feature hashing",
                if self.vectorizer.is_hashing() { "uses" } else { "does not use" }
            )));
        }

        let rows = self.vectorizer.transform(data);
        let scores = self.decision_function(&rows);

        let output = if self.probability {
            RawOutput::Probabilities(self.probabilities(scores))
        } else if self.model_type.is_regressor() {
            RawOutput::Values(scores.column(0).to_owned())
        } else {
            RawOutput::ClassIndices(Self::class_indices(&scores).into_dyn())
        };
        Ok(output)
    }
}

/// Fold `(x - mean) / scale` into the coefficients and intercepts.
fn fold_scaler(
    coef: &mut Array2<f64>,
    intercept: &mut Array1<f64>,
    mean: Option<&[f64]>,
    scale: Option<&[f64]>,
) {
    if let Some(scale) = scale {
        for mut row in coef.outer_iter_mut() {
            for (w, &s) in row.iter_mut().zip(scale) {
                if s != 0.0 {
                    *w /= s;
                }
            }
        }
    }
    if let Some(mean) = mean {
        for (k, row) in coef.outer_iter().enumerate() {
            let offset: f64 = row.iter().zip(mean).map(|(w, m)| w * m).sum();
            intercept[k] -= offset;
        }
    }
}
