// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Turning model output into user-facing predictions.

use std::path::Path;

use ndarray::Array2;

use crate::config::PredictorConfig;
use crate::error::{PredictError, Result};
use crate::features::{FeatureSet, Label};
use crate::model::{Capabilities, Learner, Model, ModelOutput};
use crate::model_type::ModelFamily;
use crate::results::Prediction;

/// Wraps a loaded model and post-processes its output.
///
/// The model's [`Capabilities`] are captured once at construction and decide
/// how every later call to [`Predictor::predict`] interprets the output:
///
/// 1. probability models report the positive-class probability, or a 0/1
///    indicator when a threshold is configured;
/// 2. regressors report the raw value;
/// 3. classifiers report the label at the predicted index.
///
/// # Example
///
/// ```no_run
/// use model_predict::{Predictor, PredictorConfig};
/// use model_predict::readers::{Format, ReaderOptions};
///
/// let predictor = Predictor::load("model.json", PredictorConfig::new().with_threshold(0.5))?;
/// let reader = Format::Csv.reader("test.csv", ReaderOptions::default());
/// for prediction in predictor.predict(&reader.read()?)? {
///     println!("{prediction}");
/// }
/// # Ok::<(), model_predict::PredictError>(())
/// ```
#[derive(Debug)]
pub struct Predictor<M = Learner> {
    model: M,
    capabilities: Capabilities,
    config: PredictorConfig,
}

impl Predictor<Learner> {
    /// Load a model file and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] if the model cannot be loaded.
    pub fn load<P: AsRef<Path>>(model_path: P, config: PredictorConfig) -> Result<Self> {
        Ok(Self::new(Learner::from_file(model_path)?, config))
    }
}

impl<M: Model> Predictor<M> {
    /// Wrap an already loaded model.
    pub fn new(model: M, config: PredictorConfig) -> Self {
        let capabilities = model.capabilities();
        Self {
            model,
            capabilities,
            config,
        }
    }

    /// The wrapped model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Capabilities captured at construction.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Configuration in use.
    pub const fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Generate one prediction per example, in order.
    ///
    /// # Errors
    ///
    /// Propagates model errors, and returns [`PredictError::PredictionError`]
    /// if the output does not line up with the examples, the positive-class
    /// index is out of range, or a class index has no label.
    pub fn predict(&self, data: &FeatureSet) -> Result<Vec<Prediction>> {
        let output = self
            .model
            .predict(data, self.capabilities.uses_feature_hashing)?;

        if output.len() != data.len() {
            return Err(PredictError::PredictionError(format!(
                "model returned {} predictions for {} examples",
                output.len(),
                data.len()
            )));
        }

        match (self.capabilities, output) {
            (
                Capabilities {
                    supports_probability: true,
                    ..
                },
                ModelOutput::Probabilities(probs),
            ) => self.probability_predictions(&probs),
            (
                Capabilities {
                    supports_probability: false,
                    family: ModelFamily::Regression,
                    ..
                },
                ModelOutput::Values(values),
            ) => Ok(values.iter().map(|&v| Prediction::Value(v)).collect()),
            (
                Capabilities {
                    supports_probability: false,
                    family: ModelFamily::Classification,
                    ..
                },
                ModelOutput::ClassIndices(indices),
            ) => self.label_predictions(&indices),
            (caps, output) => Err(PredictError::PredictionError(format!(
                "{} model (probability = {}) produced {}",
                caps.family,
                caps.supports_probability,
                output.kind()
            ))),
        }
    }

    fn probability_predictions(&self, probs: &Array2<f64>) -> Result<Vec<Prediction>> {
        let pos = self.config.positive_class;
        if pos >= probs.ncols() {
            return Err(PredictError::PredictionError(format!(
                "positive class index {pos} is out of range for {} classes",
                probs.ncols()
            )));
        }

        let column = probs.column(pos);
        let predictions = match self.config.threshold {
            None => column.iter().map(|&p| Prediction::Probability(p)).collect(),
            Some(threshold) => column
                .iter()
                .map(|&p| Prediction::Indicator(u8::from(p >= threshold)))
                .collect(),
        };
        Ok(predictions)
    }

    fn label_predictions(&self, indices: &[usize]) -> Result<Vec<Prediction>> {
        let labels = self.model.label_list();
        indices
            .iter()
            .map(|&i| {
                labels
                    .get(i)
                    .cloned()
                    .map(Prediction::Label)
                    .ok_or_else(|| label_out_of_range(i, labels))
            })
            .collect()
    }
}

fn label_out_of_range(index: usize, labels: &[Label]) -> PredictError {
    PredictError::PredictionError(format!(
        "class index {index} is out of range for {} labels",
        labels.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Example, FeatureMap};
    use crate::model::RawOutput;
    use ndarray::{Array1, ArrayD, array};

    /// Model stub that replays a fixed raw output.
    struct FixedModel {
        capabilities: Capabilities,
        labels: Vec<Label>,
        output: RawOutput,
    }

    impl Model for FixedModel {
        fn capabilities(&self) -> Capabilities {
            self.capabilities
        }

        fn label_list(&self) -> &[Label] {
            &self.labels
        }

        fn predict_raw(&self, _data: &FeatureSet, _feature_hashing: bool) -> Result<RawOutput> {
            Ok(self.output.clone())
        }
    }

    fn caps(supports_probability: bool, family: ModelFamily) -> Capabilities {
        Capabilities {
            supports_probability,
            family,
            uses_feature_hashing: false,
        }
    }

    fn feature_set(n: usize) -> FeatureSet {
        let mut fs = FeatureSet::new("test");
        for i in 0..n {
            fs.push(Example::new(Example::default_id(i), None, FeatureMap::new()));
        }
        fs
    }

    fn probability_model(positive: &[f64]) -> FixedModel {
        let rows: Vec<f64> = positive.iter().flat_map(|&p| [1.0 - p, p]).collect();
        FixedModel {
            capabilities: caps(true, ModelFamily::Classification),
            labels: vec![Label::from("neg"), Label::from("pos")],
            output: RawOutput::Probabilities(
                Array2::from_shape_vec((positive.len(), 2), rows).unwrap(),
            ),
        }
    }

    fn class_model(output: ArrayD<f64>) -> FixedModel {
        FixedModel {
            capabilities: caps(false, ModelFamily::Classification),
            labels: vec![Label::from("cat"), Label::from("dog"), Label::from("fish")],
            output: RawOutput::ClassIndices(output),
        }
    }

    #[test]
    fn test_probability_without_threshold() {
        let predictor = Predictor::new(probability_model(&[0.2, 0.5, 0.9]), PredictorConfig::new());
        let preds = predictor.predict(&feature_set(3)).unwrap();
        assert_eq!(
            preds,
            vec![
                Prediction::Probability(0.2),
                Prediction::Probability(0.5),
                Prediction::Probability(0.9)
            ]
        );
    }

    #[test]
    fn test_probability_with_threshold() {
        let config = PredictorConfig::new().with_threshold(0.5).with_positive_class(1);
        let predictor = Predictor::new(probability_model(&[0.2, 0.5, 0.9]), config);
        let lines: Vec<String> = predictor
            .predict(&feature_set(3))
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, ["0", "1", "1"]);
    }

    #[test]
    fn test_positive_class_zero() {
        let config = PredictorConfig::new().with_positive_class(0);
        let predictor = Predictor::new(probability_model(&[0.25]), config);
        let preds = predictor.predict(&feature_set(1)).unwrap();
        assert_eq!(preds, vec![Prediction::Probability(0.75)]);
    }

    #[test]
    fn test_positive_class_out_of_range() {
        let config = PredictorConfig::new().with_positive_class(2);
        let predictor = Predictor::new(probability_model(&[0.25]), config);
        assert!(predictor.predict(&feature_set(1)).is_err());
    }

    #[test]
    fn test_regression_passthrough() {
        let model = FixedModel {
            capabilities: caps(false, ModelFamily::Regression),
            labels: Vec::new(),
            output: RawOutput::Values(Array1::from_vec(vec![1.5, -3.0])),
        };
        let predictor = Predictor::new(model, PredictorConfig::new().with_threshold(0.5));
        let preds = predictor.predict(&feature_set(2)).unwrap();
        assert_eq!(preds, vec![Prediction::Value(1.5), Prediction::Value(-3.0)]);
    }

    #[test]
    fn test_classification_flat_and_column_agree() {
        let flat = Predictor::new(class_model(array![2.0, 0.0].into_dyn()), PredictorConfig::new());
        let column = Predictor::new(
            class_model(array![[2.0], [0.0]].into_dyn()),
            PredictorConfig::new(),
        );

        let expected = vec![
            Prediction::Label(Label::from("fish")),
            Prediction::Label(Label::from("cat")),
        ];
        assert_eq!(flat.predict(&feature_set(2)).unwrap(), expected);
        assert_eq!(column.predict(&feature_set(2)).unwrap(), expected);
    }

    #[test]
    fn test_classification_index_out_of_range() {
        let predictor = Predictor::new(class_model(array![5.0].into_dyn()), PredictorConfig::new());
        assert!(predictor.predict(&feature_set(1)).is_err());
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let predictor = Predictor::new(probability_model(&[0.1, 0.2]), PredictorConfig::new());
        let err = predictor.predict(&feature_set(3)).unwrap_err();
        assert!(err.to_string().contains("2 predictions for 3 examples"));
    }

    #[test]
    fn test_output_kind_mismatch_is_error() {
        let model = FixedModel {
            capabilities: caps(true, ModelFamily::Classification),
            labels: vec![Label::from("a"), Label::from("b")],
            output: RawOutput::Values(Array1::from_vec(vec![1.0])),
        };
        let predictor = Predictor::new(model, PredictorConfig::new());
        assert!(predictor.predict(&feature_set(1)).is_err());
    }

    #[test]
    fn test_capabilities_captured_once() {
        let predictor = Predictor::new(probability_model(&[0.4]), PredictorConfig::new());
        assert!(predictor.capabilities().supports_probability);
        assert_eq!(predictor.config().positive_class, 1);
        assert_eq!(predictor.model().label_list().len(), 2);
    }
}
