// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Predictor configuration.
//!
//! This module defines [`PredictorConfig`], which controls how raw model output
//! is turned into predictions: which probability column is the class of
//! interest and whether probabilities are thresholded into 0/1 indicators.

/// Default positive-class index: the second class of a sorted label list.
pub const DEFAULT_POSITIVE_CLASS: usize = 1;

/// Configuration for a [`Predictor`](crate::Predictor).
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use model_predict::PredictorConfig;
///
/// let config = PredictorConfig::new()
///     .with_positive_class(0)
///     .with_threshold(0.7);
/// assert_eq!(config.threshold, Some(0.7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Probability cutoff. When set, probability output becomes 1 if the
    /// positive-class probability meets or exceeds it and 0 otherwise.
    pub threshold: Option<f64>,
    /// Index of the class whose probability is reported. Classes are in the
    /// model's label order, which is sorted lexicographically at training time.
    pub positive_class: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            positive_class: DEFAULT_POSITIVE_CLASS,
        }
    }
}

impl PredictorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set or clear the probability threshold.
    #[must_use]
    pub const fn with_optional_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the positive-class index.
    #[must_use]
    pub const fn with_positive_class(mut self, index: usize) -> Self {
        self.positive_class = index;
        self
    }
}
