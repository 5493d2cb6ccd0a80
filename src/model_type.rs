// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Estimator types understood by the model loader.
//!
//! Each model file names the estimator it was trained with. The estimator
//! determines the model family (regression or classification) and whether
//! it can produce class probabilities.

use std::fmt;
use std::str::FromStr;

/// Broad family of an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Predicts a class from a fixed label list.
    Classification,
    /// Predicts a continuous value.
    Regression,
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classification => f.write_str("classification"),
            Self::Regression => f.write_str("regression"),
        }
    }
}

/// Linear estimator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Logistic regression classifier.
    LogisticRegression,
    /// Linear support vector classifier.
    LinearSvc,
    /// Linear classifier trained with stochastic gradient descent.
    SgdClassifier,
    /// Perceptron classifier.
    Perceptron,
    /// Ordinary least squares regression.
    LinearRegression,
    /// L2-regularized regression.
    Ridge,
    /// L1-regularized regression.
    Lasso,
    /// Combined L1/L2-regularized regression.
    ElasticNet,
    /// Linear support vector regression.
    LinearSvr,
    /// Linear regressor trained with stochastic gradient descent.
    SgdRegressor,
}

impl ModelType {
    /// Returns the estimator name as written in model files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "LogisticRegression",
            Self::LinearSvc => "LinearSVC",
            Self::SgdClassifier => "SGDClassifier",
            Self::Perceptron => "Perceptron",
            Self::LinearRegression => "LinearRegression",
            Self::Ridge => "Ridge",
            Self::Lasso => "Lasso",
            Self::ElasticNet => "ElasticNet",
            Self::LinearSvr => "LinearSVR",
            Self::SgdRegressor => "SGDRegressor",
        }
    }

    /// Returns the family this estimator belongs to.
    #[must_use]
    pub const fn family(&self) -> ModelFamily {
        match self {
            Self::LogisticRegression | Self::LinearSvc | Self::SgdClassifier | Self::Perceptron => {
                ModelFamily::Classification
            }
            Self::LinearRegression
            | Self::Ridge
            | Self::Lasso
            | Self::ElasticNet
            | Self::LinearSvr
            | Self::SgdRegressor => ModelFamily::Regression,
        }
    }

    /// Returns whether this estimator is a regressor.
    #[must_use]
    pub const fn is_regressor(&self) -> bool {
        matches!(self.family(), ModelFamily::Regression)
    }

    /// Returns whether this estimator can produce class probabilities.
    #[must_use]
    pub const fn supports_probability(&self) -> bool {
        matches!(self, Self::LogisticRegression | Self::SgdClassifier)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ModelTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logisticregression" | "logistic" => Ok(Self::LogisticRegression),
            "linearsvc" => Ok(Self::LinearSvc),
            "sgdclassifier" => Ok(Self::SgdClassifier),
            "perceptron" => Ok(Self::Perceptron),
            "linearregression" | "linear" => Ok(Self::LinearRegression),
            "ridge" => Ok(Self::Ridge),
            "lasso" => Ok(Self::Lasso),
            "elasticnet" => Ok(Self::ElasticNet),
            "linearsvr" => Ok(Self::LinearSvr),
            "sgdregressor" => Ok(Self::SgdRegressor),
            _ => Err(ModelTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown estimator name.
#[derive(Debug, Clone)]
pub struct ModelTypeParseError(String);

impl fmt::Display for ModelTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown model type '{}', expected one of: LogisticRegression, LinearSVC, \
             SGDClassifier, Perceptron, LinearRegression, Ridge, Lasso, ElasticNet, \
             LinearSVR, SGDRegressor",
            self.0
        )
    }
}

impl std::error::Error for ModelTypeParseError {}
