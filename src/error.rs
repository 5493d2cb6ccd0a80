// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the prediction library.

use std::fmt;

/// Result type alias for prediction operations.
pub type Result<T> = std::result::Result<T, PredictError>;

/// Main error type for the prediction library.
#[derive(Debug)]
pub enum PredictError {
    /// Error loading or validating a model file.
    ModelLoadError(String),
    /// Error turning model output into predictions.
    PredictionError(String),
    /// Malformed feature file content.
    ReadError(String),
    /// Input file suffix with no matching reader.
    UnsupportedFormat(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl PredictError {
    /// Build a [`PredictError::ReadError`] pointing at a line of a file.
    pub(crate) fn read_at(source: &str, line: usize, msg: impl fmt::Display) -> Self {
        Self::ReadError(format!("{source}, line {line}: {msg}"))
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::PredictionError(msg) => write!(f, "Prediction error: {msg}"),
            Self::ReadError(msg) => write!(f, "Read error: {msg}"),
            Self::UnsupportedFormat(msg) => write!(f, "Unsupported format: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PredictError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PredictError::ModelLoadError("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = PredictError::PredictionError("test".to_string());
        assert_eq!(err.to_string(), "Prediction error: test");
    }

    #[test]
    fn test_read_at_names_location() {
        let err = PredictError::read_at("train.megam", 7, "bad value");
        assert_eq!(err.to_string(), "Read error: train.megam, line 7: bad value");
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = PredictError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(PredictError::ReadError("x".into()).source().is_none());
    }
}
