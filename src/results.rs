// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Prediction values.

use std::fmt;

use crate::features::Label;
use crate::utils::format_float;

/// One prediction for one example.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Probability of the positive class.
    Probability(f64),
    /// Thresholded probability: 1 if it met the threshold, else 0.
    Indicator(u8),
    /// Raw regression output.
    Value(f64),
    /// Predicted class label.
    Label(Label),
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probability(v) | Self::Value(v) => f.write_str(&format_float(*v)),
            Self::Indicator(v) => write!(f, "{v}"),
            Self::Label(label) => write!(f, "{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Prediction::Probability(0.25).to_string(), "0.25");
        assert_eq!(Prediction::Value(3.0).to_string(), "3.0");
        assert_eq!(Prediction::Probability(3.2e-7).to_string(), "3.2e-07");
        assert_eq!(Prediction::Value(1e17).to_string(), "1e+17");
        assert_eq!(Prediction::Indicator(1).to_string(), "1");
        assert_eq!(Prediction::Label(Label::from("pos")).to_string(), "pos");
        assert_eq!(Prediction::Label(Label::Int(7)).to_string(), "7");
    }
}
