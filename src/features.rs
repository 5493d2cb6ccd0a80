// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! In-memory feature data.
//!
//! Readers produce a [`FeatureSet`]: an ordered collection of [`Example`]s,
//! each holding an identifier, an optional [`Label`] and a sparse map from
//! feature name to value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::format_float;

/// Sparse feature vector keyed by feature name.
pub type FeatureMap = BTreeMap<String, f64>;

/// A class label or target value.
///
/// Text is coerced the same way for every input format: integers first, then
/// floats, falling back to the raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label.
    Int(i64),
    /// Floating point label or target.
    Float(f64),
    /// Any other label.
    Str(String),
}

impl Label {
    /// Parse a label from raw text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            Self::Int(value)
        } else if let Ok(value) = raw.parse::<f64>() {
            Self::Float(value)
        } else {
            Self::Str(raw.to_string())
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::Str(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A single row of a feature file.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Example identifier.
    pub id: String,
    /// Label, if the file carried one.
    pub label: Option<Label>,
    /// Feature values.
    pub features: FeatureMap,
}

impl Example {
    /// Create a new example.
    #[must_use]
    pub fn new(id: impl Into<String>, label: Option<Label>, features: FeatureMap) -> Self {
        Self {
            id: id.into(),
            label,
            features,
        }
    }

    /// Default identifier for the example at `index` when the file has none.
    #[must_use]
    pub fn default_id(index: usize) -> String {
        format!("EXAMPLE_{index}")
    }
}

/// Collection of examples read from one feature file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    /// Name of the set, usually the source path.
    pub name: String,
    /// Examples in file order.
    pub examples: Vec<Example>,
}

impl FeatureSet {
    /// Create an empty feature set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            examples: Vec::new(),
        }
    }

    /// Append an example.
    pub fn push(&mut self, example: Example) {
        self.examples.push(example);
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the set has no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Iterate over examples in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    /// Whether any example carries a label.
    #[must_use]
    pub fn has_labels(&self) -> bool {
        self.examples.iter().any(|ex| ex.label.is_some())
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

/// Insert a raw cell value under `column`.
///
/// Numeric text is stored as-is. Other text `v` becomes the indicator feature
/// `column=v`. Empty cells and `?` are treated as missing.
pub(crate) fn insert_cell(features: &mut FeatureMap, column: &str, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() || raw == "?" {
        return;
    }
    match raw.parse::<f64>() {
        Ok(value) => {
            features.insert(column.to_string(), value);
        }
        Err(_) => {
            features.insert(format!("{column}={raw}"), 1.0);
        }
    }
}
