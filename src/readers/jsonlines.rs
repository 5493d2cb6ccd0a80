// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! JSON lines reader (`.jsonlines` and `.ndj`).
//!
//! Each non-blank line is an object `{"id": ..., "y": ..., "x": {...}}`.
//! Lines starting with `//` are comments. String feature values are always
//! categorical, so `"n": "3"` becomes the feature `n=3`.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Reader, ReaderOptions, source_name};
use crate::error::{PredictError, Result};
use crate::features::{Example, FeatureMap, FeatureSet, Label};

const ID_KEY: &str = "id";
const LABEL_KEY: &str = "y";
const FEATURES_KEY: &str = "x";

/// Reader for newline-delimited JSON feature files.
#[derive(Debug, Clone)]
pub struct JsonLinesReader {
    path: PathBuf,
    options: ReaderOptions,
}

impl JsonLinesReader {
    /// Create a new reader.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl Reader for JsonLinesReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> &ReaderOptions {
        &self.options
    }

    fn read_from(&self, input: &mut dyn BufRead) -> Result<FeatureSet> {
        let name = source_name(&self.path);
        let mut feature_set = FeatureSet::new(&name);

        for (line_no, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let value: Value = serde_json::from_str(line)
                .map_err(|e| PredictError::read_at(&name, line_no + 1, e))?;
            let Value::Object(object) = value else {
                return Err(PredictError::read_at(&name, line_no + 1, "expected a JSON object"));
            };

            let id = object
                .get(ID_KEY)
                .and_then(scalar_text)
                .unwrap_or_else(|| Example::default_id(feature_set.len()));
            let label = object.get(LABEL_KEY).and_then(json_label);
            let features = match object.get(FEATURES_KEY) {
                Some(Value::Object(x)) => json_features(x),
                None | Some(Value::Null) => FeatureMap::new(),
                Some(_) => {
                    return Err(PredictError::read_at(
                        &name,
                        line_no + 1,
                        "\"x\" must be an object of features",
                    ));
                }
            };

            feature_set.push(Example::new(id, label, features));
        }

        Ok(feature_set)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_label(value: &Value) -> Option<Label> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Label::Int)
            .or_else(|| n.as_f64().map(Label::Float)),
        Value::String(s) => Some(Label::parse(s)),
        Value::Bool(b) => Some(Label::Int(i64::from(*b))),
        _ => None,
    }
}

fn json_features(x: &Map<String, Value>) -> FeatureMap {
    let mut features = FeatureMap::new();
    for (key, value) in x {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_f64() {
                    features.insert(key.clone(), v);
                }
            }
            Value::Bool(b) => {
                features.insert(key.clone(), f64::from(u8::from(*b)));
            }
            Value::String(s) => {
                features.insert(format!("{key}={s}"), 1.0);
            }
            _ => {}
        }
    }
    features
}
