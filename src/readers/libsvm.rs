// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! LibSVM reader.
//!
//! Lines look like `label idx:val idx:val ... # id | 1=pos 2=neg | 1=name`.
//! The trailing comment is optional; when present it carries the example id,
//! a map from numeric labels to label names, and a map from feature indices
//! to feature names.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::{Reader, ReaderOptions, source_name};
use crate::error::{PredictError, Result};
use crate::features::{Example, FeatureMap, FeatureSet, Label};

/// Reader for LibSVM sparse feature files.
#[derive(Debug, Clone)]
pub struct LibSvmReader {
    path: PathBuf,
    options: ReaderOptions,
}

impl LibSvmReader {
    /// Create a new reader.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl Reader for LibSvmReader {
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
            let (body, comment) = match line.split_once('#') {
                Some((body, comment)) => (body.trim(), Some(comment)),
                None => (line.trim(), None),
            };
            if body.is_empty() {
                continue;
            }

            let annotations = comment.map(Annotations::parse).unwrap_or_default();
            let mut tokens = body.split_whitespace();

            let label = tokens.next().map(|raw| {
                annotations
                    .labels
                    .get(raw)
                    .map_or_else(|| Label::parse(raw), |name| Label::parse(name))
            });

            let mut features = FeatureMap::new();
            for token in tokens {
                let (idx, value) = token.split_once(':').ok_or_else(|| {
                    PredictError::read_at(&name, line_no + 1, format!("expected idx:value, got '{token}'"))
                })?;
                let value: f64 = value.parse().map_err(|_| {
                    PredictError::read_at(&name, line_no + 1, format!("invalid value '{value}'"))
                })?;
                let feature = annotations
                    .features
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| idx.to_string());
                features.insert(feature, value);
            }

            let id = annotations
                .id
                .unwrap_or_else(|| Example::default_id(feature_set.len()));
            feature_set.push(Example::new(id, label, features));
        }

        Ok(feature_set)
    }
}

/// Parsed trailing comment of a LibSVM line.
#[derive(Debug, Default)]
struct Annotations {
    id: Option<String>,
    labels: HashMap<String, String>,
    features: HashMap<String, String>,
}

impl Annotations {
    fn parse(comment: &str) -> Self {
        let mut parts = comment.split('|');
        let id = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        let labels = parts.next().map(parse_mapping).unwrap_or_default();
        let features = parts.next().map(parse_mapping).unwrap_or_default();
        Self {
            id,
            labels,
            features,
        }
    }
}

fn parse_mapping(text: &str) -> HashMap<String, String> {
    text.split_whitespace()
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
