// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! MegaM reader.
//!
//! Each example line is `label name value name value ...`. A `# id` comment
//! line names the example that follows it, and `TEST` / `DEV` section markers
//! are ignored. Lines with an even number of tokens have no label.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::{Reader, ReaderOptions, source_name};
use crate::error::{PredictError, Result};
use crate::features::{Example, FeatureMap, FeatureSet, Label};

/// Reader for MegaM feature files.
#[derive(Debug, Clone)]
pub struct MegaMReader {
    path: PathBuf,
    options: ReaderOptions,
}

impl MegaMReader {
    /// Create a new reader.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

impl Reader for MegaMReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> &ReaderOptions {
        &self.options
    }

    fn read_from(&self, input: &mut dyn BufRead) -> Result<FeatureSet> {
        let name = source_name(&self.path);
        let mut feature_set = FeatureSet::new(&name);
        let mut pending_id: Option<String> = None;

        for (line_no, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim();
                if !comment.is_empty() {
                    pending_id = Some(comment.to_string());
                }
                continue;
            }
            if line.is_empty() || line == "TEST" || line == "DEV" {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let (label, pairs) = if tokens.len() % 2 == 1 {
                (Some(Label::parse(tokens[0])), &tokens[1..])
            } else {
                (None, &tokens[..])
            };

            let mut features = FeatureMap::new();
            for pair in pairs.chunks_exact(2) {
                let value: f64 = pair[1].parse().map_err(|_| {
                    PredictError::read_at(
                        &name,
                        line_no + 1,
                        format!("invalid value '{}' for feature '{}'", pair[1], pair[0]),
                    )
                })?;
                features.insert(pair[0].to_string(), value);
            }

            let id = pending_id
                .take()
                .unwrap_or_else(|| Example::default_id(feature_set.len()));
            feature_set.push(Example::new(id, label, features));
        }

        Ok(feature_set)
    }
}
