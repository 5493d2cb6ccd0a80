// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Feature encoders.
//!
//! A trained model stores how it turned named features into column indices:
//! either an explicit vocabulary or a fixed-width hashing trick. Both produce
//! sparse rows of `(column, value)` pairs.

use std::collections::HashMap;

use crate::error::{PredictError, Result};
use crate::features::{FeatureMap, FeatureSet};
use crate::utils::murmurhash3_32;

/// Sparse row of `(column, value)` pairs.
pub type SparseRow = Vec<(usize, f64)>;

/// Maps feature names to column indices.
#[derive(Debug, Clone)]
pub enum Vectorizer {
    /// Explicit name to index mapping.
    Vocabulary(Vocabulary),
    /// Hashing trick.
    Hashing(FeatureHasher),
}

impl Vectorizer {
    /// Number of columns produced.
    #[must_use]
    pub fn n_features(&self) -> usize {
        match self {
            Self::Vocabulary(v) => v.n_features(),
            Self::Hashing(h) => h.n_features(),
        }
    }

    /// Whether this encoder uses feature hashing.
    #[must_use]
    pub const fn is_hashing(&self) -> bool {
        matches!(self, Self::Hashing(_))
    }

    /// Encode one example.
    #[must_use]
    pub fn transform_row(&self, features: &FeatureMap) -> SparseRow {
        match self {
            Self::Vocabulary(v) => v.transform_row(features),
            Self::Hashing(h) => h.transform_row(features),
        }
    }

    /// Encode every example of a feature set, preserving order.
    #[must_use]
    pub fn transform(&self, data: &FeatureSet) -> Vec<SparseRow> {
        data.iter().map(|ex| self.transform_row(&ex.features)).collect()
    }
}

/// Vocabulary-based encoder. Unknown features are dropped.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    n_features: usize,
}

impl Vocabulary {
    /// Build from a name to column mapping.
    #[must_use]
    pub fn new(index: HashMap<String, usize>) -> Self {
        let n_features = index.values().max().map_or(0, |&max| max + 1);
        Self { index, n_features }
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Column of a feature, if known.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn transform_row(&self, features: &FeatureMap) -> SparseRow {
        features
            .iter()
            .filter_map(|(name, &value)| self.get(name).map(|col| (col, value)))
            .collect()
    }
}

/// Hashing encoder.
///
/// The column is `|h| mod n_features` where `h` is the signed 32-bit
/// `MurmurHash3` of the feature name. With `alternate_sign`, values whose
/// hash is negative are negated so collisions tend to cancel out.
#[derive(Debug, Clone, Copy)]
pub struct FeatureHasher {
    n_features: usize,
    alternate_sign: bool,
}

impl FeatureHasher {
    /// Create a new hasher.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ModelLoadError`] if `n_features` is zero.
    pub fn new(n_features: usize, alternate_sign: bool) -> Result<Self> {
        if n_features == 0 {
            return Err(PredictError::ModelLoadError(
                "hashing encoder needs n_features > 0".to_string(),
            ));
        }
        Ok(Self {
            n_features,
            alternate_sign,
        })
    }

    /// Number of output columns.
    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Column and sign for a feature name.
    #[must_use]
    pub fn bucket(&self, name: &str) -> (usize, f64) {
        let h = murmurhash3_32(name.as_bytes(), 0);
        let col = h.unsigned_abs() as usize % self.n_features;
        let sign = if self.alternate_sign && h < 0 { -1.0 } else { 1.0 };
        (col, sign)
    }

    fn transform_row(&self, features: &FeatureMap) -> SparseRow {
        let mut row: SparseRow = features
            .iter()
            .map(|(name, &value)| {
                let (col, sign) = self.bucket(name);
                (col, sign * value)
            })
            .collect();

        // Merge collisions so each column appears once.
        row.sort_unstable_by_key(|&(col, _)| col);
        row.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Example;

    fn features(pairs: &[(&str, f64)]) -> FeatureMap {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_vocabulary_drops_unknown() {
        let vocab = Vocabulary::new(HashMap::from([("a".to_string(), 0), ("b".to_string(), 2)]));
        assert_eq!(vocab.n_features(), 3);

        let row = Vectorizer::Vocabulary(vocab)
            .transform_row(&features(&[("a", 1.5), ("b", 2.0), ("zzz", 9.0)]));
        assert_eq!(row, vec![(0, 1.5), (2, 2.0)]);
    }

    #[test]
    fn test_hasher_bucket_in_range() {
        let hasher = FeatureHasher::new(16, true).unwrap();
        for name in ["a", "b", "color=red", "a much longer feature name"] {
            let (col, sign) = hasher.bucket(name);
            assert!(col < 16);
            assert!(sign == 1.0 || sign == -1.0);
        }
    }

    #[test]
    fn test_hasher_rejects_zero_width() {
        let err = FeatureHasher::new(0, true).unwrap_err();
        assert!(matches!(err, PredictError::ModelLoadError(_)));
        assert_eq!(FeatureHasher::new(3, false).unwrap().n_features(), 3);
    }

    #[test]
    fn test_hasher_without_alternate_sign() {
        let hasher = FeatureHasher::new(8, false).unwrap();
        let row = hasher.transform_row(&features(&[("x", 2.0), ("y", 3.0)]));
        assert!(row.iter().all(|&(_, v)| v > 0.0));
    }

    #[test]
    fn test_hasher_merges_collisions() {
        let hasher = FeatureHasher::new(1, false).unwrap();
        let row = hasher.transform_row(&features(&[("x", 2.0), ("y", 3.0)]));
        assert_eq!(row, vec![(0, 5.0)]);
    }

    #[test]
    fn test_transform_preserves_order() {
        let vectorizer =
            Vectorizer::Vocabulary(Vocabulary::new(HashMap::from([("f".to_string(), 0)])));
        let mut data = FeatureSet::new("t");
        for v in [1.0, 2.0, 3.0] {
            data.push(Example::new("", None, features(&[("f", v)])));
        }
        let rows = vectorizer.transform(&data);
        let values: Vec<f64> = rows.iter().map(|r| r[0].1).collect();
        assert_eq!(values, [1.0, 2.0, 3.0]);
        assert!(!vectorizer.is_hashing());
    }
}
