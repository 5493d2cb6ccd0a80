// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CSV and TSV readers.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::{Reader, ReaderOptions, source_name};
use crate::error::{PredictError, Result};
use crate::features::{Example, FeatureMap, FeatureSet, Label, insert_cell};

/// Reader for delimited text with a header row.
///
/// The label column and the id column are pulled out by name; every other
/// column is a feature.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    path: PathBuf,
    options: ReaderOptions,
    delimiter: u8,
}

impl DelimitedReader {
    /// Comma-separated reader.
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self::with_delimiter(path, options, b',')
    }

    /// Tab-separated reader.
    #[must_use]
    pub fn tsv(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self::with_delimiter(path, options, b'\t')
    }

    /// Reader with an arbitrary single-byte delimiter.
    #[must_use]
    pub fn with_delimiter(path: impl Into<PathBuf>, options: ReaderOptions, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            options,
            delimiter,
        }
    }
}

impl Reader for DelimitedReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> &ReaderOptions {
        &self.options
    }

    fn read_from(&self, input: &mut dyn BufRead) -> Result<FeatureSet> {
        let name = source_name(&self.path);
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = rdr
            .headers()
            .map_err(|e| PredictError::ReadError(format!("{name}: {e}")))?
            .clone();
        let label_idx = headers.iter().position(|h| h == self.options.label_col);
        let id_idx = headers.iter().position(|h| h == self.options.id_col);

        let mut feature_set = FeatureSet::new(&name);
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| PredictError::ReadError(format!("{name}: {e}")))?;

            let mut id = None;
            let mut label = None;
            let mut features = FeatureMap::new();
            for (col, (header, value)) in headers.iter().zip(record.iter()).enumerate() {
                if Some(col) == id_idx {
                    id = Some(value.to_string()).filter(|v| !v.is_empty());
                } else if Some(col) == label_idx {
                    label = Some(value).filter(|v| !v.is_empty()).map(Label::parse);
                } else {
                    insert_cell(&mut features, header, value);
                }
            }

            let id = id.unwrap_or_else(|| Example::default_id(row));
            feature_set.push(Example::new(id, label, features));
        }

        Ok(feature_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(reader: &DelimitedReader, text: &str) -> Result<FeatureSet> {
        reader.read_from(&mut Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_csv_with_label_and_id() {
        let reader = DelimitedReader::csv("t.csv", ReaderOptions::new());
        let fs = read(&reader, "id,f1,f2,y\nex1,1.5,red,pos\nex2,0,blue,neg\n").unwrap();

        assert_eq!(fs.len(), 2);
        let first = &fs.examples[0];
        assert_eq!(first.id, "ex1");
        assert_eq!(first.label, Some(Label::from("pos")));
        assert_eq!(first.features["f1"], 1.5);
        assert_eq!(first.features["f2=red"], 1.0);
        assert!(!first.features.contains_key("y"));
        assert_eq!(fs.examples[1].id, "ex2");
    }

    #[test]
    fn test_csv_without_label() {
        let reader = DelimitedReader::csv("t.csv", ReaderOptions::new());
        let fs = read(&reader, "a,b\n1,2\n3,4\n").unwrap();
        assert!(!fs.has_labels());
        assert_eq!(fs.examples[1].id, "EXAMPLE_1");
        assert_eq!(fs.examples[1].features["b"], 4.0);
    }

    #[test]
    fn test_custom_label_col() {
        let reader =
            DelimitedReader::csv("t.csv", ReaderOptions::new().with_label_col("score"));
        let fs = read(&reader, "x,score,y\n1,0.5,2\n").unwrap();
        let ex = &fs.examples[0];
        assert_eq!(ex.label, Some(Label::Float(0.5)));
        assert_eq!(ex.features["y"], 2.0);
    }

    #[test]
    fn test_quoted_fields() {
        let reader = DelimitedReader::csv("t.csv", ReaderOptions::new());
        let fs = read(&reader, "name,y\n\"Smith, J\",1\n").unwrap();
        assert!(fs.examples[0].features.contains_key("name=Smith, J"));
        assert_eq!(fs.examples[0].label, Some(Label::Int(1)));
    }

    #[test]
    fn test_tsv() {
        let reader = DelimitedReader::tsv("t.tsv", ReaderOptions::new());
        let fs = read(&reader, "f1\tf2\ty\n1\t\t0\n").unwrap();
        let ex = &fs.examples[0];
        assert_eq!(ex.features.len(), 1);
        assert_eq!(ex.label, Some(Label::Int(0)));
    }

    #[test]
    fn test_ragged_row_is_error() {
        let reader = DelimitedReader::csv("t.csv", ReaderOptions::new());
        let err = read(&reader, "a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, PredictError::ReadError(_)));
    }
}
