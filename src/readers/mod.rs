// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Feature file readers.
//!
//! Every supported format is identified by its filename suffix. [`Format`]
//! holds the fixed suffix to reader mapping and [`Format::reader`] builds the
//! matching [`Reader`].

mod arff;
mod delimited;
mod jsonlines;
mod libsvm;
mod megam;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{PredictError, Result};
use crate::features::FeatureSet;

pub use arff::ArffReader;
pub use delimited::DelimitedReader;
pub use jsonlines::JsonLinesReader;
pub use libsvm::LibSvmReader;
pub use megam::MegaMReader;

/// Default name of the label column.
pub const DEFAULT_LABEL_COL: &str = "y";

/// Default name of the identifier column.
pub const DEFAULT_ID_COL: &str = "id";

/// Supported feature file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Attribute-Relation File Format.
    Arff,
    /// Comma-separated values with a header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
    /// Sparse `label index:value` lines.
    LibSvm,
    /// `label name value ...` lines.
    Megam,
    /// Newline-delimited JSON, same layout as `JsonLines`.
    Ndj,
    /// Tab-separated values with a header row.
    Tsv,
}

impl Format {
    /// All formats, in suffix order.
    pub const ALL: [Self; 7] = [
        Self::Arff,
        Self::Csv,
        Self::JsonLines,
        Self::LibSvm,
        Self::Megam,
        Self::Ndj,
        Self::Tsv,
    ];

    /// Filename suffix, including the leading dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Arff => ".arff",
            Self::Csv => ".csv",
            Self::JsonLines => ".jsonlines",
            Self::LibSvm => ".libsvm",
            Self::Megam => ".megam",
            Self::Ndj => ".ndj",
            Self::Tsv => ".tsv",
        }
    }

    /// Look up a format by suffix. Case-insensitive; the dot is optional.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        let ext = ext.strip_prefix('.').unwrap_or(&ext);
        Self::ALL
            .into_iter()
            .find(|f| f.extension().strip_prefix('.') == Some(ext))
    }

    /// Determine the format of a file from its suffix.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Human readable list of supported suffixes.
    #[must_use]
    pub fn supported_list() -> String {
        let exts: Vec<&str> = Self::ALL.iter().map(Self::extension).collect();
        match exts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
            Some((last, _)) => (*last).to_string(),
            None => String::new(),
        }
    }

    /// Build the reader for `path` in this format.
    #[must_use]
    pub fn reader<P: AsRef<Path>>(&self, path: P, options: ReaderOptions) -> Box<dyn Reader> {
        let path = path.as_ref().to_path_buf();
        match self {
            Self::Arff => Box::new(ArffReader::new(path, options)),
            Self::Csv => Box::new(DelimitedReader::csv(path, options)),
            Self::Tsv => Box::new(DelimitedReader::tsv(path, options)),
            Self::JsonLines | Self::Ndj => Box::new(JsonLinesReader::new(path, options)),
            Self::LibSvm => Box::new(LibSvmReader::new(path, options)),
            Self::Megam => Box::new(MegaMReader::new(path, options)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Build the reader for a path, chosen by its suffix.
///
/// # Errors
///
/// Returns [`PredictError::UnsupportedFormat`] if the suffix is not recognized.
pub fn reader_for_path<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Box<dyn Reader>> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| {
        PredictError::UnsupportedFormat(format!(
            "{} is not in {} format",
            path.display(),
            Format::supported_list()
        ))
    })?;
    Ok(format.reader(path, options))
}

/// Options shared by every reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Suppress "Loading ..." messages.
    pub quiet: bool,
    /// Name of the label column in tabular formats.
    pub label_col: String,
    /// Name of the identifier column in tabular formats.
    pub id_col: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            label_col: DEFAULT_LABEL_COL.to_string(),
            id_col: DEFAULT_ID_COL.to_string(),
        }
    }
}

impl ReaderOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable quiet mode.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the label column name.
    #[must_use]
    pub fn with_label_col(mut self, label_col: impl Into<String>) -> Self {
        self.label_col = label_col.into();
        self
    }

    /// Set the identifier column name.
    #[must_use]
    pub fn with_id_col(mut self, id_col: impl Into<String>) -> Self {
        self.id_col = id_col.into();
        self
    }
}

/// Reads a whole feature file into memory.
pub trait Reader {
    /// Path this reader reads from.
    fn path(&self) -> &Path;

    /// Options in use.
    fn options(&self) -> &ReaderOptions;

    /// Parse feature data from any buffered source.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ReadError`] on malformed content.
    fn read_from(&self, input: &mut dyn BufRead) -> Result<FeatureSet>;

    /// Read the file at [`Reader::path`].
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be opened, or the parse error
    /// from [`Reader::read_from`].
    fn read(&self) -> Result<FeatureSet> {
        let path = self.path();
        if !self.options().quiet {
            info!("Loading {}...", path.display());
        }
        let file = File::open(path).map_err(|e| {
            PredictError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        let feature_set = self.read_from(&mut BufReader::new(file))?;
        if !self.options().quiet {
            info!("Loaded {} examples from {}", feature_set.len(), path.display());
        }
        Ok(feature_set)
    }
}

/// Display name used for a reader's feature set and error messages.
fn source_name(path: &Path) -> String {
    path.display().to_string()
}
