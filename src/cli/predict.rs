// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, error};

use crate::cli::args::Cli;
use crate::error::{PredictError, Result};
use crate::model::Model;
use crate::readers::{Format, ReaderOptions, reader_for_path};
use crate::{Predictor, PredictorConfig};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files that were read and scored.
    pub files_processed: usize,
    /// Files skipped because of an unrecognized suffix.
    pub files_skipped: usize,
    /// Prediction lines written.
    pub predictions: usize,
}

/// Load the model named on the command line and write predictions for every
/// input file to `out`.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded, or if a recognized input
/// file cannot be read or scored.
pub fn run_prediction<W: Write>(cli: &Cli, out: &mut W) -> Result<RunSummary> {
    let config = PredictorConfig::new()
        .with_positive_class(cli.positive_class)
        .with_optional_threshold(cli.threshold);
    let predictor = Predictor::load(&cli.model_file, config)?;

    let options = ReaderOptions::new()
        .with_quiet(cli.quiet)
        .with_label_col(&cli.label_col);
    predict_files(&predictor, &cli.input_file, &options, out)
}

/// Write one prediction per line for each file in `files`, in order.
///
/// Files with an unrecognized suffix are logged and skipped.
///
/// # Errors
///
/// Returns the first read, prediction or write error.
pub fn predict_files<M: Model, W: Write>(
    predictor: &Predictor<M>,
    files: &[PathBuf],
    options: &ReaderOptions,
    out: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for path in files {
        let reader = match reader_for_path(path, options.clone()) {
            Ok(reader) => reader,
            Err(PredictError::UnsupportedFormat(_)) => {
                error!(
                    "Input file must be in either {} format. Skipping file {}",
                    Format::supported_list(),
                    path.display()
                );
                summary.files_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let data = reader.read()?;
        let predictions = predictor.predict(&data)?;
        for prediction in &predictions {
            writeln!(out, "{prediction}")?;
        }
        debug!("Wrote {} predictions for {}", predictions.len(), path.display());

        summary.files_processed += 1;
        summary.predictions += predictions.len();
    }

    Ok(summary)
}
