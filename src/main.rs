// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;

use model_predict::cli::args::Cli;
use model_predict::cli::logging::{LogConfig, report_fatal, subscriber};
use model_predict::cli::predict::run_prediction;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let subscriber = subscriber(&LogConfig::from_env(), io::stderr);

    let result = tracing::subscriber::with_default(subscriber, || -> model_predict::Result<()> {
        let mut out = BufWriter::new(io::stdout().lock());
        let summary = run_prediction(&cli, &mut out)?;
        out.flush()?;
        tracing::debug!(
            processed = summary.files_processed,
            skipped = summary.files_skipped,
            predictions = summary.predictions,
            "Finished"
        );
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_fatal(&e);
            ExitCode::FAILURE
        }
    }
}
