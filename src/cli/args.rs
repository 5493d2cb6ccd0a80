// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_POSITIVE_CLASS;
use crate::readers::DEFAULT_LABEL_COL;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(
    name = "generate-predictions",
    author,
    version,
    about = "Loads a trained model and outputs predictions based on input feature files.",
    long_about = None
)]
#[command(after_help = r#"Supported input formats:
    .arff, .csv, .jsonlines, .libsvm, .megam, .ndj, .tsv

Examples:
    generate-predictions model.json test.csv
    generate-predictions model.json test.csv --threshold 0.5
    generate-predictions model.json a.jsonlines b.libsvm -p 0 -q"#)]
pub struct Cli {
    /// Model file to load and use for generating predictions
    pub model_file: PathBuf,

    /// One or more feature files to generate predictions for
    #[arg(required = true, num_args = 1..)]
    pub input_file: Vec<PathBuf>,

    /// Name of the column which contains the class labels in ARFF, CSV, or TSV files
    #[arg(short, long = "label_col", default_value = DEFAULT_LABEL_COL)]
    pub label_col: String,

    /// Index of the positive class when outputting probabilities
    #[arg(short, long = "positive_class", default_value_t = DEFAULT_POSITIVE_CLASS)]
    pub positive_class: usize,

    /// Suppress printing of "Loading..." messages
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// If the model is probabilistic, output 1 if the positive class
    /// probability is at least this value and 0 otherwise
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let cli = Cli::parse_from(["generate-predictions", "model.json", "test.csv"]);
        assert_eq!(cli.model_file, PathBuf::from("model.json"));
        assert_eq!(cli.input_file, vec![PathBuf::from("test.csv")]);
        assert_eq!(cli.label_col, "y");
        assert_eq!(cli.positive_class, 1);
        assert!(!cli.quiet);
        assert!(cli.threshold.is_none());
    }

    #[test]
    fn test_args_custom() {
        let cli = Cli::parse_from([
            "generate-predictions",
            "model.json",
            "a.csv",
            "b.tsv",
            "--label_col",
            "target",
            "-p",
            "0",
            "-q",
            "-t",
            "0.75",
        ]);
        assert_eq!(cli.input_file.len(), 2);
        assert_eq!(cli.label_col, "target");
        assert_eq!(cli.positive_class, 0);
        assert!(cli.quiet);
        assert_eq!(cli.threshold, Some(0.75));
    }

    #[test]
    fn test_input_file_required() {
        assert!(Cli::try_parse_from(["generate-predictions", "model.json"]).is_err());
    }

    #[test]
    fn test_negative_positive_class_rejected() {
        let result =
            Cli::try_parse_from(["generate-predictions", "m.json", "a.csv", "--positive_class", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_version_exits_before_files() {
        let err = Cli::try_parse_from(["generate-predictions", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert!(err.to_string().starts_with("generate-predictions "));
    }
}
