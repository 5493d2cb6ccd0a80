// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the prediction pipeline

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use ndarray::Array2;
use tempfile::TempDir;

use model_predict::cli::args::Cli;
use model_predict::cli::logging::{LogConfig, subscriber};
use model_predict::cli::predict::{RunSummary, predict_files, run_prediction};
use model_predict::readers::ReaderOptions;
use model_predict::{
    Capabilities, FeatureSet, Label, Model, ModelFamily, PredictError, Predictor, PredictorConfig,
    RawOutput, Result,
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Model that returns the same positive-class probabilities for any input.
struct ScriptedProbabilities(Vec<f64>);

impl Model for ScriptedProbabilities {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_probability: true,
            family: ModelFamily::Classification,
            uses_feature_hashing: false,
        }
    }

    fn label_list(&self) -> &[Label] {
        &[]
    }

    fn predict_raw(&self, _data: &FeatureSet, _feature_hashing: bool) -> Result<RawOutput> {
        let rows: Vec<f64> = self.0.iter().flat_map(|&p| [1.0 - p, p]).collect();
        let probs = Array2::from_shape_vec((self.0.len(), 2), rows)
            .map_err(|e| PredictError::PredictionError(e.to_string()))?;
        Ok(RawOutput::Probabilities(probs))
    }
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("generate-predictions").chain(args.iter().copied()))
}

fn run_captured(cli: &Cli) -> (Result<RunSummary>, String, String) {
    let logs = SharedBuffer::default();
    let writer = logs.clone();
    let sub = subscriber(&LogConfig::new(), move || writer.clone());
    let mut out = Vec::new();
    let result = tracing::subscriber::with_default(sub, || run_prediction(cli, &mut out));
    (result, String::from_utf8(out).unwrap(), logs.contents())
}

#[test]
fn test_threshold_scenario() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "test.csv", "f\n1\n2\n3\n");
    let predictor = Predictor::new(
        ScriptedProbabilities(vec![0.2, 0.5, 0.9]),
        PredictorConfig::new().with_positive_class(1).with_threshold(0.5),
    );

    let mut out = Vec::new();
    let summary = predict_files(
        &predictor,
        &[data],
        &ReaderOptions::new().with_quiet(true),
        &mut out,
    )
    .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "0\n1\n1\n");
    assert_eq!(summary.predictions, 3);
}

#[test]
fn test_unrecognized_suffix_logs_one_error() {
    let dir = TempDir::new().unwrap();
    let model = write(
        &dir,
        "model.json",
        r#"{
            "model_type": "LogisticRegression",
            "probability": true,
            "label_list": [0, 1],
            "feature_encoder": {"type": "vocabulary", "vocabulary": {"a": 0}},
            "coef": [[0.0]],
            "intercept": [0.0]
        }"#,
    );
    let good = write(&dir, "good.jsonlines", "{\"id\": \"e1\", \"x\": {\"a\": 1}}\n");
    let bad = write(&dir, "bad.xyz", "ignored");

    let cli = cli(&[
        model.to_str().unwrap(),
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ]);
    let (result, out, logs) = run_captured(&cli);
    let summary = result.unwrap();

    assert_eq!(out, "0.5\n");
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_skipped, 1);

    let errors: Vec<&str> = logs.lines().filter(|l| l.contains("ERROR")).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("bad.xyz"));
    assert!(logs.contains("Loading"));
}

#[test]
fn test_quiet_suppresses_loading_messages() {
    let dir = TempDir::new().unwrap();
    let model = write(
        &dir,
        "model.json",
        r#"{
            "model_type": "Ridge",
            "feature_encoder": {"type": "vocabulary", "vocabulary": {"a": 0}},
            "coef": [[1.0]],
            "intercept": [0.0]
        }"#,
    );
    let data = write(&dir, "data.tsv", "a\n1\n");

    let (result, _, logs) = run_captured(&cli(&[
        model.to_str().unwrap(),
        data.to_str().unwrap(),
        "--quiet",
    ]));
    result.unwrap();
    assert!(!logs.contains("Loading"));
}

#[test]
fn test_regression_outputs_raw_values() {
    let dir = TempDir::new().unwrap();
    let model = write(
        &dir,
        "model.json",
        r#"{
            "model_type": "LinearRegression",
            "feature_encoder": {"type": "vocabulary", "vocabulary": {"a": 0, "b": 1}},
            "coef": [[2.0, -1.0]],
            "intercept": [0.5]
        }"#,
    );
    let data = write(&dir, "data.megam", "# first\n1 a 1 b 1\n# second\n0 a 2\n");

    let (result, out, _) = run_captured(&cli(&[model.to_str().unwrap(), data.to_str().unwrap(), "-q"]));
    result.unwrap();
    assert_eq!(out, "1.5\n4.5\n");
}

#[test]
fn test_classifier_outputs_labels() {
    let dir = TempDir::new().unwrap();
    let model = write(
        &dir,
        "model.json",
        r#"{
            "model_type": "LinearSVC",
            "label_list": ["cat", "dog", "fish"],
            "feature_encoder": {"type": "vocabulary", "vocabulary": {"1": 0, "2": 1}},
            "coef": [[1.0, 0.0], [0.0, 1.0], [-1.0, -1.0]],
            "intercept": [0.0, 0.0, 0.0]
        }"#,
    );
    let data = write(&dir, "data.libsvm", "0 1:3\n0 2:2\n0 1:-1 2:-1\n");

    let (result, out, _) = run_captured(&cli(&[model.to_str().unwrap(), data.to_str().unwrap(), "-q"]));
    result.unwrap();
    assert_eq!(out, "cat\ndog\nfish\n");
}

#[test]
fn test_hashed_features() {
    let dir = TempDir::new().unwrap();
    let model = write(
        &dir,
        "model.json",
        r#"{
            "model_type": "SGDClassifier",
            "probability": true,
            "label_list": ["no", "yes"],
            "feature_encoder": {"type": "hashing", "n_features": 4},
            "coef": [[0.0, 0.0, 0.0, 0.0]],
            "intercept": [0.0]
        }"#,
    );
    let data = write(&dir, "data.arff", "@relation r\n@attribute w numeric\n@data\n3\n");

    let (result, out, _) = run_captured(&cli(&[model.to_str().unwrap(), data.to_str().unwrap(), "-q"]));
    result.unwrap();
    assert_eq!(out, "0.5\n");
}

#[test]
fn test_missing_model_file() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.csv", "a\n1\n");
    let missing = dir.path().join("nope.json");

    let (result, out, _) = run_captured(&cli(&[missing.to_str().unwrap(), data.to_str().unwrap()]));
    assert!(matches!(result, Err(PredictError::ModelLoadError(_))));
    assert!(out.is_empty());
}

#[test]
fn test_version_flag() {
    let err = Cli::try_parse_from(["generate-predictions", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    assert!(err.to_string().contains(model_predict::VERSION));
}
