//! Error types for the price predictor
//!
//! Two kinds of failure exist: a [`ResourceError`] means an artifact is
//! missing, corrupt or inconsistent and the session cannot predict at all;
//! an [`InputError`] means the submitted form needs correcting.

use crate::validation::ValidationIssue;
use std::path::PathBuf;
use thiserror::Error;

/// Artifact loading or shape failures. Fatal for the session.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Artifact file does not exist
    #[error("{artifact} file not found: {}", .path.display())]
    Missing {
        artifact: &'static str,
        path: PathBuf,
    },

    /// Artifact file exists but could not be read
    #[error("failed to read {artifact} file {}: {source}", .path.display())]
    Unreadable {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be parsed or is internally inconsistent
    #[error("invalid {artifact} file {}: {reason}", .path.display())]
    Corrupt {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Feature vector width disagrees with what the scaler or model expects
    #[error("{stage} expects {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Artifact was fitted with a different column order
    #[error("{stage} column {index} is '{found}', expected '{expected}'")]
    ColumnOrder {
        stage: &'static str,
        index: usize,
        expected: String,
        found: String,
    },

    /// ONNX Runtime failed while scoring a feature vector
    #[error("model inference failed: {0}")]
    Inference(String),
}

/// Problems with a submitted property record. Recoverable by re-prompting.
#[derive(Error, Debug)]
pub enum InputError {
    /// One or more completeness/range checks failed
    #[error("{}", join_messages(.0))]
    Invalid(Vec<ValidationIssue>),

    /// Categorical value outside its closed set
    #[error("unknown {field}: '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    /// Value could not be parsed at all
    #[error("malformed input: {0}")]
    Malformed(String),
}

impl InputError {
    /// Human-readable messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            InputError::Invalid(issues) => issues.iter().map(|i| i.message.clone()).collect(),
            other => vec![other.to_string()],
        }
    }
}

fn join_messages(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Any failure on the prediction path
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("input error: {0}")]
    Input(#[from] InputError),
}

/// Result type for prediction operations
pub type Result<T> = std::result::Result<T, PredictorError>;
