//! Error types for loading artifacts, predicting clusters and building reports

use crate::model::ClusterLabel;
use crate::survey::Field;
use std::path::PathBuf;
use thiserror::Error;

/// An artifact file is missing or cannot be understood. Fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("artifact not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("schema mismatch in {}{}: {reason}", .path.display(), line_suffix(.line))]
    Schema {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

/// The model could not produce labels for the given responses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictionError {
    #[error("model has no category '{value}' for {field}")]
    UnknownCategory { field: Field, value: String },

    #[error("encoded width {actual} does not match model dimension {expected}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("model returned {actual} labels for {expected} responses")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("model returned unknown centroid index {0}")]
    UnknownCentroid(usize),
}

/// A predicted label has no entry in the cluster metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cluster '{label}' is not described in the cluster metadata")]
pub struct LookupError {
    pub label: ClusterLabel,
}

/// Any failure of the dashboard library
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("input error: {0}")]
    Input(#[from] dialoguer::Error),

    #[error("failed to render chart: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error only affects the current interaction
    pub fn is_interaction_failure(&self) -> bool {
        matches!(self, Error::Prediction(_) | Error::Lookup(_))
    }
}
