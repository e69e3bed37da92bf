use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring a model artifact into memory. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Model artifact is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Invalid decision tree: {0}")]
    InvalidTree(#[from] TreeError),
}

/// Structural defects detected while validating a decision tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("tree declares no feature columns")]
    NoFeatures,
    #[error("feature '{0}' is declared more than once")]
    DuplicateFeature(String),
    #[error("class {0} has no risk label")]
    UnsupportedClass(u8),
    #[error("node {node} splits on feature index {index}, but only {count} features are declared")]
    FeatureIndexOutOfRange {
        node: usize,
        index: usize,
        count: usize,
    },
    #[error("node {node} has a non-finite threshold")]
    NonFiniteThreshold { node: usize },
    #[error("node {node} points to child {child}, which does not exist")]
    ChildOutOfRange { node: usize, child: usize },
    #[error("node {node} points backwards to child {child}")]
    BackwardChild { node: usize, child: usize },
    #[error("leaf {node} predicts class {label}, which is not a declared class")]
    UndeclaredLeafClass { node: usize, label: u8 },
}

/// The feature record and the artifact disagree on the input shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaMismatch {
    #[error("artifact expects feature '{0}', which the feature record does not provide")]
    UnknownFeature(String),
    #[error("feature record column '{0}' was not part of the training schema")]
    UnusedColumn(String),
    #[error("artifact expects {expected} features, feature record provides {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("artifact returned class {0}, expected 0 (low risk) or 1 (high risk)")]
    UnknownClass(u8),
}

/// A user-supplied value fell outside what the interface controls allow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be a whole number, got {value}")]
    NotWholeNumber { field: &'static str, value: f64 },
}
