//! Invocation of the pre-trained environmental risk classifier.
//!
//! The serving side owns an [`Inference`] handle and passes it explicitly to
//! whatever needs a prediction; there is no process-wide model.
pub mod inference;

pub use inference::{
    Classifier, Explanation, Inference, InferenceBuilder, InferenceError, Init,
    LoadedInferenceBuilder, Prediction, PredictionJob,
};
pub use risk_model::{FeatureRecord, ModelArtifact, RiskLabel};

/// Path of the artifact shipped with the repository, for tests.
#[cfg(test)]
pub(crate) fn shipped_artifact_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/model/tree_model.json")
}
