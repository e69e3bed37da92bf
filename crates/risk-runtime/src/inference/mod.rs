//! Inference runtime module.
//!
//! The flow is:
//! 1. Load a model with [`InferenceBuilder::init`] or hand one over with
//!    [`InferenceBuilder::with_model`].
//! 2. Bind it to the feature record schema with
//!    [`LoadedInferenceBuilder::build`], producing an [`Inference`].
//! 3. Predict with [`Inference::infer`] followed by `.run()` or `.explain()`,
//!    or in bulk with [`Inference::predict_batch`].
mod classifier;
mod core;
mod error;
mod init;
mod job;

#[cfg(test)]
mod tests;

pub use classifier::Classifier;
pub use self::core::*;
pub use error::InferenceError;
pub use init::Init;
pub use job::{Explanation, Prediction, PredictionJob};
