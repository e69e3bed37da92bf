use super::classifier::Classifier;
use super::error::InferenceError;
use super::init::Init;
use super::job::PredictionJob;
use risk_model::{FeatureRecord, RiskLabel};
use std::marker::PhantomData;
use std::sync::Arc;

/// A loaded classifier bound to the [`FeatureRecord`] schema.
///
/// The model is held behind an [`Arc`] and never mutated, so one handle can
/// serve any number of concurrent callers.
pub struct Inference<M> {
    pub id: String,
    model: Arc<M>,
}

impl<M: Classifier> Inference<M> {
    pub(crate) fn new(model: Arc<M>) -> Self {
        Self {
            id: model.id(),
            model,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Starts a prediction for `record`; finish it with
    /// [`PredictionJob::run`] or [`PredictionJob::explain`].
    pub fn infer(&self, record: FeatureRecord) -> PredictionJob<'_, M> {
        PredictionJob::new(self, record)
    }

    /// Label for a single record, without domain checks.
    pub fn predict(&self, record: &FeatureRecord) -> Result<RiskLabel, InferenceError> {
        let row = record.row_for(self.model.feature_names())?;
        let class = self.model.classify(&row);
        let label = RiskLabel::try_from(class)?;
        log::debug!("[{}] {record:?} -> {label}", self.id);
        Ok(label)
    }

    /// One label per record, in input order. Stops at the first failure.
    pub fn predict_batch(&self, records: &[FeatureRecord]) -> Result<Vec<RiskLabel>, InferenceError> {
        records.iter().map(|record| self.predict(record)).collect()
    }
}

pub struct InferenceBuilder<M> {
    phantom_data: PhantomData<M>,
}

impl<M: Classifier> Default for InferenceBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Classifier> InferenceBuilder<M> {
    pub fn new() -> Self {
        Self {
            phantom_data: Default::default(),
        }
    }

    pub fn init<InitArgs>(self, args: &InitArgs) -> Result<LoadedInferenceBuilder<M>, InferenceError>
    where
        M: Init<InitArgs>,
        InitArgs: ?Sized,
    {
        let model = M::init(args)?;
        Ok(self.with_model(model))
    }

    pub fn with_model(self, model: M) -> LoadedInferenceBuilder<M> {
        self.with_shared_model(Arc::new(model))
    }

    pub fn with_shared_model(self, model: Arc<M>) -> LoadedInferenceBuilder<M> {
        LoadedInferenceBuilder { model }
    }
}

pub struct LoadedInferenceBuilder<M> {
    model: Arc<M>,
}

impl<M: Classifier> LoadedInferenceBuilder<M> {
    /// Binds the model to the feature record schema.
    ///
    /// A model trained on different columns is refused here rather than on
    /// the first request.
    pub fn build(self) -> Result<Inference<M>, InferenceError> {
        FeatureRecord::default().row_for(self.model.feature_names())?;
        let inference = Inference::new(self.model);
        log::info!("Inference ready for model {}", inference.id);
        Ok(inference)
    }
}
