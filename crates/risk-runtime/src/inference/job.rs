use super::classifier::Classifier;
use super::core::Inference;
use super::error::InferenceError;
use risk_model::{DecisionStep, FeatureRecord, RiskLabel};
use serde::Serialize;

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub record: FeatureRecord,
    pub label: RiskLabel,
}

/// A prediction together with the decision path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub record: FeatureRecord,
    pub label: RiskLabel,
    pub steps: Vec<DecisionStep>,
}

pub struct PredictionJob<'a, M> {
    inference: &'a Inference<M>,
    record: FeatureRecord,
    check_domains: bool,
}

impl<'a, M: Classifier> PredictionJob<'a, M> {
    pub(crate) fn new(inference: &'a Inference<M>, record: FeatureRecord) -> Self {
        Self {
            inference,
            record,
            check_domains: false,
        }
    }

    /// Reject values outside the interface control ranges before invoking
    /// the model.
    pub fn with_domain_check(mut self) -> Self {
        self.check_domains = true;
        self
    }

    pub fn run(self) -> Result<Prediction, InferenceError> {
        self.checked()?;
        let label = self.inference.predict(&self.record)?;
        Ok(Prediction {
            record: self.record,
            label,
        })
    }

    pub fn explain(self) -> Result<Explanation, InferenceError> {
        self.checked()?;
        let model = self.inference.model();
        let row = self.record.row_for(model.feature_names())?;
        let (steps, class) = model.decision_path(&row);
        Ok(Explanation {
            record: self.record,
            label: RiskLabel::try_from(class)?,
            steps,
        })
    }

    fn checked(&self) -> Result<(), InferenceError> {
        if self.check_domains {
            self.record.validate_domains()?;
        }
        Ok(())
    }
}
