use risk_model::{DecisionStep, ModelArtifact};

/// Anything that maps a row of feature values to a raw class.
///
/// Rows are laid out in the order of [`Classifier::feature_names`].
pub trait Classifier: Send + Sync + 'static {
    /// Stable identifier used in logs and API responses.
    fn id(&self) -> String;

    fn feature_names(&self) -> &[String];

    fn classify(&self, row: &[f64]) -> u8;

    /// Splits visited on the way to the predicted class. Opaque models
    /// report no steps.
    fn decision_path(&self, row: &[f64]) -> (Vec<DecisionStep>, u8) {
        (Vec::new(), self.classify(row))
    }
}

impl Classifier for ModelArtifact {
    fn id(&self) -> String {
        let manifest = self.manifest();
        let short = manifest.digest.get(..12).unwrap_or(&manifest.digest);
        format!("{}@{short}", manifest.name)
    }

    fn feature_names(&self) -> &[String] {
        self.tree().feature_names()
    }

    fn classify(&self, row: &[f64]) -> u8 {
        self.tree().predict_row(row)
    }

    fn decision_path(&self, row: &[f64]) -> (Vec<DecisionStep>, u8) {
        self.tree().decision_path(row)
    }
}
