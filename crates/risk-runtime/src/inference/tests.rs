use crate::inference::{Classifier, Inference, InferenceBuilder, InferenceError};
use crate::shipped_artifact_path;
use risk_model::{
    Branch, DecisionTree, FEATURE_COLUMNS, FeatureRecord, InputError, LoadError, ModelArtifact,
    RiskLabel, SchemaMismatch, TreeNode,
};
use rstest::rstest;
use std::io::Write;
use std::sync::Arc;

fn shipped_inference() -> Inference<ModelArtifact> {
    InferenceBuilder::<ModelArtifact>::new()
        .init(shipped_artifact_path().as_path())
        .unwrap()
        .build()
        .unwrap()
}

/// Classifier that always answers with the same raw class.
struct ConstantClassifier {
    feature_names: Vec<String>,
    class: u8,
}

impl ConstantClassifier {
    fn new(class: u8) -> Self {
        Self {
            feature_names: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            class,
        }
    }
}

impl Classifier for ConstantClassifier {
    fn id(&self) -> String {
        format!("constant-{}", self.class)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classify(&self, _row: &[f64]) -> u8 {
        self.class
    }
}

#[test]
fn default_scenario_is_pinned_to_shipped_artifact() {
    let inference = shipped_inference();
    let record = FeatureRecord::new(2, 2023, 100.0, 5.0, 100);
    let prediction = inference.infer(record).run().unwrap();
    assert_eq!(prediction.label, RiskLabel::Low);
    assert_eq!(prediction.record, record);
}

#[rstest]
#[case(0.0, 0, RiskLabel::Low)]
#[case(1500.0, 0, RiskLabel::Low)]
#[case(0.0, 1000, RiskLabel::High)]
#[case(1500.0, 1000, RiskLabel::High)]
#[case(600.0, 70, RiskLabel::Low)]
#[case(600.0, 80, RiskLabel::High)]
fn slider_extremes_produce_defined_labels(
    #[case] forest: f64,
    #[case] illnesses: u32,
    #[case] expected: RiskLabel,
) {
    let inference = shipped_inference();
    let prediction = inference
        .infer(FeatureRecord::from_inputs(forest, illnesses))
        .with_domain_check()
        .run()
        .unwrap();
    assert_eq!(prediction.label, expected);
}

#[test]
fn every_grid_point_yields_a_binary_label() {
    let inference = shipped_inference();
    for forest in (0..=150).map(|step| step as f64 * 10.0) {
        for illnesses in (0..=20).map(|step| step * 50) {
            let label = inference
                .predict(&FeatureRecord::from_inputs(forest, illnesses))
                .unwrap();
            assert!(label.class() <= 1);
        }
    }
}

#[test]
fn predictions_are_deterministic() {
    let inference = shipped_inference();
    let record = FeatureRecord::from_inputs(730.0, 450);
    let first = inference.predict(&record).unwrap();
    for _ in 0..100 {
        assert_eq!(inference.predict(&record).unwrap(), first);
    }

    let reloaded = shipped_inference();
    assert_eq!(reloaded.predict(&record).unwrap(), first);
    assert_eq!(reloaded.id, inference.id);
}

#[test]
fn batch_keeps_input_order() {
    let inference = shipped_inference();
    let records = [
        FeatureRecord::from_inputs(100.0, 100),
        FeatureRecord::from_inputs(1500.0, 1000),
        FeatureRecord::from_inputs(0.0, 0),
    ];
    let labels = inference.predict_batch(&records).unwrap();
    assert_eq!(labels, vec![RiskLabel::Low, RiskLabel::High, RiskLabel::Low]);
}

#[test]
fn explanation_follows_the_tree() {
    let inference = shipped_inference();
    let explanation = inference
        .infer(FeatureRecord::from_inputs(600.0, 80))
        .explain()
        .unwrap();

    assert_eq!(explanation.label, RiskLabel::High);
    let features: Vec<&str> = explanation.steps.iter().map(|s| s.feature.as_str()).collect();
    assert_eq!(
        features,
        vec!["Forest_Cover_Loss(ha)", "Reported_Illnesses", "Year"]
    );
    assert!(explanation.steps.iter().all(|s| s.branch == Branch::Right));
}

#[test]
fn domain_check_rejects_out_of_range_values() {
    let inference = shipped_inference();
    let result = inference
        .infer(FeatureRecord::from_inputs(2000.0, 10))
        .with_domain_check()
        .run();
    assert!(matches!(
        result,
        Err(InferenceError::InvalidInput(InputError::OutOfRange { .. }))
    ));
}

#[test]
fn missing_artifact_fails_with_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = InferenceBuilder::<ModelArtifact>::new().init(dir.path().join("absent.json").as_path());
    assert!(matches!(
        result,
        Err(InferenceError::ModelInitFailed(LoadError::NotFound { .. }))
    ));
}

#[test]
fn corrupted_artifact_fails_with_load_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"format_version\": 1, \"nodes\": [").unwrap();
    let result = InferenceBuilder::<ModelArtifact>::new().init(file.path());
    assert!(matches!(
        result,
        Err(InferenceError::ModelInitFailed(LoadError::Malformed(_)))
    ));
}

#[test]
fn artifact_bytes_can_be_loaded_directly() {
    let bytes = std::fs::read(shipped_artifact_path()).unwrap();
    let inference = InferenceBuilder::<ModelArtifact>::new()
        .init(bytes.as_slice())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(inference.id, shipped_inference().id);
}

#[test]
fn differently_trained_artifact_is_refused_at_build() {
    let tree = DecisionTree::new(
        vec![
            "Zone".to_string(),
            "Year".to_string(),
            "Forest_Cover_Loss(ha)".to_string(),
            "Rainfall(mm)".to_string(),
            "Reported_Illnesses".to_string(),
        ],
        vec![0, 1],
        vec![TreeNode::Leaf { label: 0 }],
    )
    .unwrap();
    let result = InferenceBuilder::new()
        .with_model(ModelArtifact::from_tree("rainfall", tree))
        .build();
    assert!(matches!(
        result,
        Err(InferenceError::SchemaMismatch(SchemaMismatch::UnknownFeature(name))) if name == "Rainfall(mm)"
    ));
}

#[test]
fn unknown_class_from_swapped_model_is_a_schema_mismatch() {
    let inference = InferenceBuilder::new()
        .with_model(ConstantClassifier::new(3))
        .build()
        .unwrap();
    let result = inference.infer(FeatureRecord::default()).run();
    assert!(matches!(
        result,
        Err(InferenceError::SchemaMismatch(SchemaMismatch::UnknownClass(3)))
    ));
}

#[test]
fn opaque_classifier_explains_without_steps() {
    let inference = InferenceBuilder::new()
        .with_model(ConstantClassifier::new(1))
        .build()
        .unwrap();
    let explanation = inference.infer(FeatureRecord::default()).explain().unwrap();
    assert_eq!(explanation.label, RiskLabel::High);
    assert!(explanation.steps.is_empty());
}

#[test]
fn shared_model_serves_concurrent_callers() {
    let inference = Arc::new(shipped_inference());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let inference = inference.clone();
            std::thread::spawn(move || {
                inference
                    .predict(&FeatureRecord::from_inputs(i as f64 * 400.0, 900))
                    .unwrap()
            })
        })
        .collect();
    let labels: Vec<RiskLabel> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        labels,
        vec![
            RiskLabel::High,
            RiskLabel::High,
            RiskLabel::High,
            RiskLabel::High
        ]
    );
}
