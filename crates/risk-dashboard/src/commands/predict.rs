use colored::Colorize;
use risk_model::{Branch, FeatureRecord, RiskLabel};
use risk_runtime::{Explanation, Prediction};

use crate::cli::PredictArgs;
use crate::config::DashboardConfig;
use crate::logging::CANOPY_GREEN;
use crate::server::load_inference;

/// Runs the scenario through the same domain check as the dashboard form.
pub(crate) fn classify(args: &PredictArgs, config: &DashboardConfig) -> anyhow::Result<Explanation> {
    let inference = load_inference(&config.model_path)?;
    let record = FeatureRecord::from_inputs(args.forest_loss_ha, args.reported_illnesses);
    Ok(inference.infer(record).with_domain_check().explain()?)
}

pub fn handle_command(args: &PredictArgs, config: &DashboardConfig) -> anyhow::Result<()> {
    let explanation = classify(args, config)?;

    if args.json {
        let json = if args.explain {
            serde_json::to_string_pretty(&explanation)?
        } else {
            serde_json::to_string_pretty(&Prediction {
                record: explanation.record,
                label: explanation.label,
            })?
        };
        println!("{json}");
        return Ok(());
    }

    if args.explain {
        for step in &explanation.steps {
            println!(
                "  node {:>2}  {} = {} {} {}",
                step.node,
                step.feature,
                step.value,
                match step.branch {
                    Branch::Left => "<=",
                    Branch::Right => ">",
                },
                step.threshold
            );
        }
    }
    print_outcome(explanation.label, &explanation.record);
    Ok(())
}

fn print_outcome(label: RiskLabel, record: &FeatureRecord) {
    println!(
        "{} forest loss {} ha, {} reported illnesses (zone {}, year {}, {} km to mines)",
        "Scenario:".custom_color(CANOPY_GREEN).bold(),
        record.forest_cover_loss_ha,
        record.reported_illnesses,
        record.zone,
        record.year,
        record.distance_to_mines_km
    );
    let headline = if label.is_high() {
        label.headline().red().bold()
    } else {
        label.headline().green().bold()
    };
    println!("{headline}");
    println!("{}", label.message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_model::{InputError, LoadError};
    use risk_runtime::InferenceError;
    use rstest::rstest;
    use std::path::Path;

    fn shipped_config() -> DashboardConfig {
        DashboardConfig {
            model_path: Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../../assets/model/tree_model.json"),
            ..Default::default()
        }
    }

    fn args(forest_loss_ha: f64, reported_illnesses: u32) -> PredictArgs {
        PredictArgs {
            forest_loss_ha,
            reported_illnesses,
            model: None,
            explain: false,
            json: false,
        }
    }

    #[test]
    fn default_scenario_is_low_risk() {
        let explanation = classify(&args(100.0, 100), &shipped_config()).unwrap();
        assert_eq!(explanation.label, RiskLabel::Low);
        assert_eq!(explanation.label.headline(), "Low Risk Zone");
        assert_eq!(explanation.record.zone, 2);
        assert_eq!(explanation.record.year, 2023);
    }

    #[rstest]
    #[case(1500.0, 1000, RiskLabel::High)]
    #[case(600.0, 70, RiskLabel::Low)]
    #[case(600.0, 80, RiskLabel::High)]
    fn labels_match_the_dashboard(
        #[case] forest: f64,
        #[case] illnesses: u32,
        #[case] expected: RiskLabel,
    ) {
        let explanation = classify(&args(forest, illnesses), &shipped_config()).unwrap();
        assert_eq!(explanation.label, expected);
    }

    #[test]
    fn out_of_range_forest_loss_is_invalid_input() {
        let err = classify(&args(5000.0, 100), &shipped_config()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InferenceError>(),
            Some(InferenceError::InvalidInput(InputError::OutOfRange { .. }))
        ));
        assert!(handle_command(&args(5000.0, 100), &shipped_config()).is_err());
    }

    #[test]
    fn missing_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            model_path: dir.path().join("absent.json"),
            ..Default::default()
        };
        let err = handle_command(&args(100.0, 100), &config).unwrap_err();
        assert!(err.chain().any(|cause| matches!(
            cause.downcast_ref::<LoadError>(),
            Some(LoadError::NotFound { .. })
        )));
    }

    #[test]
    fn json_and_explain_output_succeed() {
        let mut explained = args(100.0, 100);
        explained.explain = true;
        explained.json = true;
        assert!(handle_command(&explained, &shipped_config()).is_ok());
        explained.json = false;
        assert!(handle_command(&explained, &shipped_config()).is_ok());
    }
}
