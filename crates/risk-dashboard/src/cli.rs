use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::commands;
use crate::config::{ConfigOverrides, DashboardConfig};
use crate::logging::init_tracing;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// TOML configuration file, layered over the built-in defaults.
    #[arg(long, global = true, env = "RISK_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `risk_dashboard=debug`.
    #[arg(long, global = true, env = "RISK_DASHBOARD_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the dashboard over HTTP.
    Serve(ServeArgs),
    /// Classify a single scenario from the command line.
    Predict(PredictArgs),
    /// Describe the loaded model artifact.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "RISK_DASHBOARD_BIND")]
    pub bind: Option<SocketAddr>,
    /// Path to the tree model artifact.
    #[arg(long, env = "RISK_DASHBOARD_MODEL")]
    pub model: Option<PathBuf>,
    /// Directory holding figures and imagery.
    #[arg(long, env = "RISK_DASHBOARD_ASSETS")]
    pub assets: Option<PathBuf>,
    /// Section catalog file.
    #[arg(long, env = "RISK_DASHBOARD_CATALOG")]
    pub catalog: Option<PathBuf>,
    /// CSV offered for download.
    #[arg(long, env = "RISK_DASHBOARD_DATASET")]
    pub dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Forest cover loss in hectares.
    #[arg(long = "forest-loss", default_value_t = 100.0)]
    pub forest_loss_ha: f64,
    /// Number of reported illnesses.
    #[arg(long = "illnesses", default_value_t = 100)]
    pub reported_illnesses: u32,
    /// Path to the tree model artifact.
    #[arg(long, env = "RISK_DASHBOARD_MODEL")]
    pub model: Option<PathBuf>,
    /// Print the splits visited on the way to the label.
    #[arg(long)]
    pub explain: bool,
    /// Emit JSON instead of formatted text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the tree model artifact.
    #[arg(long, env = "RISK_DASHBOARD_MODEL")]
    pub model: Option<PathBuf>,
    /// Emit JSON instead of formatted text.
    #[arg(long)]
    pub json: bool,
}

impl ServeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind,
            model_path: self.model.clone(),
            asset_root: self.assets.clone(),
            catalog_path: self.catalog.clone(),
            dataset_path: self.dataset.clone(),
        }
    }
}

fn model_override(model: &Option<PathBuf>) -> ConfigOverrides {
    ConfigOverrides {
        model_path: model.clone(),
        ..Default::default()
    }
}

pub fn cli_main() -> anyhow::Result<()> {
    run(CliArgs::parse())
}

pub fn run(args: CliArgs) -> anyhow::Result<()> {
    init_tracing(args.log_level.as_deref())?;
    let config_path = args.config.as_deref();

    match args.command {
        Commands::Serve(serve_args) => {
            let config = DashboardConfig::resolve(config_path, &serve_args.overrides())?;
            commands::serve::handle_command(config)
        }
        Commands::Predict(predict_args) => {
            let config = DashboardConfig::resolve(config_path, &model_override(&predict_args.model))?;
            commands::predict::handle_command(&predict_args, &config)
        }
        Commands::Inspect(inspect_args) => {
            let config = DashboardConfig::resolve(config_path, &model_override(&inspect_args.model))?;
            commands::inspect::handle_command(&inspect_args, &config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_defaults_match_form_defaults() {
        let args = CliArgs::try_parse_from(["risk-dashboard", "predict"]).unwrap();
        match args.command {
            Commands::Predict(predict) => {
                assert_eq!(predict.forest_loss_ha, 100.0);
                assert_eq!(predict.reported_illnesses, 100);
                assert!(!predict.explain);
                assert!(!predict.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_flags_become_overrides() {
        let args = CliArgs::try_parse_from([
            "risk-dashboard",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--model",
            "/srv/tree.json",
            "--config",
            "dashboard.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("dashboard.toml")));
        let Commands::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        let overrides = serve.overrides();
        assert_eq!(overrides.bind, Some("0.0.0.0:9000".parse().unwrap()));
        assert_eq!(overrides.model_path, Some(PathBuf::from("/srv/tree.json")));
        assert_eq!(overrides.asset_root, None);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["risk-dashboard"]).is_err());
    }

    #[test]
    fn malformed_bind_address_is_rejected() {
        assert!(CliArgs::try_parse_from(["risk-dashboard", "serve", "--bind", "nowhere"]).is_err());
    }
}
