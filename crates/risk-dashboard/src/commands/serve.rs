use anyhow::Context as _;

use crate::config::DashboardConfig;
use crate::server::{self, AppState};
use crate::{print_info, print_success, print_warn};

/// Paths the dashboard can run without, but which leave parts of it broken.
fn missing_asset_warnings(config: &DashboardConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if !config.asset_root.is_dir() {
        warnings.push(format!(
            "Asset root {} does not exist, figures will not load",
            config.asset_root.display()
        ));
    }
    if !config.dataset_path.is_file() {
        warnings.push(format!(
            "Dataset {} does not exist, downloads will fail",
            config.dataset_path.display()
        ));
    }
    warnings
}

pub fn handle_command(config: DashboardConfig) -> anyhow::Result<()> {
    let state = AppState::load(&config)?;
    for warning in missing_asset_warnings(&config) {
        print_warn!("{warning}");
    }
    print_info!(
        "Model {} loaded, {} sections in catalog",
        state.inference.id,
        state.catalog.sections.len()
    );
    print_success!("Dashboard available at http://{}", config.bind);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(server::serve(&config, state))
}
