use colored::Colorize;

use crate::cli::InspectArgs;
use crate::config::DashboardConfig;
use crate::logging::CANOPY_GREEN;
use crate::server::{ModelSummary, load_inference};

pub fn handle_command(args: &InspectArgs, config: &DashboardConfig) -> anyhow::Result<()> {
    let inference = load_inference(&config.model_path)?;
    let artifact = inference.model();
    let summary = ModelSummary::from_artifact(artifact);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let heading = |text: &str| text.custom_color(CANOPY_GREEN).bold();
    println!("{} {}", heading("Model:"), summary.id);
    if let Some(description) = &summary.description {
        println!("{} {description}", heading("Description:"));
    }
    if let Some(created_at) = &summary.created_at {
        println!("{} {created_at}", heading("Created:"));
    }
    println!(
        "{} {} ({} bytes)",
        heading("Source:"),
        config.model_path.display(),
        artifact.manifest().size
    );
    println!("{} {}", heading("SHA-256:"), summary.digest);
    println!("{}", heading("Features:"));
    for (idx, name) in summary.feature_names.iter().enumerate() {
        println!("  {idx}: {name}");
    }
    println!(
        "{} {} nodes, {} leaves, depth {}",
        heading("Tree:"),
        summary.node_count,
        summary.leaf_count,
        summary.depth
    );
    println!("{}", heading("Rules:"));
    for rule in artifact.tree().rules() {
        println!("  {rule}");
    }
    Ok(())
}
