use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use slotscape::{ShowcaseApp, ShowcaseConfig};

/// Places models onto the slots of a base scene and shows them in a window
#[derive(Parser, Debug)]
#[command(name = "slotscape", version, about)]
struct Args {
    /// TOML file with the base scene, placements and viewer settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the base scene identifier from the config
    #[arg(short, long)]
    base: Option<String>,

    /// Hides the ImGui overlay
    #[arg(long)]
    no_ui: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ShowcaseConfig::load(path)?,
        None => ShowcaseConfig::default(),
    };
    if let Some(base) = args.base {
        config.base = base;
    }
    if args.no_ui {
        config.window.show_ui = false;
    }

    log::info!(
        "Showcasing '{}' with {} placement(s)",
        config.base,
        config.placements.len()
    );

    ShowcaseApp::new(config)?.run()
}
