//! Offline export of a saved floor plan to SVG.

use boothplan_core::FloorPlanConfig;
use boothplan_render::{RenderOptions, render, to_svg};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "boothplan-export", version, about = "Render a saved floor plan to SVG")]
struct Args {
    /// Floor plan document (JSON).
    config: PathBuf,

    /// Render the public view (no vendor names, no grid).
    #[arg(long)]
    public: bool,

    /// Output file; stdout when omitted.
    #[arg(long, short)]
    out: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), String> {
    let json = std::fs::read_to_string(&args.config)
        .map_err(|e| format!("Failed to read {}: {}", args.config.display(), e))?;
    let config = FloorPlanConfig::from_json(&json)
        .map_err(|e| format!("Failed to parse {}: {}", args.config.display(), e))?;

    let options = if args.public {
        RenderOptions::public()
    } else {
        RenderOptions::editor()
    };
    let drawing = render(&config, &options);
    log::info!(
        "Rendered {} ({} booths, {} items)",
        config.show_id,
        config.len(),
        drawing.items.len()
    );

    let svg = to_svg(&drawing);
    match &args.out {
        Some(path) => std::fs::write(path, svg)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e)),
        None => {
            print!("{svg}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("boothplan-export: {e}");
            ExitCode::FAILURE
        }
    }
}
