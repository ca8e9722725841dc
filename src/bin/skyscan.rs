//! skyscan - schema-constrained drone footage analysis CLI
//!
//! Picks a scenario prompt, sends it to the analysis service with the
//! response schema attached, and renders the validated result: report
//! text, metric bars, and the event timeline.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use skyscan::config::SkyscanConfig;
use skyscan::render;
use skyscan::scenarios;

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario id to run (see --list-scenarios).
    #[arg(long, value_name = "ID", required_unless_present = "list_scenarios")]
    scenario: Option<String>,
    /// Path to the video under analysis. Only the file name is sent; the
    /// video bytes never leave this machine.
    #[arg(long, value_name = "PATH", required_unless_present = "list_scenarios")]
    video: Option<PathBuf>,
    /// Print the validated result as JSON on stdout.
    #[arg(long)]
    json: bool,
    /// Override the overlay visibility window in seconds.
    #[arg(long, value_name = "SECS")]
    window_secs: Option<f64>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, value_enum, default_value = "auto", value_name = "MODE")]
    ui: ui::UiMode,
    /// List available scenarios and exit.
    #[arg(long)]
    list_scenarios: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_scenarios {
        for scenario in scenarios::scenarios() {
            println!("{:<26}  {}", scenario.id, scenario.description);
        }
        return Ok(());
    }

    let ui = ui::Ui::detect(args.ui);

    let scenario_id = args
        .scenario
        .as_deref()
        .ok_or_else(|| anyhow!("--scenario is required"))?;
    let scenario = scenarios::find(scenario_id)
        .ok_or_else(|| anyhow!("unknown scenario {scenario_id:?} (see --list-scenarios)"))?;
    let video = args
        .video
        .as_ref()
        .ok_or_else(|| anyhow!("--video is required"))?;
    let video_name = video
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("video path has no file name: {}", video.display()))?;
    if !video.exists() {
        log::warn!(
            "video file {} not found locally; only the name is sent",
            video.display()
        );
    }

    let mut config = {
        let _stage = ui.stage("Load configuration");
        SkyscanConfig::load()?
    };
    if let Some(secs) = args.window_secs {
        if !(secs > 0.0) {
            return Err(anyhow!("--window-secs must be positive"));
        }
        config.overlay.window_secs = secs;
    }
    log::info!(
        "scenario {} against {} (model {})",
        scenario.id,
        video_name,
        config.model
    );

    let result = {
        let stage = ui.stage("Generate analysis report");
        match skyscan::generate_analysis_report(scenario.prompt, &video_name) {
            Ok(result) => result,
            Err(err) => {
                stage.fail();
                log::error!("analysis failed: {err}");
                return Err(anyhow!("{}", err.user_message()));
            }
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}: {}", scenario.name, video_name);
    println!();
    print!("{}", render::render_result(&result));

    let previews: Vec<String> = result
        .events
        .iter()
        .filter_map(|event| {
            // only events with a parseable timestamp and a renderable box
            skyscan::parse_timestamp(&event.time)?;
            let bounds = event.bounds.as_ref()?.clamped()?;
            Some(format!(
                "  at {} (+{}s): box x={:.2} y={:.2} w={:.2} h={:.2}",
                event.time,
                config.overlay.window_secs,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height
            ))
        })
        .collect();
    if !previews.is_empty() {
        println!();
        println!("Overlay Preview");
        println!("---------------");
        for line in &previews {
            println!("{line}");
        }
    }
    Ok(())
}
