//! demo - offline run against the canned scenario catalog
//!
//! Renders a scenario's demo result through the same paths the live CLI
//! uses, then sweeps playback time across the event timeline to show
//! which detection boxes the overlay would draw at each position. Needs
//! no credential and no network.

use anyhow::{anyhow, Result};
use clap::Parser;

use skyscan::overlay::{visible_boxes, OverlaySettings};
use skyscan::render;
use skyscan::scenarios;
use skyscan::timecode::parse_timestamp;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario id to render (see skyscan --list-scenarios).
    #[arg(long, default_value = "vessel-inspection")]
    scenario: String,
    /// Playback sweep step in seconds.
    #[arg(long, default_value_t = 1.0)]
    step: f64,
    /// Overlay visibility window in seconds.
    #[arg(long, default_value_t = 3.0)]
    window_secs: f64,
    /// Print the canned result as JSON instead of rendered text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if !(args.step > 0.0) {
        return Err(anyhow!("step must be positive"));
    }
    if !(args.window_secs > 0.0) {
        return Err(anyhow!("window-secs must be positive"));
    }

    let scenario = scenarios::find(&args.scenario)
        .ok_or_else(|| anyhow!("unknown scenario {:?}", args.scenario))?;

    stage("load canned scenario result");
    let result = scenario.demo_result();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    stage("render report");
    print!("{}", render::render_result(&result));

    stage("sweep playback timeline");
    let settings = OverlaySettings {
        window_secs: args.window_secs,
    };
    let last_event_secs = result
        .events
        .iter()
        .filter_map(|event| parse_timestamp(&event.time))
        .max()
        .unwrap_or(0);
    let sweep_end = last_event_secs as f64 + args.window_secs;

    println!();
    println!(
        "overlay sweep (window {}s, step {}s):",
        args.window_secs, args.step
    );
    let mut overlay_hits = 0usize;
    let mut position = 0.0;
    while position < sweep_end {
        let visible = visible_boxes(&result.events, position, &settings);
        if !visible.is_empty() {
            let labels: Vec<String> = visible
                .iter()
                .map(|hit| format!("{} ({})", hit.event.time, hit.event.severity.as_str()))
                .collect();
            println!("  t={:>6.1}s  {}", position, labels.join(", "));
            overlay_hits += visible.len();
        }
        position += args.step;
    }

    let boxed_events = result.events.iter().filter(|e| e.bounds.is_some()).count();

    println!();
    println!("demo summary:");
    println!("  scenario: {} ({})", scenario.name, scenario.id);
    println!("  metrics: {}", result.metrics.len());
    println!(
        "  events: {} ({} with boxes)",
        result.events.len(),
        boxed_events
    );
    println!(
        "  sweep: {}s in {}s steps, {} overlay hits",
        sweep_end, args.step, overlay_hits
    );
    println!("next steps:");
    println!("  cargo run --bin skyscan -- --list-scenarios");
    println!(
        "  cargo run --bin skyscan -- --scenario {} --video <file.mp4>",
        scenario.id
    );
    Ok(())
}

fn stage(msg: &str) {
    eprintln!("demo: {}", msg);
}
