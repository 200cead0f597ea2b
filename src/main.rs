//! Vantage - model ingestion and live visualization
//!
//! Loads one or more model files (OBJ, STL, glTF/GLB), derives their
//! statistics, frames them in the canonical viewing box, and drives the
//! visualization pipeline. Window ownership and actual drawing belong to an
//! embedding renderer; this binary exercises the pipeline headlessly and
//! reports what it would draw.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use vantage_view::{format_file_size, ModelStats};

mod settings;
mod viewer;

use settings::ViewerSettings;
use viewer::Viewer;

struct CliArgs {
    models: Vec<PathBuf>,
    mode: Option<String>,
    stats_json: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs {
        models: Vec::new(),
        mode: None,
        stats_json: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--mode" => {
                args.mode = Some(
                    it.next()
                        .ok_or_else(|| anyhow::anyhow!("--mode needs a value"))?,
                );
            }
            "--stats-json" => args.stats_json = true,
            "--help" | "-h" => {
                println!("usage: vantage [--mode <solid|wireframe|vertices|faces>] [--stats-json] <model>...");
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                anyhow::bail!("unknown flag: {other}");
            }
            _ => args.models.push(PathBuf::from(arg)),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let args = parse_args()?;
    if args.models.is_empty() {
        println!("usage: vantage [--mode <solid|wireframe|vertices|faces>] [--stats-json] <model>...");
        return Ok(());
    }

    let settings = ViewerSettings::load();
    let mut viewer = Viewer::new(&settings);

    if let Some(mode) = &args.mode {
        viewer.queue_mode(mode.parse()?);
    }
    for path in &args.models {
        viewer.request_load(path.clone());
    }

    // Cooperative tick loop at ~60 Hz until every requested load resolves.
    // Loads never block a tick; they land whenever they finish.
    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    let mut last = tokio::time::Instant::now();
    while viewer.pending_loads() > 0 {
        ticker.tick().await;
        let now = tokio::time::Instant::now();
        viewer.tick((now - last).as_secs_f32());
        last = now;
    }

    let frame = viewer.tick(0.0);
    info!(
        "frame: {} draw items, mode {}, camera {}",
        frame.items.len(),
        frame.mode,
        if frame.camera.is_some() {
            "fitted"
        } else {
            "unchanged"
        }
    );

    if let Some(stats) = viewer.stats() {
        if args.stats_json {
            println!("{}", serde_json::to_string_pretty(stats)?);
        } else {
            print_stats(stats);
        }
    }

    Ok(())
}

/// The info-panel view of the installed model.
fn print_stats(stats: &ModelStats) {
    info!("format:        {}", stats.format);
    info!("file:          {}", stats.file_name);
    info!("size:          {}", format_file_size(stats.file_size));
    info!("vertices:      {}", stats.vertices);
    info!("edges (~):     {}", stats.edges);
    info!("faces:         {}", stats.faces);
    info!("triangles:     {}", stats.triangles);
    info!("materials:     {}", stats.material_count);
    info!(
        "extents:       {:.2} x {:.2} x {:.2}",
        stats.extents.x, stats.extents.y, stats.extents.z
    );
    info!("volume (~):    {:.2}", stats.volume);
    info!("area (~):      {:.2}", stats.surface_area);
}
