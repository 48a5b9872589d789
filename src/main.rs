use anyhow::{Context, Result, bail};
use clap::Parser;
use geo::Coord;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use trackutils::config::FileConfig;
use trackutils::domain::Track;
use trackutils::geometry::Bounds;
use trackutils::io::{TrackIo, write_npy};
use trackutils::plot::{plot_track, write_svg};

/// Inspect racetrack waypoint files
///
/// Examples:
///   # Summarize a track from ./tracks
///   trackutils reinvent_base
///
///   # Plot the waypoints and print a JSON summary
///   trackutils reinvent_base.npy --tracks-dir ~/deepracer/tracks --svg reinvent.svg --json
///
///   # Find where a car at (250cm, 80cm) is on the center line
///   trackutils reinvent_base --locate 250,80
#[derive(Parser, Debug)]
#[command(name = "trackutils")]
#[command(version, about, long_about = None)]
struct Args {
    /// Track name, with or without the .npy extension
    track: String,

    /// Path to config file (optional, auto-searches trackutils.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the waypoint files (defaults to ./tracks)
    #[arg(short = 'd', long)]
    tracks_dir: Option<PathBuf>,

    /// Write a scatter plot of the waypoints to this SVG file
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the center line in centimeters to this .npy file
    #[arg(long)]
    export_center: Option<PathBuf>,

    /// Print the track summary as JSON
    #[arg(long)]
    json: bool,

    /// Project a point given in centimeters as X,Y onto the center line
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    locate: Option<Coord<f64>>,

    /// Angle in degrees within which a projected point still counts as on a segment
    #[arg(long)]
    tolerated_angle: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct TrackSummary<'a> {
    name: &'a str,
    waypoints: usize,
    center_line_length_cm: f64,
    road_area_m2: f64,
    bounds_cm: Option<Bounds>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            FileConfig::parse(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);

    let tracks_dir = args.tracks_dir.clone().unwrap_or(file_config.tracks_dir);
    let tolerated_angle = args
        .tolerated_angle
        .unwrap_or(file_config.tolerated_angle);
    let svg_path = args.svg.clone().or(file_config.svg);

    if !(tolerated_angle > 0.0) {
        bail!("--tolerated-angle must be positive, got {}", tolerated_angle);
    }

    if verbose {
        println!("Configuration:");
        println!("  Track: {}", args.track);
        println!("  Tracks dir: {}", tracks_dir.display());
        println!("  Tolerated angle: {}°", tolerated_angle);
        if let Some(ref path) = svg_path {
            println!("  Plot: {}", path.display());
        }
        println!();
    }

    let spinner = create_spinner("Loading track waypoints...");
    let start = Instant::now();
    let track_io = TrackIo::new(&tracks_dir);
    let track = track_io.load_track(&args.track).with_context(|| {
        format!(
            "Failed to load track {} from {}",
            args.track,
            tracks_dir.display()
        )
    })?;
    spinner.finish_with_message(format!(
        "Loaded {} waypoints for {} [{:.1}s]",
        track.len(),
        track.name(),
        start.elapsed().as_secs_f32()
    ));

    let summary = TrackSummary {
        name: track.name(),
        waypoints: track.len(),
        center_line_length_cm: track.center_line_length(),
        road_area_m2: track.road_area(),
        bounds_cm: track.bounds(),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print_summary(&summary);
    }

    if let Some(ref path) = svg_path {
        let svg = plot_track(&track);
        write_svg(path, &svg).context("Failed to write SVG plot")?;
        println!("Wrote plot with {} markers to {}", svg.markers, path.display());
    }

    if let Some(ref path) = args.export_center {
        let values: Vec<f64> = track
            .center_line()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect();
        write_npy(path, &values, 2).context("Failed to export center line")?;
        println!(
            "Wrote {} center line points to {}",
            track.center_line().len(),
            path.display()
        );
    }

    if let Some(point) = args.locate {
        print_location(&track, point, tolerated_angle);
    }

    if verbose {
        println!();
        println!("Done in {:.1}s", total_start.elapsed().as_secs_f32());
    }

    Ok(())
}

fn print_summary(summary: &TrackSummary) {
    println!();
    println!("Track: {}", summary.name);
    println!("  Waypoints: {}", summary.waypoints);
    println!(
        "  Center line length: {:.2} m",
        summary.center_line_length_cm / 100.0
    );
    println!("  Road area: {:.2} m²", summary.road_area_m2);
    if let Some(ref bounds) = summary.bounds_cm {
        println!(
            "  Extent: {:.2} m x {:.2} m",
            bounds.width() / 100.0,
            bounds.height() / 100.0
        );
    }
    println!();
}

fn print_location(track: &Track, point: Coord<f64>, tolerated_angle: f64) {
    match track.closest_center_line_point(point, tolerated_angle) {
        Some(hit) => {
            println!(
                "Closest center line point to ({}, {}): ({:.3}, {:.3}) near waypoint {}, {:.2} cm away",
                point.x, point.y, hit.point.x, hit.point.y, hit.index, hit.distance
            );
        }
        None => println!("Track has no center line to project onto"),
    }
}

fn parse_point(value: &str) -> Result<Coord<f64>, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {value:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad X {x:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad Y {y:?}: {e}"))?;
    Ok(Coord { x, y })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
