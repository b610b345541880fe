//! Run the feature pipeline on one scan and print the features as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Scan recorded as JSON (LaserScan fields), default model
//! detect_features --scan scan.json
//!
//! # Custom model
//! detect_features --scan scan.json --model configs/feature_model.yaml
//!
//! # Synthetic scene
//! detect_features --demo doorway --pretty
//! ```

use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use drishti::sim::WallScene;
use drishti::{FeatureModel, LaserScan, SyncDetector};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Demo {
    /// Room wall with a doorway onto a recess
    Doorway,
    /// Corridor with a side branch
    TJunction,
}

#[derive(Parser)]
#[command(name = "detect-features")]
#[command(about = "Extract navigational features from a 2D laser scan")]
struct Args {
    /// Scan file (JSON)
    #[arg(short, long, conflicts_with = "demo", required_unless_present = "demo")]
    scan: Option<PathBuf>,

    /// Feature model file (YAML); defaults to configs/feature_model.yaml
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Use a simulated scene instead of a scan file
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// Beams in a simulated scan over a 180° sweep
    #[arg(long, default_value = "181")]
    beams: usize,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let model = match &args.model {
        Some(path) => FeatureModel::load(path)?,
        None => FeatureModel::load_default()?,
    };
    if let Err(e) = model.validate() {
        warn!("Incomplete feature model: {}", e);
    }

    let scan = load_scan(args)?;
    info!(
        "Scan: {} beams over [{:.3}, {:.3}] rad",
        scan.len(),
        scan.angle_min,
        scan.angle_max
    );

    let mut detector = SyncDetector::new(model);
    detector.update_features(&scan)?;

    let snapshot = detector.snapshot();
    info!(
        "{} lines, {} doors, {} branches, {} corners, hallway={}",
        snapshot.lines.len(),
        snapshot.doors.len(),
        snapshot.intersections.len(),
        snapshot.right_angles.len(),
        snapshot.in_hallway
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    println!("{}", json);
    Ok(())
}

fn load_scan(args: &Args) -> Result<LaserScan, Box<dyn std::error::Error>> {
    if let Some(demo) = args.demo {
        let scene = match demo {
            Demo::Doorway => WallScene::doorway(),
            Demo::TJunction => WallScene::t_junction(),
        };
        return Ok(scene.scan(0.0, PI, args.beams, 10.0));
    }

    match &args.scan {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Err("either --scan or --demo is required".into()),
    }
}
