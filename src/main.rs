//! Pose piano: replays recorded or synthesised keypoint sessions through the
//! gesture engine and reports how well the melody was played.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use pose_piano::{
    app::PianoApp,
    audio::LoggingAudio,
    config::{Config, EXAMPLE_CONFIG},
    session::{synthesize_performance, Session},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session to replay (YAML)
    #[arg(short, long)]
    session: Option<String>,

    /// Synthesise a perfect performance of this many notes of the melody
    #[arg(long, value_name = "NOTES", num_args = 0..=1, default_missing_value = "48")]
    demo: Option<usize>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Mirror coordinates horizontally (front camera)
    #[arg(long)]
    flip: bool,

    /// Sensor rotation in degrees
    #[arg(long)]
    rotation: Option<f64>,

    /// Enable wrist stroke detection
    #[arg(long)]
    strokes: bool,

    /// Write the example configuration to this path and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("Failed to write {path}"))?;
        info!("Example configuration written to {}", path);
        return Ok(());
    }

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if args.flip {
        config.display.flip = true;
    }
    if let Some(rotation) = args.rotation {
        config.display.rotation_degrees = rotation;
    }
    if args.strokes {
        config.gestures.stroke_detection = true;
    }
    config.validate().context("Invalid configuration")?;

    let session = match (&args.session, args.demo) {
        (Some(path), _) => {
            info!("Loading session from: {}", path);
            Session::from_file(path).with_context(|| format!("Failed to load session {path}"))?
        }
        (None, Some(notes)) => {
            info!("Synthesising a {}-note performance", notes);
            synthesize_performance(&config, notes)?
        }
        (None, None) => bail!("Nothing to play: pass --session <FILE> or --demo"),
    };

    let mut app = PianoApp::new(&config, Box::new(LoggingAudio))?;
    let summary = app.run(&session);
    println!("{summary}");

    Ok(())
}
