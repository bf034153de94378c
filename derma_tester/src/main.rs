mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use derma_vision::core_modules::mood::ExpressionScores;
use derma_vision::live_session::FaceObservation;
use derma_vision::{
    BoundingBox, LiveFrame, LiveSession, SessionUpdate, SkinAnalyzer, VisionConfig, VisionError, validate_paths,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "derma_vision=info,derma_tester=info";

#[derive(Parser)]
#[command(name = "derma_tester", about = "Scalp upload gating and skin metrics from image files")]
struct Cli {
    /// JSON configuration file; omitted sections keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether each image shows hair and scalp.
    Validate {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Cosmetic skin metrics over a region of one image.
    Skin {
        image: PathBuf,
        /// Face box as X,Y,W,H; defaults to the whole image.
        #[arg(long, value_parser = parse_bbox)]
        bbox: Option<BoundingBox>,
        #[arg(long)]
        json: bool,
    },
    /// Replay a directory of frames through a live session.
    Session {
        dir: PathBuf,
        #[arg(long, value_parser = parse_bbox)]
        bbox: Option<BoundingBox>,
    },
}

fn parse_bbox(value: &str) -> std::result::Result<BoundingBox, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, width, height] = parts.as_slice() else {
        return Err(format!("expected X,Y,W,H, got '{value}'"));
    };
    let number = |text: &str| text.parse::<i64>().map_err(|error| format!("'{text}': {error}"));
    let (x, y, width, height) = (number(x)?, number(y)?, number(width)?, number(height)?);
    Ok(BoundingBox::new(
        i32::try_from(x).map_err(|error| error.to_string())?,
        i32::try_from(y).map_err(|error| error.to_string())?,
        u32::try_from(width).map_err(|error| error.to_string())?,
        u32::try_from(height).map_err(|error| error.to_string())?,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Logging & Argument Parsing ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    // --- 2. Configuration ---
    let config = match &cli.config {
        Some(path) => VisionConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => VisionConfig::default(),
    };

    // --- 3. Dispatch ---
    match cli.cmd {
        Commands::Validate { images, json } => run_validate(images, &config, json).await,
        Commands::Skin { image, bbox, json } => run_skin(&image, bbox, &config, json),
        Commands::Session { dir, bbox } => run_session(&dir, bbox, &config).await,
    }
}

async fn run_validate(images: Vec<PathBuf>, config: &VisionConfig, json: bool) -> Result<()> {
    let results = validate_paths(images, config.gate.clone()).await?;
    for (path, result) in &results {
        match result {
            Ok(gate) if json => println!("{}", serde_json::to_string(&render::gate_json(path, gate))?),
            Ok(gate) => println!("{}", render::gate_report(path, gate)),
            Err(error) => eprintln!("{}: {error}", path.display()),
        }
    }
    if results.iter().any(|(_, result)| result.is_err()) {
        bail!("some images could not be read");
    }
    Ok(())
}

fn run_skin(path: &Path, bbox: Option<BoundingBox>, config: &VisionConfig, json: bool) -> Result<()> {
    let frame = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let region = bbox.unwrap_or_else(|| BoundingBox::full(frame.width(), frame.height()));
    let analyzer = SkinAnalyzer::new(config.cosmetic.clone())?;
    let metrics = analyzer.analyze_region(&frame, &region)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", render::metrics_report(&metrics));
    }
    Ok(())
}

/// Frame files in name order.
fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

async fn run_session(dir: &Path, bbox: Option<BoundingBox>, config: &VisionConfig) -> Result<()> {
    // --- 1. Frame Discovery ---
    let paths = frame_paths(dir)?;
    if paths.is_empty() {
        bail!("no frames found in {}", dir.display());
    }

    // --- 2. Session Initialization ---
    let (frame_tx, frame_rx) = mpsc::channel(1);
    let mut handle = LiveSession::spawn(config.live.clone(), config.cosmetic.clone(), frame_rx)?;

    // --- 3. Frame Producer ---
    // Frames are offered at the session cadence, the way a camera would supply them.
    let pace = Duration::from_millis(config.live.interval_ms);
    let producer = tokio::spawn(async move {
        for path in paths {
            let image = match image::open(&path) {
                Ok(image) => image.to_rgba8(),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable frame");
                    continue;
                }
            };
            let bbox = bbox.unwrap_or_else(|| BoundingBox::full(image.width(), image.height()));
            let frame = LiveFrame {
                image,
                face: Some(FaceObservation {
                    bbox,
                    detection_score: 1.0,
                    expressions: Some(ExpressionScores {
                        neutral: 1.0,
                        ..ExpressionScores::default()
                    }),
                }),
            };
            if frame_tx.send(frame).await.is_err() {
                break;
            }
            tokio::time::sleep(pace).await;
        }
    });

    // --- 4. Update Loop ---
    loop {
        match handle.next_update().await {
            Ok(SessionUpdate::Reading(reading)) => println!("{}", render::reading_line(&reading)),
            Ok(SessionUpdate::NoFace { frame_id }) => println!("frame {frame_id}: no face"),
            Ok(SessionUpdate::Dropped { frame_id, reason }) => println!("frame {frame_id}: dropped ({reason})"),
            Err(VisionError::SessionClosed) => break,
            Err(error) => return Err(error.into()),
        }
    }
    producer.await?;

    // --- 5. Final Report ---
    let report = handle.finish().await?;
    println!("{}", render::session_report(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_parses() {
        assert_eq!(parse_bbox("10, 20,30,40"), Ok(BoundingBox::new(10, 20, 30, 40)));
        assert_eq!(parse_bbox("-5,0,8,8"), Ok(BoundingBox::new(-5, 0, 8, 8)));
    }

    #[test]
    fn bbox_rejects_malformed() {
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("1,2,3,x").is_err());
        assert!(parse_bbox("1,2,-3,4").is_err());
    }

    #[test]
    fn cli_shape() {
        let cli = Cli::try_parse_from(["derma_tester", "skin", "face.png", "--bbox", "1,2,3,4", "--json"])
            .expect("valid arguments");
        match cli.cmd {
            Commands::Skin { bbox, json, .. } => {
                assert_eq!(bbox, Some(BoundingBox::new(1, 2, 3, 4)));
                assert!(json);
            }
            _ => panic!("wrong subcommand"),
        }
        assert!(Cli::try_parse_from(["derma_tester", "validate"]).is_err());
    }
}
