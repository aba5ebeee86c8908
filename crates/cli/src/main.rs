mod config;
mod courts;
mod recency;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use courtmap_shared::{
    config_for, ClusterBuilder, Mode, ModeConfig, ScreenSize, ViewportRegion,
    DEFAULT_MAX_ITERATIONS,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::Settings;

#[derive(Parser)]
#[command(author, version, about = "Screen-space clustering of court map markers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Cluster courts for a single viewport")]
    Cluster {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long, allow_hyphen_values = true, help = "Visible latitude span in degrees")]
        lat_delta: f64,
        #[arg(long, allow_hyphen_values = true, help = "Visible longitude span in degrees")]
        lng_delta: f64,
    },
    #[command(about = "Cluster a sequence of viewports and print only the newest result")]
    Replay {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long, help = "JSON array of viewport regions, oldest first")]
        regions: PathBuf,
    },
    #[command(about = "Print pin geometry for every map mode")]
    Modes,
}

#[derive(Args)]
struct EngineArgs {
    #[arg(long, help = "JSON array of courts [env: COURTMAP_COURTS]")]
    courts: Option<PathBuf>,
    #[arg(long, default_value = "activity")]
    mode: Mode,
    #[arg(
        long,
        value_parser = config::parse_pixels,
        help = "Screen width in pixels [env: COURTMAP_SCREEN_WIDTH]"
    )]
    screen_width: Option<f64>,
    #[arg(
        long,
        value_parser = config::parse_pixels,
        help = "Screen height in pixels [env: COURTMAP_SCREEN_HEIGHT]"
    )]
    screen_height: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
}

impl EngineArgs {
    fn builder(&self, settings: &Settings) -> ClusterBuilder {
        let screen = ScreenSize::new(
            self.screen_width.unwrap_or(settings.screen.width),
            self.screen_height.unwrap_or(settings.screen.height),
        );
        ClusterBuilder::new(screen).max_iterations(self.max_iterations)
    }

    fn courts_path(&self, settings: &Settings) -> PathBuf {
        self.courts
            .clone()
            .unwrap_or_else(|| settings.courts_path.clone())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeRow {
    mode: Mode,
    #[serde(flatten)]
    config: ModeConfig,
    effective_radius_x: f64,
    effective_radius_y: f64,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_filter);

    match cli.command {
        Command::Cluster {
            engine,
            lat_delta,
            lng_delta,
        } => {
            let points = courts::load_courts(&engine.courts_path(&settings))?;
            let region = ViewportRegion::span(lat_delta, lng_delta);
            let partition = engine.builder(&settings).build(&points, region, engine.mode);
            if !partition.converged {
                tracing::warn!(
                    passes = partition.passes,
                    "Partition is a best-effort result; raise --max-iterations to merge further"
                );
            }
            print_json(&partition)
        }
        Command::Replay { engine, regions } => {
            let points = Arc::new(courts::load_courts(&engine.courts_path(&settings))?);
            let regions = courts::load_regions(&regions)?;
            let builder = engine.builder(&settings);
            match recency::cluster_latest(points, &regions, builder, engine.mode).await? {
                Some(latest) => {
                    tracing::info!(
                        generation = latest.generation,
                        lat_delta = latest.region.latitude_delta,
                        lng_delta = latest.region.longitude_delta,
                        markers = latest.partition.items.len(),
                        "Newest viewport clustered"
                    );
                    print_json(&latest.partition)
                }
                None => {
                    tracing::warn!("No viewport regions to replay");
                    Ok(())
                }
            }
        }
        Command::Modes => {
            let rows: Vec<ModeRow> = Mode::ALL
                .into_iter()
                .map(|mode| {
                    let config = config_for(mode);
                    let (rx, ry) = config.effective_radii();
                    ModeRow {
                        mode,
                        config,
                        effective_radius_x: rx,
                        effective_radius_y: ry,
                    }
                })
                .collect();
            print_json(&rows)
        }
    }
}
