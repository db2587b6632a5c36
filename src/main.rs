//! Conquest Map - headless runner
//!
//! Loads a map, plays a number of random ticks against the renderer and
//! writes the resulting images and region data to disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;

use conquest_map::core::config::AppConfig;
use conquest_map::core::error::Result;
use conquest_map::core::types::{PixelCoord, RegionId};
use conquest_map::map::loader::load_map;
use conquest_map::render::{CompositeRenderer, ImageRequest};
use conquest_map::sim::{SceneEvent, SimulationDriver};

/// Render a territory map after a run of random game events
#[derive(Parser, Debug)]
#[command(name = "conquest-map")]
#[command(about = "Render territory map composites and attack overlays")]
struct Args {
    /// Map name; reads <name>.gif (or .png) and <name>.map
    #[arg(default_value = "world")]
    map: String,

    /// Directory holding the map files
    #[arg(long, default_value = "maps")]
    maps: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of random ticks to play
    #[arg(long, default_value_t = 20)]
    ticks: u32,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Pace ticks at the configured interval instead of running flat out
    #[arg(long)]
    live: bool,

    /// Also write the hover preview for this pixel
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    hover: Option<Vec<u32>>,
}

/// One entry of regions.json
#[derive(Serialize)]
struct RegionRecord {
    id: RegionId,
    centroid: Option<PixelCoord>,
    key_points: Vec<PixelCoord>,
    pixels: usize,
    neighbors: Vec<RegionId>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conquest_map=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let map = load_map(&args.maps, &args.map)?;
    let mut renderer = CompositeRenderer::new(map, config.render.clone());
    let mut driver = SimulationDriver::new(config.simulation.clone())?;

    let mut events: Vec<SceneEvent> = Vec::new();
    driver.populate(&mut renderer, &mut events)?;
    for _ in 0..args.ticks {
        if args.live {
            std::thread::sleep(driver.tick_interval());
        }
        driver.tick(&mut renderer, &mut events)?;
    }
    tracing::info!(
        seed = driver.seed(),
        ticks = args.ticks,
        events = events.len(),
        "simulation finished"
    );

    fs::create_dir_all(&args.out)?;
    write_images(&renderer, &driver, &args)?;
    write_regions(&renderer, &args.out)?;
    fs::write(
        args.out.join("events.json"),
        serde_json::to_string_pretty(&events)?,
    )?;

    println!(
        "Wrote {} attack overlays for map '{}' to {}",
        driver.attacks().len(),
        args.map,
        args.out.display()
    );
    Ok(())
}

fn write_images(
    renderer: &CompositeRenderer,
    driver: &SimulationDriver,
    args: &Args,
) -> Result<()> {
    renderer
        .request(&ImageRequest::background())?
        .save(args.out.join("background.png"))?;

    if let Some([x, y]) = args.hover.as_deref().and_then(|v| <[u32; 2]>::try_from(v).ok()) {
        renderer
            .request(&ImageRequest::hover(x, y))?
            .save(args.out.join("hover.png"))?;
    }

    for &(attacker, defender) in driver.attacks() {
        let Some(color) = renderer
            .owner_of(attacker)
            .and_then(|owner| renderer.player_color(owner))
        else {
            continue;
        };
        renderer
            .request(&ImageRequest::attack(attacker, defender, color))?
            .save(args.out.join(format!("attack-{}-{}.png", attacker, defender)))?;
    }
    Ok(())
}

fn write_regions(renderer: &CompositeRenderer, out: &Path) -> Result<()> {
    let map = renderer.region_map();
    let records: Vec<RegionRecord> = map
        .regions()
        .map(|region| RegionRecord {
            id: region.id,
            centroid: region.centroid,
            key_points: region.key_points.clone(),
            pixels: region.pixel_count,
            neighbors: map.neighbors_of(region.id).to_vec(),
        })
        .collect();

    fs::write(out.join("regions.json"), serde_json::to_string_pretty(&records)?)?;
    Ok(())
}
