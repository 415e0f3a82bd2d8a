//! Mission runner: build the space representation of a scene, populate the
//! flow field toward a destination, then fly the control loop over it.

use anyhow::{bail, Context, Result};
use clap::Parser;
use flownav_cli::presets;
use flownav_cli::scene::Scene;
use flownav_core::{build_space, populate_flow_field, GraphConfig, SpaceConfig};
use flownav_pilot::{fly, MissionConfig, NullActuator, Pilot, TelloActuator};
use glam::DVec3;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "flownav", about = "Flow-field navigation mission runner")]
struct Args {
    /// Scene preset (open_room, pillar, wall_gap, scatter)
    #[arg(long, default_value = "pillar", conflicts_with = "scene_file")]
    scene: String,

    /// Load the scene from a JSON file instead of a preset
    #[arg(long)]
    scene_file: Option<PathBuf>,

    /// Start position as "x,y,z" in meters
    #[arg(long, default_value = "-3.75,-3.75,1.25")]
    start: String,

    /// Destination as "x,y,z", or a named preset destination
    #[arg(long, default_value = "far_corner")]
    dest: String,

    /// Subdivision passes for the space representation
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Neighbor distance threshold for graph construction, meters
    #[arg(long, default_value_t = 1000.0)]
    dist_threshold: f64,

    /// How many closest neighbors each cell keeps
    #[arg(long, default_value_t = 8)]
    top_k: usize,

    /// Commanded speed scale, cm/s per unit of flow vector
    #[arg(long, default_value_t = 100.0)]
    speed: f64,

    /// Seconds each command is held before re-sampling
    #[arg(long, default_value_t = 1.0)]
    hold: f64,

    /// Mission timeout in seconds
    #[arg(long, default_value_t = 60.0)]
    timeout: f64,

    /// Send real commands over UDP instead of the default log-only run
    #[arg(long)]
    live: bool,

    /// Drone command address for --live
    #[arg(long, default_value = "192.168.10.1:8889")]
    tello_addr: String,
}

fn parse_vec3(raw: &str) -> Result<DVec3> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("bad coordinate {part:?}"))
        })
        .collect::<Result<_>>()?;
    if parts.len() != 3 {
        bail!("expected x,y,z, got {raw:?}");
    }
    Ok(DVec3::new(parts[0], parts[1], parts[2]))
}

fn resolve_destination(raw: &str) -> Result<DVec3> {
    if raw.contains(',') {
        parse_vec3(raw)
    } else {
        presets::destination(raw)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();

    let scene = match &args.scene_file {
        Some(path) => Scene::from_file(path)?,
        None => presets::by_name(&args.scene)?,
    };
    let start = parse_vec3(&args.start)?;
    let destination = resolve_destination(&args.dest)?;

    let space_config = SpaceConfig {
        center: scene.bounds_center,
        size: scene.bounds_size,
        max_depth: args.depth,
    };
    tracing::info!(scene = %scene.name, depth = args.depth, "building space representation");
    let mut field = build_space(&space_config, &scene)?;
    tracing::info!(
        cells = field.all_cells(false).len(),
        leaves = field.all_cells(true).len(),
        "octree built"
    );

    let graph_config = GraphConfig {
        distance_threshold: args.dist_threshold,
        top_k_neighbors: args.top_k,
    };
    populate_flow_field(&mut field, destination, &graph_config, &scene)?;
    tracing::info!(?destination, "flow field populated");

    let mission = MissionConfig {
        speed: args.speed,
        command_hold: Duration::from_secs_f64(args.hold),
        timeout: Duration::from_secs_f64(args.timeout),
    };

    let report = if args.live {
        let actuator = TelloActuator::connect(args.tello_addr.as_str())
            .with_context(|| format!("connecting to drone at {}", args.tello_addr))?;
        let mut pilot = Pilot::new(actuator, start, false);
        fly(&mut pilot, &field, destination, &mission)?
    } else {
        let mut pilot = Pilot::new(NullActuator, start, true);
        fly(&mut pilot, &field, destination, &mission)?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
