//! Headless painting demo.
//!
//! Loads a level (or the built-in demo level), walks a scripted player past
//! the paintings and logs every ripple the walk sets off.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use ripplepaint::floor::{SURFACE_PAINTING_WARP_LEFT, SURFACE_PAINTING_WOBBLE_LEFT, SURFACE_PAINTING_WOBBLE_MIDDLE};
use ripplepaint::prelude::*;
use ripplepaint::PaintingHandle;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Run the rippling painting simulation headless", long_about = None)]
struct Args {
    /// Level config to load (defaults to the built-in demo level)
    #[arg(long)]
    level: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Write the built-in demo level to this path and exit
    #[arg(long)]
    write_demo: Option<PathBuf>,

    /// Mark the moving painting as unlocked
    #[arg(long)]
    unlocked: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One leg of the scripted walk.
struct Leg {
    frames: u32,
    position: Vec3,
    floor: Option<i16>,
}

/// Walk through the demo level: brush the first painting's ripple floor,
/// jump into it, then wander over to the floor painting and drop in.
fn demo_walk() -> Vec<Leg> {
    let plain = Some(0x0001);
    vec![
        Leg { frames: 20, position: Vec3::new(-400.0, 0.0, 300.0), floor: plain },
        Leg { frames: 60, position: Vec3::new(300.0, 0.0, 200.0), floor: Some(SURFACE_PAINTING_WOBBLE_MIDDLE) },
        Leg { frames: 40, position: Vec3::new(300.0, 0.0, 300.0), floor: plain },
        Leg { frames: 90, position: Vec3::new(150.0, 180.0, 40.0), floor: Some(SURFACE_PAINTING_WARP_LEFT) },
        Leg { frames: 40, position: Vec3::new(1500.0, 0.0, 300.0), floor: plain },
        Leg { frames: 80, position: Vec3::new(3300.0, 0.0, 300.0), floor: Some(SURFACE_PAINTING_WOBBLE_LEFT + 6) },
        Leg { frames: 80, position: Vec3::new(3300.0, -300.0, 300.0), floor: Some(SURFACE_PAINTING_WARP_LEFT + 6) },
    ]
}

fn leg_at(walk: &[Leg], frame: u32) -> Option<&Leg> {
    let mut start = 0;
    for leg in walk {
        if frame < start + leg.frames {
            return Some(leg);
        }
        start += leg.frames;
    }
    walk.last()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(path) = &args.write_demo {
        LevelConfig::demo().save(path)?;
        info!("wrote demo level to {}", path.display());
        return Ok(());
    }

    let mut sim = match &args.level {
        Some(path) => {
            let base_dir = path.parent().map(PathBuf::from).unwrap_or_default();
            LevelConfig::load(path)?.build(base_dir)?
        }
        None => LevelConfig::demo().build(".")?,
    };

    let nodes = sim.nodes();

    let mut flags = MemoryFlags { unlocked: args.unlocked, moved_back: false };
    let walk = demo_walk();

    // area load
    sim.update_snapshot(CallContext::Init, 0, Vec3::ZERO, &|_: Vec3| -> Option<Surface> { None });
    for node in &nodes {
        let mut node = *node;
        sim.draw(CallContext::Init, &mut node, &mut flags);
    }

    let mut rippling: Option<PaintingHandle> = None;
    let mut rippling_frames = 0u32;
    let mut triangles = 0usize;

    for frame in 1..=args.frames {
        let Some(leg) = leg_at(&walk, frame) else {
            break;
        };
        let floor_type = leg.floor;
        let floors = move |_: Vec3| floor_type.map(|kind| Surface { kind, id: 0 });
        sim.update_snapshot(CallContext::Render, frame, leg.position, &floors);

        for node in &nodes {
            let mut node = *node;
            if let Some(list) = sim.draw(CallContext::Render, &mut node, &mut flags) {
                triangles += list.triangle_count();
                debug!("frame {} node {:#06x}: {} commands", frame, node.parameter, list.len());
            }
        }

        let now = sim.context().rippling;
        if now != rippling {
            match now.and_then(|h| sim.painting(h).map(|p| (h, p))) {
                Some((h, p)) => info!(
                    "frame {}: painting {}/{} {:?} from ({:.1}, {:.1})",
                    frame, h.group, h.slot, p.state, p.ripple_origin.x, p.ripple_origin.y
                ),
                None => info!("frame {}: all paintings still", frame),
            }
            rippling = now;
        }
        if now.is_some() {
            rippling_frames += 1;
        }
    }

    info!(
        "{} frames, {} rippling, {} triangles drawn, mover status {:#04b}",
        args.frames,
        rippling_frames,
        triangles,
        sim.mover_status().bits()
    );
    Ok(())
}
