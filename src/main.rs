//! Comet Strikers headless runner
//!
//! Plays a seeded session with a simple autopilot and logs every game event.
//! Useful for balancing tuning files and for checking replays are stable.

use std::path::PathBuf;

use clap::Parser;
use comet_strikers::consts::TICK_RATE;
use comet_strikers::sim::body::normalize_degrees;
use comet_strikers::sim::{CelestialKind, ControlState, GameEvent, Session};
use comet_strikers::{DifficultyPreset, Tuning};

#[derive(Parser)]
#[command(name = "comet-strikers")]
#[command(about = "Run a headless Comet Strikers session with an autopilot")]
struct Args {
    /// RNG seed for the session
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Number of simulation ticks to run (60 per second)
    #[arg(short, long, default_value_t = 60 * 120)]
    ticks: u64,

    /// Tuning JSON file (defaults are used when omitted)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Difficulty preset: easy, normal or hard
    #[arg(short, long)]
    preset: Option<String>,

    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

/// Heading tolerance before the autopilot pulls the trigger (degrees)
const AIM_TOLERANCE: f32 = 8.0;

/// Turn toward the nearest object; lasers for rocks, rockets for comets
fn autopilot(session: &Session) -> ControlState {
    let level = session.level();
    let ship = level.ship();
    let Some(target) = level
        .objects()
        .min_by(|a, b| {
            let da = a.pos().distance_squared(ship.pos());
            let db = b.pos().distance_squared(ship.pos());
            da.total_cmp(&db)
        })
    else {
        return ControlState::default();
    };

    let bearing = (target.pos() - ship.pos()).to_angle().to_degrees();
    let error = normalize_degrees(bearing - ship.body.rotation);
    let aimed = error.abs() <= AIM_TOLERANCE;
    let comet = target.kind == CelestialKind::Comet;

    ControlState {
        turn_left: error < -AIM_TOLERANCE,
        turn_right: error > AIM_TOLERANCE,
        thrust_forward: aimed && target.pos().distance(ship.pos()) > 250.0,
        fire_primary: aimed && !comet,
        fire_secondary: aimed && comet,
        ..Default::default()
    }
}

fn describe(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::LevelStarted { level } => format!("level {} started", level),
        GameEvent::ShipSpawned { generation, .. } => format!("ship {} spawned", generation),
        GameEvent::ShipExploded { lives_left, .. } => {
            format!("ship exploded, {} lives left", lives_left)
        }
        GameEvent::ObjectDestroyed { kind, scale, by, .. } => {
            format!("{} (scale {:.2}) destroyed by {}", kind.as_str(), scale, by.as_str())
        }
        GameEvent::FragmentsSpawned { count, .. } => format!("{} fragments", count),
        GameEvent::LevelWon { level } => format!("level {} won", level),
        GameEvent::GameOver { reason } => format!("game over: {}", reason.message()),
        GameEvent::GameWon { level } => format!("game won after level {}", level),
        // Per-shot and per-timer noise
        GameEvent::ShipVulnerable { .. }
        | GameEvent::ProjectilesFired { .. }
        | GameEvent::LaserDeflected { .. } => return None,
    };
    Some(line)
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();

    let mut tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                eprintln!("Error loading tuning: {}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    if let Some(name) = &args.preset {
        match DifficultyPreset::from_str(name) {
            Some(preset) => tuning.apply_preset(preset),
            None => {
                eprintln!("Unknown preset '{}' (expected easy, normal or hard)", name);
                std::process::exit(1);
            }
        }
    }

    if args.dump_tuning {
        match tuning.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing tuning: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!(
        "Comet Strikers: seed {}, {} ticks, preset {}",
        args.seed,
        args.ticks,
        tuning.preset.as_str()
    );

    let mut session = Session::new(tuning, args.seed);
    let mut ran = 0;
    while ran < args.ticks && !session.is_finished() {
        let controls = autopilot(&session);
        session.update(&controls);
        ran += 1;

        for event in session.drain_events() {
            if let Some(line) = describe(&event) {
                println!("[{:>7.2}s] {}", ran as f32 / TICK_RATE as f32, line);
            }
        }
    }

    let level = session.level();
    let counts = level.counts();
    println!(
        "Stopped after {} ticks on level {}/{}: {} lives, {} rockets, {} asteroids, {} fragments, {} comets{}",
        ran,
        level.level_index(),
        session.tuning().level.max_levels,
        level.lives(),
        level.rockets_remaining(),
        counts.asteroids,
        counts.child_asteroids,
        counts.comets,
        if session.is_finished() { " (finished)" } else { "" }
    );
}
