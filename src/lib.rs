//! Comet Strikers - A wrapped-field asteroid and comet shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, weapons, collisions, level state machine)
//! - `tuning`: Data-driven game balance
//! - `error`: Tuning load/validation errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use tuning::{DifficultyPreset, Tuning};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Playing field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Wrap buffers (celestial sprites are larger than the ship)
    pub const SHIP_WRAP_BUFFER: f32 = 32.0;
    pub const CELESTIAL_WRAP_BUFFER: f32 = 64.0;

    /// Deferred action delays
    pub const INVULNERABILITY_MS: u32 = 2000;
    pub const RESPAWN_DELAY_MS: u32 = 3000;
    pub const LEVEL_ADVANCE_DELAY_MS: u32 = 1000;
    pub const RESTART_DELAY_MS: u32 = 3000;

    /// Celestial collision circle before scaling
    pub const CELESTIAL_BASE_RADIUS: f32 = 70.0;
    pub const CELESTIAL_MAX_SPEED: f32 = 200.0;

    /// Safe spawn: half-extent of the exclusion box around the ship and the push
    pub const SPAWN_EXCLUSION: f32 = 150.0;
    pub const SPAWN_PUSH: f32 = 100.0;
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Below this scale an asteroid splits in two, otherwise in three
    pub const FRAGMENT_SCALE_THRESHOLD: f32 = 0.5;
}

/// Point offset from `origin` by `distance` along `angle_degrees + 180°`.
///
/// The half-turn matches the sprite heading convention: a negative distance
/// lands in front of a body facing `angle_degrees`.
#[inline]
pub fn point_at_angle(distance: f32, angle_degrees: f32, origin: Vec2) -> Vec2 {
    let radians = (angle_degrees + 180.0).to_radians();
    origin + Vec2::new(radians.cos(), radians.sin()) * distance
}

/// Unit vector pointing along a rotation in degrees
#[inline]
pub fn heading(angle_degrees: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Uniform random integer inclusive of both bounds (inverted bounds are swapped)
#[inline]
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// Wrap `value` into `[low, high]` when it has left that range
#[inline]
pub fn wrap_coordinate(value: f32, low: f32, high: f32) -> f32 {
    if value < low || value > high {
        low + (value - low).rem_euclid(high - low)
    } else {
        value
    }
}

/// Convert a millisecond delay into simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * consts::TICK_RATE as u64).div_ceil(1000)
}
