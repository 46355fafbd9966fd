//! Asteroids, asteroid fragments and comets
//!
//! One type with a category tag. The category carries the size range and the
//! fragmentation rule; everything else is shared.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Field, MovingBody};
use crate::random_int;
use crate::tuning::CelestialTuning;

/// Category of a celestial object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelestialKind {
    Asteroid,
    /// Fragment of a destroyed asteroid; never splits again
    ChildAsteroid,
    /// Only rockets can destroy comets
    Comet,
}

impl CelestialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CelestialKind::Asteroid => "asteroid",
            CelestialKind::ChildAsteroid => "child_asteroid",
            CelestialKind::Comet => "comet",
        }
    }

    /// Scale range in percent (inclusive)
    pub fn scale_bounds(&self) -> (i32, i32) {
        match self {
            CelestialKind::Asteroid => (35, 65),
            CelestialKind::ChildAsteroid => (10, 35),
            CelestialKind::Comet => (35, 70),
        }
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        let (min, max) = self.scale_bounds();
        scale.clamp(min as f32 / 100.0, max as f32 / 100.0)
    }

    /// Number of fragments left behind when a laser destroys this object
    pub fn fragment_count(&self, scale: f32, threshold: f32) -> u32 {
        match self {
            CelestialKind::Asteroid if scale < threshold => 2,
            CelestialKind::Asteroid => 3,
            CelestialKind::ChildAsteroid | CelestialKind::Comet => 0,
        }
    }

    pub fn laser_immune(&self) -> bool {
        matches!(self, CelestialKind::Comet)
    }
}

/// Optional overrides for a spawn; `None` fields are randomized
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnParams {
    pub ship_pos: Vec2,
    pub spawn_point: Option<Vec2>,
    pub scale: Option<f32>,
    /// Degrees per tick
    pub rotation_speed: Option<f32>,
}

impl SpawnParams {
    pub fn random(ship_pos: Vec2) -> Self {
        Self {
            ship_pos,
            ..Default::default()
        }
    }

    /// Fragment of a destroyed asteroid
    pub fn fragment(ship_pos: Vec2, at: Vec2, scale: f32, rotation_speed: f32) -> Self {
        Self {
            ship_pos,
            spawn_point: Some(at),
            scale: Some(scale),
            rotation_speed: Some(rotation_speed),
        }
    }
}

/// Linear speed component that is never imperceptibly slow: resample until
/// the value is at most -50 or at least 50.
pub fn valid_random_velocity<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    loop {
        let velocity = random_int(rng, -100, 100);
        if velocity <= -50 || velocity >= 50 {
            return velocity;
        }
    }
}

/// Spin for a freshly spawned object (degrees per tick)
pub fn random_rotation_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    random_int(rng, -20, 20) as f32 / 10.0
}

/// Spin for a fragment (degrees per tick), biased clockwise
pub fn fragment_rotation_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    random_int(rng, -80, 80) as f32 / 10.0 + 2.0
}

/// Random point in the field, moved off the ship on every axis that falls
/// inside the exclusion box. Single pass.
pub fn safe_spawn_point<R: Rng + ?Sized>(
    rng: &mut R,
    field: &Field,
    ship_pos: Vec2,
    tuning: &CelestialTuning,
) -> Vec2 {
    let margin = tuning.spawn_margin.round() as i32;
    let x = random_int(rng, margin, (field.width as i32).saturating_sub(margin)) as f32;
    let y = random_int(rng, margin, (field.height as i32).saturating_sub(margin)) as f32;
    let clear = tuning.spawn_exclusion + tuning.spawn_push;

    let push = |coord: f32, ship: f32| -> f32 {
        if (coord - ship).abs() <= tuning.spawn_exclusion {
            if coord > ship { ship + clear } else { ship - clear }
        } else {
            coord
        }
    };

    Vec2::new(push(x, ship_pos.x), push(y, ship_pos.y))
}

/// An asteroid, fragment or comet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialObject {
    pub id: u32,
    pub kind: CelestialKind,
    pub body: MovingBody,
    pub scale: f32,
    /// Degrees per tick
    pub rotation_speed: f32,
    /// Collision circle radius (already scaled)
    pub radius: f32,
}

impl CelestialObject {
    /// Create an object, randomizing whatever `params` leaves open
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        id: u32,
        kind: CelestialKind,
        params: SpawnParams,
        field: &Field,
        tuning: &CelestialTuning,
    ) -> Self {
        let pos = params
            .spawn_point
            .unwrap_or_else(|| safe_spawn_point(rng, field, params.ship_pos, tuning));
        let scale = match params.scale {
            Some(scale) => kind.clamp_scale(scale),
            None => {
                let (min, max) = kind.scale_bounds();
                random_int(rng, min, max) as f32 / 100.0
            }
        };
        let rotation_speed = params
            .rotation_speed
            .unwrap_or_else(|| random_rotation_speed(rng));

        let mut body = MovingBody::new(pos, tuning.max_speed).with_bounce(tuning.bounce);
        let vx = valid_random_velocity(rng) as f32;
        let vy = valid_random_velocity(rng) as f32;
        body.set_velocity(Vec2::new(vx, vy));

        Self {
            id,
            kind,
            body,
            scale,
            rotation_speed,
            radius: tuning.base_radius * scale,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Drift, spin and wrap
    pub fn update(&mut self, dt: f32, field: &Field, wrap_buffer: f32) {
        self.body.integrate(dt);
        self.body.rotate_by(self.rotation_speed);
        self.body.wrap_to_bounds(field, wrap_buffer);
    }
}
