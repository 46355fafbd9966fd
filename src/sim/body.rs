//! Moving bodies and the wrapped playing field
//!
//! Every physical entity (ship, asteroid, comet, projectile) is a `MovingBody`.
//! Rotations are in degrees, screen coordinates (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::heading;
use crate::tuning::FieldTuning;
use crate::wrap_coordinate;

/// Playing field rectangle anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inclusive containment (a point on the edge is still inside)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width && pos.y <= self.height
    }
}

impl From<&FieldTuning> for Field {
    fn from(tuning: &FieldTuning) -> Self {
        Self::new(tuning.width, tuning.height)
    }
}

/// Normalize degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// A physical body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingBody {
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    vel: Vec2,
    /// px/s², integrated into velocity each step
    pub accel: Vec2,
    /// Degrees per second
    pub angular_vel: f32,
    /// Fraction of velocity kept per second (1.0 = no drag)
    pub drag: f32,
    max_speed: f32,
    /// Fraction of the normal velocity kept when bouncing off another body
    pub bounce: f32,
}

impl MovingBody {
    pub fn new(pos: Vec2, max_speed: f32) -> Self {
        Self {
            pos,
            rotation: 0.0,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            angular_vel: 0.0,
            drag: 1.0,
            max_speed: max_speed.max(0.0),
            bounce: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = normalize_degrees(rotation);
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag.clamp(0.0, 1.0);
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Set velocity, clamped to max speed
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
        self.clamp_speed();
    }

    /// Set velocity along a heading (degrees)
    pub fn set_velocity_from_heading(&mut self, rotation: f32, magnitude: f32) {
        self.set_velocity(heading(rotation) * magnitude);
    }

    /// Set acceleration along a heading (degrees); negative magnitude pushes backwards
    pub fn set_acceleration_from_heading(&mut self, rotation: f32, magnitude: f32) {
        self.accel = heading(rotation) * magnitude;
    }

    fn clamp_speed(&mut self) {
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel = self.vel.normalize_or_zero() * self.max_speed;
        }
    }

    /// Damping: velocity is scaled by `drag` once per second of simulated time
    pub fn apply_drag(&mut self, dt: f32) {
        if self.drag < 1.0 {
            self.vel *= self.drag.powf(dt);
        }
    }

    /// Advance one timestep: acceleration, drag, speed clamp, position, rotation
    pub fn integrate(&mut self, dt: f32) {
        if self.accel != Vec2::ZERO {
            self.vel += self.accel * dt;
        }
        self.apply_drag(dt);
        self.clamp_speed();
        self.pos += self.vel * dt;
        if self.angular_vel != 0.0 {
            self.rotate_by(self.angular_vel * dt);
        }
    }

    /// Rotate by a fixed number of degrees
    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
    }

    /// Toroidal wrap: beyond `buffer` past an edge, reappear past the opposite edge.
    /// Returns true if the body moved.
    pub fn wrap_to_bounds(&mut self, field: &Field, buffer: f32) -> bool {
        let wrapped = Vec2::new(
            wrap_coordinate(self.pos.x, -buffer, field.width + buffer),
            wrap_coordinate(self.pos.y, -buffer, field.height + buffer),
        );
        let moved = wrapped != self.pos;
        self.pos = wrapped;
        moved
    }
}
