//! Collision detection and response between circular bodies
//!
//! Sprites are approximated by circles: the ship, every projectile and every
//! celestial object carry a collision radius.

use glam::Vec2;

use super::body::MovingBody;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Overlap test only (projectiles pass through until resolved)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Circle-vs-circle collision with contact information
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    if !circles_overlap(a_pos, a_radius, b_pos, b_radius) {
        return CollisionResult::miss();
    }

    let delta = a_pos - b_pos;
    let dist = delta.length();
    // Concentric circles: pick an arbitrary but stable normal
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::Y
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: a_radius + b_radius - dist,
    }
}

/// Push two overlapping bodies apart and bounce them off each other.
///
/// Each body keeps `bounce` of its velocity component along the contact normal
/// (reflected, so `bounce == 1.0` is a mirror reflection); tangential motion
/// is untouched.
pub fn bounce_apart(a: &mut MovingBody, b: &mut MovingBody, contact: &CollisionResult) {
    if !contact.hit {
        return;
    }

    let half = contact.penetration / 2.0;
    a.pos += contact.normal * half;
    b.pos -= contact.normal * half;

    // Only bounce if closing in on each other
    let closing = (a.vel() - b.vel()).dot(contact.normal) < 0.0;
    if closing {
        a.set_velocity(bounce_off(a.vel(), contact.normal, a.bounce));
        b.set_velocity(bounce_off(b.vel(), -contact.normal, b.bounce));
    }
}

fn bounce_off(vel: Vec2, normal: Vec2, bounce: f32) -> Vec2 {
    let into = vel.dot(normal);
    if into >= 0.0 {
        return vel;
    }
    let tangential = vel - into * normal;
    tangential - into * bounce * normal
}
