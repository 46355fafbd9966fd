//! Projectile weapons
//!
//! A `Weapon` owns its live projectiles, gates firing with a tick cooldown and
//! optionally tracks finite ammunition. Lasers and rockets are the same type
//! with different tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Field, MovingBody};
use crate::point_at_angle;
use crate::tuning::WeaponTuning;

/// Which weapon a projectile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Laser,
    Rocket,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Laser => "laser",
            WeaponKind::Rocket => "rocket",
        }
    }
}

/// A laser bolt or rocket in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Unique within the owning weapon
    pub id: u32,
    pub kind: WeaponKind,
    pub body: MovingBody,
    /// Constant forward speed (px/s)
    pub speed: f32,
    pub radius: f32,
    /// Cosmetic, passed through to the renderer
    pub scale: f32,
    pub alpha: f32,
}

impl Projectile {
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Heading in degrees (fixed at spawn)
    pub fn heading(&self) -> f32 {
        self.body.rotation
    }
}

/// Projectile manager for one weapon kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    kind: WeaponKind,
    tuning: WeaponTuning,
    elements: Vec<Projectile>,
    /// Ticks left before the next pair may spawn
    cooldown: u32,
    /// `None` means unlimited
    ammunition: Option<u32>,
    next_id: u32,
}

impl Weapon {
    pub fn new(kind: WeaponKind, tuning: WeaponTuning, ammunition: Option<u32>) -> Self {
        Self {
            kind,
            tuning,
            elements: Vec::new(),
            cooldown: 0,
            ammunition,
            next_id: 1,
        }
    }

    /// Unlimited laser cannon
    pub fn laser(tuning: WeaponTuning) -> Self {
        Self::new(WeaponKind::Laser, tuning, None)
    }

    /// Rocket launcher with a finite magazine
    pub fn rocket(tuning: WeaponTuning, amount: u32) -> Self {
        Self::new(WeaponKind::Rocket, tuning, Some(amount))
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn elements(&self) -> &[Projectile] {
        &self.elements
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn ammunition(&self) -> Option<u32> {
        self.ammunition
    }

    /// Fire events left (`u32::MAX` when unlimited)
    pub fn remaining(&self) -> u32 {
        self.ammunition.unwrap_or(u32::MAX)
    }

    pub fn is_exhausted(&self) -> bool {
        self.ammunition == Some(0)
    }

    /// Fire a symmetric pair from `origin` along `heading` (degrees).
    ///
    /// Returns true if a pair spawned this call.
    pub fn fire(&mut self, origin: Vec2, heading: f32) -> bool {
        if self.is_exhausted() {
            return false;
        }
        if self.cooldown >= 1 {
            self.cooldown -= 1;
            return false;
        }

        self.spawn_pair(origin, heading);
        self.cooldown = self.tuning.delay;
        if let Some(amount) = self.ammunition.as_mut() {
            *amount = amount.saturating_sub(1);
        }
        true
    }

    fn spawn_pair(&mut self, origin: Vec2, heading: f32) {
        let muzzle = point_at_angle(-self.tuning.muzzle_offset, heading, origin);
        let half = self.tuning.spacing / 2.0;
        for offset in [-half, half] {
            let pos = point_at_angle(offset, heading + 90.0, muzzle);
            let mut body = MovingBody::new(pos, self.tuning.speed).with_rotation(heading);
            body.set_velocity_from_heading(heading, self.tuning.speed);
            let id = self.next_id;
            self.next_id += 1;
            self.elements.push(Projectile {
                id,
                kind: self.kind,
                body,
                speed: self.tuning.speed,
                radius: self.tuning.radius,
                scale: self.tuning.scale,
                alpha: self.tuning.alpha,
            });
        }
    }

    /// Trigger released: the next press fires immediately
    pub fn stop_fire(&mut self) {
        self.cooldown = 0;
    }

    /// Move every projectile and drop the ones that left the field
    pub fn update(&mut self, dt: f32, field: &Field) {
        for projectile in &mut self.elements {
            let heading = projectile.heading();
            projectile
                .body
                .set_velocity_from_heading(heading, projectile.speed);
            projectile.body.integrate(dt);
        }
        self.elements.retain(|p| field.contains(p.pos()));
    }

    /// Take over the projectiles of a wrecked ship's weapon. Ids allocated
    /// afterwards stay clear of the adopted ones.
    pub fn adopt_in_flight(&mut self, wreck: Weapon) {
        let offset = self.next_id.max(1) - 1;
        for mut projectile in wreck.elements {
            projectile.id += offset;
            self.next_id = self.next_id.max(projectile.id + 1);
            self.elements.push(projectile);
        }
        self.next_id = self.next_id.max(wreck.next_id + offset);
    }

    /// Remove a projectile by id; returns false if it was already gone
    pub fn remove_element(&mut self, id: u32) -> bool {
        let before = self.elements.len();
        self.elements.retain(|p| p.id != id);
        self.elements.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn test_fire_spawns_symmetric_pair() {
        let mut laser = Weapon::laser(WeaponTuning::laser());
        let origin = Vec2::new(400.0, 300.0);
        assert!(laser.fire(origin, -90.0));
        assert_eq!(laser.elements().len(), 2);

        let a = laser.elements()[0].pos();
        let b = laser.elements()[1].pos();
        // Facing up: muzzle 15px above, pair spread horizontally by 58
        assert!(((a.x - b.x).abs() - 58.0).abs() < 1e-3);
        assert!((a.y - 285.0).abs() < 1e-3);
        assert!((b.y - 285.0).abs() < 1e-3);
        assert!(((a.x + b.x) / 2.0 - 400.0).abs() < 1e-3);
        for p in laser.elements() {
            assert_eq!(p.heading(), -90.0);
        }
    }

    #[test]
    fn test_cooldown_gates_fire() {
        let mut laser = Weapon::laser(WeaponTuning::laser());
        let origin = Vec2::new(400.0, 300.0);
        assert!(laser.fire(origin, 0.0));
        assert_eq!(laser.cooldown(), 8);
        for _ in 0..8 {
            assert!(!laser.fire(origin, 0.0));
        }
        assert_eq!(laser.cooldown(), 0);
        assert!(laser.fire(origin, 0.0));
        assert_eq!(laser.elements().len(), 4);
    }

    #[test]
    fn test_stop_fire_resets_cooldown() {
        let mut laser = Weapon::laser(WeaponTuning::laser());
        laser.fire(Vec2::new(400.0, 300.0), 0.0);
        laser.stop_fire();
        assert_eq!(laser.cooldown(), 0);
        assert!(laser.fire(Vec2::new(400.0, 300.0), 0.0));
    }

    #[test]
    fn test_rocket_ammunition_per_fire_event() {
        let mut rocket = Weapon::rocket(WeaponTuning::rocket(), 2);
        let origin = Vec2::new(400.0, 300.0);
        assert!(rocket.fire(origin, 0.0));
        assert_eq!(rocket.ammunition(), Some(1));
        assert_eq!(rocket.elements().len(), 2);
        rocket.stop_fire();
        assert!(rocket.fire(origin, 0.0));
        assert_eq!(rocket.ammunition(), Some(0));
        rocket.stop_fire();
        assert!(!rocket.fire(origin, 0.0));
        assert_eq!(rocket.ammunition(), Some(0));
        assert_eq!(rocket.elements().len(), 4);
    }

    #[test]
    fn test_update_moves_straight_and_culls() {
        let mut laser = Weapon::laser(WeaponTuning::laser());
        laser.fire(Vec2::new(700.0, 300.0), 0.0);
        let start = laser.elements()[0].pos();
        laser.update(SIM_DT, &field());
        let moved = laser.elements()[0].pos() - start;
        assert!((moved.x - 800.0 * SIM_DT).abs() < 1e-2);
        assert!(moved.y.abs() < 1e-3);

        // 800 px/s from x=715 leaves the field within 9 ticks
        for _ in 0..10 {
            laser.update(SIM_DT, &field());
        }
        assert!(laser.elements().is_empty());
    }

    #[test]
    fn test_remove_element_idempotent() {
        let mut laser = Weapon::laser(WeaponTuning::laser());
        laser.fire(Vec2::new(400.0, 300.0), 0.0);
        let id = laser.elements()[0].id;
        assert!(laser.remove_element(id));
        assert!(!laser.remove_element(id));
        assert_eq!(laser.elements().len(), 1);
    }

    proptest! {
        #[test]
        fn prop_ammunition_monotonic(
            presses in proptest::collection::vec(any::<bool>(), 1..300),
            amount in 0u32..6,
        ) {
            let mut rocket = Weapon::rocket(WeaponTuning::rocket(), amount);
            let mut last = rocket.remaining();
            for pressed in presses {
                if pressed {
                    rocket.fire(Vec2::new(400.0, 300.0), 0.0);
                } else {
                    rocket.stop_fire();
                }
                let now = rocket.remaining();
                prop_assert!(now <= last);
                last = now;
            }
        }

        #[test]
        fn prop_rate_limited(ticks in 1u32..400, delay in 0u32..60) {
            let tuning = WeaponTuning { delay, ..WeaponTuning::laser() };
            let mut laser = Weapon::laser(tuning);
            let mut events = 0u32;
            for _ in 0..ticks {
                if laser.fire(Vec2::new(400.0, 300.0), 0.0) {
                    events += 1;
                }
            }
            prop_assert!(events <= ticks.div_ceil(delay + 1));
        }
    }
}
