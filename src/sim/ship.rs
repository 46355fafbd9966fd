//! The player's ship
//!
//! Owns a laser cannon and a rocket launcher. A ship instance lives for one
//! life: it is replaced, never revived, after an explosion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Field, MovingBody};
use super::tick::ControlState;
use super::weapon::{Weapon, WeaponKind};
use crate::tuning::{ShipTuning, Tuning};

/// Which weapons spawned a pair during `apply_controls`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotsFired {
    pub lasers: bool,
    pub rockets: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Counts ship instances within a level; guards deferred ship actions
    pub generation: u32,
    pub body: MovingBody,
    active: bool,
    invulnerable: bool,
    exploded: bool,
    tuning: ShipTuning,
    lasers: Weapon,
    rockets: Weapon,
}

impl PlayerShip {
    /// Fresh, invulnerable ship at the spawn point carrying `rockets`
    pub fn new(generation: u32, tuning: &Tuning, rockets: u32) -> Self {
        let ship = &tuning.ship;
        let body = MovingBody::new(Vec2::new(ship.spawn_x, ship.spawn_y), ship.max_speed)
            .with_rotation(ship.spawn_rotation)
            .with_drag(ship.drag)
            .with_bounce(ship.bounce);

        Self {
            generation,
            body,
            active: true,
            invulnerable: true,
            exploded: false,
            tuning: ship.clone(),
            lasers: Weapon::laser(tuning.laser.clone()),
            rockets: Weapon::rocket(tuning.rocket.clone(), rockets),
        }
    }

    /// Replacement for `wreck`: its remaining rockets and its projectiles
    /// still in flight carry over to the new ship
    pub fn respawn(wreck: PlayerShip, generation: u32, tuning: &Tuning) -> Self {
        let mut ship = Self::new(generation, tuning, wreck.rockets_remaining());
        ship.lasers.adopt_in_flight(wreck.lasers);
        ship.rockets.adopt_in_flight(wreck.rockets);
        ship
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn radius(&self) -> f32 {
        self.tuning.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn lasers(&self) -> &Weapon {
        &self.lasers
    }

    pub fn rockets(&self) -> &Weapon {
        &self.rockets
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> &mut Weapon {
        match kind {
            WeaponKind::Laser => &mut self.lasers,
            WeaponKind::Rocket => &mut self.rockets,
        }
    }

    pub fn rockets_remaining(&self) -> u32 {
        self.rockets.ammunition().unwrap_or(0)
    }

    pub fn rockets_in_flight(&self) -> usize {
        self.rockets.elements().len()
    }

    // --- Thrusters ---

    pub fn accelerate(&mut self) {
        if self.active {
            let rotation = self.body.rotation;
            self.body
                .set_acceleration_from_heading(rotation, self.tuning.thrust);
        }
    }

    pub fn de_accelerate(&mut self) {
        if self.active {
            let rotation = self.body.rotation;
            self.body
                .set_acceleration_from_heading(rotation, -self.tuning.reverse_thrust);
        }
    }

    pub fn no_acceleration(&mut self) {
        self.body.accel = Vec2::ZERO;
    }

    pub fn turn_left(&mut self) {
        if self.active {
            self.body.angular_vel = -self.tuning.turn_rate;
        }
    }

    pub fn turn_right(&mut self) {
        if self.active {
            self.body.angular_vel = self.tuning.turn_rate;
        }
    }

    pub fn neutral(&mut self) {
        self.body.angular_vel = 0.0;
    }

    // --- Weapons ---

    pub fn fire_lasers(&mut self) -> bool {
        self.active && self.lasers.fire(self.body.pos, self.body.rotation)
    }

    pub fn fire_rockets(&mut self) -> bool {
        self.active && self.rockets.fire(self.body.pos, self.body.rotation)
    }

    pub fn stop_fire_lasers(&mut self) {
        self.lasers.stop_fire();
    }

    pub fn stop_fire_rockets(&mut self) {
        self.rockets.stop_fire();
    }

    /// Drive the ship from one tick of control state.
    ///
    /// Forward beats reverse and left beats right when both are held.
    pub fn apply_controls(&mut self, controls: &ControlState) -> ShotsFired {
        if controls.thrust_forward {
            self.accelerate();
        } else if controls.thrust_reverse {
            self.de_accelerate();
        } else {
            self.no_acceleration();
        }

        if controls.turn_left {
            self.turn_left();
        } else if controls.turn_right {
            self.turn_right();
        } else {
            self.neutral();
        }

        let mut fired = ShotsFired::default();
        if controls.fire_primary {
            fired.lasers = self.fire_lasers();
        } else {
            self.stop_fire_lasers();
        }
        if controls.fire_secondary {
            fired.rockets = self.fire_rockets();
        } else {
            self.stop_fire_rockets();
        }
        fired
    }

    /// Grace period over; only a new ship is invulnerable again
    pub fn end_invulnerability(&mut self) {
        self.invulnerable = false;
    }

    /// Destroy the ship. Returns false if it had already exploded.
    ///
    /// Projectiles already in flight keep flying.
    pub fn explode(&mut self) -> bool {
        if self.exploded {
            return false;
        }
        self.exploded = true;
        self.active = false;
        self.body.accel = Vec2::ZERO;
        self.body.angular_vel = 0.0;
        self.body.set_velocity(Vec2::ZERO);
        self.lasers.stop_fire();
        self.rockets.stop_fire();
        true
    }

    /// Physics (while intact) and projectiles
    pub fn update(&mut self, dt: f32, field: &Field) {
        if !self.exploded {
            self.body.integrate(dt);
            self.body.wrap_to_bounds(field, self.tuning.wrap_buffer);
        }
        self.update_weapons(dt, field);
    }

    pub fn update_weapons(&mut self, dt: f32, field: &Field) {
        self.lasers.update(dt, field);
        self.rockets.update(dt, field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn ship() -> PlayerShip {
        PlayerShip::new(1, &Tuning::default(), 3)
    }

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn test_spawn_state() {
        let ship = ship();
        assert!(ship.is_active());
        assert!(ship.is_invulnerable());
        assert!(!ship.is_exploded());
        assert_eq!(ship.pos(), Vec2::new(400.0, 400.0));
        assert_eq!(ship.body.rotation, -90.0);
        assert_eq!(ship.rockets_remaining(), 3);
        assert_eq!(ship.lasers().ammunition(), None);
    }

    #[test]
    fn test_accelerate_moves_along_heading() {
        let mut ship = ship();
        ship.accelerate();
        for _ in 0..30 {
            ship.update(SIM_DT, &field());
        }
        // Facing up: y decreases, x unchanged
        assert!(ship.pos().y < 400.0);
        assert!((ship.pos().x - 400.0).abs() < 1e-2);
    }

    #[test]
    fn test_speed_clamped_under_sustained_thrust() {
        let mut ship = ship();
        ship.accelerate();
        for _ in 0..600 {
            ship.update(SIM_DT, &field());
            assert!(ship.body.speed() <= 200.0 + 1e-3);
        }
    }

    #[test]
    fn test_turning() {
        let mut ship = ship();
        ship.turn_right();
        ship.update(SIM_DT, &field());
        assert!((ship.body.rotation - (-85.0)).abs() < 1e-3);
        ship.neutral();
        ship.update(SIM_DT, &field());
        assert!((ship.body.rotation - (-85.0)).abs() < 1e-3);
    }

    #[test]
    fn test_controls_priority() {
        let mut ship = ship();
        let controls = ControlState {
            thrust_forward: true,
            thrust_reverse: true,
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        ship.apply_controls(&controls);
        assert_eq!(ship.body.angular_vel, -300.0);
        // Forward thrust points up
        assert!(ship.body.accel.y < 0.0);
    }

    #[test]
    fn test_controls_fire_both_weapons() {
        let mut ship = ship();
        let controls = ControlState {
            fire_primary: true,
            fire_secondary: true,
            ..Default::default()
        };
        let fired = ship.apply_controls(&controls);
        assert!(fired.lasers && fired.rockets);
        assert_eq!(ship.lasers().elements().len(), 2);
        assert_eq!(ship.rockets_in_flight(), 2);
        assert_eq!(ship.rockets_remaining(), 2);

        // Held trigger is rate limited
        let fired = ship.apply_controls(&controls);
        assert_eq!(fired, ShotsFired::default());
    }

    #[test]
    fn test_explode_is_terminal() {
        let mut ship = ship();
        ship.fire_lasers();
        assert!(ship.explode());
        assert!(!ship.explode());
        assert!(!ship.is_active());

        let before = ship.pos();
        ship.accelerate();
        ship.turn_left();
        assert!(!ship.fire_rockets());
        ship.update(SIM_DT, &field());
        assert_eq!(ship.pos(), before);
        assert_eq!(ship.body.angular_vel, 0.0);

        // In-flight lasers keep moving
        let laser_y = ship.lasers().elements()[0].pos().y;
        ship.update(SIM_DT, &field());
        assert!(ship.lasers().elements()[0].pos().y < laser_y);
    }

    #[test]
    fn test_respawn_inherits_rockets_and_projectiles() {
        let mut wreck = ship();
        wreck.fire_lasers();
        wreck.fire_rockets();
        wreck.explode();

        let ship = PlayerShip::respawn(wreck, 2, &Tuning::default());
        assert_eq!(ship.generation, 2);
        assert!(!ship.is_exploded() && ship.is_invulnerable());
        assert_eq!(ship.pos(), Vec2::new(400.0, 400.0));
        assert_eq!(ship.rockets_remaining(), 2);
        assert_eq!(ship.lasers().elements().len(), 2);
        assert_eq!(ship.rockets_in_flight(), 2);

        // New shots never reuse an inherited id
        let mut ship = ship;
        assert!(ship.fire_lasers());
        let mut ids: Vec<_> = ship.lasers().elements().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_end_invulnerability() {
        let mut ship = ship();
        ship.end_invulnerability();
        assert!(!ship.is_invulnerable());
    }
}
