//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Deferred actions on the tick clock, never wall time
//! - No rendering or platform dependencies

pub mod body;
pub mod celestial;
pub mod collision;
pub mod scheduler;
pub mod session;
pub mod ship;
pub mod state;
pub mod tick;
pub mod weapon;

pub use body::{Field, MovingBody};
pub use celestial::{CelestialKind, CelestialObject, SpawnParams};
pub use collision::{CollisionResult, bounce_apart, circle_circle, circles_overlap};
pub use scheduler::{DeferredAction, Guard, Scheduler};
pub use session::Session;
pub use ship::{PlayerShip, ShotsFired};
pub use state::{GameEvent, GameOverReason, Level, LevelOutcome, ObjectCounts, Transition};
pub use tick::{ControlState, tick};
pub use weapon::{Projectile, Weapon, WeaponKind};
