//! Level state and core simulation types
//!
//! A `Level` owns everything alive in one level: the ship, the celestial
//! objects, the counters, the deferred-action queue and the event queue the
//! host drains for rendering and sound.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::Field;
use super::celestial::{CelestialKind, CelestialObject, SpawnParams};
use super::scheduler::{DeferredAction, Guard, Scheduler};
use super::ship::PlayerShip;
use super::weapon::WeaponKind;
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Won,
    GameOver,
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    OutOfLives,
    /// No rockets left and a laser-immune comet remains
    OutOfRockets,
}

impl GameOverReason {
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::OutOfLives => "All ships destroyed",
            GameOverReason::OutOfRockets => "Out of rockets with comets remaining",
        }
    }
}

/// Request for the owner of the level to replace it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Next level index
    Advance,
    /// Start over from the first level
    Restart,
}

/// Something the host may want to render or sonify
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    ShipSpawned { generation: u32, pos: Vec2 },
    ShipVulnerable { generation: u32 },
    ShipExploded { pos: Vec2, lives_left: u32 },
    ProjectilesFired { kind: WeaponKind, pos: Vec2 },
    ObjectDestroyed {
        kind: CelestialKind,
        pos: Vec2,
        scale: f32,
        by: WeaponKind,
    },
    FragmentsSpawned { count: u32, pos: Vec2 },
    /// Laser hit a comet and fizzled
    LaserDeflected { pos: Vec2 },
    LevelWon { level: u32 },
    GameOver { reason: GameOverReason },
    /// The last level was won
    GameWon { level: u32 },
}

/// Remaining objects per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub asteroids: u32,
    pub child_asteroids: u32,
    pub comets: u32,
}

impl ObjectCounts {
    pub fn total(&self) -> u32 {
        self.asteroids + self.child_asteroids + self.comets
    }

    pub fn is_clear(&self) -> bool {
        self.total() == 0
    }

    fn slot(&mut self, kind: CelestialKind) -> &mut u32 {
        match kind {
            CelestialKind::Asteroid => &mut self.asteroids,
            CelestialKind::ChildAsteroid => &mut self.child_asteroids,
            CelestialKind::Comet => &mut self.comets,
        }
    }
}

/// One level of play
#[derive(Debug, Clone)]
pub struct Level {
    /// 1-based level index
    index: u32,
    pub(crate) tuning: Tuning,
    pub(crate) field: Field,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) ship: PlayerShip,
    pub(crate) asteroids: Vec<CelestialObject>,
    pub(crate) child_asteroids: Vec<CelestialObject>,
    pub(crate) comets: Vec<CelestialObject>,
    pub(crate) counts: ObjectCounts,
    pub(crate) lives: u32,
    /// Ship present and controllable
    pub(crate) alive: bool,
    /// Simulation running; false is terminal
    pub(crate) active: bool,
    pub(crate) outcome: Option<LevelOutcome>,
    pub(crate) transition: Option<Transition>,
    pub(crate) scheduler: Scheduler,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl Level {
    /// Create a level with the composition the tuning prescribes for `index`
    pub fn new(index: u32, tuning: &Tuning, rockets: u32, seed: u64) -> Self {
        let asteroids = tuning.level.asteroids_for(index);
        let comets = tuning.level.comets_for(index);
        Self::with_composition(index, tuning, rockets, seed, asteroids, comets)
    }

    /// Create a level with an explicit number of asteroids and comets
    pub fn with_composition(
        index: u32,
        tuning: &Tuning,
        rockets: u32,
        seed: u64,
        asteroids: u32,
        comets: u32,
    ) -> Self {
        let mut level = Self {
            index,
            tuning: tuning.clone(),
            field: Field::from(&tuning.field),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            ship: PlayerShip::new(1, tuning, rockets),
            asteroids: Vec::new(),
            child_asteroids: Vec::new(),
            comets: Vec::new(),
            counts: ObjectCounts::default(),
            lives: tuning.level.lives,
            alive: true,
            active: true,
            outcome: None,
            transition: None,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            next_id: 1,
        };

        level.events.push(GameEvent::LevelStarted { level: index });
        level.announce_ship();

        let ship_pos = level.ship.pos();
        for _ in 0..asteroids {
            level.spawn_object(CelestialKind::Asteroid, SpawnParams::random(ship_pos));
        }
        for _ in 0..comets {
            level.spawn_object(CelestialKind::Comet, SpawnParams::random(ship_pos));
        }

        log::info!(
            "Level {}: {} asteroids, {} comets, {} lives, {} rockets",
            index,
            asteroids,
            comets,
            level.lives,
            rockets
        );
        level
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a celestial object and count it. Returns its id.
    pub fn spawn_object(&mut self, kind: CelestialKind, params: SpawnParams) -> u32 {
        let id = self.next_entity_id();
        let object = CelestialObject::spawn(
            &mut self.rng,
            id,
            kind,
            params,
            &self.field,
            &self.tuning.celestial,
        );
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0}) scale {:.2}",
            kind.as_str(),
            id,
            object.pos().x,
            object.pos().y,
            object.scale
        );
        self.collection_mut(kind).push(object);
        *self.counts.slot(kind) += 1;
        id
    }

    /// Remove a celestial object. Returns `None` if it is already gone.
    pub(crate) fn remove_object(&mut self, kind: CelestialKind, id: u32) -> Option<CelestialObject> {
        let collection = self.collection_mut(kind);
        let idx = collection.iter().position(|o| o.id == id)?;
        let object = collection.remove(idx);
        let slot = self.counts.slot(kind);
        *slot = slot.saturating_sub(1);
        Some(object)
    }

    fn collection_mut(&mut self, kind: CelestialKind) -> &mut Vec<CelestialObject> {
        match kind {
            CelestialKind::Asteroid => &mut self.asteroids,
            CelestialKind::ChildAsteroid => &mut self.child_asteroids,
            CelestialKind::Comet => &mut self.comets,
        }
    }

    /// Queue a deferred action `delay_ms` from now
    pub(crate) fn schedule(&mut self, delay_ms: u32, action: DeferredAction, guard: Guard) {
        self.scheduler
            .schedule(self.time_ticks, ms_to_ticks(delay_ms), action, guard);
    }

    /// Whether a deferred action may still apply
    pub(crate) fn guard_holds(&self, guard: Guard) -> bool {
        match guard {
            Guard::ShipGeneration(generation) => {
                self.active && self.ship.generation == generation && !self.ship.is_exploded()
            }
            Guard::LevelActive => self.active,
            Guard::Outcome(outcome) => self.outcome == Some(outcome),
        }
    }

    /// Emit the spawn event and arm the invulnerability timer for the current ship
    fn announce_ship(&mut self) {
        let generation = self.ship.generation;
        self.events.push(GameEvent::ShipSpawned {
            generation,
            pos: self.ship.pos(),
        });
        self.schedule(
            self.tuning.ship.invulnerability_ms,
            DeferredAction::EndInvulnerability,
            Guard::ShipGeneration(generation),
        );
    }

    /// Replace the wrecked ship, keeping its remaining rockets and anything
    /// it still has in flight
    pub(crate) fn respawn_ship(&mut self) {
        if self.lives == 0 || self.alive {
            return;
        }
        let generation = self.ship.generation + 1;
        let fresh = PlayerShip::new(generation, &self.tuning, 0);
        let wreck = std::mem::replace(&mut self.ship, fresh);
        let rockets = wreck.rockets_remaining();
        self.ship = PlayerShip::respawn(wreck, generation, &self.tuning);
        self.alive = true;
        log::debug!(
            "Ship {} respawned with {} rockets, {} lives left",
            generation,
            rockets,
            self.lives
        );
        self.announce_ship();
    }

    // --- Read-only view for the host ---

    pub fn level_index(&self) -> u32 {
        self.index
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn rockets_remaining(&self) -> u32 {
        self.ship.rockets_remaining()
    }

    pub fn counts(&self) -> ObjectCounts {
        self.counts
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn ship(&self) -> &PlayerShip {
        &self.ship
    }

    pub fn asteroids(&self) -> &[CelestialObject] {
        &self.asteroids
    }

    pub fn child_asteroids(&self) -> &[CelestialObject] {
        &self.child_asteroids
    }

    pub fn comets(&self) -> &[CelestialObject] {
        &self.comets
    }

    /// Every celestial object (asteroids, fragments, comets)
    pub fn objects(&self) -> impl Iterator<Item = &CelestialObject> {
        self.asteroids
            .iter()
            .chain(self.child_asteroids.iter())
            .chain(self.comets.iter())
    }

    pub fn pending_actions(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take a pending advance/restart request
    pub fn take_transition(&mut self) -> Option<Transition> {
        self.transition.take()
    }
}
