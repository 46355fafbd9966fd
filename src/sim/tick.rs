//! Fixed timestep simulation tick
//!
//! Advances one level deterministically: deferred actions, controls, motion,
//! collisions, then win/lose evaluation.

use std::collections::HashSet;

use super::celestial::{CelestialKind, SpawnParams, fragment_rotation_speed};
use super::collision::{bounce_apart, circle_circle, circles_overlap};
use super::scheduler::{DeferredAction, Guard};
use super::state::{GameEvent, GameOverReason, Level, LevelOutcome, Transition};
use super::weapon::WeaponKind;
use crate::consts::SIM_DT;

/// Controls held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub thrust_forward: bool,
    pub thrust_reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Lasers
    pub fire_primary: bool,
    /// Rockets
    pub fire_secondary: bool,
}

/// Projectile overlapping a celestial object this tick
#[derive(Debug, Clone, Copy)]
struct Hit {
    weapon: WeaponKind,
    projectile: u32,
    target: u32,
    target_kind: CelestialKind,
}

impl Level {
    /// Advance one fixed step
    pub fn update(&mut self, controls: &ControlState) {
        tick(self, controls, SIM_DT);
    }
}

/// Advance the level by one fixed timestep
pub fn tick(level: &mut Level, controls: &ControlState, dt: f32) {
    level.time_ticks += 1;
    run_deferred(level);

    // Game over (or advance) is terminal; only timers keep running
    if !level.active {
        return;
    }

    if level.alive {
        let fired = level.ship.apply_controls(controls);
        let pos = level.ship.pos();
        if fired.lasers {
            level.events.push(GameEvent::ProjectilesFired {
                kind: WeaponKind::Laser,
                pos,
            });
        }
        if fired.rockets {
            level.events.push(GameEvent::ProjectilesFired {
                kind: WeaponKind::Rocket,
                pos,
            });
        }

        level.ship.update(dt, &level.field);
        update_objects(level, dt);

        resolve_ship_contacts(level);
        resolve_projectile_hits(level);
    } else {
        update_objects(level, dt);
        level.ship.update_weapons(dt, &level.field);
    }

    evaluate_outcome(level);
}

fn run_deferred(level: &mut Level) {
    for entry in level.scheduler.take_due(level.time_ticks) {
        if !level.guard_holds(entry.guard) {
            log::debug!("Dropped stale {:?} ({:?})", entry.action, entry.guard);
            continue;
        }
        match entry.action {
            DeferredAction::EndInvulnerability => {
                level.ship.end_invulnerability();
                level.events.push(GameEvent::ShipVulnerable {
                    generation: level.ship.generation,
                });
            }
            DeferredAction::RespawnShip => level.respawn_ship(),
            DeferredAction::AdvanceLevel => {
                level.active = false;
                level.transition = Some(Transition::Advance);
            }
            DeferredAction::Restart => {
                level.transition = Some(Transition::Restart);
            }
        }
    }
}

fn update_objects(level: &mut Level, dt: f32) {
    let wrap = level.tuning.celestial.wrap_buffer;
    for object in level
        .asteroids
        .iter_mut()
        .chain(level.child_asteroids.iter_mut())
        .chain(level.comets.iter_mut())
    {
        object.update(dt, &level.field, wrap);
    }
}

/// Ship against every object: fatal if vulnerable, a bounce otherwise
fn resolve_ship_contacts(level: &mut Level) {
    let radius = level.ship.radius();
    let mut fatal = false;

    for object in level
        .asteroids
        .iter_mut()
        .chain(level.child_asteroids.iter_mut())
        .chain(level.comets.iter_mut())
    {
        let contact = circle_circle(level.ship.pos(), radius, object.pos(), object.radius);
        if !contact.hit {
            continue;
        }
        if level.ship.is_invulnerable() {
            bounce_apart(&mut level.ship.body, &mut object.body, &contact);
        } else {
            fatal = true;
            break;
        }
    }

    if fatal {
        destroy_ship(level);
    }
}

fn destroy_ship(level: &mut Level) {
    if !level.ship.explode() {
        return;
    }
    level.alive = false;
    level.lives = level.lives.saturating_sub(1);
    level.events.push(GameEvent::ShipExploded {
        pos: level.ship.pos(),
        lives_left: level.lives,
    });
    log::info!("Ship {} destroyed, {} lives left", level.ship.generation, level.lives);

    if level.lives > 0 {
        let delay = level.tuning.level.respawn_delay_ms;
        level.schedule(delay, DeferredAction::RespawnShip, Guard::LevelActive);
    }
}

/// Snapshot of every projectile/object overlap, rockets first
fn collect_hits(level: &Level) -> Vec<Hit> {
    let mut hits = Vec::new();
    for weapon in [level.ship.rockets(), level.ship.lasers()] {
        for projectile in weapon.elements() {
            for object in level.objects() {
                if circles_overlap(projectile.pos(), projectile.radius, object.pos(), object.radius) {
                    hits.push(Hit {
                        weapon: weapon.kind(),
                        projectile: projectile.id,
                        target: object.id,
                        target_kind: object.kind,
                    });
                }
            }
        }
    }
    hits
}

fn resolve_projectile_hits(level: &mut Level) {
    let hits = collect_hits(level);
    let mut spent: HashSet<(WeaponKind, u32)> = HashSet::new();
    let mut destroyed: HashSet<u32> = HashSet::new();

    for hit in hits {
        if spent.contains(&(hit.weapon, hit.projectile)) || destroyed.contains(&hit.target) {
            continue;
        }
        spent.insert((hit.weapon, hit.projectile));
        level.ship.weapon_mut(hit.weapon).remove_element(hit.projectile);

        if hit.weapon == WeaponKind::Laser && hit.target_kind.laser_immune() {
            let pos = level
                .objects()
                .find(|o| o.id == hit.target)
                .map(|o| o.pos())
                .unwrap_or_default();
            level.events.push(GameEvent::LaserDeflected { pos });
            continue;
        }

        destroyed.insert(hit.target);
        destroy_object(level, hit);
    }
}

fn destroy_object(level: &mut Level, hit: Hit) {
    let Some(object) = level.remove_object(hit.target_kind, hit.target) else {
        return;
    };
    let pos = object.pos();
    level.events.push(GameEvent::ObjectDestroyed {
        kind: object.kind,
        pos,
        scale: object.scale,
        by: hit.weapon,
    });
    log::debug!(
        "{} #{} destroyed by {}",
        object.kind.as_str(),
        object.id,
        hit.weapon.as_str()
    );

    if hit.weapon != WeaponKind::Laser {
        return;
    }
    let count = object
        .kind
        .fragment_count(object.scale, level.tuning.celestial.fragment_threshold);
    if count == 0 {
        return;
    }

    let scale = object.scale / count as f32;
    let ship_pos = level.ship.pos();
    for _ in 0..count {
        let spin = fragment_rotation_speed(&mut level.rng);
        level.spawn_object(
            CelestialKind::ChildAsteroid,
            SpawnParams::fragment(ship_pos, pos, scale, spin),
        );
    }
    level.events.push(GameEvent::FragmentsSpawned { count, pos });
}

fn evaluate_outcome(level: &mut Level) {
    if level.outcome.is_some() {
        return;
    }

    if level.counts.is_clear() {
        level.outcome = Some(LevelOutcome::Won);
        level.events.push(GameEvent::LevelWon {
            level: level.level_index(),
        });
        log::info!("Level {} cleared", level.level_index());
        let delay = level.tuning.level.advance_delay_ms;
        level.schedule(
            delay,
            DeferredAction::AdvanceLevel,
            Guard::Outcome(LevelOutcome::Won),
        );
    } else if level.lives < 1 {
        game_over(level, GameOverReason::OutOfLives);
    } else if level.alive
        && level.ship.rockets_remaining() < 1
        && level.ship.rockets_in_flight() == 0
        && level.counts.comets > 0
    {
        game_over(level, GameOverReason::OutOfRockets);
    }
}

fn game_over(level: &mut Level, reason: GameOverReason) {
    level.active = false;
    level.outcome = Some(LevelOutcome::GameOver);
    level.events.push(GameEvent::GameOver { reason });
    log::info!("Game over on level {}: {}", level.level_index(), reason.message());
    let delay = level.tuning.level.restart_delay_ms;
    level.schedule(
        delay,
        DeferredAction::Restart,
        Guard::Outcome(LevelOutcome::GameOver),
    );
}
