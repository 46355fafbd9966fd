//! A full game: a sequence of levels
//!
//! The session owns the current `Level` and replaces it when the level asks
//! to advance or restart.

use super::state::{GameEvent, Level, Transition};
use super::tick::ControlState;
use crate::tuning::{RocketPolicy, Tuning};

#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    seed: u64,
    level: Level,
    /// Restarts so far; varies the layout of replayed levels
    attempt: u32,
    finished: bool,
    events: Vec<GameEvent>,
}

/// Per-level seed so replays of a session are identical
fn level_seed(seed: u64, level: u32, attempt: u32) -> u64 {
    seed ^ (level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (attempt as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let rockets = tuning.level.rockets;
        let level = Level::new(1, &tuning, rockets, level_seed(seed, 1, 0));
        let mut session = Self {
            tuning,
            seed,
            level,
            attempt: 0,
            finished: false,
            events: Vec::new(),
        };
        session.collect_events();
        session
    }

    /// Tick the current level and apply any transition it requested
    pub fn update(&mut self, controls: &ControlState) {
        if self.finished {
            return;
        }
        self.level.update(controls);
        self.collect_events();

        match self.level.take_transition() {
            Some(Transition::Advance) => self.advance(),
            Some(Transition::Restart) => self.restart(),
            None => {}
        }
    }

    fn advance(&mut self) {
        let finished_level = self.level.level_index();
        if finished_level >= self.tuning.level.max_levels {
            self.finished = true;
            self.events.push(GameEvent::GameWon {
                level: finished_level,
            });
            log::info!("All {} levels cleared", finished_level);
            return;
        }

        let next = finished_level + 1;
        let rockets = match self.tuning.level.rocket_policy {
            RocketPolicy::Reset => self.tuning.level.rockets,
            // Never start a level without a rocket per comet
            RocketPolicy::CarryOver => self
                .level
                .rockets_remaining()
                .max(self.tuning.level.comets_for(next)),
        };
        self.level = Level::new(
            next,
            &self.tuning,
            rockets,
            level_seed(self.seed, next, self.attempt),
        );
        self.collect_events();
    }

    fn restart(&mut self) {
        self.attempt += 1;
        log::info!("Restarting (attempt {})", self.attempt + 1);
        self.level = Level::new(
            1,
            &self.tuning,
            self.tuning.level.rockets,
            level_seed(self.seed, 1, self.attempt),
        );
        self.collect_events();
    }

    fn collect_events(&mut self) {
        self.events.extend(self.level.drain_events());
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Last level won; nothing left to simulate
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::celestial::CelestialKind;
    use crate::sim::state::GameOverReason;

    /// Tuning whose levels contain nothing, so each one is won immediately
    fn empty_levels() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.level.asteroids_base = 0;
        tuning.level.asteroids_per_level = 0;
        tuning.level.comets_per_level = 0;
        tuning
    }

    fn run(session: &mut Session, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            session.update(&ControlState::default());
            events.extend(session.drain_events());
        }
        events
    }

    #[test]
    fn test_session_starts_level_one() {
        let mut session = Session::new(Tuning::default(), 7);
        assert_eq!(session.level().level_index(), 1);
        assert_eq!(session.level().counts().asteroids, 5);
        assert_eq!(session.level().counts().comets, 1);
        let events = session.drain_events();
        assert_eq!(events[0], GameEvent::LevelStarted { level: 1 });
    }

    #[test]
    fn test_session_advances_to_next_level() {
        let mut session = Session::new(empty_levels(), 7);
        let events = run(&mut session, 61);
        assert!(events.contains(&GameEvent::LevelWon { level: 1 }));
        assert!(events.contains(&GameEvent::LevelStarted { level: 2 }));
        assert_eq!(session.level().level_index(), 2);
        assert!(session.level().is_active());
    }

    #[test]
    fn test_session_finishes_after_last_level() {
        let mut tuning = empty_levels();
        tuning.level.max_levels = 2;
        let mut session = Session::new(tuning, 7);

        let events = run(&mut session, 200);
        assert!(session.is_finished());
        assert!(events.contains(&GameEvent::GameWon { level: 2 }));
        assert!(!events.contains(&GameEvent::LevelStarted { level: 3 }));

        // Finished sessions ignore further updates
        assert!(run(&mut session, 10).is_empty());
    }

    #[test]
    fn test_session_restarts_after_game_over() {
        let mut tuning = Tuning::default();
        tuning.level.rockets = 0;
        let mut session = Session::new(tuning, 7);

        let events = run(&mut session, 1);
        assert!(events.contains(&GameEvent::GameOver {
            reason: GameOverReason::OutOfRockets
        }));

        // Restart fires after 3000 ms and builds a fresh level 1
        let events = run(&mut session, 180);
        assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
        assert!(session.level().is_active());
        assert_eq!(session.level().lives(), 3);
    }

    #[test]
    fn test_rocket_policy() {
        let mut tuning = empty_levels();
        tuning.level.rockets = 1;
        tuning.level.comets_per_level = 1;
        tuning.level.max_comets = 4;

        let mut session = Session::new(tuning.clone(), 7);
        session.level.comets.clear();
        session.level.counts.comets = 0;
        run(&mut session, 61);
        // Carried over, topped up to the comet count of level 2
        assert_eq!(session.level().level_index(), 2);
        assert_eq!(session.level().rockets_remaining(), 2);

        tuning.level.rocket_policy = RocketPolicy::Reset;
        let mut session = Session::new(tuning, 7);
        session.level.comets.clear();
        session.level.counts.comets = 0;
        run(&mut session, 61);
        assert_eq!(session.level().rockets_remaining(), 1);
        assert_eq!(
            session.level().counts().comets,
            session.level().comets().len() as u32
        );
        assert!(session.level().objects().all(|o| o.kind == CelestialKind::Comet));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut a = Session::new(Tuning::default(), 4242);
        let mut b = Session::new(Tuning::default(), 4242);
        let ea = run(&mut a, 300);
        let eb = run(&mut b, 300);
        assert_eq!(ea, eb);
        let pa: Vec<_> = a.level().objects().map(|o| o.pos()).collect();
        let pb: Vec<_> = b.level().objects().map(|o| o.pos()).collect();
        assert_eq!(pa, pb);
    }
}
