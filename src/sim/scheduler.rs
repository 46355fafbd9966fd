//! One-shot deferred actions on the simulation clock
//!
//! Respawns, invulnerability expiry, level advance and restart are queued as
//! `(fire_at, action, guard)` entries. The level re-checks the guard when an
//! entry comes due, so a timer that outlives its reason does nothing.

use super::state::LevelOutcome;

/// What to do when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    EndInvulnerability,
    RespawnShip,
    AdvanceLevel,
    Restart,
}

/// Condition that must still hold when the action fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The ship that scheduled the action is still the current ship
    ShipGeneration(u32),
    /// The level is still simulating
    LevelActive,
    /// The level ended with this outcome
    Outcome(LevelOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    pub fire_at: u64,
    pub action: DeferredAction,
    pub guard: Guard,
}

/// Pending deferred actions, kept in firing order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<ScheduledAction>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay_ticks` after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, action: DeferredAction, guard: Guard) {
        let entry = ScheduledAction {
            fire_at: now + delay_ticks,
            action,
            guard,
        };
        // Insert after every entry due at the same tick (FIFO among equals)
        let idx = self.pending.partition_point(|e| e.fire_at <= entry.fire_at);
        self.pending.insert(idx, entry);
    }

    /// Remove and return every entry due at or before `now`
    pub fn take_due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let due = self.pending.partition_point(|e| e.fire_at <= now);
        self.pending.drain(..due).collect()
    }

    pub fn pending(&self) -> &[ScheduledAction] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 10, DeferredAction::RespawnShip, Guard::LevelActive);
        scheduler.schedule(0, 5, DeferredAction::EndInvulnerability, Guard::ShipGeneration(1));
        scheduler.schedule(0, 10, DeferredAction::AdvanceLevel, Guard::LevelActive);

        assert!(scheduler.take_due(4).is_empty());

        let due = scheduler.take_due(5);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].action, DeferredAction::EndInvulnerability);

        let due = scheduler.take_due(20);
        let actions: Vec<_> = due.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![DeferredAction::RespawnShip, DeferredAction::AdvanceLevel]
        );
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, 60, DeferredAction::Restart, Guard::Outcome(LevelOutcome::GameOver));
        assert_eq!(scheduler.pending()[0].fire_at, 160);
        assert!(scheduler.take_due(159).is_empty());
        assert_eq!(scheduler.take_due(160).len(), 1);
    }
}
