//! Session-owned attack timer registry.
//!
//! Boss attack cadences are not stored on the boss entity; they live here as
//! `(owner, kind)` entries so that cancellation at boss death is a registry
//! operation instead of a pointer chase, and a timer that outlives its owner
//! for a frame fires into a liveness check rather than a dangling entity.
//!
//! Countdown style matches the rest of the crate: `remaining` seconds
//! decremented by the frame delta, reset to `interval` for repeating entries.

use bevy::prelude::*;

/// What a due scheduler entry should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    /// Single aimed shot from the boss main gun.
    BossMainGun,
    /// Downward fan of boss bullets.
    BossLaserSweep,
}

#[derive(Debug)]
struct ScheduledAttack {
    owner: Entity,
    kind: AttackKind,
    interval: f32,
    remaining: f32,
    repeating: bool,
    cancelled: bool,
}

/// Registry of pending attack timers, ticked once per frame.
#[derive(Resource, Debug, Default)]
pub struct AttackScheduler {
    entries: Vec<ScheduledAttack>,
}

impl AttackScheduler {
    /// Register a repeating trigger. First firing happens one full interval
    /// after registration.
    pub fn register_repeating(&mut self, owner: Entity, kind: AttackKind, interval: f32) {
        self.entries.push(ScheduledAttack {
            owner,
            kind,
            interval,
            remaining: interval,
            repeating: true,
            cancelled: false,
        });
    }

    /// Register a one-shot trigger firing once after `delay` seconds.
    pub fn register_once(&mut self, owner: Entity, kind: AttackKind, delay: f32) {
        self.entries.push(ScheduledAttack {
            owner,
            kind,
            interval: delay,
            remaining: delay,
            repeating: false,
            cancelled: false,
        });
    }

    /// Cancel every entry belonging to `owner`. Idempotent: cancelling an
    /// owner with no entries, or one already cancelled, is a no-op.
    pub fn cancel_owner(&mut self, owner: Entity) {
        for entry in self.entries.iter_mut().filter(|e| e.owner == owner) {
            entry.cancelled = true;
        }
    }

    /// Number of entries still scheduled (not cancelled).
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.cancelled).count()
    }

    /// Advance all timers by `dt` seconds and collect the due `(owner, kind)`
    /// pairs. Cancelled entries and fired one-shots are dropped here.
    pub fn tick(&mut self, dt: f32) -> Vec<(Entity, AttackKind)> {
        let mut due = Vec::new();
        for entry in self.entries.iter_mut() {
            if entry.cancelled {
                continue;
            }
            entry.remaining -= dt;
            if entry.remaining <= 0.0 {
                due.push((entry.owner, entry.kind));
                if entry.repeating {
                    entry.remaining += entry.interval;
                } else {
                    entry.cancelled = true;
                }
            }
        }
        self.entries.retain(|e| !e.cancelled);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> (World, Entity) {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        (world, e)
    }

    #[test]
    fn repeating_entry_fires_at_its_cadence() {
        let (_world, boss) = owner();
        let mut scheduler = AttackScheduler::default();
        scheduler.register_repeating(boss, AttackKind::BossMainGun, 0.5);

        assert!(scheduler.tick(0.4).is_empty());
        let due = scheduler.tick(0.2);
        assert_eq!(due, vec![(boss, AttackKind::BossMainGun)]);

        // Cadence is preserved across firings, not restarted from the tick.
        let due = scheduler.tick(0.5);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn one_shot_fires_exactly_once() {
        let (_world, boss) = owner();
        let mut scheduler = AttackScheduler::default();
        scheduler.register_once(boss, AttackKind::BossLaserSweep, 1.0);

        assert!(scheduler.tick(0.9).is_empty());
        assert_eq!(scheduler.tick(0.2).len(), 1);
        assert!(scheduler.tick(10.0).is_empty());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn cancel_owner_stops_all_of_its_timers() {
        let (mut world, boss) = owner();
        let other = world.spawn_empty().id();
        let mut scheduler = AttackScheduler::default();
        scheduler.register_repeating(boss, AttackKind::BossMainGun, 0.5);
        scheduler.register_repeating(boss, AttackKind::BossLaserSweep, 6.0);
        scheduler.register_repeating(other, AttackKind::BossMainGun, 0.5);

        scheduler.cancel_owner(boss);
        assert_eq!(scheduler.active_count(), 1);

        let due = scheduler.tick(10.0);
        assert!(due.iter().all(|(o, _)| *o == other));
    }

    #[test]
    fn cancel_is_idempotent() {
        let (_world, boss) = owner();
        let mut scheduler = AttackScheduler::default();
        scheduler.register_repeating(boss, AttackKind::BossMainGun, 0.5);

        scheduler.cancel_owner(boss);
        scheduler.cancel_owner(boss); // second cancel is a no-op
        assert_eq!(scheduler.active_count(), 0);
        assert!(scheduler.tick(10.0).is_empty());
    }

    #[test]
    fn multiple_intervals_elapsing_in_one_tick_fire_once() {
        // A long frame fires the entry once; the deficit carries into the
        // next interval rather than bursting multiple shots.
        let (_world, boss) = owner();
        let mut scheduler = AttackScheduler::default();
        scheduler.register_repeating(boss, AttackKind::BossMainGun, 0.5);

        assert_eq!(scheduler.tick(1.6).len(), 1);
    }
}
