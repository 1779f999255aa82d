//! Fixed-capacity object pools over pre-spawned entities.
//!
//! Every recyclable entity category (bullets, enemies, elites, the boss) is
//! backed by an arena of entities spawned once at session init and an
//! [`EntityPool`] free-list. `acquire` pops a free slot, `release` pushes it
//! back — O(1) either way, no allocation during play, and a full pool simply
//! returns `None` so the caller drops the spawn or shot.
//!
//! The ECS half of activation toggles `ColliderDisabled` and `Visibility`
//! and repositions the slot; the pool half tracks ownership. An entity is
//! either live (owned by the simulation) or free (owned by the pool), never
//! both: [`EntityPool::release`] is idempotent and refuses entities it does
//! not consider live, which is what makes double-kill races harmless.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

// ── Pool identity ─────────────────────────────────────────────────────────────

/// Entity categories with their own fixed-capacity pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    PlayerBullet,
    EnemyBullet,
    BossBullet,
    Enemy,
    Elite,
    Boss,
}

impl PoolKind {
    /// Stable index into the per-kind pool array.
    #[inline]
    fn index(self) -> usize {
        match self {
            PoolKind::PlayerBullet => 0,
            PoolKind::EnemyBullet => 1,
            PoolKind::BossBullet => 2,
            PoolKind::Enemy => 3,
            PoolKind::Elite => 4,
            PoolKind::Boss => 5,
        }
    }

    /// All kinds, in pool-array order.
    pub const ALL: [PoolKind; 6] = [
        PoolKind::PlayerBullet,
        PoolKind::EnemyBullet,
        PoolKind::BossBullet,
        PoolKind::Enemy,
        PoolKind::Elite,
        PoolKind::Boss,
    ];
}

/// Attached to every pooled entity so collision resolution and bounds
/// checking can dispatch on kind without per-kind duplicated handlers.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pooled {
    pub kind: PoolKind,
}

/// Marker for player bullets (fired straight up).
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerBullet;

/// Marker for elite bullets (fired straight down).
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyBullet;

/// Marker for boss bullets (aimed at the player at fire time).
#[derive(Component, Debug, Clone, Copy)]
pub struct BossBullet;

// ── Free-list pool ────────────────────────────────────────────────────────────

/// One category's arena bookkeeping: a free-index stack plus the live set.
#[derive(Debug, Default)]
pub struct EntityPool {
    capacity: usize,
    free: Vec<Entity>,
    live: HashSet<Entity>,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: Vec::with_capacity(capacity),
            live: HashSet::with_capacity(capacity),
        }
    }

    /// Hand a pre-spawned slot to the pool at init time.
    ///
    /// Slots beyond the configured capacity are ignored.
    pub fn preload(&mut self, entity: Entity) {
        if self.free.len() + self.live.len() < self.capacity {
            self.free.push(entity);
        }
    }

    /// Pop a free slot, or `None` when every slot is live.
    ///
    /// Exhaustion is not an error: the caller skips its spawn or shot and
    /// state stays unchanged.
    pub fn acquire(&mut self) -> Option<Entity> {
        let entity = self.free.pop()?;
        self.live.insert(entity);
        Some(entity)
    }

    /// Return a slot to the pool. Idempotent: releasing an entity that is
    /// not live (already released, or never acquired) returns `false` and
    /// changes nothing.
    pub fn release(&mut self, entity: Entity) -> bool {
        if self.live.remove(&entity) {
            self.free.push(entity);
            true
        } else {
            false
        }
    }

    /// Move every live slot back to the free list, returning the reclaimed
    /// entities so the caller can park them. Used by the session reset.
    pub fn drain_live(&mut self) -> Vec<Entity> {
        let drained: Vec<Entity> = self.live.drain().collect();
        self.free.extend(drained.iter().copied());
        drained
    }

    /// Whether the entity is currently owned by the simulation.
    #[inline]
    pub fn is_live(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ── Pools resource ────────────────────────────────────────────────────────────

/// All six pools, owned by the session.
#[derive(Resource, Debug)]
pub struct Pools {
    pools: [EntityPool; 6],
}

impl Pools {
    /// Build empty pools sized from config; slots are preloaded by the
    /// session init once the arena entities exist.
    pub fn new(config: &crate::config::GameConfig) -> Self {
        Self {
            pools: [
                EntityPool::new(config.player_bullet_pool),
                EntityPool::new(config.enemy_bullet_pool),
                EntityPool::new(config.boss_bullet_pool),
                EntityPool::new(config.enemy_pool),
                EntityPool::new(config.elite_pool),
                EntityPool::new(config.boss_pool),
            ],
        }
    }

    #[inline]
    pub fn get(&self, kind: PoolKind) -> &EntityPool {
        &self.pools[kind.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, kind: PoolKind) -> &mut EntityPool {
        &mut self.pools[kind.index()]
    }
}

// ── ECS activation ────────────────────────────────────────────────────────────

/// Wake an acquired slot: reposition, assign velocity, enable its collider
/// and make it visible. Runs through deferred commands, so the slot is
/// physically active from the next schedule apply.
pub fn activate(commands: &mut Commands, entity: Entity, translation: Vec3, linvel: Vec2) {
    commands
        .entity(entity)
        .insert((
            Transform::from_translation(translation),
            Velocity {
                linvel,
                angvel: 0.0,
            },
            Visibility::Visible,
        ))
        .remove::<ColliderDisabled>();
}

/// Park a released slot: hide it, disable its collider, zero its velocity.
pub fn deactivate(commands: &mut Commands, entity: Entity) {
    commands
        .entity(entity)
        .insert((ColliderDisabled, Visibility::Hidden, Velocity::zero()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> (World, Vec<Entity>) {
        let mut world = World::new();
        let ids = (0..n).map(|_| world.spawn_empty().id()).collect();
        (world, ids)
    }

    #[test]
    fn acquire_hands_out_each_slot_once() {
        let (_world, ids) = entities(3);
        let mut pool = EntityPool::new(3);
        for &e in &ids {
            pool.preload(e);
        }

        let mut seen = HashSet::new();
        for _ in 0..3 {
            let e = pool.acquire().unwrap();
            assert!(seen.insert(e), "same slot handed out twice");
        }
        assert_eq!(pool.live_count(), 3);
        assert!(pool.acquire().is_none(), "full pool must return None");
    }

    #[test]
    fn live_count_never_exceeds_capacity() {
        let (_world, ids) = entities(8);
        let mut pool = EntityPool::new(4);
        for &e in &ids {
            pool.preload(e); // preloads beyond capacity are ignored
        }

        while pool.acquire().is_some() {}
        assert_eq!(pool.live_count(), 4);
        assert!(pool.live_count() <= pool.capacity());
    }

    #[test]
    fn release_recycles_the_slot() {
        let (_world, ids) = entities(1);
        let mut pool = EntityPool::new(1);
        pool.preload(ids[0]);

        let e = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());
        assert!(pool.release(e));
        let again = pool.acquire().unwrap();
        assert_eq!(e, again);
    }

    #[test]
    fn release_is_idempotent() {
        let (_world, ids) = entities(2);
        let mut pool = EntityPool::new(2);
        pool.preload(ids[0]);
        pool.preload(ids[1]);

        let e = pool.acquire().unwrap();
        assert!(pool.release(e));
        assert!(!pool.release(e), "second release must be a no-op");
        assert_eq!(pool.live_count(), 0);
        // The slot must not be duplicated onto the free list.
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn releasing_a_foreign_entity_is_a_no_op() {
        let (_world, ids) = entities(2);
        let mut pool = EntityPool::new(1);
        pool.preload(ids[0]);

        assert!(!pool.release(ids[1]));
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn pools_are_sized_from_config() {
        let config = crate::config::GameConfig::default();
        let pools = Pools::new(&config);
        assert_eq!(pools.get(PoolKind::PlayerBullet).capacity(), 10);
        assert_eq!(pools.get(PoolKind::EnemyBullet).capacity(), 40);
        assert_eq!(pools.get(PoolKind::Boss).capacity(), 1);
    }
}
