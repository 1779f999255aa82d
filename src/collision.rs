//! Kind-dispatched collision resolution and world-bounds reclamation.
//!
//! Collision groups restrict reported pairs to exactly five combinations:
//! player-bullet against enemy, elite, or boss, and the player against enemy
//! or boss bullets. One resolution system consumes every
//! `CollisionEvent::Started` and dispatches on the pooled kind of each side,
//! so adding a hostile kind means extending one `match`, not adding a system.
//!
//! Idempotency rules enforced here:
//! - a bullet credits at most one hit per pass (`spent` set) and is released
//!   exactly once (the pool release is the gate for stale events);
//! - an elite or boss that is no longer live absorbs nothing — its health
//!   never goes below the killing hit and its score is awarded exactly once;
//! - the player only takes a hit while the lifecycle phase accepts one.

use crate::config::GameConfig;
use crate::effects::spawn_explosion_burst;
use crate::enemy::Health;
use crate::player::{Player, PlayerLives, PlayerPhase, PlayerScore};
use crate::pool::{self, PoolKind, Pooled, Pools};
use crate::scheduler::AttackScheduler;
use crate::session::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

// ── Resolution ────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn collision_resolution_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut pools: ResMut<Pools>,
    mut scheduler: ResMut<AttackScheduler>,
    mut score: ResMut<PlayerScore>,
    mut lives: ResMut<PlayerLives>,
    mut phase: ResMut<PlayerPhase>,
    q_pooled: Query<(&Pooled, &Transform)>,
    q_player: Query<&Transform, With<Player>>,
    mut q_health: Query<&mut Health>,
    config: Res<GameConfig>,
) {
    // Bullets that already landed a hit this pass.
    let mut spent: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let CollisionEvent::Started(e1, e2, _) = event else {
            continue;
        };

        let k1 = q_pooled.get(*e1).map(|(p, _)| p.kind).ok();
        let k2 = q_pooled.get(*e2).map(|(p, _)| p.kind).ok();

        match (k1, k2) {
            (Some(PoolKind::PlayerBullet), Some(hostile_kind)) if is_hostile(hostile_kind) => {
                resolve_bullet_hit(
                    &mut commands,
                    *e1,
                    *e2,
                    hostile_kind,
                    &mut spent,
                    &mut pools,
                    &mut scheduler,
                    &mut score,
                    &q_pooled,
                    &mut q_health,
                    &config,
                );
            }
            (Some(hostile_kind), Some(PoolKind::PlayerBullet)) if is_hostile(hostile_kind) => {
                resolve_bullet_hit(
                    &mut commands,
                    *e2,
                    *e1,
                    hostile_kind,
                    &mut spent,
                    &mut pools,
                    &mut scheduler,
                    &mut score,
                    &q_pooled,
                    &mut q_health,
                    &config,
                );
            }
            (None, Some(bullet_kind)) if is_hostile_bullet(bullet_kind) => {
                if q_player.get(*e1).is_ok() {
                    resolve_player_hit(
                        &mut commands,
                        *e2,
                        bullet_kind,
                        &mut spent,
                        &mut pools,
                        &mut lives,
                        &mut phase,
                        &q_player,
                        &config,
                    );
                }
            }
            (Some(bullet_kind), None) if is_hostile_bullet(bullet_kind) => {
                if q_player.get(*e2).is_ok() {
                    resolve_player_hit(
                        &mut commands,
                        *e1,
                        bullet_kind,
                        &mut spent,
                        &mut pools,
                        &mut lives,
                        &mut phase,
                        &q_player,
                        &config,
                    );
                }
            }
            _ => {}
        }
    }
}

#[inline]
fn is_hostile(kind: PoolKind) -> bool {
    matches!(kind, PoolKind::Enemy | PoolKind::Elite | PoolKind::Boss)
}

#[inline]
fn is_hostile_bullet(kind: PoolKind) -> bool {
    matches!(kind, PoolKind::EnemyBullet | PoolKind::BossBullet)
}

/// A player bullet struck a hostile. Release the bullet first, then apply
/// damage; a stale bullet or an already-dead hostile is a no-op.
#[allow(clippy::too_many_arguments)]
fn resolve_bullet_hit(
    commands: &mut Commands,
    bullet: Entity,
    hostile: Entity,
    hostile_kind: PoolKind,
    spent: &mut HashSet<Entity>,
    pools: &mut Pools,
    scheduler: &mut AttackScheduler,
    score: &mut PlayerScore,
    q_pooled: &Query<(&Pooled, &Transform)>,
    q_health: &mut Query<&mut Health>,
    config: &GameConfig,
) {
    if !spent.insert(bullet) {
        return;
    }
    if !pools.get_mut(PoolKind::PlayerBullet).release(bullet) {
        // Stale event: the bullet left play before this pair was reported.
        return;
    }
    pool::deactivate(commands, bullet);

    if !pools.get(hostile_kind).is_live(hostile) {
        return;
    }

    let hit_pos = q_pooled
        .get(hostile)
        .map(|(_, t)| t.translation.truncate())
        .unwrap_or(Vec2::ZERO);

    match hostile_kind {
        PoolKind::Enemy => {
            pools.get_mut(PoolKind::Enemy).release(hostile);
            pool::deactivate(commands, hostile);
            score.award_kill(config.enemy_score);
            spawn_explosion_burst(commands, hit_pos);
        }
        PoolKind::Elite | PoolKind::Boss => {
            let Ok(mut health) = q_health.get_mut(hostile) else {
                return;
            };
            health.hp -= 1;
            if health.hp > 0 {
                return;
            }
            pools.get_mut(hostile_kind).release(hostile);
            pool::deactivate(commands, hostile);
            // No-op for elites: only the boss registers attack timers.
            scheduler.cancel_owner(hostile);
            let points = if hostile_kind == PoolKind::Boss {
                config.boss_score
            } else {
                config.elite_score
            };
            score.award_kill(points);
            spawn_explosion_burst(commands, hit_pos);
            info!("hostile destroyed for {points} points");
        }
        _ => {}
    }
}

/// A hostile bullet struck the player. The bullet is always consumed; the
/// hit itself only lands while the lifecycle phase accepts one.
#[allow(clippy::too_many_arguments)]
fn resolve_player_hit(
    commands: &mut Commands,
    bullet: Entity,
    bullet_kind: PoolKind,
    spent: &mut HashSet<Entity>,
    pools: &mut Pools,
    lives: &mut PlayerLives,
    phase: &mut PlayerPhase,
    q_player: &Query<&Transform, With<Player>>,
    config: &GameConfig,
) {
    if !spent.insert(bullet) {
        return;
    }
    if !pools.get_mut(bullet_kind).release(bullet) {
        return;
    }
    pool::deactivate(commands, bullet);

    if !phase.accepts_hits() {
        return;
    }

    lives.remaining -= 1;
    *phase = PlayerPhase::Exploding {
        remaining_secs: config.player_explosion_secs,
    };
    if let Ok(transform) = q_player.single() {
        spawn_explosion_burst(commands, transform.translation.truncate());
    }
    info!("player hit; {} lives remaining", lives.remaining);
}

// ── World bounds ──────────────────────────────────────────────────────────────

/// Release any active pooled entity that drifted past the field plus margin.
/// Unconditional for every kind: missed bullets, leaked enemies, strays.
pub fn out_of_bounds_system(
    mut commands: Commands,
    q_active: Query<(Entity, &Transform, &Pooled), Without<ColliderDisabled>>,
    mut pools: ResMut<Pools>,
    config: Res<GameConfig>,
) {
    let x_limit = config.field_half_width + config.oob_margin;
    let y_limit = config.field_half_height + config.oob_margin;

    for (entity, transform, pooled) in q_active.iter() {
        let p = transform.translation;
        if p.x.abs() > x_limit || p.y.abs() > y_limit {
            if pools.get_mut(pooled.kind).release(entity) {
                pool::deactivate(&mut commands, entity);
            }
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CollisionEvent>().add_systems(
            PostUpdate,
            (collision_resolution_system, out_of_bounds_system)
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
