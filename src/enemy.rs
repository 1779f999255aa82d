//! Hostile entities: spawn cadences, descend-and-hold behavior, elite fire,
//! and the scheduler-driven boss attacks.
//!
//! Three spawn triggers run off [`SpawnTimers`] countdowns, independent of
//! how many hostiles are active:
//!
//! | Trigger | Cadence | Placement |
//! |---------|---------|-----------|
//! | basic enemy | repeating, 1 s | random X across the field, top edge |
//! | elite wave | repeating, ~12 s | fixed pair at ±`elite_pair_x` |
//! | boss | one-shot after ~60 s | fixed spawn point at top centre |
//!
//! A due trigger always resets its countdown, even when the pool is
//! exhausted — the spawn is dropped, the cadence is not.

use crate::config::GameConfig;
use crate::constants::{Z_BULLET, Z_ENEMY};
use crate::player::Player;
use crate::pool::{self, PoolKind, Pools};
use crate::scheduler::{AttackKind, AttackScheduler};
use crate::session::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for basic enemies: constant downward drift, one-hit kill, no state.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Marker for elites: multi-hit, descend to the hold-line, then fire on a
/// per-entity cooldown.
#[derive(Component, Debug, Clone, Copy)]
pub struct Elite;

/// Marker for the boss: elite-class hull with scheduler-attached attacks.
#[derive(Component, Debug, Clone, Copy)]
pub struct Boss;

/// Remaining hits before destruction. Decremented by exactly 1 per confirmed
/// hit; crossing 0 releases the entity exactly once.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: i32,
}

/// Per-entity fire cooldown; decremented each frame, reset on every shot
/// attempt (fired or dropped).
#[derive(Component, Debug, Clone, Copy)]
pub struct FireCooldown {
    pub timer: f32,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Countdown state for the three spawn triggers.
#[derive(Resource, Debug, Clone)]
pub struct SpawnTimers {
    /// Seconds until the next basic enemy spawn.
    pub enemy_secs: f32,
    /// Seconds until the next elite wave.
    pub elite_secs: f32,
    /// One-shot boss entrance countdown; `None` once consumed.
    pub boss_delay: Option<f32>,
}

impl SpawnTimers {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            enemy_secs: config.enemy_spawn_interval,
            elite_secs: config.elite_wave_interval,
            boss_delay: Some(config.boss_spawn_delay),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Unit aim vector from `from` toward `to`, falling back to straight down
/// when the two coincide. Evaluated once per shot: homing-at-fire.
pub fn aim_at(from: Vec2, to: Vec2) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::NEG_Y
    } else {
        dir
    }
}

/// Direction of the `i`-th bullet in a downward fan of `count` bullets
/// spread across ±`half_angle` radians around straight down.
fn fan_direction(i: u32, count: u32, half_angle: f32) -> Vec2 {
    let angle = if count <= 1 {
        0.0
    } else {
        -half_angle + (2.0 * half_angle) * (i as f32 / (count - 1) as f32)
    };
    Vec2::new(angle.sin(), -angle.cos())
}

// ── Spawn systems ─────────────────────────────────────────────────────────────

/// Repeating basic-enemy spawner: random X within the field margins, enters
/// at the top, drifts straight down.
pub fn enemy_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timers: ResMut<SpawnTimers>,
    mut pools: ResMut<Pools>,
    config: Res<GameConfig>,
) {
    timers.enemy_secs -= time.delta_secs();
    if timers.enemy_secs > 0.0 {
        return;
    }
    timers.enemy_secs += config.enemy_spawn_interval;

    let Some(enemy) = pools.get_mut(PoolKind::Enemy).acquire() else {
        // Pool exhausted: spawn dropped, cadence kept.
        return;
    };

    let limit = config.field_half_width - config.enemy_spawn_x_margin;
    let x = rand::thread_rng().gen_range(-limit..=limit);
    pool::activate(
        &mut commands,
        enemy,
        Vec3::new(x, config.top_spawn_y, Z_ENEMY),
        Vec2::new(0.0, -config.enemy_speed),
    );
}

/// Repeating elite-wave spawner: one fixed pair per wave at ±`elite_pair_x`.
/// Each activated elite gets fresh health and a full fire cooldown.
pub fn elite_wave_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timers: ResMut<SpawnTimers>,
    mut pools: ResMut<Pools>,
    config: Res<GameConfig>,
) {
    timers.elite_secs -= time.delta_secs();
    if timers.elite_secs > 0.0 {
        return;
    }
    timers.elite_secs += config.elite_wave_interval;

    for x in [-config.elite_pair_x, config.elite_pair_x] {
        let Some(elite) = pools.get_mut(PoolKind::Elite).acquire() else {
            // Partial waves are fine: whichever slot was free still spawns.
            continue;
        };
        pool::activate(
            &mut commands,
            elite,
            Vec3::new(x, config.top_spawn_y, Z_ENEMY),
            Vec2::new(0.0, -config.elite_speed),
        );
        commands.entity(elite).insert((
            Health { hp: config.elite_hp },
            FireCooldown {
                timer: config.elite_fire_cooldown,
            },
        ));
    }
}

/// One-shot boss entrance. Registers the boss's main-gun and special-attack
/// cadences with the session scheduler; both are cancelled at boss death.
pub fn boss_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timers: ResMut<SpawnTimers>,
    mut pools: ResMut<Pools>,
    mut scheduler: ResMut<AttackScheduler>,
    config: Res<GameConfig>,
) {
    let Some(delay) = timers.boss_delay.as_mut() else {
        return;
    };
    *delay -= time.delta_secs();
    if *delay > 0.0 {
        return;
    }
    timers.boss_delay = None;

    let Some(boss) = pools.get_mut(PoolKind::Boss).acquire() else {
        return;
    };
    pool::activate(
        &mut commands,
        boss,
        Vec3::new(0.0, config.top_spawn_y, Z_ENEMY),
        Vec2::new(0.0, -config.boss_speed),
    );
    commands
        .entity(boss)
        .insert(Health { hp: config.boss_hp });

    scheduler.register_repeating(boss, AttackKind::BossMainGun, config.boss_fire_cooldown);
    scheduler.register_repeating(boss, AttackKind::BossLaserSweep, config.boss_laser_interval);
    info!("boss entered the field");
}

// ── Behavior systems ──────────────────────────────────────────────────────────

/// Elites and the boss descend until the hold-line, then stop vertically and
/// stay put while their attacks run.
#[allow(clippy::type_complexity)]
pub fn descend_hold_system(
    mut q: Query<
        (&Transform, &mut Velocity),
        (
            Or<(With<Elite>, With<Boss>)>,
            Without<ColliderDisabled>,
        ),
    >,
    config: Res<GameConfig>,
) {
    for (transform, mut velocity) in q.iter_mut() {
        if transform.translation.y <= config.hold_line_y && velocity.linvel.y < 0.0 {
            velocity.linvel.y = 0.0;
        }
    }
}

/// While holding, each elite fires straight down whenever its cooldown
/// drains. A full bullet pool drops the shot but still resets the cooldown,
/// so the cadence is preserved.
pub fn elite_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    mut q_elites: Query<
        (&Transform, &mut FireCooldown),
        (With<Elite>, Without<ColliderDisabled>),
    >,
    mut pools: ResMut<Pools>,
    config: Res<GameConfig>,
) {
    let dt = time.delta_secs();
    for (transform, mut cooldown) in q_elites.iter_mut() {
        cooldown.timer -= dt;
        if cooldown.timer > 0.0 {
            continue;
        }
        // Only fire from the hold position, not mid-descent.
        if transform.translation.y > config.hold_line_y {
            continue;
        }
        cooldown.timer = config.elite_fire_cooldown;

        let Some(bullet) = pools.get_mut(PoolKind::EnemyBullet).acquire() else {
            continue;
        };
        let muzzle = transform.translation.truncate() - Vec2::new(0.0, 20.0);
        pool::activate(
            &mut commands,
            bullet,
            muzzle.extend(Z_BULLET),
            Vec2::new(0.0, -config.enemy_bullet_speed),
        );
    }
}

/// Drain the attack scheduler and execute due boss attacks.
///
/// Attacks only run from the hold position, same as elite fire: a due entry
/// while the boss is still descending is skipped, with the cadence ticking
/// on. A due entry whose owner is no longer an active boss (already
/// defeated, collider disabled) is likewise a silent no-op.
#[allow(clippy::type_complexity)]
pub fn boss_attack_system(
    mut commands: Commands,
    time: Res<Time>,
    mut scheduler: ResMut<AttackScheduler>,
    q_boss: Query<&Transform, (With<Boss>, Without<ColliderDisabled>)>,
    q_player: Query<&Transform, With<Player>>,
    mut pools: ResMut<Pools>,
    config: Res<GameConfig>,
) {
    let due = scheduler.tick(time.delta_secs());
    if due.is_empty() {
        return;
    }

    let player_pos = q_player
        .single()
        .map(|t| t.translation.truncate())
        .unwrap_or(Vec2::new(0.0, -config.field_half_height));

    for (owner, kind) in due {
        let Ok(boss_transform) = q_boss.get(owner) else {
            continue;
        };
        let boss_pos = boss_transform.translation.truncate();
        if boss_pos.y > config.hold_line_y {
            continue;
        }

        match kind {
            AttackKind::BossMainGun => {
                let Some(bullet) = pools.get_mut(PoolKind::BossBullet).acquire() else {
                    continue;
                };
                let dir = aim_at(boss_pos, player_pos);
                pool::activate(
                    &mut commands,
                    bullet,
                    (boss_pos + dir * 30.0).extend(Z_BULLET),
                    dir * config.boss_bullet_speed,
                );
            }
            AttackKind::BossLaserSweep => {
                for i in 0..config.boss_laser_volley {
                    let Some(bullet) = pools.get_mut(PoolKind::BossBullet).acquire() else {
                        break;
                    };
                    let dir = fan_direction(i, config.boss_laser_volley, config.boss_laser_half_angle);
                    pool::activate(
                        &mut commands,
                        bullet,
                        (boss_pos + dir * 30.0).extend(Z_BULLET),
                        dir * config.boss_bullet_speed,
                    );
                }
            }
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttackScheduler>().add_systems(
            Update,
            (
                enemy_spawn_system,
                elite_wave_system,
                boss_spawn_system,
                descend_hold_system,
                elite_fire_system,
                boss_attack_system,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
