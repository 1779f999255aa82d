//! Session lifecycle: state machine, arena initialization, and restart.
//!
//! `init_session` runs once at startup, after the config file is loaded. It
//! pre-spawns the entire pooled arena — every bullet, enemy, elite, and boss
//! slot, disabled and hidden — plus the player ship, and installs the
//! session-owned resources. Nothing is allocated after this point during
//! play; activation and release just toggle the slots.
//!
//! The restart path releases every live slot, restores lives, score, phase,
//! and timers to their configured starting values, repositions the player,
//! and re-enters `Playing`.

use crate::config::GameConfig;
use crate::constants::{
    BOSS_HALF_EXTENTS, BULLET_HALF_EXTENTS, ELITE_HALF_EXTENTS, ENEMY_HALF_EXTENTS,
    PLAYER_HALF_EXTENTS, PLAYER_START_X, PLAYER_START_Y, Z_PLAYER,
};
use crate::enemy::{Boss, Elite, Enemy, FireCooldown, Health, SpawnTimers};
use crate::player::{Player, PlayerFireCooldown, PlayerLives, PlayerPhase, PlayerScore};
use crate::pool::{
    self, BossBullet, EnemyBullet, PlayerBullet, PoolKind, Pooled, Pools,
};
use crate::scheduler::AttackScheduler;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level session state. Every simulation system runs only in `Playing`;
/// entering `GameOver` freezes score, lives, spawns, and collisions.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Playing,
    GameOver,
}

// ── Collision filtering ───────────────────────────────────────────────────────

/// Membership/filter pairs restricting reported overlaps to exactly the
/// meaningful combinations: player bullets against hostiles, hostile
/// bullets against the player. Hostile hulls never touch the player.
fn collision_groups_for(kind: PoolKind) -> CollisionGroups {
    match kind {
        PoolKind::PlayerBullet => CollisionGroups::new(
            Group::GROUP_2,
            Group::GROUP_3 | Group::GROUP_4 | Group::GROUP_5,
        ),
        PoolKind::Enemy => CollisionGroups::new(Group::GROUP_3, Group::GROUP_2),
        PoolKind::Elite => CollisionGroups::new(Group::GROUP_4, Group::GROUP_2),
        PoolKind::Boss => CollisionGroups::new(Group::GROUP_5, Group::GROUP_2),
        PoolKind::EnemyBullet => CollisionGroups::new(Group::GROUP_6, Group::GROUP_1),
        PoolKind::BossBullet => CollisionGroups::new(Group::GROUP_7, Group::GROUP_1),
    }
}

fn player_collision_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::GROUP_6 | Group::GROUP_7)
}

fn half_extents_for(kind: PoolKind) -> (f32, f32) {
    match kind {
        PoolKind::PlayerBullet | PoolKind::EnemyBullet | PoolKind::BossBullet => {
            BULLET_HALF_EXTENTS
        }
        PoolKind::Enemy => ENEMY_HALF_EXTENTS,
        PoolKind::Elite => ELITE_HALF_EXTENTS,
        PoolKind::Boss => BOSS_HALF_EXTENTS,
    }
}

// ── Init ──────────────────────────────────────────────────────────────────────

/// Spawn one disabled arena slot for `kind`.
fn spawn_slot(commands: &mut Commands, kind: PoolKind) -> Entity {
    let (hx, hy) = half_extents_for(kind);
    let mut slot = commands.spawn((
        Pooled { kind },
        Transform::from_xyz(0.0, 0.0, 0.0),
        Visibility::Hidden,
        RigidBody::KinematicVelocityBased,
        Velocity::zero(),
        Collider::cuboid(hx, hy),
        Sensor,
        collision_groups_for(kind),
        ActiveEvents::COLLISION_EVENTS,
        ColliderDisabled,
    ));
    match kind {
        PoolKind::PlayerBullet => {
            slot.insert(PlayerBullet);
        }
        PoolKind::EnemyBullet => {
            slot.insert(EnemyBullet);
        }
        PoolKind::BossBullet => {
            slot.insert(BossBullet);
        }
        PoolKind::Enemy => {
            slot.insert(Enemy);
        }
        PoolKind::Elite => {
            slot.insert((Elite, Health { hp: 1 }, FireCooldown { timer: 0.0 }));
        }
        PoolKind::Boss => {
            slot.insert((Boss, Health { hp: 1 }));
        }
    }
    slot.id()
}

/// Startup system: pre-spawn the full arena and the player, install the
/// session resources. Runs after `load_game_config` so capacities and
/// starting values come from the effective config.
pub fn init_session(mut commands: Commands, config: Res<GameConfig>) {
    let mut pools = Pools::new(&config);
    for kind in PoolKind::ALL {
        for _ in 0..pools.get(kind).capacity() {
            let slot = spawn_slot(&mut commands, kind);
            pools.get_mut(kind).preload(slot);
        }
    }
    commands.insert_resource(pools);
    commands.insert_resource(SpawnTimers::from_config(&config));
    commands.insert_resource(PlayerLives {
        remaining: config.player_lives,
    });

    commands.spawn((
        Player,
        Transform::from_xyz(PLAYER_START_X, PLAYER_START_Y, Z_PLAYER),
        Visibility::Visible,
        RigidBody::KinematicVelocityBased,
        Velocity::zero(),
        Collider::cuboid(PLAYER_HALF_EXTENTS.0, PLAYER_HALF_EXTENTS.1),
        Sensor,
        player_collision_groups(),
        ActiveEvents::COLLISION_EVENTS,
    ));

    info!(
        "session initialized: {} lives, arena pre-spawned",
        config.player_lives
    );
}

// ── Restart ───────────────────────────────────────────────────────────────────

/// On the game-over screen, `R` releases every live slot, restores the
/// session resources to their starting values, repositions the player, and
/// re-enters `Playing`.
#[allow(clippy::too_many_arguments)]
pub fn restart_session_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut pools: ResMut<Pools>,
    mut timers: ResMut<SpawnTimers>,
    mut scheduler: ResMut<AttackScheduler>,
    mut lives: ResMut<PlayerLives>,
    mut score: ResMut<PlayerScore>,
    mut phase: ResMut<PlayerPhase>,
    mut cooldown: ResMut<PlayerFireCooldown>,
    mut q_player: Query<&mut Transform, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
    config: Res<GameConfig>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }

    for kind in PoolKind::ALL {
        for entity in pools.get_mut(kind).drain_live() {
            pool::deactivate(&mut commands, entity);
        }
    }
    *scheduler = AttackScheduler::default();
    *timers = SpawnTimers::from_config(&config);
    lives.remaining = config.player_lives;
    *score = PlayerScore::default();
    *phase = PlayerPhase::Alive;
    cooldown.timer = 0.0;

    if let Ok(mut transform) = q_player.single_mut() {
        transform.translation.x = PLAYER_START_X;
        transform.translation.y = PLAYER_START_Y;
    }

    next_state.set(GameState::Playing);
    info!("session restarted");
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<GameConfig>()
            .add_systems(
                Startup,
                (crate::config::load_game_config, init_session).chain(),
            )
            .add_systems(
                Update,
                restart_session_system.run_if(in_state(GameState::GameOver)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn session_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.init_resource::<AttackScheduler>();
        app.init_resource::<PlayerScore>();
        app.init_resource::<PlayerFireCooldown>();
        app.insert_resource(PlayerPhase::default());
        app
    }

    #[test]
    fn init_pre_spawns_every_slot_and_the_player() {
        let mut app = session_test_app();
        app.add_systems(Startup, init_session);
        app.update();

        let config = GameConfig::default();
        let expected = config.player_bullet_pool
            + config.enemy_bullet_pool
            + config.boss_bullet_pool
            + config.enemy_pool
            + config.elite_pool
            + config.boss_pool;

        let slots = app
            .world_mut()
            .query::<&Pooled>()
            .iter(app.world())
            .count();
        assert_eq!(slots, expected);

        let players = app
            .world_mut()
            .query::<&Player>()
            .iter(app.world())
            .count();
        assert_eq!(players, 1);

        // All slots start free.
        let pools = app.world().resource::<Pools>();
        for kind in PoolKind::ALL {
            assert_eq!(pools.get(kind).live_count(), 0);
        }
    }

    #[test]
    fn every_slot_starts_disabled_and_hidden() {
        let mut app = session_test_app();
        app.add_systems(Startup, init_session);
        app.update();

        let disabled = app
            .world_mut()
            .query_filtered::<&Pooled, With<ColliderDisabled>>()
            .iter(app.world())
            .count();
        let total = app
            .world_mut()
            .query::<&Pooled>()
            .iter(app.world())
            .count();
        assert_eq!(disabled, total);
    }

    #[test]
    fn restart_clears_the_field_and_restores_starting_values() {
        let mut app = session_test_app();
        app.add_systems(Startup, init_session);
        app.add_systems(Update, restart_session_system);
        app.update();

        // Dirty the session: live hostiles, spent score, lost lives.
        {
            let mut pools = app.world_mut().resource_mut::<Pools>();
            pools.get_mut(PoolKind::Enemy).acquire();
            pools.get_mut(PoolKind::Enemy).acquire();
            pools.get_mut(PoolKind::PlayerBullet).acquire();
        }
        app.world_mut().resource_mut::<PlayerScore>().award_kill(700);
        app.world_mut().resource_mut::<PlayerLives>().remaining = 0;
        app.insert_resource(PlayerPhase::GameOver);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();
        app.update(); // apply the state transition

        let pools = app.world().resource::<Pools>();
        for kind in PoolKind::ALL {
            assert_eq!(pools.get(kind).live_count(), 0);
        }
        assert_eq!(app.world().resource::<PlayerScore>().points, 0);
        assert_eq!(
            app.world().resource::<PlayerLives>().remaining,
            GameConfig::default().player_lives
        );
        assert_eq!(*app.world().resource::<PlayerPhase>(), PlayerPhase::Alive);
        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::Playing
        );
    }

    #[test]
    fn restart_ignores_other_keys() {
        let mut app = session_test_app();
        app.add_systems(Startup, init_session);
        app.add_systems(Update, restart_session_system);
        app.update();

        app.world_mut().resource_mut::<PlayerScore>().award_kill(100);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        assert_eq!(app.world().resource::<PlayerScore>().points, 100);
    }
}
