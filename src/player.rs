//! Player ship: intent-driven movement, rate-limited fire, and the
//! Alive → Exploding → Respawning → Alive / GameOver lifecycle machine.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`player_intent_clear_system`] — resets `PlayerIntent` to zero.
//! 2. [`keyboard_to_intent_system`] — arrow keys / space into `PlayerIntent`.
//! 3. [`apply_player_intent_system`] — converts intent into `Velocity`.
//! 4. [`player_fire_system`] — acquires a bullet slot when fire is due.
//! 5. [`player_clamp_system`] — keeps the ship inside the field.
//! 6. [`player_phase_system`] — ticks the lifecycle state machine.
//!
//! The intent abstraction keeps the core testable: the host (or a test)
//! writes the 8-directional vector and fire pulse, and exactly one system
//! converts it into physics. No other system writes the player's velocity.

use crate::config::GameConfig;
use crate::constants::{MUZZLE_OFFSET_Y, PLAYER_LIVES, Z_BULLET};
use crate::pool::{self, PoolKind, Pools};
use crate::session::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player ship entity. Exactly one instance; never
/// pooled — respawn repositions it instead of recycling.
#[derive(Component)]
pub struct Player;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Aggregated directional intent and fire pulse for the current frame.
///
/// `dir` is the raw 8-directional vector (each axis −1, 0, or +1); the host's
/// input mapping writes it, [`apply_player_intent_system`] consumes it.
/// Tests populate this directly to drive the ship without an input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    pub dir: Vec2,
    pub fire: bool,
}

/// Enforces a minimum interval between consecutive shots.
#[derive(Resource, Default)]
pub struct PlayerFireCooldown {
    /// Remaining cooldown in seconds; decremented each frame, clamped to 0.
    pub timer: f32,
}

/// Tracks the player's gameplay score. Monotonically non-decreasing; updated
/// only on confirmed kills.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PlayerScore {
    /// Accumulated points.
    pub points: u32,
    /// Hostiles fully destroyed.
    pub destroyed: u32,
}

impl PlayerScore {
    /// Credit one confirmed kill.
    pub fn award_kill(&mut self, points: u32) {
        self.points += points;
        self.destroyed += 1;
    }
}

/// Lives remaining, including the current one.
#[derive(Resource, Debug, Clone)]
pub struct PlayerLives {
    pub remaining: i32,
}

impl Default for PlayerLives {
    fn default() -> Self {
        Self {
            remaining: PLAYER_LIVES,
        }
    }
}

/// Player lifecycle state machine.
///
/// | State | Meaning |
/// |-------|---------|
/// | `Alive` | normal play; hits are accepted |
/// | `Exploding` | destruction effect running; movement frozen, hits ignored |
/// | `Respawning` | back at the start position, immune until the window ends |
/// | `GameOver` | terminal; entered when the effect completes with 0 lives |
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum PlayerPhase {
    Alive,
    Exploding { remaining_secs: f32 },
    Respawning { immune_secs: f32 },
    GameOver,
}

impl Default for PlayerPhase {
    fn default() -> Self {
        PlayerPhase::Alive
    }
}

impl PlayerPhase {
    /// Hits only land while `Alive`; every other state gates re-entrancy.
    #[inline]
    pub fn accepts_hits(&self) -> bool {
        matches!(self, PlayerPhase::Alive)
    }

    /// Movement (and firing) is frozen while the destruction effect runs
    /// and after game over.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        matches!(self, PlayerPhase::Exploding { .. } | PlayerPhase::GameOver)
    }

    #[inline]
    pub fn is_immune(&self) -> bool {
        matches!(self, PlayerPhase::Respawning { .. })
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Clear `PlayerIntent` at the start of every frame, before any input source
/// writes to it.
pub fn player_intent_clear_system(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

/// Host-side input mapping: arrow keys become the 8-directional vector,
/// space becomes the fire pulse. Thin by design — everything below
/// [`PlayerIntent`] is engine-agnostic.
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    if keys.pressed(KeyCode::ArrowLeft) {
        intent.dir.x = -1.0;
    } else if keys.pressed(KeyCode::ArrowRight) {
        intent.dir.x = 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        intent.dir.y = 1.0;
    } else if keys.pressed(KeyCode::ArrowDown) {
        intent.dir.y = -1.0;
    }
    if keys.pressed(KeyCode::Space) {
        intent.fire = true;
    }
}

/// Convert [`PlayerIntent`] into the ship's `Velocity`.
///
/// Each axis is set independently to ±`player_speed` — diagonal movement is
/// deliberately not normalized. While the destruction effect runs the
/// velocity is frozen to zero regardless of intent.
pub fn apply_player_intent_system(
    mut q: Query<&mut Velocity, With<Player>>,
    intent: Res<PlayerIntent>,
    phase: Res<PlayerPhase>,
    config: Res<GameConfig>,
) {
    let Ok(mut velocity) = q.single_mut() else {
        return;
    };

    if phase.is_frozen() {
        velocity.linvel = Vec2::ZERO;
        return;
    }

    velocity.linvel = Vec2::new(
        intent.dir.x.clamp(-1.0, 1.0) * config.player_speed,
        intent.dir.y.clamp(-1.0, 1.0) * config.player_speed,
    );
}

/// Fire a bullet when the fire pulse is active and the rate limit allows it.
///
/// The cooldown counts down every frame; holding fire yields exactly one
/// bullet per `player_fire_cooldown` window. A full bullet pool drops the
/// shot without touching the cooldown state of anything else.
pub fn player_fire_system(
    mut commands: Commands,
    q_player: Query<&Transform, With<Player>>,
    intent: Res<PlayerIntent>,
    phase: Res<PlayerPhase>,
    mut cooldown: ResMut<PlayerFireCooldown>,
    mut pools: ResMut<Pools>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    cooldown.timer = (cooldown.timer - time.delta_secs()).max(0.0);

    if !intent.fire || cooldown.timer > 0.0 || phase.is_frozen() {
        return;
    }

    let Ok(transform) = q_player.single() else {
        return;
    };

    let Some(bullet) = pools.get_mut(PoolKind::PlayerBullet).acquire() else {
        // Pool exhausted — the shot is dropped, not queued.
        return;
    };

    let muzzle = transform.translation.truncate() + Vec2::new(0.0, MUZZLE_OFFSET_Y);
    pool::activate(
        &mut commands,
        bullet,
        muzzle.extend(Z_BULLET),
        Vec2::new(0.0, config.player_bullet_speed),
    );
    cooldown.timer = config.player_fire_cooldown;
}

/// Keep the ship inside the play field. The physics host integrates
/// velocity freely; this clamp is the world-bounds contact for the player,
/// who is never released to a pool.
pub fn player_clamp_system(
    mut q: Query<&mut Transform, With<Player>>,
    config: Res<GameConfig>,
) {
    let Ok(mut transform) = q.single_mut() else {
        return;
    };
    transform.translation.x = transform
        .translation
        .x
        .clamp(-config.field_half_width, config.field_half_width);
    transform.translation.y = transform
        .translation
        .y
        .clamp(-config.field_half_height, config.field_half_height);
}

/// Tick the lifecycle machine.
///
/// - `Exploding` counts down the destruction effect. On completion:
///   lives left → reposition to the start point and open the immunity
///   window; none left → `GameOver` (terminal; the state transition gates
///   every simulation system off).
/// - `Respawning` counts down the immunity window, then returns to `Alive`.
pub fn player_phase_system(
    mut q_player: Query<&mut Transform, With<Player>>,
    mut phase: ResMut<PlayerPhase>,
    lives: Res<PlayerLives>,
    mut next_state: ResMut<NextState<GameState>>,
    time: Res<Time>,
    config: Res<GameConfig>,
) {
    let dt = time.delta_secs();

    match &mut *phase {
        PlayerPhase::Alive | PlayerPhase::GameOver => {}
        PlayerPhase::Exploding { remaining_secs } => {
            *remaining_secs -= dt;
            if *remaining_secs > 0.0 {
                return;
            }
            if lives.remaining > 0 {
                if let Ok(mut transform) = q_player.single_mut() {
                    transform.translation.x = crate::constants::PLAYER_START_X;
                    transform.translation.y = crate::constants::PLAYER_START_Y;
                }
                *phase = PlayerPhase::Respawning {
                    immune_secs: config.respawn_immunity_secs,
                };
                info!(
                    "player respawned; {}s immunity, {} lives left",
                    config.respawn_immunity_secs, lives.remaining
                );
            } else {
                *phase = PlayerPhase::GameOver;
                next_state.set(GameState::GameOver);
                info!("game over");
            }
        }
        PlayerPhase::Respawning { immune_secs } => {
            *immune_secs -= dt;
            if *immune_secs <= 0.0 {
                *phase = PlayerPhase::Alive;
            }
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerIntent>()
            .init_resource::<PlayerFireCooldown>()
            .init_resource::<PlayerScore>()
            .init_resource::<PlayerLives>()
            .init_resource::<PlayerPhase>()
            .add_systems(
                Update,
                (
                    player_intent_clear_system,
                    keyboard_to_intent_system,
                    apply_player_intent_system,
                    player_fire_system,
                    player_clamp_system,
                    player_phase_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameState;
    use bevy::state::app::StatesPlugin;

    fn player_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.insert_resource(GameConfig::default());
        app.insert_resource(PlayerIntent::default());
        app.insert_resource(PlayerFireCooldown::default());
        app.insert_resource(PlayerScore::default());
        app.insert_resource(PlayerLives::default());
        app.insert_resource(PlayerPhase::default());
        app
    }

    fn spawn_player(app: &mut App, pos: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Transform::from_translation(pos.extend(0.0)),
                Velocity::zero(),
            ))
            .id()
    }

    #[test]
    fn intent_sets_axis_velocity_without_diagonal_normalization() {
        let mut app = player_test_app();
        app.add_systems(Update, apply_player_intent_system);
        let player = spawn_player(&mut app, Vec2::ZERO);

        app.world_mut().resource_mut::<PlayerIntent>().dir = Vec2::new(1.0, -1.0);
        app.update();

        let v = app.world().get::<Velocity>(player).unwrap().linvel;
        assert_eq!(v, Vec2::new(200.0, -200.0));
    }

    #[test]
    fn exploding_player_velocity_is_frozen() {
        let mut app = player_test_app();
        app.add_systems(Update, apply_player_intent_system);
        let player = spawn_player(&mut app, Vec2::ZERO);

        app.world_mut().resource_mut::<PlayerIntent>().dir = Vec2::new(1.0, 0.0);
        app.insert_resource(PlayerPhase::Exploding {
            remaining_secs: 0.5,
        });
        app.update();

        let v = app.world().get::<Velocity>(player).unwrap().linvel;
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn fire_is_rate_limited_to_one_bullet_per_window() {
        let mut app = player_test_app();
        app.add_systems(Update, player_fire_system);
        spawn_player(&mut app, Vec2::new(0.0, -300.0));

        // Plenty of slots, so only the rate limit constrains acquisitions.
        let mut pools = Pools::new(&GameConfig::default());
        let slots: Vec<Entity> = (0..10).map(|_| app.world_mut().spawn_empty().id()).collect();
        for &e in &slots {
            pools.get_mut(PoolKind::PlayerBullet).preload(e);
        }
        app.insert_resource(pools);

        app.world_mut().resource_mut::<PlayerIntent>().fire = true;
        app.update(); // first shot
        app.world_mut().resource_mut::<PlayerIntent>().fire = true;
        app.update(); // second pulse lands well inside the 100ms window

        let pools = app.world().resource::<Pools>();
        assert_eq!(
            pools.get(PoolKind::PlayerBullet).live_count(),
            1,
            "two fire pulses inside one window must produce exactly one bullet"
        );

        // Window elapsed: the countdown has drained.
        app.world_mut().resource_mut::<PlayerFireCooldown>().timer = 0.0;
        app.world_mut().resource_mut::<PlayerIntent>().fire = true;
        app.update();
        let pools = app.world().resource::<Pools>();
        assert_eq!(pools.get(PoolKind::PlayerBullet).live_count(), 2);
    }

    #[test]
    fn fire_with_exhausted_pool_drops_the_shot() {
        let mut app = player_test_app();
        app.add_systems(Update, player_fire_system);
        spawn_player(&mut app, Vec2::ZERO);

        // Empty pool: no preloaded slots at all.
        app.insert_resource(Pools::new(&GameConfig::default()));
        app.world_mut().resource_mut::<PlayerIntent>().fire = true;
        app.update();

        let pools = app.world().resource::<Pools>();
        assert_eq!(pools.get(PoolKind::PlayerBullet).live_count(), 0);
    }

    #[test]
    fn explosion_completion_with_lives_respawns_at_start_immune() {
        let mut app = player_test_app();
        app.add_systems(Update, player_phase_system);
        let player = spawn_player(&mut app, Vec2::new(120.0, 40.0));

        app.insert_resource(PlayerLives { remaining: 2 });
        app.insert_resource(PlayerPhase::Exploding {
            remaining_secs: 0.0,
        });
        app.update(); // effect complete on this frame

        let phase = app.world().resource::<PlayerPhase>();
        assert!(phase.is_immune(), "respawn must open the immunity window");

        let t = app.world().get::<Transform>(player).unwrap().translation;
        assert_eq!(t.truncate(), Vec2::new(0.0, -300.0));
    }

    #[test]
    fn immunity_clears_after_the_configured_window() {
        let mut app = player_test_app();
        app.add_systems(Update, player_phase_system);
        spawn_player(&mut app, Vec2::ZERO);

        app.insert_resource(PlayerPhase::Respawning { immune_secs: 2.0 });
        app.update(); // window still open
        assert!(app.world().resource::<PlayerPhase>().is_immune());

        app.insert_resource(PlayerPhase::Respawning { immune_secs: 0.0 });
        app.update(); // window drained
        assert_eq!(*app.world().resource::<PlayerPhase>(), PlayerPhase::Alive);
    }

    #[test]
    fn explosion_completion_without_lives_is_game_over() {
        let mut app = player_test_app();
        app.add_systems(Update, player_phase_system);
        spawn_player(&mut app, Vec2::ZERO);

        app.insert_resource(PlayerLives { remaining: 0 });
        app.insert_resource(PlayerPhase::Exploding {
            remaining_secs: 0.0,
        });
        app.update(); // effect completes with no lives left
        app.update(); // let the StateTransition schedule apply NextState

        assert_eq!(
            *app.world().resource::<PlayerPhase>(),
            PlayerPhase::GameOver
        );
        let state = app.world().resource::<State<GameState>>();
        assert_eq!(*state.get(), GameState::GameOver);
    }

    #[test]
    fn clamp_keeps_the_ship_inside_the_field() {
        let mut app = player_test_app();
        app.add_systems(Update, player_clamp_system);
        let player = spawn_player(&mut app, Vec2::new(500.0, -900.0));

        app.update();
        let t = app.world().get::<Transform>(player).unwrap().translation;
        assert_eq!(t.truncate(), Vec2::new(300.0, -400.0));
    }
}
