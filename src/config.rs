//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`]. At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.enemy_speed`, `config.elite_hp`, etc.

use crate::constants::*;
use crate::error::{validate_interval, validate_pool_capacity};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`. Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Play Field ───────────────────────────────────────────────────────────
    pub field_half_width: f32,
    pub field_half_height: f32,
    pub oob_margin: f32,
    pub top_spawn_y: f32,
    pub hold_line_y: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_fire_cooldown: f32,
    pub player_bullet_speed: f32,
    pub player_lives: i32,
    pub player_explosion_secs: f32,
    pub respawn_immunity_secs: f32,

    // ── Basic Enemy ──────────────────────────────────────────────────────────
    pub enemy_speed: f32,
    pub enemy_spawn_interval: f32,
    pub enemy_spawn_x_margin: f32,
    pub enemy_score: u32,

    // ── Elite Enemy ──────────────────────────────────────────────────────────
    pub elite_speed: f32,
    pub elite_wave_interval: f32,
    pub elite_pair_x: f32,
    pub elite_hp: i32,
    pub elite_fire_cooldown: f32,
    pub enemy_bullet_speed: f32,
    pub elite_score: u32,

    // ── Boss ─────────────────────────────────────────────────────────────────
    pub boss_spawn_delay: f32,
    pub boss_speed: f32,
    pub boss_hp: i32,
    pub boss_fire_cooldown: f32,
    pub boss_bullet_speed: f32,
    pub boss_laser_interval: f32,
    pub boss_laser_volley: u32,
    pub boss_laser_half_angle: f32,
    pub boss_score: u32,

    // ── Pool Capacities ──────────────────────────────────────────────────────
    pub player_bullet_pool: usize,
    pub enemy_bullet_pool: usize,
    pub boss_bullet_pool: usize,
    pub enemy_pool: usize,
    pub elite_pool: usize,
    pub boss_pool: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Play Field
            field_half_width: FIELD_HALF_WIDTH,
            field_half_height: FIELD_HALF_HEIGHT,
            oob_margin: OOB_MARGIN,
            top_spawn_y: TOP_SPAWN_Y,
            hold_line_y: HOLD_LINE_Y,
            // Player
            player_speed: PLAYER_SPEED,
            player_fire_cooldown: PLAYER_FIRE_COOLDOWN,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            player_lives: PLAYER_LIVES,
            player_explosion_secs: PLAYER_EXPLOSION_SECS,
            respawn_immunity_secs: RESPAWN_IMMUNITY_SECS,
            // Basic Enemy
            enemy_speed: ENEMY_SPEED,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
            enemy_spawn_x_margin: ENEMY_SPAWN_X_MARGIN,
            enemy_score: ENEMY_SCORE,
            // Elite Enemy
            elite_speed: ELITE_SPEED,
            elite_wave_interval: ELITE_WAVE_INTERVAL,
            elite_pair_x: ELITE_PAIR_X,
            elite_hp: ELITE_HP,
            elite_fire_cooldown: ELITE_FIRE_COOLDOWN,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            elite_score: ELITE_SCORE,
            // Boss
            boss_spawn_delay: BOSS_SPAWN_DELAY,
            boss_speed: BOSS_SPEED,
            boss_hp: BOSS_HP,
            boss_fire_cooldown: BOSS_FIRE_COOLDOWN,
            boss_bullet_speed: BOSS_BULLET_SPEED,
            boss_laser_interval: BOSS_LASER_INTERVAL,
            boss_laser_volley: BOSS_LASER_VOLLEY,
            boss_laser_half_angle: BOSS_LASER_HALF_ANGLE,
            boss_score: BOSS_SCORE,
            // Pool Capacities
            player_bullet_pool: PLAYER_BULLET_POOL,
            enemy_bullet_pool: ENEMY_BULLET_POOL,
            boss_bullet_pool: BOSS_BULLET_POOL,
            enemy_pool: ENEMY_POOL,
            elite_pool: ELITE_POOL,
            boss_pool: BOSS_POOL,
        }
    }
}

impl GameConfig {
    /// Validate the values a broken override could wedge the session with.
    ///
    /// Returns the first violation found; callers log it and keep the
    /// compiled defaults instead.
    pub fn validate(&self) -> crate::error::GameResult<()> {
        validate_pool_capacity("player_bullet_pool", self.player_bullet_pool)?;
        validate_pool_capacity("enemy_bullet_pool", self.enemy_bullet_pool)?;
        validate_pool_capacity("boss_bullet_pool", self.boss_bullet_pool)?;
        validate_pool_capacity("enemy_pool", self.enemy_pool)?;
        validate_pool_capacity("elite_pool", self.elite_pool)?;
        validate_pool_capacity("boss_pool", self.boss_pool)?;
        validate_interval("player_fire_cooldown", self.player_fire_cooldown)?;
        validate_interval("enemy_spawn_interval", self.enemy_spawn_interval)?;
        validate_interval("elite_wave_interval", self.elite_wave_interval)?;
        validate_interval("elite_fire_cooldown", self.elite_fire_cooldown)?;
        validate_interval("boss_fire_cooldown", self.boss_fire_cooldown)?;
        validate_interval("boss_laser_interval", self.boss_laser_interval)?;
        validate_interval("player_explosion_secs", self.player_explosion_secs)?;
        validate_interval("respawn_immunity_secs", self.respawn_immunity_secs)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults. Parse or validation errors
/// are logged and the defaults are kept. A missing file is silently ignored.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("loaded game config from {path}");
                }
                Err(e) => {
                    warn!("rejected {path}: {e}; using defaults");
                }
            },
            Err(e) => {
                warn!("failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("no {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants() {
        let config = GameConfig::default();
        assert_eq!(config.player_lives, PLAYER_LIVES);
        assert_eq!(config.enemy_pool, ENEMY_POOL);
        assert_eq!(config.boss_hp, BOSS_HP);
        assert!((config.player_fire_cooldown - PLAYER_FIRE_COOLDOWN).abs() < f32::EPSILON);
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: GameConfig = toml::from_str("elite_hp = 9\nenemy_speed = 140.0").unwrap();
        assert_eq!(config.elite_hp, 9);
        assert!((config.enemy_speed - 140.0).abs() < f32::EPSILON);
        // Untouched keys keep the compiled defaults.
        assert_eq!(config.player_lives, PLAYER_LIVES);
        assert_eq!(config.boss_score, BOSS_SCORE);
    }

    #[test]
    fn zero_capacity_override_fails_validation() {
        let config: GameConfig = toml::from_str("enemy_pool = 0").unwrap();
        assert!(config.validate().is_err());
    }
}
