//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig`] mirrors every value and can override any of
//! them at startup from `assets/game.toml`; this file remains the
//! authoritative default source.

// ── Play Field ────────────────────────────────────────────────────────────────

/// Half-width of the play field (world units). The field spans ±300 on x.
pub const FIELD_HALF_WIDTH: f32 = 300.0;

/// Half-height of the play field (world units). The field spans ±400 on y.
pub const FIELD_HALF_HEIGHT: f32 = 400.0;

/// Extra slack outside the field edge before an entity counts as
/// out-of-bounds and is released back to its pool.
///
/// Large enough that spawn points above the top edge stay inside the margin,
/// small enough that off-screen entities are reclaimed within a few frames.
pub const OOB_MARGIN: f32 = 48.0;

/// Y coordinate at which newly spawned hostiles enter the field, just above
/// the visible top edge so they slide into view rather than popping in.
pub const TOP_SPAWN_Y: f32 = 420.0;

/// Hold-line: descending elites and bosses stop their vertical movement here
/// and begin attacking (260 units below the top edge of the 800-unit field).
pub const HOLD_LINE_Y: f32 = 140.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Player respawn / start position.
pub const PLAYER_START_X: f32 = 0.0;
pub const PLAYER_START_Y: f32 = -300.0;

/// Per-axis player speed (u/s). Applied independently on x and y from the
/// 8-directional intent — diagonals are NOT normalized, matching classic
/// arcade handling.
pub const PLAYER_SPEED: f32 = 200.0;

/// Minimum interval between consecutive player shots (seconds).
/// Holding or mashing fire never exceeds one bullet per window.
pub const PLAYER_FIRE_COOLDOWN: f32 = 0.1;

/// Player bullet speed straight up (u/s).
pub const PLAYER_BULLET_SPEED: f32 = 300.0;

/// Lives at session start (including the current one).
pub const PLAYER_LIVES: i32 = 3;

/// Duration of the player destruction effect (seconds). Movement is frozen
/// for the whole window; the respawn or game-over decision happens when it
/// completes.
pub const PLAYER_EXPLOSION_SECS: f32 = 1.0;

/// Post-respawn immunity window (seconds). Hits are ignored until it elapses.
pub const RESPAWN_IMMUNITY_SECS: f32 = 2.0;

// ── Basic Enemy ───────────────────────────────────────────────────────────────

/// Constant downward speed of basic enemies (u/s).
pub const ENEMY_SPEED: f32 = 100.0;

/// Seconds between basic enemy spawn attempts. The cadence holds for the
/// whole session; a full pool drops the spawn but never shifts the timer.
pub const ENEMY_SPAWN_INTERVAL: f32 = 1.0;

/// Horizontal margin kept clear of the field edges when rolling a spawn X,
/// so enemies never appear half outside the field.
pub const ENEMY_SPAWN_X_MARGIN: f32 = 50.0;

/// Points per basic enemy kill.
pub const ENEMY_SCORE: u32 = 100;

// ── Elite Enemy ───────────────────────────────────────────────────────────────

/// Elite descent speed until the hold-line (u/s).
pub const ELITE_SPEED: f32 = 60.0;

/// Seconds between elite wave spawns (one pair per wave).
pub const ELITE_WAVE_INTERVAL: f32 = 12.0;

/// Elites spawn in fixed pairs at ±this X offset.
pub const ELITE_PAIR_X: f32 = 150.0;

/// Hits required to destroy an elite.
pub const ELITE_HP: i32 = 6;

/// Seconds between elite shots while holding.
pub const ELITE_FIRE_COOLDOWN: f32 = 1.0;

/// Elite bullet speed straight down (u/s).
pub const ENEMY_BULLET_SPEED: f32 = 150.0;

/// Points per elite kill.
pub const ELITE_SCORE: u32 = 500;

// ── Boss ──────────────────────────────────────────────────────────────────────

/// One-shot delay before the boss enters the field (seconds).
pub const BOSS_SPAWN_DELAY: f32 = 60.0;

/// Boss descent speed until the hold-line (u/s).
pub const BOSS_SPEED: f32 = 40.0;

/// Hits required to destroy the boss.
pub const BOSS_HP: i32 = 18;

/// Boss main-gun cadence (seconds). Each shot is aimed at the player's
/// position at fire time — homing-at-fire, not continuously homing.
pub const BOSS_FIRE_COOLDOWN: f32 = 0.5;

/// Boss bullet speed along the aim vector (u/s).
pub const BOSS_BULLET_SPEED: f32 = 200.0;

/// Boss special-attack cadence (seconds): a downward fan of bullets.
pub const BOSS_LASER_INTERVAL: f32 = 6.0;

/// Number of bullets per special-attack fan.
pub const BOSS_LASER_VOLLEY: u32 = 5;

/// Half-angle of the special-attack fan (radians, centred straight down).
pub const BOSS_LASER_HALF_ANGLE: f32 = 0.7;

/// Points for defeating the boss.
pub const BOSS_SCORE: u32 = 2500;

// ── Pool Capacities ───────────────────────────────────────────────────────────
//
// Each capacity bounds peak concurrent entities of that kind. A full pool
// silently drops the spawn or shot — deliberate backpressure, not a bug.

pub const PLAYER_BULLET_POOL: usize = 10;
pub const ENEMY_BULLET_POOL: usize = 40;
pub const BOSS_BULLET_POOL: usize = 10;
pub const ENEMY_POOL: usize = 20;
pub const ELITE_POOL: usize = 8;
pub const BOSS_POOL: usize = 1;

// ── Collider Half-Extents ─────────────────────────────────────────────────────
//
// AABB-style cuboid sensors; overlap events drive all damage resolution.

pub const PLAYER_HALF_EXTENTS: (f32, f32) = (12.0, 16.0);
pub const BULLET_HALF_EXTENTS: (f32, f32) = (3.0, 8.0);
pub const ENEMY_HALF_EXTENTS: (f32, f32) = (12.0, 12.0);
pub const ELITE_HALF_EXTENTS: (f32, f32) = (16.0, 16.0);
pub const BOSS_HALF_EXTENTS: (f32, f32) = (36.0, 26.0);

/// Vertical offset from the player's centre to the bullet muzzle.
pub const MUZZLE_OFFSET_Y: f32 = 20.0;

// ── Z Layers ──────────────────────────────────────────────────────────────────

pub const Z_BULLET: f32 = 0.2;
pub const Z_ENEMY: f32 = 0.25;
pub const Z_PLAYER: f32 = 0.3;
pub const Z_PARTICLE: f32 = 0.4;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Particles per destruction burst.
pub const BURST_PARTICLE_COUNT: u32 = 12;

/// Lifetime of a single burst particle (seconds).
pub const BURST_PARTICLE_LIFETIME: f32 = 0.5;

/// Outward speed of burst particles (u/s).
pub const BURST_PARTICLE_SPEED: f32 = 120.0;
