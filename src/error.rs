//! Simulation-specific error types.
//!
//! The core has no user-visible error surface: pool exhaustion, stale entity
//! references, and double-hit races all degrade to silent no-ops. What
//! remains error-worthy is configuration — a zero-capacity pool or a
//! non-positive cooldown would wedge the spawn cadence — so validation
//! helpers here are run against [`crate::config::GameConfig`] at load time.

use std::fmt;

/// Top-level error enum for the skystrike simulation.
#[derive(Debug)]
pub enum GameError {
    /// A configuration value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the value (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if a pool capacity is zero.
///
/// A zero-capacity pool makes every acquire fail, which silently disables the
/// corresponding entity category for the whole session.
pub fn validate_pool_capacity(name: &'static str, value: usize) -> GameResult<()> {
    if value == 0 {
        Err(GameError::UnsafeConstant {
            name,
            value: value as f32,
            safe_range: "[1, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if a cooldown or interval is not strictly positive.
///
/// Non-positive intervals make a repeating trigger fire every frame.
pub fn validate_interval(name: &'static str, value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pool_capacity_is_rejected() {
        assert!(validate_pool_capacity("enemy_pool", 0).is_err());
        assert!(validate_pool_capacity("enemy_pool", 1).is_ok());
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        assert!(validate_interval("fire_cooldown", 0.0).is_err());
        assert!(validate_interval("fire_cooldown", -1.0).is_err());
        assert!(validate_interval("fire_cooldown", 0.1).is_ok());
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = validate_interval("enemy_spawn_interval", -2.0).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("enemy_spawn_interval"));
        assert!(text.contains("-2"));
    }
}
