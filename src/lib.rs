//! Vertically-scrolling arcade shooter simulation core.
//!
//! Fixed-capacity object pools over pre-spawned entities, countdown-driven
//! spawners, a session-owned attack scheduler, kind-dispatched collision
//! resolution, and a guarded player lifecycle state machine, hosted on Bevy
//! with `bevy_rapier2d` sensor colliders doing overlap detection.

pub mod collision;
pub mod config;
pub mod constants;
pub mod effects;
pub mod enemy;
pub mod error;
pub mod player;
pub mod pool;
pub mod rendering;
pub mod scheduler;
pub mod session;
