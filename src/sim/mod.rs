//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Driven only through `tick(state, input, dt)`
//! - Seeded RNG only
//! - No rendering, DOM, or audio dependencies
//!
//! The shell observes the sim through `HudSnapshot` and the per-tick
//! `GameEvent` queue.

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{circle_rect_overlap, circles_overlap, point_in_rect};
pub use level::{Level, LevelParams, check_progression};
pub use state::{
    Enemy, GameEvent, GamePhase, GameState, HudSnapshot, LevelBanner, Obstacle, Owner, Player,
    Projectile,
};
pub use tick::{TickInput, spawn_enemy, tick};
