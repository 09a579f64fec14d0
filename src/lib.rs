//! Strike Zone - a top-down wave-defense arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, enemies, projectiles, levels)
//! - `render`: Canvas-2D rendering, a pure function of simulation state
//! - `audio`: Web Audio tone synthesis for game cues

pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions; all positions live in this space
    /// regardless of physical canvas scaling.
    pub const FIELD_W: f32 = 1337.0;
    pub const FIELD_H: f32 = 550.0;

    /// Base enemy population cap and spawn interval (level 1 values)
    pub const MAX_ENEMIES_BASE: usize = 6;
    pub const SPAWN_INTERVAL_BASE_MS: f32 = 1800.0;

    /// Kill counts required to advance a level
    pub const KILLS_TO_LEVEL2: u32 = 20;
    pub const KILLS_TO_LEVEL3: u32 = 50;

    /// Player tuning
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_SIZE: f32 = 26.0;
    pub const PLAYER_TURN_SPEED: f32 = 0.05;
    pub const PLAYER_ACCEL: f32 = 0.14;
    pub const PLAYER_FRICTION: f32 = 0.96;
    /// Drive speed clamp; reverse tops out higher than forward
    pub const PLAYER_SPEED_MIN: f32 = -3.5;
    pub const PLAYER_SPEED_MAX: f32 = 4.5;
    /// Weapon cooldown in ticks
    pub const PLAYER_RELOAD_TICKS: u32 = 18;
    /// How close to the field edge the player may get
    pub const PLAYER_EDGE_MARGIN: f32 = 12.0;

    /// Player bullet speed (units per tick) and lifetime (ticks)
    pub const BULLET_SPEED: f32 = 30.0;
    pub const BULLET_MAX_AGE: u32 = 120;

    /// Enemy bullets outlive player bullets and get a wider despawn margin
    pub const ENEMY_BULLET_MAX_AGE: u32 = 600;
    pub const ENEMY_BULLET_EDGE_PAD: f32 = 20.0;

    /// Enemy steering: max angular change per tick (radians)
    pub const ENEMY_TURN_CLAMP: f32 = 0.03;
    /// Enemies are shoved back inside this margin each tick
    pub const ENEMY_EDGE_MARGIN: f32 = 8.0;
}

/// Shortest signed angular difference from `from` to `to`, in [-π, π)
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Angle of the vector pointing from `a` to `b`
#[inline]
pub fn angle_to(a: Vec2, b: Vec2) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
