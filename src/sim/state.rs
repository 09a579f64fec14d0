//! Game state and core simulation types
//!
//! Everything the renderer and shell read lives here. One `GameState` is one
//! session; a restart builds a fresh one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::level::Level;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives hit zero; state is frozen until the shell builds a new session
    GameOver,
}

/// The player craft
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Hull facing (drive direction)
    pub angle: f32,
    /// Turret facing, re-aimed at the pointer every tick
    pub turret_angle: f32,
    /// Scalar drive speed along `angle`
    pub speed: f32,
    pub size: f32,
    /// Ticks until the weapon may fire again
    pub reload: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0),
            angle: 0.0,
            turret_angle: 0.0,
            speed: 0.0,
            size: PLAYER_SIZE,
            reload: 0,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A hostile craft
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    /// Randomized per spawn, 18-36
    pub size: f32,
    pub angle: f32,
    pub speed: f32,
    /// Single-hit kill
    pub health: u32,
    /// Ticks until the next shot; only consumed at level 3
    pub reload: i32,
}

/// Who launched a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks alive; bullets expire past a fixed age
    pub age: u32,
    pub owner: Owner,
}

/// Static axis-aligned rectangle. Drawn for flavor; nothing collides with it.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    /// The fixed obstacle layout, created once per session
    pub fn standard_field() -> Vec<Obstacle> {
        [
            (150.0, 120.0, 90.0, 18.0),
            (360.0, 320.0, 16.0, 120.0),
            (650.0, 90.0, 140.0, 18.0),
            (700.0, 400.0, 18.0, 140.0),
            (340.0, 80.0, 18.0, 110.0),
            (80.0, 420.0, 160.0, 18.0),
        ]
        .into_iter()
        .map(|(x, y, w, h)| Obstacle { x, y, w, h })
        .collect()
    }
}

/// Transient level-up banner with its own countdown
#[derive(Debug, Clone, Default)]
pub struct LevelBanner {
    pub text: String,
    pub remaining_ms: f32,
}

impl LevelBanner {
    pub fn show(text: impl Into<String>, duration_ms: f32) -> Self {
        Self {
            text: text.into(),
            remaining_ms: duration_ms,
        }
    }

    /// Advance the countdown
    pub fn tick(&mut self, dt_ms: f32) {
        if self.remaining_ms > 0.0 {
            self.remaining_ms -= dt_ms;
        }
    }

    pub fn visible(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// Fade linearly over the last 3 seconds of display time
    pub fn opacity(&self) -> f32 {
        (self.remaining_ms / 3000.0).clamp(0.0, 1.0)
    }
}

/// Something that happened during a tick that the shell may want to
/// surface (audio cue, HUD refresh, overlay). Fire-and-forget: the sim
/// never blocks on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired,
    EnemyDown,
    /// Player struck by an enemy bullet
    PlayerHit,
    /// Enemy rammed the player; the enemy dies too
    PlayerRammed,
    LevelUp(Level),
    GameOver,
}

/// Read-only snapshot handed to the HUD after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Floored display score
    pub score: u32,
    pub lives: u32,
    pub enemies: usize,
    pub level: Level,
    pub kills: u32,
}

/// Complete session state (deterministic for a given seed + input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    /// Real-valued; kills add 2, survival drifts it upward
    pub score: f64,
    pub lives: u32,
    /// Cumulative enemy kills; drives level progression
    pub kills: u32,
    pub level: Level,
    /// Accumulates dt until it crosses the level's spawn interval
    pub spawn_timer_ms: f32,
    pub banner: LevelBanner,
    /// Last known pointer position in field coordinates
    pub pointer: Vec2,
    /// Events emitted by the most recent ticks; drained by the shell
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session: full lives, level 1, empty field except obstacles
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player: Player::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            obstacles: Obstacle::standard_field(),
            score: 0.0,
            lives: PLAYER_LIVES,
            kills: 0,
            level: Level::One,
            spawn_timer_ms: 0.0,
            banner: LevelBanner::show("Level 1. Good hunting!", 2500.0),
            pointer: Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0),
            events: Vec::new(),
        }
    }

    /// Snapshot for the HUD collaborator
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score.floor() as u32,
            lives: self.lives,
            enemies: self.enemies.len(),
            level: self.level,
            kills: self.kills,
        }
    }
}
