//! Level progression and per-level tuning
//!
//! Levels only ever advance within a session. Derived parameters are a pure
//! function of the level, recomputed on demand rather than stored as
//! mutable globals.

use super::state::{GameEvent, GameState, LevelBanner};
use crate::consts::*;

/// Difficulty tier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    One,
    Two,
    Three,
}

/// Tuning derived from the current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    /// Enemy population cap
    pub max_enemies: usize,
    /// Spawn timer threshold in milliseconds
    pub spawn_interval_ms: f32,
    /// Whether enemies return fire
    pub enemies_fire: bool,
    /// Applied once to every live enemy's speed on entering this level
    pub entry_speed_scale: f32,
}

impl Level {
    /// 1-based display number
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    pub fn params(self) -> LevelParams {
        match self {
            Level::One => LevelParams {
                max_enemies: MAX_ENEMIES_BASE,
                spawn_interval_ms: SPAWN_INTERVAL_BASE_MS,
                enemies_fire: false,
                entry_speed_scale: 1.0,
            },
            Level::Two => LevelParams {
                max_enemies: MAX_ENEMIES_BASE.saturating_add(4).min(16),
                spawn_interval_ms: (SPAWN_INTERVAL_BASE_MS * 0.6).max(600.0),
                enemies_fire: false,
                entry_speed_scale: 1.8,
            },
            // The cap dips back below level 2's here; return fire carries
            // the difficulty instead.
            Level::Three => LevelParams {
                max_enemies: MAX_ENEMIES_BASE.min(20),
                spawn_interval_ms: (SPAWN_INTERVAL_BASE_MS * 0.45).max(450.0),
                enemies_fire: true,
                entry_speed_scale: 1.0,
            },
        }
    }
}

/// Advance the level if the kill count crossed a threshold.
///
/// Runs twice per tick (after each kill and at tick end), so it must be a
/// no-op when the session already sits at the target level. The two checks
/// run in sequence: a session far past both thresholds advances 1 -> 2 -> 3
/// within a single call.
pub fn check_progression(state: &mut GameState) {
    if state.level == Level::One && state.kills >= KILLS_TO_LEVEL2 {
        enter_level(
            state,
            Level::Two,
            "Level 2! Enemies are faster. Hold the line!",
            5000.0,
        );
    }
    if state.level == Level::Two && state.kills >= KILLS_TO_LEVEL3 {
        enter_level(
            state,
            Level::Three,
            "Level 3! Enemies are shooting back. No retreat!",
            5500.0,
        );
    }
}

fn enter_level(state: &mut GameState, level: Level, message: &str, banner_ms: f32) {
    state.level = level;
    let scale = level.params().entry_speed_scale;
    for enemy in &mut state.enemies {
        enemy.speed *= scale;
    }
    state.banner = LevelBanner::show(message, banner_ms);
    state.events.push(GameEvent::LevelUp(level));
    log::info!("level up: now at level {}", level.number());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;
    use glam::Vec2;

    fn enemy_with_speed(speed: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(100.0, 100.0),
            size: 20.0,
            angle: 0.0,
            speed,
            health: 1,
            reload: 30,
        }
    }

    #[test]
    fn test_param_table() {
        let p1 = Level::One.params();
        assert_eq!(p1.max_enemies, 6);
        assert_eq!(p1.spawn_interval_ms, 1800.0);
        assert!(!p1.enemies_fire);

        let p2 = Level::Two.params();
        assert_eq!(p2.max_enemies, 10);
        assert_eq!(p2.spawn_interval_ms, 1080.0);
        assert!(!p2.enemies_fire);

        let p3 = Level::Three.params();
        assert_eq!(p3.max_enemies, 6);
        assert_eq!(p3.spawn_interval_ms, 810.0);
        assert!(p3.enemies_fire);
    }

    #[test]
    fn test_threshold_fires_once_and_scales_speeds() {
        let mut state = GameState::new(1);
        state.enemies.push(enemy_with_speed(1.0));
        state.enemies.push(enemy_with_speed(0.8));
        state.kills = KILLS_TO_LEVEL2;

        check_progression(&mut state);
        assert_eq!(state.level, Level::Two);
        assert!((state.enemies[0].speed - 1.8).abs() < 1e-6);
        assert!((state.enemies[1].speed - 1.44).abs() < 1e-6);
        assert!(state.banner.visible());
        assert!(state.events.contains(&GameEvent::LevelUp(Level::Two)));

        // Re-checking at the same kill count must change nothing
        state.events.clear();
        check_progression(&mut state);
        assert_eq!(state.level, Level::Two);
        assert!((state.enemies[0].speed - 1.8).abs() < 1e-6);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_chained_progression_in_one_check() {
        let mut state = GameState::new(1);
        state.kills = KILLS_TO_LEVEL3;
        check_progression(&mut state);
        assert_eq!(state.level, Level::Three);
    }

    #[test]
    fn test_level_three_does_not_scale_speeds() {
        let mut state = GameState::new(1);
        state.level = Level::Two;
        state.enemies.push(enemy_with_speed(2.0));
        state.kills = KILLS_TO_LEVEL3;

        check_progression(&mut state);
        assert_eq!(state.level, Level::Three);
        assert!((state.enemies[0].speed - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_level_never_regresses() {
        let mut state = GameState::new(1);
        state.level = Level::Three;
        state.kills = 0;
        check_progression(&mut state);
        assert_eq!(state.level, Level::Three);
    }
}
