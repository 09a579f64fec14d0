//! Per-frame simulation step
//!
//! `tick` advances one session by `dt` milliseconds. Order of operations:
//! player control, player bullets, enemy bullets (level 3), enemy steering
//! and ramming, spawning, score drift, progression check. Hitting zero lives
//! ends the step immediately and freezes the session.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::collision::circles_overlap;
use super::level::check_progression;
use super::state::{Enemy, GameEvent, GamePhase, GameState, Owner, Projectile};
use crate::consts::*;
use crate::{angle_to, heading, shortest_angle_delta};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub turn_left: bool,
    pub turn_right: bool,
    /// Accelerates toward the positive end of the speed clamp
    pub throttle_up: bool,
    /// Accelerates toward the negative end
    pub throttle_down: bool,
    /// One-shot fire trigger (click or fire key); cleared by the host
    pub fire: bool,
    /// Pointer position in field coordinates, if it moved
    pub pointer: Option<Vec2>,
}

/// Advance the session by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.banner.tick(dt);
    if let Some(p) = input.pointer {
        state.pointer = p;
    }

    step_player(state, input, dt);
    if input.fire {
        fire_player_weapon(state);
    }

    step_player_bullets(state);

    if state.level.params().enemies_fire && !step_enemy_bullets(state) {
        return;
    }

    if !step_enemies(state) {
        return;
    }

    // Spawning uses the parameters of whatever level the tick ended up at
    let params = state.level.params();
    state.spawn_timer_ms += dt;
    if state.spawn_timer_ms > params.spawn_interval_ms && state.enemies.len() < params.max_enemies {
        state.spawn_timer_ms = 0.0;
        spawn_enemy(state);
    }

    // Small survival reward, independent of kills
    state.score += 0.001 * dt as f64;

    check_progression(state);
}

fn step_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let pointer = state.pointer;
    let player = &mut state.player;

    if input.turn_left {
        player.angle -= PLAYER_TURN_SPEED * (dt / 32.0);
    }
    if input.turn_right {
        player.angle += PLAYER_TURN_SPEED * (dt / 32.0);
    }
    if input.throttle_up {
        player.speed += PLAYER_ACCEL * (dt / 8.0);
    }
    if input.throttle_down {
        player.speed -= PLAYER_ACCEL * (dt / 8.0);
    }

    player.speed *= PLAYER_FRICTION;
    player.speed = player.speed.clamp(PLAYER_SPEED_MIN, PLAYER_SPEED_MAX);

    player.pos += heading(player.angle) * player.speed;
    player.pos.x = player.pos.x.clamp(PLAYER_EDGE_MARGIN, FIELD_W - PLAYER_EDGE_MARGIN);
    player.pos.y = player.pos.y.clamp(PLAYER_EDGE_MARGIN, FIELD_H - PLAYER_EDGE_MARGIN);

    // Turret snaps to the pointer, no smoothing
    player.turret_angle = angle_to(player.pos, pointer);

    if player.reload > 0 {
        player.reload -= 1;
    }
}

/// Spawn a player bullet from the turret muzzle, gated by the cooldown
fn fire_player_weapon(state: &mut GameState) {
    let player = &state.player;
    if player.reload > 0 {
        return;
    }

    let dir = heading(player.turret_angle);
    state.bullets.push(Projectile {
        pos: player.pos + dir * (player.size * 0.6),
        vel: dir * BULLET_SPEED,
        age: 0,
        owner: Owner::Player,
    });
    state.player.reload = PLAYER_RELOAD_TICKS;
    state.events.push(GameEvent::PlayerFired);
}

/// Move player bullets, expire them, and resolve hits against enemies.
/// One bullet kills at most one enemy; enemies are checked from the highest
/// index down, so removal indices stay valid mid-iteration.
fn step_player_bullets(state: &mut GameState) {
    let mut i = state.bullets.len();
    'bullets: while i > 0 {
        i -= 1;

        let expired = {
            let b = &mut state.bullets[i];
            b.pos += b.vel;
            b.age += 1;
            b.pos.x < 0.0
                || b.pos.x > FIELD_W
                || b.pos.y < 0.0
                || b.pos.y > FIELD_H
                || b.age > BULLET_MAX_AGE
        };
        if expired {
            state.bullets.remove(i);
            continue;
        }

        let bullet_pos = state.bullets[i].pos;
        let mut j = state.enemies.len();
        while j > 0 {
            j -= 1;
            let enemy = &state.enemies[j];
            if circles_overlap(bullet_pos, enemy.pos, enemy.size * 0.6) {
                state.bullets.remove(i);
                state.enemies.remove(j);
                state.kills += 1;
                state.score += 2.0;
                state.events.push(GameEvent::EnemyDown);
                // A kill can promote the level mid-tick
                check_progression(state);
                continue 'bullets;
            }
        }
    }
}

/// Move enemy bullets and test them against the player.
/// Returns false when the player ran out of lives.
fn step_enemy_bullets(state: &mut GameState) -> bool {
    let mut i = state.enemy_bullets.len();
    while i > 0 {
        i -= 1;

        let expired = {
            let b = &mut state.enemy_bullets[i];
            b.pos += b.vel;
            b.age += 1;
            b.pos.x < -ENEMY_BULLET_EDGE_PAD
                || b.pos.x > FIELD_W + ENEMY_BULLET_EDGE_PAD
                || b.pos.y < -ENEMY_BULLET_EDGE_PAD
                || b.pos.y > FIELD_H + ENEMY_BULLET_EDGE_PAD
                || b.age > ENEMY_BULLET_MAX_AGE
        };
        if expired {
            state.enemy_bullets.remove(i);
            continue;
        }

        let hit = circles_overlap(
            state.enemy_bullets[i].pos,
            state.player.pos,
            state.player.size * 0.8,
        );
        if hit {
            state.enemy_bullets.remove(i);
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::PlayerHit);
            if state.lives == 0 {
                enter_game_over(state);
                return false;
            }
        }
    }
    true
}

/// Steer, move, and (level 3) fire each enemy, then resolve ramming.
/// Returns false when a ram took the player's last life.
fn step_enemies(state: &mut GameState) -> bool {
    let enemies_fire = state.level.params().enemies_fire;

    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;

        // Turn gradually toward the player, bounded per tick
        let target = angle_to(state.enemies[i].pos, state.player.pos);
        let diff = shortest_angle_delta(state.enemies[i].angle, target);
        let enemy = &mut state.enemies[i];
        enemy.angle += diff.clamp(-ENEMY_TURN_CLAMP, ENEMY_TURN_CLAMP);
        enemy.pos += heading(enemy.angle) * enemy.speed;

        if enemies_fire {
            state.enemies[i].reload -= 1;
            if state.enemies[i].reload <= 0 {
                fire_enemy_weapon(state, i);
            }
        }

        // Ramming: contact destroys the enemy and costs a life
        let enemy = &state.enemies[i];
        let ram_radius = 0.6 * (enemy.size + state.player.size);
        if circles_overlap(enemy.pos, state.player.pos, ram_radius) {
            state.enemies.remove(i);
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::PlayerRammed);
            if state.lives == 0 {
                enter_game_over(state);
                return false;
            }
            continue;
        }

        // Hard clamp back into the field, no bounce
        let enemy = &mut state.enemies[i];
        enemy.pos.x = enemy.pos.x.clamp(ENEMY_EDGE_MARGIN, FIELD_W - ENEMY_EDGE_MARGIN);
        enemy.pos.y = enemy.pos.y.clamp(ENEMY_EDGE_MARGIN, FIELD_H - ENEMY_EDGE_MARGIN);
    }
    true
}

/// Enemy shot aimed at the player's current position, randomized speed,
/// cooldown reset to a random value in [60, 180)
fn fire_enemy_weapon(state: &mut GameState, idx: usize) {
    let enemy_pos = state.enemies[idx].pos;
    let enemy_size = state.enemies[idx].size;
    let ang = angle_to(enemy_pos, state.player.pos);
    let speed: f32 = state.rng.random_range(2.0..3.0);
    let dir = heading(ang);

    state.enemy_bullets.push(Projectile {
        pos: enemy_pos + dir * enemy_size,
        vel: dir * speed,
        age: 0,
        owner: Owner::Enemy,
    });
    state.enemies[idx].reload = 60 + state.rng.random_range(0..120);
    state.events.push(GameEvent::EnemyFired);
}

/// Spawn a fresh enemy at a random point on one of the four field edges
pub fn spawn_enemy(state: &mut GameState) {
    let edge: u8 = state.rng.random_range(0..4);
    let pos = match edge {
        0 => Vec2::new(10.0, state.rng.random_range(0.0..FIELD_H)),
        1 => Vec2::new(FIELD_W - 10.0, state.rng.random_range(0.0..FIELD_H)),
        2 => Vec2::new(state.rng.random_range(0.0..FIELD_W), 10.0),
        _ => Vec2::new(state.rng.random_range(0.0..FIELD_W), FIELD_H - 10.0),
    };

    state.enemies.push(Enemy {
        pos,
        size: state.rng.random_range(18.0..36.0),
        angle: state.rng.random_range(0.0..TAU),
        speed: state.rng.random_range(0.6..1.5),
        health: 1,
        reload: state.rng.random_range(0..120),
    });
}

fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver);
    log::info!(
        "game over: score {} after {} kills",
        state.score.floor(),
        state.kills
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;
    use proptest::prelude::*;

    const DT: f32 = 16.0;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn parked_enemy(pos: Vec2, size: f32) -> Enemy {
        Enemy {
            pos,
            size,
            angle: 0.0,
            speed: 0.0,
            health: 1,
            reload: 1000,
        }
    }

    fn still_bullet(pos: Vec2, owner: Owner) -> Projectile {
        Projectile {
            pos,
            vel: Vec2::ZERO,
            age: 0,
            owner,
        }
    }

    #[test]
    fn test_zero_ticks_is_initial_state() {
        let state = GameState::new(42);
        let hud = state.hud();
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.kills, 0);
        assert_eq!(hud.level, Level::One);
        assert_eq!(hud.enemies, 0);
    }

    #[test]
    fn test_bullet_kills_overlapping_enemy() {
        let mut state = GameState::new(42);
        let spot = Vec2::new(500.0, 300.0);
        state.enemies.push(parked_enemy(spot, 20.0));
        state.bullets.push(still_bullet(spot, Owner::Player));

        tick(&mut state, &idle(), DT);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.kills, 1);
        // +2 per kill plus the 0.001*dt survival drift
        let expected = 2.0 + 0.001 * DT as f64;
        assert!((state.score - expected).abs() < 1e-9);
        assert!(state.events.contains(&GameEvent::EnemyDown));
    }

    #[test]
    fn test_one_bullet_kills_at_most_one_enemy() {
        let mut state = GameState::new(42);
        let spot = Vec2::new(500.0, 300.0);
        state.enemies.push(parked_enemy(spot, 20.0));
        state.enemies.push(parked_enemy(spot, 30.0));
        state.bullets.push(still_bullet(spot, Owner::Player));

        tick(&mut state, &idle(), DT);

        // Highest index is checked first, so the size-30 enemy dies
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].size, 20.0);
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_bullet_expires_by_age_and_bounds() {
        let mut state = GameState::new(42);
        let mut old = still_bullet(Vec2::new(500.0, 300.0), Owner::Player);
        old.age = BULLET_MAX_AGE;
        state.bullets.push(old);
        state.bullets.push(Projectile {
            pos: Vec2::new(FIELD_W - 5.0, 300.0),
            vel: Vec2::new(BULLET_SPEED, 0.0),
            age: 0,
            owner: Owner::Player,
        });

        tick(&mut state, &idle(), DT);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_weapon_cooldown_blocks_rapid_fire() {
        let mut state = GameState::new(42);
        let fire = TickInput {
            fire: true,
            pointer: Some(Vec2::new(FIELD_W, FIELD_H / 2.0)),
            ..TickInput::default()
        };

        tick(&mut state, &fire, DT);
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &fire, DT);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_turret_tracks_pointer() {
        let mut state = GameState::new(42);
        let below = state.player.pos + Vec2::new(0.0, 100.0);
        let input = TickInput {
            pointer: Some(below),
            ..TickInput::default()
        };

        tick(&mut state, &input, DT);
        assert!((state.player.turret_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_enemies_only_fire_at_level_three() {
        let mut state = GameState::new(42);
        let mut enemy = parked_enemy(Vec2::new(100.0, 100.0), 20.0);
        enemy.reload = 1;
        state.enemies.push(enemy);

        tick(&mut state, &idle(), DT);
        assert!(state.enemy_bullets.is_empty());
        // Cooldown untouched below level 3
        assert_eq!(state.enemies[0].reload, 1);

        state.level = Level::Three;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.enemy_bullets[0].owner, Owner::Enemy);
        let speed = state.enemy_bullets[0].vel.length();
        assert!((2.0..3.0).contains(&speed));
        let reload = state.enemies[0].reload;
        assert!((60..180).contains(&reload));
        assert!(state.events.contains(&GameEvent::EnemyFired));
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = GameState::new(42);
        state.level = Level::Three;
        state
            .enemy_bullets
            .push(still_bullet(state.player.pos, Owner::Enemy));

        tick(&mut state, &idle(), DT);

        assert_eq!(state.lives, 2);
        assert!(state.enemy_bullets.is_empty());
        assert!(state.events.contains(&GameEvent::PlayerHit));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_enemy_bullets_idle_below_level_three() {
        let mut state = GameState::new(42);
        state
            .enemy_bullets
            .push(still_bullet(Vec2::new(50.0, 50.0), Owner::Enemy));

        tick(&mut state, &idle(), DT);
        assert_eq!(state.enemy_bullets[0].age, 0);
    }

    #[test]
    fn test_ram_costs_life_and_destroys_enemy() {
        let mut state = GameState::new(42);
        state.enemies.push(parked_enemy(state.player.pos, 20.0));

        tick(&mut state, &idle(), DT);

        assert_eq!(state.lives, 2);
        assert!(state.enemies.is_empty());
        assert!(state.events.contains(&GameEvent::PlayerRammed));
    }

    #[test]
    fn test_fatal_ram_ends_the_tick_early() {
        let mut state = GameState::new(42);
        state.lives = 1;
        state.spawn_timer_ms = 5000.0;
        state.enemies.push(parked_enemy(state.player.pos, 20.0));

        tick(&mut state, &idle(), DT);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
        // Spawning and score drift never ran this tick
        assert_eq!(state.spawn_timer_ms, 5000.0);
        assert_eq!(state.score, 0.0);

        // Frozen until the shell builds a new session
        state.events.clear();
        tick(&mut state, &idle(), DT);
        assert_eq!(state.score, 0.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_spawn_after_interval_and_cap() {
        let mut state = GameState::new(42);
        tick(&mut state, &idle(), 1801.0);
        assert_eq!(state.enemies.len(), 1);
        let spawned = &state.enemies[0];
        assert!((18.0..36.0).contains(&spawned.size));
        assert!((0.6..1.5).contains(&spawned.speed));

        // At the cap nothing spawns, and the timer keeps accumulating
        let mut state = GameState::new(42);
        for k in 0..6 {
            state
                .enemies
                .push(parked_enemy(Vec2::new(30.0 + 40.0 * k as f32, 30.0), 20.0));
        }
        state.spawn_timer_ms = 5000.0;
        tick(&mut state, &idle(), DT);
        assert_eq!(state.enemies.len(), 6);
        assert!(state.spawn_timer_ms > 5000.0);
    }

    #[test]
    fn test_kill_threshold_promotes_mid_tick() {
        let mut state = GameState::new(42);
        state.kills = KILLS_TO_LEVEL2 - 1;
        let spot = Vec2::new(500.0, 300.0);
        state.enemies.push(parked_enemy(spot, 20.0));
        state.bullets.push(still_bullet(spot, Owner::Player));

        tick(&mut state, &idle(), DT);

        assert_eq!(state.kills, KILLS_TO_LEVEL2);
        assert_eq!(state.level, Level::Two);
        assert!(state.events.contains(&GameEvent::LevelUp(Level::Two)));
        assert!(state.banner.visible());
    }

    #[test]
    fn test_score_drift_accrues_without_kills() {
        let mut state = GameState::new(42);
        for _ in 0..10 {
            tick(&mut state, &idle(), DT);
        }
        let expected = 10.0 * 0.001 * DT as f64;
        assert!((state.score - expected).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_player_speed_and_position_bounded(
            seed in any::<u64>(),
            keys in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..200,
            ),
        ) {
            let mut state = GameState::new(seed);
            for (left, right, up, down) in keys {
                let input = TickInput {
                    turn_left: left,
                    turn_right: right,
                    throttle_up: up,
                    throttle_down: down,
                    ..TickInput::default()
                };
                tick(&mut state, &input, DT);

                prop_assert!(state.player.speed >= PLAYER_SPEED_MIN);
                prop_assert!(state.player.speed <= PLAYER_SPEED_MAX);
                prop_assert!(state.player.pos.x >= PLAYER_EDGE_MARGIN);
                prop_assert!(state.player.pos.x <= FIELD_W - PLAYER_EDGE_MARGIN);
                prop_assert!(state.player.pos.y >= PLAYER_EDGE_MARGIN);
                prop_assert!(state.player.pos.y <= FIELD_H - PLAYER_EDGE_MARGIN);
            }
        }

        #[test]
        fn prop_enemy_turn_is_bounded(
            ex in 8.0f32..1329.0,
            ey in 8.0f32..542.0,
            start_angle in -6.0f32..6.0,
        ) {
            let pos = Vec2::new(ex, ey);
            let mut state = GameState::new(7);
            prop_assume!(pos.distance(state.player.pos) > 100.0);

            let mut enemy = parked_enemy(pos, 20.0);
            enemy.angle = start_angle;
            state.enemies.push(enemy);

            tick(&mut state, &idle(), DT);

            let turned = (state.enemies[0].angle - start_angle).abs();
            prop_assert!(turned <= ENEMY_TURN_CLAMP + 1e-6);
        }
    }
}
