//! Procedural level generation
//!
//! Levels are generated from the state's own RNG, so a seed fully determines
//! the run. Difficulty scales the level width, entity counts, enemy speed,
//! and trigger cadence; every third difficulty adds a boss at the far end.

use glam::Vec2;
use rand::Rng;

use super::aabb::Aabb;
use super::state::{AttackPattern, Behavior, Crate, Enemy, Facing, GameState, RescueCage, SpikePit};
use crate::consts::*;
use crate::roster::CharacterProfile;
use crate::tuning::Tuning;

pub fn generate_level(state: &mut GameState, tuning: &Tuning) {
    state.bullets.clear();
    state.turrets.clear();
    state.explosions.clear();
    state.enemies.clear();
    state.crates.clear();
    state.cages.clear();
    state.spike_pits.clear();

    let d = state.difficulty;
    state.level_width = GAME_WIDTH * (2 + d) as f32;

    let platforms = spawn_platforms(state, 10 + 5 * d as usize);
    spawn_loose_crates(state, &platforms, 5 + 2 * d as usize);
    spawn_enemies(state, 3 + 2 * d as usize);
    if d > 0 && d % 3 == 0 {
        spawn_boss(state, tuning);
    }
    spawn_spike_pits(state, d.min(4) as usize);
    spawn_cage(state, &platforms);

    // Player starts at the left edge of the new level, on the ground
    state.player.rect.pos = Vec2::new(100.0, GROUND_Y - PLAYER_HEIGHT);
    state.player.vel_y = 0.0;
    state.player.on_ground = true;
    state.player.grapple = None;
    state.player.double_jump_used = false;
    state.player.wall_sliding = false;

    log::debug!(
        "generated level: difficulty={} width={} enemies={} crates={} pits={}",
        d,
        state.level_width,
        state.enemies.len(),
        state.crates.len(),
        state.spike_pits.len()
    );
}

/// Unbreakable platform crates scattered at jumpable heights. Returns their
/// rects so crates and the cage can be placed on top of them.
fn spawn_platforms(state: &mut GameState, count: usize) -> Vec<Aabb> {
    let mut rects = Vec::with_capacity(count);
    for _ in 0..count {
        let w = 100.0 + state.rng.random_range(0.0..100.0);
        let x = state.rng.random_range(150.0..state.level_width - 250.0);
        let y = GROUND_Y - 50.0 - state.rng.random_range(0.0..200.0);
        let rect = Aabb::new(x, y, w, 20.0);
        let id = state.next_entity_id();
        state.crates.push(Crate {
            id,
            rect,
            health: PLATFORM_HEALTH,
        });
        rects.push(rect);
    }
    rects
}

fn spawn_loose_crates(state: &mut GameState, platforms: &[Aabb], count: usize) {
    for _ in 0..count {
        let rect = if platforms.is_empty() || state.rng.random_bool(0.5) {
            // On the ground
            let x = state.rng.random_range(300.0..state.level_width - 150.0);
            Aabb::new(x, GROUND_Y - CRATE_HEIGHT, CRATE_WIDTH, CRATE_HEIGHT)
        } else {
            let p = &platforms[state.rng.random_range(0..platforms.len())];
            let x = p.left() + state.rng.random_range(0.0..(p.size.x - CRATE_WIDTH).max(1.0));
            Aabb::new(x, p.top() - CRATE_HEIGHT, CRATE_WIDTH, CRATE_HEIGHT)
        };
        let id = state.next_entity_id();
        state.crates.push(Crate {
            id,
            rect,
            health: CRATE_HEALTH,
        });
    }
}

fn villain_pool(state: &GameState) -> Vec<CharacterProfile> {
    if state.cast.villains.is_empty() {
        crate::roster::fallback_cast().villains
    } else {
        state.cast.villains.clone()
    }
}

fn spawn_enemies(state: &mut GameState, count: usize) {
    let d = state.difficulty;
    let villains = villain_pool(state);
    for _ in 0..count {
        // Flying enemies join the mix at higher difficulty
        let kinds = if d >= 2 { 3 } else { 2 };
        let behavior = match state.rng.random_range(0..kinds) {
            0 => Behavior::Shoot,
            1 => Behavior::Charge,
            _ => Behavior::Fly,
        };
        let x = state.rng.random_range(600.0..state.level_width - 100.0);
        let y = match behavior {
            Behavior::Fly => state.rng.random_range(100.0..300.0),
            _ => GROUND_Y - ENEMY_HEIGHT,
        };
        let villain = villains[state.rng.random_range(0..villains.len())].clone();
        let shoot_cooldown = (180_u32.saturating_sub(10 * d)).max(30);
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            rect: Aabb::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            villain,
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            facing: Facing::Left,
            move_dir: if state.rng.random_bool(0.5) {
                Facing::Left
            } else {
                Facing::Right
            },
            move_speed: 1.0 + 0.2 * d as f32,
            shoot_cooldown,
            damage_flash: 0,
            vel_y: 0.0,
            behavior,
        });
    }
}

/// The cast's lead villain, waiting at the far end of the level.
fn spawn_boss(state: &mut GameState, tuning: &Tuning) {
    let villains = villain_pool(state);
    let villain = villains[0].clone();
    let pattern = match state.rng.random_range(0..3) {
        0 => AttackPattern::Spread,
        1 => AttackPattern::Beam,
        _ => AttackPattern::Hail,
    };
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        rect: Aabb::new(
            state.level_width - BOSS_WIDTH - 200.0,
            GROUND_Y - BOSS_HEIGHT,
            BOSS_WIDTH,
            BOSS_HEIGHT,
        ),
        villain,
        health: BOSS_MAX_HEALTH,
        max_health: BOSS_MAX_HEALTH,
        facing: Facing::Left,
        move_dir: Facing::Left,
        move_speed: 1.5,
        shoot_cooldown: 60,
        damage_flash: 0,
        vel_y: 0.0,
        behavior: Behavior::Boss {
            pattern,
            pattern_ticks: tuning.boss_pattern_ticks,
        },
    });
}

fn spawn_spike_pits(state: &mut GameState, count: usize) {
    for _ in 0..count {
        let x = state.rng.random_range(800.0..state.level_width - 200.0);
        let id = state.next_entity_id();
        state.spike_pits.push(SpikePit {
            id,
            rect: Aabb::new(
                x,
                GROUND_Y - SPIKE_PIT_HEIGHT,
                SPIKE_PIT_WIDTH,
                SPIKE_PIT_HEIGHT,
            ),
        });
    }
}

/// Exactly one rescue cage per level; breaking it is the win condition.
fn spawn_cage(state: &mut GameState, platforms: &[Aabb]) {
    let rect = if platforms.is_empty() {
        Aabb::new(state.level_width - 400.0, GROUND_Y - 50.0, 50.0, 50.0)
    } else {
        let p = &platforms[state.rng.random_range(0..platforms.len())];
        Aabb::new(p.center().x - 25.0, p.top() - 50.0, 50.0, 50.0)
    };
    let id = state.next_entity_id();
    state.cages.push(RescueCage {
        id,
        rect,
        health: CAGE_HEALTH,
    });
}
