//! Enemy and turret behavior
//!
//! Each enemy runs one behavior archetype per tick: patrol-and-shoot,
//! charge, diagonal flight, or the boss's timed attack patterns. Turrets
//! are player-deployed and pick their own targets.

use glam::Vec2;
use rand::Rng;

use super::projectile;
use super::state::{AttackPattern, Behavior, Bullet, Faction, Facing, GameEvent, GameState};
use crate::consts::*;
use crate::roster::WeaponKind;
use crate::settings::Settings;
use crate::tuning::Tuning;

pub fn update_enemies(state: &mut GameState, tuning: &Tuning, settings: &Settings) {
    let platforms = state.platform_rects();
    let player_center = state.player.rect.center();

    for i in 0..state.enemies.len() {
        state.enemies[i].shoot_cooldown = state.enemies[i].shoot_cooldown.saturating_sub(1);
        state.enemies[i].damage_flash = state.enemies[i].damage_flash.saturating_sub(1);

        let center = state.enemies[i].rect.center();
        let to_player = player_center - center;
        state.enemies[i].facing = Facing::from_sign(to_player.x);
        let in_aggro = to_player.x.abs() < AGGRO_RANGE_X && to_player.y.abs() < AGGRO_RANGE_Y;

        match state.enemies[i].behavior {
            Behavior::Shoot => {
                patrol(state, i);
                if in_aggro && state.enemies[i].shoot_cooldown == 0 {
                    let id = state.next_entity_id();
                    let facing = state.enemies[i].facing;
                    let bullet = projectile::straight_shot(
                        id,
                        &state.enemies[i],
                        facing,
                        Faction::Enemy,
                        BULLET_SPEED * ENEMY_BULLET_SPEED_MULT,
                    );
                    state.bullets.push(bullet);
                    reroll_cooldown(state, i);
                }
            }
            Behavior::Charge => {
                let speed = state.enemies[i].move_speed * CHARGE_SPEED_MULT;
                state.enemies[i].rect.pos.x += to_player.x.signum() * speed;
            }
            Behavior::Fly => {
                // Diagonal pursuit at half speed, no gravity
                let speed = state.enemies[i].move_speed * 0.5;
                state.enemies[i].rect.pos.x += to_player.x.signum() * speed;
                state.enemies[i].rect.pos.y += to_player.y.signum() * speed;
                if in_aggro && state.enemies[i].shoot_cooldown == 0 {
                    let id = state.next_entity_id();
                    let bullet = projectile::aimed_shot(
                        id,
                        &state.enemies[i],
                        player_center,
                        Faction::Enemy,
                        BULLET_SPEED * ENEMY_BULLET_SPEED_MULT,
                    );
                    state.bullets.push(bullet);
                    reroll_cooldown(state, i);
                }
            }
            Behavior::Boss {
                pattern,
                pattern_ticks,
            } => {
                let speed = state.enemies[i].move_speed;
                state.enemies[i].rect.pos.x += to_player.x.signum() * speed;

                let (pattern, pattern_ticks) = if pattern_ticks == 0 {
                    (roll_pattern(state), tuning.boss_pattern_ticks)
                } else {
                    (pattern, pattern_ticks - 1)
                };
                state.enemies[i].behavior = Behavior::Boss {
                    pattern,
                    pattern_ticks,
                };

                // Patterns fire on their own cadence, no aggro gate
                if state.enemies[i].shoot_cooldown == 0 {
                    fire_boss_pattern(state, i, pattern, player_center, tuning);
                }
            }
        }

        if !matches!(state.enemies[i].behavior, Behavior::Fly) {
            apply_enemy_gravity(state, i, &platforms);
        }
    }

    resolve_contact_damage(state, tuning, settings);
}

/// Walk along the patrol heading, reversing at level bounds or on contact
/// with a crate.
fn patrol(state: &mut GameState, i: usize) {
    let speed = state.enemies[i].move_speed;
    let dir = state.enemies[i].move_dir;
    let moved = state.enemies[i]
        .rect
        .translated(Vec2::new(dir.sign() * speed, 0.0));
    let max_x = state.level_width - state.enemies[i].rect.size.x;
    let hit_wall = moved.pos.x < 0.0
        || moved.pos.x > max_x
        || state.crates.iter().any(|c| moved.overlaps(&c.rect));
    if hit_wall {
        state.enemies[i].move_dir = dir.flipped();
    } else {
        state.enemies[i].rect = moved;
    }
}

fn reroll_cooldown(state: &mut GameState, i: usize) {
    let jitter = state.rng.random_range(0..60);
    state.enemies[i].shoot_cooldown = 90 + jitter;
}

fn roll_pattern(state: &mut GameState) -> AttackPattern {
    match state.rng.random_range(0..3) {
        0 => AttackPattern::Spread,
        1 => AttackPattern::Beam,
        _ => AttackPattern::Hail,
    }
}

fn fire_boss_pattern(
    state: &mut GameState,
    i: usize,
    pattern: AttackPattern,
    player_center: Vec2,
    tuning: &Tuning,
) {
    match pattern {
        AttackPattern::Spread => {
            // 5-way fan in the facing direction
            let facing = state.enemies[i].facing;
            for k in 0..5 {
                let id = state.next_entity_id();
                let mut bullet = projectile::straight_shot(
                    id,
                    &state.enemies[i],
                    facing,
                    Faction::Enemy,
                    BULLET_SPEED * ENEMY_BULLET_SPEED_MULT,
                );
                bullet.vel.y = (k as f32 - 2.0) * 2.0;
                state.bullets.push(bullet);
            }
            state.enemies[i].shoot_cooldown = tuning.boss_spread_cadence;
        }
        AttackPattern::Beam => {
            let id = state.next_entity_id();
            let mut bullet = projectile::aimed_shot(
                id,
                &state.enemies[i],
                player_center,
                Faction::Enemy,
                BULLET_SPEED * 1.5,
            );
            bullet.rect.size = Vec2::new(30.0, 10.0);
            state.bullets.push(bullet);
            state.enemies[i].shoot_cooldown = tuning.boss_beam_cadence;
        }
        AttackPattern::Hail => {
            // One bullet per cadence tick, raining from a random point
            // along the top of the level
            let x = state.rng.random_range(0.0..state.level_width);
            let id = state.next_entity_id();
            state.bullets.push(Bullet {
                id,
                rect: super::aabb::Aabb::new(x, -20.0, BULLET_WIDTH, BULLET_HEIGHT),
                owner: Faction::Enemy,
                vel: Vec2::new(0.0, 6.0),
                weapon: WeaponKind::Rifle,
            });
            state.enemies[i].shoot_cooldown = tuning.boss_hail_cadence;
        }
    }
}

fn apply_enemy_gravity(state: &mut GameState, i: usize, platforms: &[super::aabb::Aabb]) {
    state.enemies[i].vel_y += GRAVITY;
    let rect = state.enemies[i].rect;
    let mut new_y = rect.pos.y + state.enemies[i].vel_y;
    for platform in platforms {
        let x_overlap = rect.right() > platform.left() && rect.left() < platform.right();
        if x_overlap
            && rect.bottom() <= platform.top()
            && new_y + rect.size.y >= platform.top()
            && state.enemies[i].vel_y >= 0.0
        {
            new_y = platform.top() - rect.size.y;
            state.enemies[i].vel_y = 0.0;
            break;
        }
    }
    state.enemies[i].rect.pos.y = new_y;
}

/// Touching an enemy hurts; charging enemies hit harder. A brief contact
/// invincibility window stops damage from stacking every tick.
fn resolve_contact_damage(state: &mut GameState, tuning: &Tuning, settings: &Settings) {
    if settings.god_mode {
        return;
    }
    for i in 0..state.enemies.len() {
        if state.player.is_invincible() {
            break;
        }
        if state.enemies[i].health <= 0 {
            continue;
        }
        if state.enemies[i].rect.overlaps(&state.player.rect) {
            let damage = match state.enemies[i].behavior {
                Behavior::Charge => CHARGE_MELEE_DAMAGE,
                _ => MELEE_DAMAGE,
            };
            state.player.health -= damage;
            state.player.clamp_health();
            state.player.invincibility_timer = tuning.contact_invincibility_ticks;
            state.player.damage_flash = tuning.damage_flash_ticks;
            state.add_shake(0.3);
            state.events.push(GameEvent::Hurt);
        }
    }
}

/// Turrets expire on their own, pick the horizontally nearest living enemy,
/// and fire when one is in range.
pub fn update_turrets(state: &mut GameState, tuning: &Tuning) {
    for t in &mut state.turrets {
        t.lifespan = t.lifespan.saturating_sub(1);
        t.shoot_cooldown = t.shoot_cooldown.saturating_sub(1);
    }
    state.turrets.retain(|t| t.lifespan > 0);

    for i in 0..state.turrets.len() {
        if state.turrets[i].shoot_cooldown > 0 {
            continue;
        }
        let tx = state.turrets[i].rect.center().x;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.health > 0)
            .map(|e| e.rect.center().x - tx)
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));
        let Some(dx) = target else { continue };
        if dx.abs() > TURRET_RANGE {
            continue;
        }
        state.turrets[i].facing = Facing::from_sign(dx);
        let id = state.next_entity_id();
        let facing = state.turrets[i].facing;
        // Turret fire shares the enemy muzzle speed
        let bullet = projectile::straight_shot(
            id,
            &state.turrets[i],
            facing,
            Faction::Turret,
            BULLET_SPEED * ENEMY_BULLET_SPEED_MULT,
        );
        state.bullets.push(bullet);
        state.turrets[i].shoot_cooldown = tuning.turret_cooldown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fallback_cast;
    use crate::sim::aabb::Aabb;
    use crate::sim::state::{Enemy, Turret};

    fn bare_state() -> GameState {
        let mut state = GameState::new(3, fallback_cast());
        state.enemies.clear();
        state.bullets.clear();
        state.crates.clear();
        state.cages.clear();
        state.spike_pits.clear();
        state.turrets.clear();
        state.player.rect.pos = Vec2::new(200.0, GROUND_Y - PLAYER_HEIGHT);
        state
    }

    fn spawn_enemy(state: &mut GameState, x: f32, behavior: Behavior) -> usize {
        let id = state.next_entity_id();
        let villain = state.cast.villains[0].clone();
        state.enemies.push(Enemy {
            id,
            rect: Aabb::new(x, GROUND_Y - ENEMY_HEIGHT, ENEMY_WIDTH, ENEMY_HEIGHT),
            villain,
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            facing: Facing::Left,
            move_dir: Facing::Right,
            move_speed: 1.0,
            shoot_cooldown: 0,
            damage_flash: 0,
            vel_y: 0.0,
            behavior,
        });
        state.enemies.len() - 1
    }

    #[test]
    fn test_shoot_enemy_fires_in_aggro_window() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        spawn_enemy(&mut state, 500.0, Behavior::Shoot);
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].owner, Faction::Enemy);
        // Fired toward the player on the left
        assert!(state.bullets[0].vel.x < 0.0);
        assert!(state.enemies[0].shoot_cooldown >= 90);
    }

    #[test]
    fn test_shoot_enemy_holds_fire_out_of_range() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        state.level_width = 4000.0;
        spawn_enemy(&mut state, 3000.0, Behavior::Shoot);
        update_enemies(&mut state, &tuning, &settings);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_charge_enemy_closes_distance() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let i = spawn_enemy(&mut state, 600.0, Behavior::Charge);
        let x0 = state.enemies[i].rect.pos.x;
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.enemies[i].rect.pos.x, x0 - CHARGE_SPEED_MULT);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fly_enemy_ignores_gravity() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let id = state.next_entity_id();
        let villain = state.cast.villains[0].clone();
        state.enemies.push(Enemy {
            id,
            rect: Aabb::new(600.0, 100.0, ENEMY_WIDTH, ENEMY_HEIGHT),
            villain,
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            facing: Facing::Left,
            move_dir: Facing::Right,
            move_speed: 1.0,
            shoot_cooldown: 10,
            damage_flash: 0,
            vel_y: 0.0,
            behavior: Behavior::Fly,
        });
        update_enemies(&mut state, &tuning, &settings);
        // Moved toward the player on both axes instead of falling
        assert_eq!(state.enemies[0].rect.pos.x, 599.5);
        assert_eq!(state.enemies[0].rect.pos.y, 100.5);
        assert_eq!(state.enemies[0].vel_y, 0.0);
    }

    #[test]
    fn test_boss_pattern_cycles() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let i = spawn_enemy(
            &mut state,
            800.0,
            Behavior::Boss {
                pattern: AttackPattern::Spread,
                pattern_ticks: 0,
            },
        );
        update_enemies(&mut state, &tuning, &settings);
        let Behavior::Boss { pattern_ticks, .. } = state.enemies[i].behavior else {
            panic!("boss behavior lost");
        };
        assert_eq!(pattern_ticks, tuning.boss_pattern_ticks);
        // A pattern fired immediately
        assert!(!state.bullets.is_empty());
    }

    #[test]
    fn test_spread_fires_five_way_fan() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        spawn_enemy(
            &mut state,
            800.0,
            Behavior::Boss {
                pattern: AttackPattern::Spread,
                pattern_ticks: 100,
            },
        );
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.bullets.len(), 5);
        let vys: Vec<f32> = state.bullets.iter().map(|b| b.vel.y).collect();
        assert_eq!(vys, vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_contact_damage_and_invincibility_gate() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let px = state.player.rect.pos.x;
        spawn_enemy(&mut state, px, Behavior::Shoot);
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - MELEE_DAMAGE);
        assert!(state.player.is_invincible());
        assert!(state.events.contains(&GameEvent::Hurt));

        // While invincible, overlap does nothing more
        let health = state.player.health;
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, health);
    }

    #[test]
    fn test_god_mode_blocks_contact_damage() {
        let tuning = Tuning::default();
        let settings = Settings {
            god_mode: true,
            ..Default::default()
        };
        let mut state = bare_state();
        let px = state.player.rect.pos.x;
        spawn_enemy(&mut state, px, Behavior::Charge);
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_turret_fires_at_nearest_enemy_and_expires() {
        let tuning = Tuning::default();
        let mut state = bare_state();
        spawn_enemy(&mut state, 400.0, Behavior::Shoot);
        spawn_enemy(&mut state, 900.0, Behavior::Shoot);
        let id = state.next_entity_id();
        state.turrets.push(Turret {
            id,
            rect: Aabb::new(300.0, GROUND_Y - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT),
            lifespan: 2,
            shoot_cooldown: 0,
            facing: Facing::Left,
        });
        update_turrets(&mut state, &tuning);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].owner, Faction::Turret);
        // Aimed right, toward the enemy at 400 rather than 900
        assert_eq!(
            state.bullets[0].vel.x,
            BULLET_SPEED * ENEMY_BULLET_SPEED_MULT
        );
        assert_eq!(state.turrets[0].shoot_cooldown, tuning.turret_cooldown);

        update_turrets(&mut state, &tuning);
        assert!(state.turrets.is_empty());
    }

    #[test]
    fn test_patrol_reverses_at_level_edge() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let i = spawn_enemy(&mut state, 500.0, Behavior::Shoot);
        state.enemies[i].shoot_cooldown = 1000;
        state.enemies[i].rect.pos.x = state.level_width - ENEMY_WIDTH;
        update_enemies(&mut state, &tuning, &settings);
        assert_eq!(state.enemies[i].move_dir, Facing::Left);
    }
}
