//! Bullet hit resolution and hazards
//!
//! Bullets are taken out of the state, tested against their valid targets,
//! and only the misses survive. A bullet damages at most one target.
//! Player-owned bullets resolve against enemies, crates, and cages; enemy-
//! and turret-owned bullets resolve against the player. A grenade that
//! reaches the ground unconsumed detonates: a blast-sized visual and a
//! shake, no damage of its own.

use glam::Vec2;

use super::aabb::Aabb;
use super::state::{Faction, GameEvent, GameState};
use crate::consts::*;
use crate::roster::WeaponKind;
use crate::settings::Settings;
use crate::tuning::Tuning;

pub fn resolve_bullets(state: &mut GameState, tuning: &Tuning, settings: &Settings) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        let mut hit = match bullet.owner {
            // Turret bullets resolve like enemy fire: only the player can
            // be struck by them
            Faction::Enemy | Faction::Turret => {
                hit_player(state, &bullet.rect, ENEMY_BULLET_DAMAGE, tuning, settings)
            }
            Faction::Player => hit_player_target(state, &bullet.rect, &bullet.weapon, tuning),
        };
        if !hit && bullet.weapon == WeaponKind::Grenade && bullet.rect.bottom() >= GROUND_Y {
            detonate_grenade(state, bullet.rect.center(), tuning);
            hit = true;
        }
        if !hit {
            survivors.push(bullet);
        }
    }

    state.bullets = survivors;
    state.enemies.retain(|e| e.health > 0);
    state.crates.retain(|c| c.health > 0);
    state.cages.retain(|c| c.health > 0);
}

fn hit_player(
    state: &mut GameState,
    rect: &Aabb,
    damage: i32,
    tuning: &Tuning,
    settings: &Settings,
) -> bool {
    if settings.god_mode || state.player.is_invincible() {
        return false;
    }
    if !rect.overlaps(&state.player.rect) {
        return false;
    }
    state.player.health -= damage;
    state.player.clamp_health();
    state.player.damage_flash = tuning.damage_flash_ticks;
    state.add_shake(0.2);
    state.events.push(GameEvent::Hurt);
    true
}

/// A player-owned bullet against the first enemy, crate, or cage it touches.
/// Any non-grenade hit spawns a small impact effect regardless of target.
fn hit_player_target(
    state: &mut GameState,
    rect: &Aabb,
    weapon: &WeaponKind,
    tuning: &Tuning,
) -> bool {
    for i in 0..state.enemies.len() {
        if state.enemies[i].health > 0 && rect.overlaps(&state.enemies[i].rect) {
            impact_effect(state, rect, weapon, tuning);
            damage_enemy(state, i, PLAYER_BULLET_DAMAGE, tuning);
            return true;
        }
    }
    for i in 0..state.crates.len() {
        if rect.overlaps(&state.crates[i].rect) {
            impact_effect(state, rect, weapon, tuning);
            damage_crate(state, i, PLAYER_BULLET_DAMAGE, tuning);
            return true;
        }
    }
    for i in 0..state.cages.len() {
        if rect.overlaps(&state.cages[i].rect) {
            impact_effect(state, rect, weapon, tuning);
            damage_cage(state, i, PLAYER_BULLET_DAMAGE, tuning);
            return true;
        }
    }
    false
}

fn impact_effect(state: &mut GameState, rect: &Aabb, weapon: &WeaponKind, tuning: &Tuning) {
    if *weapon != WeaponKind::Grenade {
        state.push_explosion(rect.center(), Vec2::new(20.0, 20.0), tuning);
    }
}

/// Ground detonation is purely a consumption event: the blast-sized visual
/// and a shake. Grenades deal damage through direct hits only.
fn detonate_grenade(state: &mut GameState, center: Vec2, tuning: &Tuning) {
    state.push_explosion(
        center,
        Vec2::new(GRENADE_BLAST_WIDTH, GRENADE_BLAST_HEIGHT),
        tuning,
    );
    state.add_shake(0.4);
    state.events.push(GameEvent::Explosion);
}

/// Apply damage; on the crossing into death, award score once and emit the
/// kill effects. The corpse is swept out after all bullets resolve.
fn damage_enemy(state: &mut GameState, i: usize, damage: i32, tuning: &Tuning) {
    state.enemies[i].health -= damage;
    state.enemies[i].damage_flash = tuning.damage_flash_ticks;
    if state.enemies[i].health <= 0 {
        let boss = state.enemies[i].is_boss();
        state.score += if boss { SCORE_BOSS } else { SCORE_ENEMY };
        let rect = state.enemies[i].rect;
        state.push_explosion(rect.center(), rect.size * 1.5, tuning);
        state.add_shake(if boss { 0.8 } else { 0.4 });
        state.events.push(GameEvent::EnemyDown { boss });
    }
}

fn damage_crate(state: &mut GameState, i: usize, damage: i32, tuning: &Tuning) {
    state.crates[i].health -= damage;
    if state.crates[i].health <= 0 {
        let rect = state.crates[i].rect;
        state.push_explosion(rect.center(), rect.size, tuning);
        state.events.push(GameEvent::Explosion);
    }
}

/// Breaking the cage grants a life and swaps in a fresh hero.
fn damage_cage(state: &mut GameState, i: usize, damage: i32, tuning: &Tuning) {
    state.cages[i].health -= damage;
    if state.cages[i].health <= 0 {
        state.events.push(GameEvent::Rescue);
        state.player.lives += 1;
        state.add_shake(0.3);
        state.swap_hero(tuning);
    }
}

/// Spike pits are instantly lethal and bypass the damage pipeline entirely;
/// falling below the world does the same with no exemptions.
pub fn evaluate_hazards(state: &mut GameState, settings: &Settings) {
    if state.player.health > 0
        && !settings.god_mode
        && !state.player.is_invincible()
        && state
            .spike_pits
            .iter()
            .any(|s| s.rect.overlaps(&state.player.rect))
    {
        state.player.health = 0;
        state.add_shake(0.5);
        state.events.push(GameEvent::Hurt);
    }
    if state.player.rect.top() > GAME_HEIGHT + 100.0 {
        state.player.health = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fallback_cast;
    use crate::sim::state::{Behavior, Bullet, Crate, Enemy, Facing, RescueCage, SpikePit};

    fn bare_state() -> GameState {
        let mut state = GameState::new(5, fallback_cast());
        state.enemies.clear();
        state.bullets.clear();
        state.crates.clear();
        state.cages.clear();
        state.spike_pits.clear();
        state.explosions.clear();
        state.player.rect.pos = Vec2::new(200.0, GROUND_Y - PLAYER_HEIGHT);
        state
    }

    fn enemy_at(state: &mut GameState, x: f32, health: i32, behavior: Behavior) {
        let id = state.next_entity_id();
        let villain = state.cast.villains[0].clone();
        state.enemies.push(Enemy {
            id,
            rect: Aabb::new(x, GROUND_Y - ENEMY_HEIGHT, ENEMY_WIDTH, ENEMY_HEIGHT),
            villain,
            health,
            max_health: health,
            facing: Facing::Left,
            move_dir: Facing::Right,
            move_speed: 1.0,
            shoot_cooldown: 0,
            damage_flash: 0,
            vel_y: 0.0,
            behavior,
        });
    }

    fn bullet_at(state: &mut GameState, x: f32, y: f32, owner: Faction, weapon: WeaponKind) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            rect: Aabb::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
            owner,
            vel: Vec2::new(BULLET_SPEED, 0.0),
            weapon,
        });
    }

    #[test]
    fn test_enemy_dies_after_three_rifle_hits() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        enemy_at(&mut state, 500.0, ENEMY_MAX_HEALTH, Behavior::Shoot);

        for _ in 0..2 {
            bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
            resolve_bullets(&mut state, &tuning, &settings);
            assert_eq!(state.enemies.len(), 1);
        }
        bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, SCORE_ENEMY);
        assert!(state.events.contains(&GameEvent::EnemyDown { boss: false }));
    }

    #[test]
    fn test_boss_kill_scores_big() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        enemy_at(
            &mut state,
            500.0,
            PLAYER_BULLET_DAMAGE,
            Behavior::Boss {
                pattern: crate::sim::state::AttackPattern::Spread,
                pattern_ticks: 10,
            },
        );
        bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.score, SCORE_BOSS);
        assert!(state.events.contains(&GameEvent::EnemyDown { boss: true }));
    }

    #[test]
    fn test_bullet_hits_at_most_one_target() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        enemy_at(&mut state, 500.0, ENEMY_MAX_HEALTH, Behavior::Shoot);
        enemy_at(&mut state, 505.0, ENEMY_MAX_HEALTH, Behavior::Shoot);
        bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        let total: i32 = state.enemies.iter().map(|e| e.health).sum();
        assert_eq!(total, 2 * ENEMY_MAX_HEALTH - PLAYER_BULLET_DAMAGE);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_bullet_damages_player() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let p = state.player.rect.pos;
        bullet_at(&mut state, p.x, p.y + 10.0, Faction::Enemy, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - ENEMY_BULLET_DAMAGE);
        assert!(state.player.damage_flash > 0);
        // Bullet hits flag the damage flash but grant no invincibility;
        // that window belongs to contact damage only
        assert!(!state.player.is_invincible());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_turret_bullet_resolves_against_the_player_only() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let p = state.player.rect.pos;
        // Enemy stacked on the player so the bullet overlaps both
        enemy_at(&mut state, p.x, ENEMY_MAX_HEALTH, Behavior::Shoot);
        bullet_at(&mut state, p.x, p.y + 10.0, Faction::Turret, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - ENEMY_BULLET_DAMAGE);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_turret_bullet_passes_through_enemies() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        enemy_at(&mut state, 500.0, ENEMY_MAX_HEALTH, Behavior::Shoot);
        bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Turret, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_invincible_player_lets_bullets_pass() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        state.player.invincibility_timer = 100;
        let p = state.player.rect.pos;
        bullet_at(&mut state, p.x, p.y + 10.0, Faction::Enemy, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_cage_break_grants_life_and_new_hero() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.cages.push(RescueCage {
            id,
            rect: Aabb::new(500.0, GROUND_Y - 50.0, 50.0, 50.0),
            health: CAGE_HEALTH,
        });
        let lives = state.player.lives;
        let hero = state.player.hero.id;

        for _ in 0..3 {
            bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
            resolve_bullets(&mut state, &tuning, &settings);
        }
        assert!(state.cages.is_empty());
        assert_eq!(state.player.lives, lives + 1);
        assert_ne!(state.player.hero.id, hero);
        assert!(state.events.contains(&GameEvent::Rescue));
    }

    #[test]
    fn test_grenade_detonates_on_ground() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        bullet_at(
            &mut state,
            500.0,
            GROUND_Y - BULLET_HEIGHT + 1.0,
            Faction::Player,
            WeaponKind::Grenade,
        );
        resolve_bullets(&mut state, &tuning, &settings);
        assert!(state.bullets.is_empty());
        assert!(state.events.contains(&GameEvent::Explosion));
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(
            state.explosions[0].rect.size,
            Vec2::new(GRENADE_BLAST_WIDTH, GRENADE_BLAST_HEIGHT)
        );
    }

    #[test]
    fn test_detonation_is_damage_free() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        // Enemy inside the would-be blast box but not touching the bullet
        enemy_at(&mut state, 540.0, ENEMY_MAX_HEALTH, Behavior::Shoot);
        bullet_at(
            &mut state,
            500.0,
            GROUND_Y - BULLET_HEIGHT + 1.0,
            Faction::Player,
            WeaponKind::Grenade,
        );
        resolve_bullets(&mut state, &tuning, &settings);
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_platform_crate_absorbs_without_breaking() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.crates.push(Crate {
            id,
            rect: Aabb::new(500.0, 300.0, 100.0, 20.0),
            health: PLATFORM_HEALTH,
        });
        bullet_at(&mut state, 510.0, 305.0, Faction::Player, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.crates.len(), 1);
        assert_eq!(state.crates[0].health, PLATFORM_HEALTH - PLAYER_BULLET_DAMAGE);
        assert!(state.bullets.is_empty());
        // Non-grenade hits leave an impact effect on crates too
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].rect.size, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_cage_hit_spawns_impact_effect() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.cages.push(RescueCage {
            id,
            rect: Aabb::new(500.0, GROUND_Y - 50.0, 50.0, 50.0),
            health: CAGE_HEALTH,
        });
        bullet_at(&mut state, 510.0, GROUND_Y - 20.0, Faction::Player, WeaponKind::Rifle);
        resolve_bullets(&mut state, &tuning, &settings);
        assert_eq!(state.cages[0].health, CAGE_HEALTH - PLAYER_BULLET_DAMAGE);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_spike_pit_is_instantly_lethal() {
        let settings = Settings::default();
        let mut state = bare_state();
        let id = state.next_entity_id();
        state.spike_pits.push(SpikePit {
            id,
            rect: Aabb::new(
                state.player.rect.pos.x,
                GROUND_Y - SPIKE_PIT_HEIGHT,
                SPIKE_PIT_WIDTH,
                SPIKE_PIT_HEIGHT,
            ),
        });
        evaluate_hazards(&mut state, &settings);
        assert_eq!(state.player.health, 0);
    }

    #[test]
    fn test_spike_pit_respects_invincibility() {
        let settings = Settings::default();
        let mut state = bare_state();
        state.player.invincibility_timer = 10;
        let id = state.next_entity_id();
        state.spike_pits.push(SpikePit {
            id,
            rect: Aabb::new(
                state.player.rect.pos.x,
                GROUND_Y - SPIKE_PIT_HEIGHT,
                SPIKE_PIT_WIDTH,
                SPIKE_PIT_HEIGHT,
            ),
        });
        evaluate_hazards(&mut state, &settings);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_falling_out_of_the_world_kills_regardless() {
        let settings = Settings {
            god_mode: true,
            ..Default::default()
        };
        let mut state = bare_state();
        state.player.invincibility_timer = 1000;
        state.player.rect.pos.y = GAME_HEIGHT + 200.0;
        evaluate_hazards(&mut state, &settings);
        assert_eq!(state.player.health, 0);
    }
}
