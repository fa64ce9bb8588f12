//! The per-tick transition function
//!
//! `tick` never mutates its input: it clones the previous state and advances
//! the clone through each subsystem in a fixed order. Two states built from
//! the same seed and fed the same inputs stay bit-identical forever.

use super::state::{GameEvent, GamePhase, GameState, Player};
use super::{collision, enemy, level, player, projectile};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Action-level input for one tick. Held keys arrive as `true` every tick;
/// the simulation does its own edge detection where an action is
/// press-triggered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
    pub special: bool,
    pub dash: bool,
    pub grapple: bool,
    /// Edge-triggered by the shell
    pub pause: bool,
}

/// Advance the world by exactly one tick.
pub fn tick(prev: &GameState, input: &TickInput, tuning: &Tuning, settings: &Settings) -> GameState {
    let mut state = prev.clone();
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return state;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }
    if state.phase != GamePhase::Playing {
        return state;
    }

    state.time_ticks += 1;
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    player::update_player(&mut state, input, tuning);
    enemy::update_enemies(&mut state, tuning, settings);
    enemy::update_turrets(&mut state, tuning);
    projectile::integrate_bullets(&mut state);
    collision::resolve_bullets(&mut state, tuning, settings);
    collision::evaluate_hazards(&mut state, settings);

    for e in &mut state.explosions {
        e.life = e.life.saturating_sub(1);
    }
    state.explosions.retain(|e| e.life > 0);

    if state.player.health <= 0 {
        handle_player_death(&mut state, tuning);
    } else if state.enemies.is_empty() && state.cages.is_empty() {
        advance_level(&mut state, tuning);
    }

    state
}

/// Spend a life and respawn with a fresh hero, or end the run.
fn handle_player_death(state: &mut GameState, tuning: &Tuning) {
    if state.player.lives > 0 {
        let lives = state.player.lives - 1;
        let hero = state.player.hero.clone();
        let id = state.next_entity_id();
        state.player = Player::new(id, hero, lives);
        state.player.rect.pos.x = 100.0;
        state.player.rect.pos.y = GROUND_Y - PLAYER_HEIGHT;
        state.swap_hero(tuning);
        state.add_shake(0.6);
    } else {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Level cleared: everyone down and the cage already broken.
fn advance_level(state: &mut GameState, tuning: &Tuning) {
    state.difficulty += 1;
    state.player.health += LEVEL_CLEAR_HEAL;
    state.player.clamp_health();
    state.events.push(GameEvent::LevelComplete {
        difficulty: state.difficulty,
    });
    level::generate_level(state, tuning);
}
