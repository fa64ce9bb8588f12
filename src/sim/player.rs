//! Player movement physics and the ability state machine
//!
//! Runs once per tick in a fixed order: timers, dash/horizontal movement,
//! horizontal collision (with dig), gravity and landing, wall slide, the
//! three-way jump priority, fly/glide modifiers, shooting, specials, air
//! dash, and the grappling hook.

use glam::Vec2;

use super::aabb::Aabb;
use super::projectile;
use super::state::{Facing, GameEvent, GameState, GrappleState, Turret};
use super::tick::TickInput;
use crate::consts::*;
use crate::roster::SpecialKind;
use crate::tuning::Tuning;

pub fn update_player(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    step_timers(state, input, tuning);

    // Horizontal movement; dash overrides manual steering
    let mut dx = 0.0;
    if state.player.dash_timer > 0 {
        dx = state.player.facing.sign() * PLAYER_SPEED * DASH_SPEED_MULT;
        state.player.vel_y = 0.0;
    } else {
        if input.left {
            dx -= PLAYER_SPEED;
            state.player.facing = Facing::Left;
        }
        if input.right {
            dx += PLAYER_SPEED;
            state.player.facing = Facing::Right;
        }
    }

    let blocked = move_horizontal(state, dx, tuning);
    let landed = apply_vertical_physics(state);

    // Wall slide: blocked horizontally, airborne, and descending
    state.player.wall_sliding = blocked && !state.player.on_ground && state.player.vel_y > 0.0;
    if state.player.wall_sliding {
        state.player.vel_y = state.player.vel_y.min(WALL_SLIDE_MAX_FALL);
    }
    if state.player.on_ground {
        state.player.coyote_timer = tuning.coyote_ticks;
    }

    resolve_jump(state);
    apply_flight_modifiers(state, input);
    state.player.rect.pos.y = landed;

    if input.fire && state.player.fire_cooldown == 0 {
        projectile::fire_player_weapon(state, tuning);
    }

    trigger_special(state, input, tuning);

    // Air dash from the movement ability
    if state.player.hero.movement.air_dash
        && input.dash
        && state.player.dash_timer == 0
        && !state.player.on_ground
    {
        start_dash(state, tuning);
    }

    update_grapple(state, input);

    // Keep the player inside the level
    let max_x = state.level_width - state.player.rect.size.x;
    state.player.rect.pos.x = state.player.rect.pos.x.clamp(0.0, max_x);

    state.player.jump_was_held = input.jump;
    state.player.special_was_held = input.special;
    state.player.grapple_was_held = input.grapple;
}

/// Decrement every player timer, floored at zero, and latch the jump buffer
/// on the rising edge of the jump action.
fn step_timers(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let p = &mut state.player;
    p.special_cooldown = p.special_cooldown.saturating_sub(1);
    p.fire_cooldown = p.fire_cooldown.saturating_sub(1);
    p.invincibility_timer = p.invincibility_timer.saturating_sub(1);
    p.damage_flash = p.damage_flash.saturating_sub(1);
    p.dash_timer = p.dash_timer.saturating_sub(1);
    p.coyote_timer = p.coyote_timer.saturating_sub(1);
    p.jump_buffer = p.jump_buffer.saturating_sub(1);
    if input.jump && !p.jump_was_held {
        p.jump_buffer = tuning.jump_buffer_ticks;
    }
}

/// Move horizontally, rejecting movement into crates. A digger zeroes
/// destructible obstacles and keeps going. Returns whether a wall blocked
/// the move.
fn move_horizontal(state: &mut GameState, dx: f32, tuning: &Tuning) -> bool {
    state.player.digging = false;
    if dx == 0.0 {
        return false;
    }
    let moved = state.player.rect.translated(Vec2::new(dx, 0.0));
    let can_dig = state.player.hero.movement.dig;
    let mut blocked = false;
    let mut dug: Vec<usize> = Vec::new();
    for (i, c) in state.crates.iter().enumerate() {
        if moved.overlaps(&c.rect) {
            if can_dig && c.destructible() {
                dug.push(i);
            } else {
                blocked = true;
                break;
            }
        }
    }
    if blocked {
        return true;
    }
    for i in dug {
        let rect = state.crates[i].rect;
        state.crates[i].health = 0;
        state.player.digging = true;
        state.push_explosion(rect.center(), rect.size, tuning);
        state.events.push(GameEvent::Explosion);
    }
    state.crates.retain(|c| c.health > 0);
    state.player.rect.pos.x += dx;
    false
}

/// Gravity plus landing checks against every platform. Returns the resolved
/// y position; velocity and grounded state are updated in place.
fn apply_vertical_physics(state: &mut GameState) -> f32 {
    state.player.vel_y += GRAVITY;
    let rect = state.player.rect;
    let mut new_y = rect.pos.y + state.player.vel_y;
    state.player.on_ground = false;
    for platform in state.platform_rects() {
        let x_overlap = rect.right() > platform.left() && rect.left() < platform.right();
        if !x_overlap {
            continue;
        }
        // Descending into the top surface
        if rect.bottom() <= platform.top()
            && new_y + rect.size.y >= platform.top()
            && state.player.vel_y >= 0.0
        {
            new_y = platform.top() - rect.size.y;
            state.player.vel_y = 0.0;
            state.player.on_ground = true;
            state.player.double_jump_used = false;
            state.player.wall_sliding = false;
            state.player.flying = false;
            state.player.gliding = false;
            state.player.grapple = None;
            break;
        }
    }
    new_y
}

/// Buffered jump input consumes, in priority order: ground jump within the
/// coyote window, wall jump while sliding, then double jump.
fn resolve_jump(state: &mut GameState) {
    if state.player.jump_buffer == 0 {
        return;
    }
    let mut jumped = false;
    if state.player.coyote_timer > 0 {
        state.player.vel_y = -PLAYER_JUMP_FORCE;
        jumped = true;
    } else if state.player.wall_sliding {
        // Kick away from the wall with a stronger upward impulse
        let away = state.player.facing.flipped();
        state.player.rect.pos.x += away.sign() * PLAYER_SPEED;
        state.player.facing = away;
        state.player.vel_y = -PLAYER_JUMP_FORCE * WALL_JUMP_MULT;
        jumped = true;
    } else if state.player.hero.movement.double_jump && !state.player.double_jump_used {
        state.player.vel_y = -PLAYER_JUMP_FORCE;
        state.player.double_jump_used = true;
        jumped = true;
    }
    if jumped {
        state.player.jump_buffer = 0;
        state.player.coyote_timer = 0;
        state.player.wall_sliding = false;
        state.events.push(GameEvent::Jump);
    }
}

/// Fly sustains upward thrust while jump is held; glide caps descent.
fn apply_flight_modifiers(state: &mut GameState, input: &TickInput) {
    let p = &mut state.player;
    p.flying = false;
    p.gliding = false;
    if !input.jump || p.on_ground {
        return;
    }
    if p.hero.movement.fly {
        p.vel_y = (p.vel_y - FLY_THRUST).max(FLY_MAX_RISE);
        p.flying = true;
    } else if p.hero.movement.glide && p.vel_y > 0.0 {
        p.vel_y = p.vel_y.min(GLIDE_MAX_FALL);
        p.gliding = true;
    }
}

/// Special ability on the rising edge of its action, gated by its cooldown.
fn trigger_special(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    if !input.special || state.player.special_was_held || state.player.special_cooldown > 0 {
        return;
    }
    state.player.special_cooldown = tuning.special_cooldown;
    match state.player.hero.special {
        SpecialKind::Turret => {
            let id = state.next_entity_id();
            let rect = state.player.rect;
            state.turrets.push(Turret {
                id,
                rect,
                lifespan: tuning.turret_lifespan,
                shoot_cooldown: 0,
                facing: state.player.facing,
            });
        }
        SpecialKind::Invincibility => {
            state.player.invincibility_timer = tuning.invincibility_ticks;
        }
        SpecialKind::Cluster => {
            projectile::spawn_cluster(state);
        }
        SpecialKind::None => {}
    }
    // "Dash Strike" style specials dash regardless of the main effect
    if state.player.hero.dash_special {
        start_dash(state, tuning);
    }
}

fn start_dash(state: &mut GameState, tuning: &Tuning) {
    state.player.dash_timer = tuning.dash_ticks;
    state.player.invincibility_timer = state.player.invincibility_timer.max(tuning.dash_ticks);
    state.events.push(GameEvent::Dash);
}

/// Grappling hook: attach on the rising edge, swing while held, release on
/// let-go. A failed anchor search is a no-op, not an error.
fn update_grapple(state: &mut GameState, input: &TickInput) {
    if !state.player.hero.movement.grapple {
        return;
    }
    if input.grapple {
        if !state.player.grapple_was_held && state.player.grapple.is_none() {
            let origin = state.player.rect.center();
            let facing = state.player.facing;
            if let Some(anchor) = find_grapple_anchor(origin, facing, &state.platform_rects()) {
                let length = (origin - anchor).length().max(GRAPPLE_MIN_LENGTH);
                let angle = (origin.x - anchor.x).atan2(origin.y - anchor.y);
                state.player.grapple = Some(GrappleState {
                    anchor,
                    length,
                    angle,
                    angular_vel: 0.0,
                });
            }
        }
        if let Some(mut g) = state.player.grapple {
            // Pendulum: restoring force toward straight-down adjusts angular
            // speed, damped multiplicatively each tick
            g.angular_vel += -(GRAVITY / g.length) * g.angle.sin() * 4.0;
            g.angular_vel *= GRAPPLE_DAMPING;
            g.angle += g.angular_vel;
            let center = g.anchor + Vec2::new(g.angle.sin(), g.angle.cos()) * g.length;
            state.player.rect.pos = center - state.player.rect.size * 0.5;
            state.player.vel_y = 0.0;
            state.player.grapple = Some(g);
        }
    } else if let Some(g) = state.player.grapple.take() {
        // Carry the vertical component of the tangential swing velocity
        let vy = -(g.angular_vel * g.length) * g.angle.sin();
        state.player.vel_y = vy.clamp(-PLAYER_JUMP_FORCE, PLAYER_JUMP_FORCE);
    }
}

/// Sample a fixed number of points stepping outward and upward in the facing
/// direction; the first point inside a platform anchors at that platform's
/// top surface.
pub fn find_grapple_anchor(origin: Vec2, facing: Facing, platforms: &[Aabb]) -> Option<Vec2> {
    for i in 1..=GRAPPLE_SAMPLES {
        let sample = origin
            + Vec2::new(
                facing.sign() * GRAPPLE_STEP_X * i as f32,
                -GRAPPLE_STEP_Y * i as f32,
            );
        for platform in platforms {
            if platform.contains_point(sample) {
                return Some(Vec2::new(sample.x, platform.top()));
            }
        }
    }
    None
}
