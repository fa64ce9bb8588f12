//! Projectile spawning and integration
//!
//! All bullet spawns funnel through the [`Shooter`] capability so player,
//! enemies, and turrets share one primitive instead of passing concrete
//! entity types around.

use glam::Vec2;

use super::aabb::Aabb;
use super::state::{Bullet, Enemy, Faction, Facing, GameEvent, GameState, Player, Turret};
use crate::consts::*;
use crate::roster::WeaponKind;
use crate::tuning::Tuning;

/// Capability needed to spawn a bullet: where it comes from, which way it
/// points, and what kind of shot it is.
pub trait Shooter {
    fn rect(&self) -> Aabb;
    fn facing(&self) -> Facing;
    fn weapon(&self) -> WeaponKind;
}

impl Shooter for Player {
    fn rect(&self) -> Aabb {
        self.rect
    }
    fn facing(&self) -> Facing {
        self.facing
    }
    fn weapon(&self) -> WeaponKind {
        self.hero.weapon
    }
}

impl Shooter for Enemy {
    fn rect(&self) -> Aabb {
        self.rect
    }
    fn facing(&self) -> Facing {
        self.facing
    }
    // Enemy fire is always straight shots regardless of villain flavor text
    fn weapon(&self) -> WeaponKind {
        WeaponKind::Rifle
    }
}

impl Shooter for Turret {
    fn rect(&self) -> Aabb {
        self.rect
    }
    fn facing(&self) -> Facing {
        self.facing
    }
    fn weapon(&self) -> WeaponKind {
        WeaponKind::Rifle
    }
}

/// Muzzle position for a shot leaving the shooter's bounding box.
fn muzzle(shooter: &dyn Shooter, dir: Facing) -> Vec2 {
    let rect = shooter.rect();
    let x = match dir {
        Facing::Right => rect.right(),
        Facing::Left => rect.left() - BULLET_WIDTH,
    };
    Vec2::new(x, rect.center().y - BULLET_HEIGHT / 2.0)
}

/// A horizontal shot in the given direction.
pub fn straight_shot(
    id: u32,
    shooter: &dyn Shooter,
    dir: Facing,
    owner: Faction,
    speed: f32,
) -> Bullet {
    let pos = muzzle(shooter, dir);
    Bullet {
        id,
        rect: Aabb::new(pos.x, pos.y, BULLET_WIDTH, BULLET_HEIGHT),
        owner,
        vel: Vec2::new(dir.sign() * speed, 0.0),
        weapon: shooter.weapon(),
    }
}

/// A shot aimed at an arbitrary point, used by flying enemies and the boss
/// beam pattern.
pub fn aimed_shot(id: u32, shooter: &dyn Shooter, target: Vec2, owner: Faction, speed: f32) -> Bullet {
    let from = shooter.rect().center();
    let dir = Facing::from_sign(target.x - from.x);
    let pos = muzzle(shooter, dir);
    let vel = (target - from).normalize_or_zero() * speed;
    Bullet {
        id,
        rect: Aabb::new(pos.x, pos.y, BULLET_WIDTH, BULLET_HEIGHT),
        owner,
        vel,
        weapon: shooter.weapon(),
    }
}

/// Fire the player's weapon: dispatch on the classified weapon kind, spawn
/// the bullets, and start the per-weapon cooldown.
pub fn fire_player_weapon(state: &mut GameState, tuning: &Tuning) {
    use rand::Rng;
    let weapon = state.player.hero.weapon;
    let dir = state.player.facing;
    state.player.fire_cooldown = tuning.weapon_cooldown(weapon);

    match weapon {
        WeaponKind::Shotgun => {
            state.events.push(GameEvent::ShootShotgun);
            for i in 0..5 {
                let jitter: f32 = state.rng.random_range(0.8..1.2);
                let id = state.next_entity_id();
                let mut bullet =
                    straight_shot(id, &state.player, dir, Faction::Player, BULLET_SPEED * jitter);
                // Vertical spread across the five pellets
                bullet.vel.y = (i as f32 - 2.0) * 1.5;
                state.bullets.push(bullet);
            }
        }
        WeaponKind::Grenade => {
            state.events.push(GameEvent::ShootGrenade);
            let id = state.next_entity_id();
            let mut bullet =
                straight_shot(id, &state.player, dir, Faction::Player, BULLET_SPEED * 0.7);
            bullet.vel.y = -10.0;
            state.bullets.push(bullet);
        }
        WeaponKind::Rifle => {
            state.events.push(GameEvent::ShootRifle);
            let id = state.next_entity_id();
            let bullet = straight_shot(id, &state.player, dir, Faction::Player, BULLET_SPEED);
            state.bullets.push(bullet);
        }
    }
}

/// The "cluster" special: a burst of randomly-angled grenades from the
/// player's position.
pub fn spawn_cluster(state: &mut GameState) {
    use rand::Rng;
    let origin = state.player.rect.pos;
    for _ in 0..8 {
        let vx: f32 = state.rng.random_range(-0.5..0.5) * BULLET_SPEED;
        let vy: f32 = -state.rng.random_range(0.0..12.0);
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            rect: Aabb::new(origin.x, origin.y, BULLET_WIDTH, BULLET_HEIGHT),
            owner: Faction::Player,
            vel: Vec2::new(vx, vy),
            weapon: WeaponKind::Grenade,
        });
    }
    state.events.push(GameEvent::ShootGrenade);
}

/// Integrate bullet positions and cull anything past the playfield margin.
/// Grenade detonation is a hit and lives in the collision resolver.
pub fn integrate_bullets(state: &mut GameState) {
    let level_width = state.level_width;
    for bullet in &mut state.bullets {
        if bullet.weapon == WeaponKind::Grenade {
            bullet.vel.y += GRENADE_GRAVITY;
        }
        bullet.rect.pos += bullet.vel;
    }
    state.bullets.retain(|b| {
        b.rect.pos.x > -BULLET_MARGIN
            && b.rect.pos.x < level_width + BULLET_MARGIN
            && b.rect.pos.y < GAME_HEIGHT + BULLET_MARGIN
            && b.rect.pos.y > -3.0 * BULLET_MARGIN
    });
}
