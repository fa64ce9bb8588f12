//! World state and core simulation types
//!
//! The `GameState` exclusively owns every entity collection. Entities never
//! hold references to one another; relations ("nearest enemy", "grapple
//! anchor") are recomputed by lookup each tick so removals can't dangle.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::*;
use crate::roster::{Cast, CharacterProfile, WeaponKind};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Simulation frozen entirely; timers do not decay
    Paused,
    /// Run ended
    GameOver,
}

/// Which way an entity is pointing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    #[inline]
    pub fn from_sign(dx: f32) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
    Turret,
}

/// Active pendulum swing while the grapple is held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrappleState {
    /// Anchor point on a platform's top surface
    pub anchor: Vec2,
    /// Rope length, fixed at attach time
    pub length: f32,
    /// Angle from straight-down under the anchor
    pub angle: f32,
    pub angular_vel: f32,
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub rect: Aabb,
    pub hero: CharacterProfile,
    pub health: i32,
    pub max_health: i32,
    pub facing: Facing,
    pub lives: u32,
    pub vel_y: f32,
    pub on_ground: bool,
    /// Timers, all floored at zero each tick
    pub special_cooldown: u32,
    pub fire_cooldown: u32,
    pub invincibility_timer: u32,
    pub damage_flash: u32,
    pub dash_timer: u32,
    pub coyote_timer: u32,
    pub jump_buffer: u32,
    /// Movement ability state
    pub double_jump_used: bool,
    pub wall_sliding: bool,
    pub flying: bool,
    pub gliding: bool,
    pub digging: bool,
    pub grapple: Option<GrappleState>,
    /// Previous-tick held state for edge detection
    pub jump_was_held: bool,
    pub special_was_held: bool,
    pub grapple_was_held: bool,
}

impl Player {
    pub fn new(id: u32, hero: CharacterProfile, lives: u32) -> Self {
        Self {
            id,
            rect: Aabb::new(
                GAME_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                GAME_HEIGHT - PLAYER_HEIGHT - 100.0,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            hero,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            facing: Facing::Right,
            lives,
            vel_y: 0.0,
            on_ground: false,
            special_cooldown: 0,
            fire_cooldown: 0,
            invincibility_timer: 0,
            damage_flash: 0,
            dash_timer: 0,
            coyote_timer: 0,
            jump_buffer: 0,
            double_jump_used: false,
            wall_sliding: false,
            flying: false,
            gliding: false,
            digging: false,
            grapple: None,
            jump_was_held: false,
            special_was_held: false,
            grapple_was_held: false,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0
    }

    /// Clamp health into [0, max_health].
    #[inline]
    pub fn clamp_health(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
    }
}

/// AI archetype governing an enemy's movement and attacks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Patrol between walls, fire when the player enters the aggro window
    Shoot,
    /// Run straight at the player
    Charge,
    /// Diagonal pursuit at half speed, ignores the ground
    Fly,
    /// Tracks the player and cycles timed attack patterns
    Boss {
        pattern: AttackPattern,
        pattern_ticks: u32,
    },
}

/// One of a boss's interchangeable timed firing routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// 5-way fan
    Spread,
    /// Single large fast aimed bullet
    Beam,
    /// Bullets raining from random points along the top of the playfield
    Hail,
}

/// A non-player combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Aabb,
    pub villain: CharacterProfile,
    pub health: i32,
    pub max_health: i32,
    /// Toward the player, updated every tick
    pub facing: Facing,
    /// Patrol heading for the `Shoot` behavior
    pub move_dir: Facing,
    pub move_speed: f32,
    pub shoot_cooldown: u32,
    pub damage_flash: u32,
    pub vel_y: f32,
    pub behavior: Behavior,
}

impl Enemy {
    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.behavior, Behavior::Boss { .. })
    }
}

/// A live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub rect: Aabb,
    pub owner: Faction,
    pub vel: Vec2,
    /// Drives rendering and grenade-specific physics
    pub weapon: WeaponKind,
}

/// A crate: static platform (very high health) or destructible obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crate {
    pub id: u32,
    pub rect: Aabb,
    pub health: i32,
}

impl Crate {
    /// Destructible obstacles can be dug through; platforms cannot.
    #[inline]
    pub fn destructible(&self) -> bool {
        self.health < PLATFORM_HEALTH
    }
}

/// Breaking the cage is the win condition: +1 life and a hero swap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescueCage {
    pub id: u32,
    pub rect: Aabb,
    pub health: i32,
}

/// Player-deployed autonomous turret; expires on its own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: u32,
    pub rect: Aabb,
    pub lifespan: u32,
    pub shoot_cooldown: u32,
    pub facing: Facing,
}

/// Instant-lethal floor hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpikePit {
    pub id: u32,
    pub rect: Aabb,
}

/// Purely visual; no collision effect on others
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub rect: Aabb,
    pub life: u32,
}

/// Events emitted during a tick for the audio/render collaborators.
/// Fire-and-forget: the simulation never branches on their handling.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jump,
    ShootRifle,
    ShootShotgun,
    ShootGrenade,
    Explosion,
    Hurt,
    Rescue,
    Dash,
    EnemyDown { boss: bool },
    HeroSwap { name: String, catchphrase: String },
    LevelComplete { difficulty: u32 },
    GameOver { score: u64 },
}

/// Complete world state, advanced by [`super::tick::tick`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// All gameplay randomness flows through this
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub difficulty: u32,
    pub score: u64,
    pub time_ticks: u64,
    /// Current level spans [0, level_width); grows with difficulty
    pub level_width: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub crates: Vec<Crate>,
    pub cages: Vec<RescueCage>,
    pub turrets: Vec<Turret>,
    pub spike_pits: Vec<SpikePit>,
    pub explosions: Vec<Explosion>,
    /// Render-side shake magnitude, decays each tick
    pub screen_shake: f32,
    /// The full cast; hero swaps and enemy spawns draw from here
    pub cast: Cast,
    /// Events from the most recent tick, drained by the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed and cast, with the first level
    /// already generated.
    pub fn new(seed: u64, cast: Cast) -> Self {
        let starting_hero = cast
            .heroes
            .first()
            .cloned()
            .unwrap_or_else(|| crate::roster::fallback_cast().heroes.remove(0));
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            difficulty: 0,
            score: 0,
            time_ticks: 0,
            level_width: GAME_WIDTH,
            player: Player::new(1, starting_hero, PLAYER_STARTING_LIVES),
            enemies: Vec::new(),
            bullets: Vec::new(),
            crates: Vec::new(),
            cages: Vec::new(),
            turrets: Vec::new(),
            spike_pits: Vec::new(),
            explosions: Vec::new(),
            screen_shake: 0.0,
            cast,
            events: Vec::new(),
            next_id: 2,
        };
        super::level::generate_level(&mut state, &Tuning::default());
        state
    }

    /// Allocate a monotonically increasing entity ID.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Platform rectangles for landing/anchor checks: every crate plus the
    /// implicit full-width ground.
    pub fn platform_rects(&self) -> Vec<Aabb> {
        let mut rects: Vec<Aabb> = self.crates.iter().map(|c| c.rect).collect();
        rects.push(Aabb::new(0.0, GROUND_Y, self.level_width, GROUND_HEIGHT));
        rects
    }

    pub fn push_explosion(&mut self, center: Vec2, size: Vec2, tuning: &Tuning) {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            rect: Aabb {
                pos: center - size * 0.5,
                size,
            },
            life: tuning.explosion_ticks,
        });
    }

    pub fn add_shake(&mut self, magnitude: f32) {
        self.screen_shake = (self.screen_shake + magnitude).min(1.0);
    }

    /// Swap the active hero for a different random one from the cast:
    /// full heal, special reset, and a brief invincibility window.
    pub fn swap_hero(&mut self, tuning: &Tuning) {
        use rand::Rng;
        let current = self.player.hero.id;
        let others: Vec<&CharacterProfile> = self
            .cast
            .heroes
            .iter()
            .filter(|h| h.id != current)
            .collect();
        let next = if others.is_empty() {
            // Single-hero cast keeps the same hero
            self.player.hero.clone()
        } else {
            let idx = self.rng.random_range(0..others.len());
            others[idx].clone()
        };
        self.events.push(GameEvent::HeroSwap {
            name: next.name.clone(),
            catchphrase: next.catchphrase.clone(),
        });
        self.player.hero = next;
        self.player.health = self.player.max_health;
        self.player.special_cooldown = 0;
        self.player.invincibility_timer = tuning.swap_invincibility_ticks;
    }
}
