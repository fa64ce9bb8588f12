//! Explodium - side-scrolling run-and-gun with a generated cast
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (physics, AI, combat, levels)
//! - `roster`: Character profiles and keyword classification
//! - `tuning`: Tick-count cadences as data, not hard law
//! - `persistence`: Save/load of casts and high scores
//! - `audio`: Fire-and-forget cue mapping for the audio collaborator

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod roster;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use roster::{Cast, CharacterProfile};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible playfield dimensions (levels may extend wider than this)
    pub const GAME_WIDTH: f32 = 1024.0;
    pub const GAME_HEIGHT: f32 = 576.0;
    /// Height of the implicit ground strip along the bottom
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// Y coordinate of the walkable ground surface
    pub const GROUND_Y: f32 = GAME_HEIGHT - GROUND_HEIGHT;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_JUMP_FORCE: f32 = 18.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_STARTING_LIVES: u32 = 2;
    /// Dash moves at this multiple of base speed
    pub const DASH_SPEED_MULT: f32 = 2.5;
    /// Wall jump gets a slightly stronger upward impulse
    pub const WALL_JUMP_MULT: f32 = 1.1;
    /// Descent cap while wall-sliding (wall friction)
    pub const WALL_SLIDE_MAX_FALL: f32 = 2.0;
    /// Descent cap while gliding
    pub const GLIDE_MAX_FALL: f32 = 2.0;
    /// Net upward acceleration while flying with jump held
    pub const FLY_THRUST: f32 = 1.2;
    /// Fastest the player may rise under sustained flight
    pub const FLY_MAX_RISE: f32 = -6.0;

    /// World gravity, per tick
    pub const GRAVITY: f32 = 0.8;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 50.0;
    pub const ENEMY_MAX_HEALTH: i32 = 50;
    pub const BOSS_WIDTH: f32 = 80.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    pub const BOSS_MAX_HEALTH: i32 = 1000;
    /// Horizontal/vertical window within which enemies open fire
    pub const AGGRO_RANGE_X: f32 = 600.0;
    pub const AGGRO_RANGE_Y: f32 = 250.0;
    /// Charge behavior moves at this multiple of base move speed
    pub const CHARGE_SPEED_MULT: f32 = 1.8;
    /// Contact damage for regular / charging enemies
    pub const MELEE_DAMAGE: i32 = 10;
    pub const CHARGE_MELEE_DAMAGE: i32 = 20;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 15.0;
    pub const BULLET_HEIGHT: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 12.0;
    /// Bullets are culled once past this margin around the playfield
    pub const BULLET_MARGIN: f32 = 100.0;
    /// Enemy and turret bullets fly at this fraction of player bullet speed
    pub const ENEMY_BULLET_SPEED_MULT: f32 = 0.8;
    /// Grenade bullets accumulate extra downward acceleration
    pub const GRENADE_GRAVITY: f32 = GRAVITY / 1.5;
    /// Damage per hit, by bullet owner
    pub const PLAYER_BULLET_DAMAGE: i32 = 20;
    pub const ENEMY_BULLET_DAMAGE: i32 = 10;
    /// Area-of-effect box when a grenade detonates on the ground
    pub const GRENADE_BLAST_WIDTH: f32 = 80.0;
    pub const GRENADE_BLAST_HEIGHT: f32 = 80.0;

    /// Crates and cages
    pub const CRATE_WIDTH: f32 = 50.0;
    pub const CRATE_HEIGHT: f32 = 50.0;
    pub const CRATE_HEALTH: i32 = 20;
    /// Platforms are crates with health high enough to never break
    pub const PLATFORM_HEALTH: i32 = 999;
    pub const CAGE_HEALTH: i32 = 60;

    /// Spike pits
    pub const SPIKE_PIT_WIDTH: f32 = 80.0;
    pub const SPIKE_PIT_HEIGHT: f32 = 20.0;

    /// Score awards
    pub const SCORE_ENEMY: u64 = 100;
    pub const SCORE_BOSS: u64 = 5000;

    /// Health restored when the level is cleared
    pub const LEVEL_CLEAR_HEAL: i32 = 25;

    /// Turret engagement range (horizontal)
    pub const TURRET_RANGE: f32 = 500.0;

    /// Grapple anchor search: samples along a ray stepping out and up
    pub const GRAPPLE_SAMPLES: u32 = 24;
    pub const GRAPPLE_STEP_X: f32 = 20.0;
    pub const GRAPPLE_STEP_Y: f32 = 14.0;
    /// Minimum usable rope length
    pub const GRAPPLE_MIN_LENGTH: f32 = 40.0;
    /// Multiplicative damping on angular speed, per tick
    pub const GRAPPLE_DAMPING: f32 = 0.995;
}
