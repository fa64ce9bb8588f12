//! Data-driven game balance
//!
//! Every duration here is a tick count tuned for a 60 Hz simulation. If the
//! tick rate changes, scale these together to preserve their ratios.

use serde::{Deserialize, Serialize};

/// Tick-count cadences for timers, cooldowns, and grace windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Base weapon cooldown (rifle); shotgun and grenade scale off this
    pub bullet_cooldown: u32,
    /// Special ability cooldown (10 s)
    pub special_cooldown: u32,
    /// Invincibility special duration (5 s)
    pub invincibility_ticks: u32,
    /// Invincibility granted on hero swap (2 s)
    pub swap_invincibility_ticks: u32,
    /// Invincibility granted after taking contact damage (1 s)
    pub contact_invincibility_ticks: u32,
    /// Ground jump still allowed this long after walking off a ledge
    pub coyote_ticks: u32,
    /// Early jump press remembered this long before landing
    pub jump_buffer_ticks: u32,
    /// Dash duration, and the invincibility window that rides along
    pub dash_ticks: u32,
    /// Deployed turret lifespan (7.5 s)
    pub turret_lifespan: u32,
    pub turret_cooldown: u32,
    /// Boss holds one attack pattern this long before re-rolling (4 s)
    pub boss_pattern_ticks: u32,
    /// Fire cadence per boss pattern
    pub boss_spread_cadence: u32,
    pub boss_beam_cadence: u32,
    pub boss_hail_cadence: u32,
    /// Damage flash duration on hit
    pub damage_flash_ticks: u32,
    /// Explosion visual lifetime
    pub explosion_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_cooldown: 15,
            special_cooldown: 600,
            invincibility_ticks: 300,
            swap_invincibility_ticks: 120,
            contact_invincibility_ticks: 60,
            coyote_ticks: 5,
            jump_buffer_ticks: 6,
            dash_ticks: 20,
            turret_lifespan: 450,
            turret_cooldown: 45,
            boss_pattern_ticks: 240,
            boss_spread_cadence: 45,
            boss_beam_cadence: 70,
            boss_hail_cadence: 10,
            damage_flash_ticks: 5,
            explosion_ticks: 15,
        }
    }
}

impl Tuning {
    /// Weapon cooldown after firing, per weapon kind.
    pub fn weapon_cooldown(&self, weapon: crate::roster::WeaponKind) -> u32 {
        use crate::roster::WeaponKind;
        match weapon {
            WeaponKind::Rifle => self.bullet_cooldown,
            WeaponKind::Shotgun => (self.bullet_cooldown as f32 * 2.5) as u32,
            WeaponKind::Grenade => self.bullet_cooldown * 3,
        }
    }
}
