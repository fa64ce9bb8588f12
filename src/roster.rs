//! Character profiles and keyword classification
//!
//! Profiles arrive from a generative collaborator as free text ("Lever-Action
//! Shotgun", "Deployable Turret", "Air Dash"). Behavior is derived by
//! case-insensitive substring match, classified once here into closed tags so
//! the per-tick simulation never touches strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weapon behavior, defaulting to rifle when no keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Rifle,
    Shotgun,
    Grenade,
}

impl WeaponKind {
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("shotgun") {
            WeaponKind::Shotgun
        } else if text.contains("grenade") {
            WeaponKind::Grenade
        } else {
            WeaponKind::Rifle
        }
    }
}

/// Special ability behavior. A "dash" keyword may co-occur with any of these
/// and is tracked separately on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialKind {
    #[default]
    None,
    Turret,
    Invincibility,
    Cluster,
}

impl SpecialKind {
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("turret") {
            SpecialKind::Turret
        } else if text.contains("invincib") {
            SpecialKind::Invincibility
        } else if text.contains("cluster") {
            SpecialKind::Cluster
        } else {
            SpecialKind::None
        }
    }
}

/// Set of movement abilities a profile grants. Wall sliding itself is a
/// universal mechanic; the tag only records that the text mentioned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementKinds {
    pub double_jump: bool,
    pub wall_slide: bool,
    pub air_dash: bool,
    pub fly: bool,
    pub glide: bool,
    pub dig: bool,
    pub grapple: bool,
}

impl MovementKinds {
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        Self {
            double_jump: text.contains("double"),
            wall_slide: text.contains("wall"),
            air_dash: text.contains("dash"),
            fly: text.contains("fly"),
            glide: text.contains("glide"),
            dig: text.contains("dig"),
            grapple: text.contains("grappl"),
        }
    }
}

/// A named hero or villain record. The free-text fields are kept for display
/// and speech; the tags drive all gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub weapon_type: String,
    pub special_ability: String,
    pub movement_ability: String,
    pub catchphrase: String,
    /// Image reference, attached later by the portrait collaborator
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub weapon: WeaponKind,
    #[serde(default)]
    pub special: SpecialKind,
    /// "Dash Strike" style specials dash in addition to their main effect
    #[serde(default)]
    pub dash_special: bool,
    #[serde(default)]
    pub movement: MovementKinds,
}

impl CharacterProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        name: &str,
        description: &str,
        weapon_type: &str,
        special_ability: &str,
        movement_ability: &str,
        catchphrase: &str,
    ) -> Self {
        let mut profile = Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            weapon_type: weapon_type.to_string(),
            special_ability: special_ability.to_string(),
            movement_ability: movement_ability.to_string(),
            catchphrase: catchphrase.to_string(),
            portrait: None,
            weapon: WeaponKind::Rifle,
            special: SpecialKind::None,
            dash_special: false,
            movement: MovementKinds::default(),
        };
        profile.reclassify();
        profile
    }

    /// Recompute the closed tags from the free-text fields. Called on
    /// construction and again after deserializing older saves.
    pub fn reclassify(&mut self) {
        self.weapon = WeaponKind::classify(&self.weapon_type);
        self.special = SpecialKind::classify(&self.special_ability);
        self.dash_special = self.special_ability.to_lowercase().contains("dash");
        self.movement = MovementKinds::classify(&self.movement_ability);
    }
}

/// A full generated roster: the player's heroes and the opposing villains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cast {
    pub heroes: Vec<CharacterProfile>,
    pub villains: Vec<CharacterProfile>,
    /// Flavor text from the briefing collaborator; absence is non-fatal
    #[serde(default)]
    pub briefing: Option<String>,
}

impl Cast {
    /// Re-run classification on every profile (after load).
    pub fn reclassify(&mut self) {
        for profile in self.heroes.iter_mut().chain(self.villains.iter_mut()) {
            profile.reclassify();
        }
    }
}

/// Roster generation failure. Callers fall back to [`fallback_cast`] and
/// keep playing; generation errors are never fatal.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster service unavailable: {0}")]
    Unavailable(String),
    #[error("roster response malformed: {0}")]
    Malformed(String),
}

/// Seam for the hosted generation collaborator. The simulation only ever
/// sees the resulting [`Cast`].
pub trait RosterProvider {
    fn generate(&self, theme: &str, count: usize) -> Result<Cast, RosterError>;
}

/// Provider that always serves the built-in cast. Used offline and as the
/// recovery path when a real provider errors.
#[derive(Debug, Default)]
pub struct OfflineRoster;

impl RosterProvider for OfflineRoster {
    fn generate(&self, theme: &str, _count: usize) -> Result<Cast, RosterError> {
        log::info!("serving built-in cast for theme {theme:?}");
        Ok(fallback_cast())
    }
}

/// The fixed cast used whenever generation fails.
pub fn fallback_cast() -> Cast {
    Cast {
        heroes: vec![
            CharacterProfile::new(
                1,
                "Bro-bo",
                "A one-man army with an explosive temper and a bigger bandana.",
                "Explosive-Tip Bow",
                "Screaming Rage",
                "Wall Slide",
                "They drew first blood, not me!",
            ),
            CharacterProfile::new(
                2,
                "The Brominator",
                "Cybernetic organism. Living tissue over metal endoskeleton.",
                "Lever-Action Shotgun",
                "Temporary Invincibility",
                "Double Jump",
                "I need your boots, your clothes, and your motorcycle.",
            ),
            CharacterProfile::new(
                3,
                "Bro Hard",
                "Wrong guy, wrong place, wrong time. Yippee-ki-yay.",
                "Standard Issue Pistol",
                "Dash Strike",
                "Air Dash",
                "Welcome to the party, pal!",
            ),
            CharacterProfile::new(
                4,
                "Indiana Brones",
                "It belongs in a museum! And so do these bad guys.",
                "Trusty Whip",
                "Cluster Grenade",
                "Grappling Hook",
                "Snakes. Why'd it have to be snakes?",
            ),
        ],
        villains: vec![
            CharacterProfile::new(
                101,
                "Colonel Ludmilla",
                "A ruthless commander with an eyepatch and a deep-seated grudge.",
                "AK-47",
                "Airstrike",
                "Air Dash",
                "For the motherland... of evil!",
            ),
            CharacterProfile::new(
                102,
                "CEO Evilman",
                "He's not just evil, he's corporately evil.",
                "Golden Gun",
                "Summon Minions",
                "Double Jump",
                "Consider this your final notice.",
            ),
            CharacterProfile::new(
                103,
                "Dr. No-Good",
                "A maniacal scientist with a doomsday device.",
                "Acid Sprayer",
                "Gas Cloud",
                "Wall Slide",
                "The world will tremble before my genius!",
            ),
            CharacterProfile::new(
                104,
                "Cyber Commando",
                "Half man, half machine, all bad attitude.",
                "Laser Minigun",
                "EMP Blast",
                "Air Dash",
                "You are obsolete.",
            ),
        ],
        briefing: None,
    }
}
