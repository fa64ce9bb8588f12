//! Audio cue routing
//!
//! The simulation emits [`GameEvent`]s; this module maps them onto named
//! cues for whatever audio backend the shell provides. The simulation never
//! waits on or branches over audio.

use crate::sim::GameEvent;

/// Every sound the game can ask for, by stable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    ShootRifle,
    ShootShotgun,
    ShootGrenade,
    Explosion,
    Hurt,
    Rescue,
    Dash,
    EnemyDown,
    BossDown,
    LevelComplete,
    GameOver,
}

impl AudioCue {
    pub fn cue_name(self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::ShootRifle => "shoot_rifle",
            AudioCue::ShootShotgun => "shoot_shotgun",
            AudioCue::ShootGrenade => "shoot_grenade",
            AudioCue::Explosion => "explosion",
            AudioCue::Hurt => "hurt",
            AudioCue::Rescue => "rescue",
            AudioCue::Dash => "dash",
            AudioCue::EnemyDown => "enemy_down",
            AudioCue::BossDown => "boss_down",
            AudioCue::LevelComplete => "level_complete",
            AudioCue::GameOver => "game_over",
        }
    }
}

/// Backend seam. `speak` carries hero catchphrases for text-to-speech
/// capable backends; others may ignore it.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
    fn speak(&mut self, _line: &str) {}
}

/// Discards everything; for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::Jump => Some(AudioCue::Jump),
        GameEvent::ShootRifle => Some(AudioCue::ShootRifle),
        GameEvent::ShootShotgun => Some(AudioCue::ShootShotgun),
        GameEvent::ShootGrenade => Some(AudioCue::ShootGrenade),
        GameEvent::Explosion => Some(AudioCue::Explosion),
        GameEvent::Hurt => Some(AudioCue::Hurt),
        GameEvent::Rescue => Some(AudioCue::Rescue),
        GameEvent::Dash => Some(AudioCue::Dash),
        GameEvent::EnemyDown { boss: false } => Some(AudioCue::EnemyDown),
        GameEvent::EnemyDown { boss: true } => Some(AudioCue::BossDown),
        GameEvent::LevelComplete { .. } => Some(AudioCue::LevelComplete),
        GameEvent::GameOver { .. } => Some(AudioCue::GameOver),
        GameEvent::HeroSwap { .. } => None,
    }
}

/// Forward one tick's worth of events to the sink.
pub fn route_events(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for event in events {
        if let GameEvent::HeroSwap { catchphrase, .. } = event {
            sink.speak(catchphrase);
            continue;
        }
        if let Some(cue) = cue_for(event) {
            sink.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<AudioCue>,
        lines: Vec<String>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: AudioCue) {
            self.cues.push(cue);
        }
        fn speak(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut rec = Recorder::default();
        route_events(
            &[
                GameEvent::Jump,
                GameEvent::EnemyDown { boss: true },
                GameEvent::EnemyDown { boss: false },
            ],
            &mut rec,
        );
        assert_eq!(
            rec.cues,
            vec![AudioCue::Jump, AudioCue::BossDown, AudioCue::EnemyDown]
        );
    }

    #[test]
    fn test_hero_swap_speaks_the_catchphrase() {
        let mut rec = Recorder::default();
        route_events(
            &[GameEvent::HeroSwap {
                name: "Bro-bo".into(),
                catchphrase: "Let's get radical!".into(),
            }],
            &mut rec,
        );
        assert!(rec.cues.is_empty());
        assert_eq!(rec.lines, vec!["Let's get radical!".to_string()]);
    }

    #[test]
    fn test_cue_names_are_stable() {
        assert_eq!(AudioCue::ShootShotgun.cue_name(), "shoot_shotgun");
        assert_eq!(AudioCue::Hurt.cue_name(), "hurt");
    }
}
