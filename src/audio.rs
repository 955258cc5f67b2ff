//! Sound and haptic cues
//!
//! The simulation never plays anything itself. Each snapshot carries the
//! [`GameEvent`]s raised since the previous one; [`AudioManager`] turns those
//! into sound effects, music changes and vibration pulses and hands them to
//! whatever [`AudioSink`] the host provides.

use crate::settings::Settings;
use crate::sim::state::{GameEvent, GameState};
use crate::tuning::WeaponKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    LaserShot,
    PlasmaShot,
    RailgunShot,
    MissileShot,
    /// Enemy destroyed
    EnemyExplosion,
    BonusPickup,
    /// Timed bonus wore off
    PowerDown,
    ShieldBreak,
    PlayerHit,
    BossSpawn,
    /// Boss defeated
    Victory,
    /// Game over
    Defeat,
}

impl SoundEffect {
    /// Shot sound for a weapon family
    pub fn for_weapon(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Plasma => SoundEffect::PlasmaShot,
            WeaponKind::RailGun => SoundEffect::RailgunShot,
            WeaponKind::Missile => SoundEffect::MissileShot,
            _ => SoundEffect::LaserShot,
        }
    }

    /// Sound cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired(kind) => Some(Self::for_weapon(*kind)),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::EnemyExplosion),
            GameEvent::BonusCollected(_) => Some(SoundEffect::BonusPickup),
            GameEvent::EffectExpired(_) => Some(SoundEffect::PowerDown),
            GameEvent::ShieldBroken => Some(SoundEffect::ShieldBreak),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::BossSpawned(_) => Some(SoundEffect::BossSpawn),
            GameEvent::BossDefeated(_) => Some(SoundEffect::Victory),
            GameEvent::GameOver { .. } => Some(SoundEffect::Defeat),
            GameEvent::WeaponUnlocked(_) | GameEvent::ZoneChanged { .. } => None,
        }
    }
}

/// Vibration length in milliseconds for an event
pub fn haptic_for_event(event: &GameEvent) -> Option<u64> {
    match event {
        GameEvent::PlayerHit { .. } => Some(200),
        GameEvent::ShieldBroken => Some(100),
        GameEvent::BossSpawned(_) => Some(300),
        GameEvent::GameOver { .. } => Some(500),
        _ => None,
    }
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    /// Zones 1-4 each have a loop
    Zone(u32),
    Boss,
}

impl MusicTrack {
    pub fn for_zone(id: u32) -> Self {
        match id {
            1..=4 => MusicTrack::Zone(id),
            5 => MusicTrack::Boss,
            _ => MusicTrack::Menu,
        }
    }
}

/// Output device for cues (speaker, vibrator, log, test recorder)
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn vibrate(&mut self, millis: u64);
}

/// Sink that writes every cue to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {:?} @ {:.2}", track, volume);
    }

    fn vibrate(&mut self, millis: u64) {
        log::debug!("vibrate {}ms", millis);
    }
}

/// Routes snapshot events to a sink, gated by the player's settings
pub struct AudioManager<S: AudioSink> {
    sink: S,
    sfx_volume: f32,
    music_volume: f32,
    vibration: bool,
    track: Option<MusicTrack>,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut manager = Self {
            sink,
            sfx_volume: 0.0,
            music_volume: 0.0,
            vibration: false,
            track: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up changed volume/mute/vibration preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        self.vibration = settings.vibration_enabled;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play the menu loop (e.g. between runs)
    pub fn enter_menu(&mut self) {
        self.switch_music(MusicTrack::Menu);
    }

    /// Emit cues for everything `state` raised. Call once per published snapshot.
    pub fn observe(&mut self, state: &GameState) {
        self.switch_music(MusicTrack::for_zone(state.zone.id));

        for event in &state.events {
            if let Some(effect) = SoundEffect::for_event(event) {
                if self.sfx_volume > 0.0 {
                    self.sink.play(effect, self.sfx_volume);
                }
            }
            if let Some(millis) = haptic_for_event(event) {
                if self.vibration {
                    self.sink.vibrate(millis);
                }
            }
        }
    }

    fn switch_music(&mut self, track: MusicTrack) {
        if self.track == Some(track) {
            return;
        }
        self.track = Some(track);
        if self.music_volume > 0.0 {
            self.sink.play_music(track, self.music_volume);
        }
    }
}
