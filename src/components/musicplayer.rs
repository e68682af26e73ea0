//! Background music toggle component.
//!
//! A [`MusicPlayer`] names one music stream on the audio thread. Every toggle
//! of the entity's [`ActivationTracker`] starts or stops it:
//!
//! - playing → stop
//! - ready → resume the output device, set the gain, play
//! - still loading or failed to load → ignored with a warning
//!
//! Loading starts as soon as the component is added; the result arrives later
//! as an [`AudioMessage`](crate::events::audio::AudioMessage) and is applied by
//! [`music_state_system`](crate::systems::music::music_state_system).
//!
//! [`ActivationTracker`]: crate::components::activation::ActivationTracker

use bevy_ecs::prelude::Component;
use log::warn;
use smallvec::{SmallVec, smallvec};

use crate::events::audio::AudioCmd;

/// Where the stream is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Loading,
    Ready,
    Playing,
    Failed,
}

#[derive(Component, Debug, Clone)]
pub struct MusicPlayer {
    /// Stream id on the audio thread.
    pub id: String,
    /// File to load.
    pub path: String,
    /// Gain stage level in `0.0..=1.0`.
    pub volume: f32,
    /// Restart when the end of the stream is reached.
    pub looped: bool,
    pub state: PlaybackState,
}

impl MusicPlayer {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            volume: 1.0,
            looped: true,
            state: PlaybackState::Loading,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Command that starts loading this stream.
    pub fn load_cmd(&self) -> AudioCmd {
        AudioCmd::LoadMusic {
            id: self.id.clone(),
            path: self.path.clone(),
        }
    }

    /// Start or stop playback, returning the commands to send.
    pub fn toggle(&mut self) -> SmallVec<[AudioCmd; 3]> {
        match self.state {
            PlaybackState::Playing => self.stop().into_iter().collect(),
            PlaybackState::Ready => self.play(),
            PlaybackState::Loading => {
                warn!("music '{}' is still loading, toggle ignored", self.id);
                SmallVec::new()
            }
            PlaybackState::Failed => {
                warn!("music '{}' failed to load, toggle ignored", self.id);
                SmallVec::new()
            }
        }
    }

    fn play(&mut self) -> SmallVec<[AudioCmd; 3]> {
        self.state = PlaybackState::Playing;
        smallvec![
            AudioCmd::ResumeOutput,
            AudioCmd::VolumeMusic {
                id: self.id.clone(),
                vol: self.volume,
            },
            AudioCmd::PlayMusic {
                id: self.id.clone(),
                looped: self.looped,
            },
        ]
    }

    /// Stop playback. Returns `None` if nothing was playing.
    pub fn stop(&mut self) -> Option<AudioCmd> {
        if !self.is_playing() {
            return None;
        }
        self.state = PlaybackState::Ready;
        Some(AudioCmd::StopMusic {
            id: self.id.clone(),
        })
    }
}
