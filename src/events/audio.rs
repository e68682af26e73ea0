//! Messages exchanged with the audio thread.
//!
//! [`AudioCmd`] flows from ECS systems to the audio thread (through
//! [`forward_audio_cmds`](crate::systems::audio::forward_audio_cmds)) and
//! [`AudioMessage`] flows back (through
//! [`poll_audio_messages`](crate::systems::audio::poll_audio_messages)).

use bevy_ecs::message::Message;

/// Commands sent *to* the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    UnloadMusic { id: String },
    PlayMusic { id: String, looped: bool },
    /// Stopping a stream that is not playing does nothing.
    StopMusic { id: String },
    /// Gain stage level, `0.0..=1.0`.
    VolumeMusic { id: String, vol: f32 },
    /// Mute the output device until resumed.
    SuspendOutput,
    /// Restore the output device level if it was suspended.
    ResumeOutput,
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    MusicLoaded { id: String },
    MusicUnloaded { id: String },
    MusicLoadFailed { id: String, error: String },
    MusicPlayStarted { id: String },
    MusicStopped { id: String },
    MusicFinished { id: String }, // reached end for non looping
    MusicVolumeChanged { id: String, vol: f32 },
    OutputSuspended,
    OutputResumed,
}
