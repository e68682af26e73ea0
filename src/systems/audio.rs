//! Audio system implementation backed by a dedicated thread and Raylib.
//!
//! This module hosts the background audio thread and the systems that bridge
//! it with the ECS world:
//! - [`audio_thread`] runs on its own OS thread, owns the Raylib audio device,
//!   and processes [`AudioCmd`] messages, emitting [`AudioMessage`] responses.
//! - [`forward_audio_cmds`] / [`update_bevy_audio_cmds`] move commands written
//!   by systems and observers onto the channel.
//! - [`poll_audio_messages`] / [`update_bevy_audio_messages`] drain the
//!   thread's replies into the ECS message queue.
//!
//! Raylib audio calls stay on one thread; the main thread only ever touches
//! lock-free channels, so loading a file never stalls a frame.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::{MessageReader, MessageWriter, Messages, Res, ResMut};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio};
use rustc_hash::{FxHashMap, FxHashSet};

/// Drain any pending replies from the audio thread into
/// [`Messages<AudioMessage>`]. Non-blocking.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
///
/// Run this after [`poll_audio_messages`] so same-frame readers see the writes.
pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // Ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Startup options for [`audio_thread`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioThreadOptions {
    /// Start with the output muted until [`AudioCmd::ResumeOutput`].
    pub start_suspended: bool,
}

/// What to do with a stream that ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Looped stream: seek back and keep playing.
    Restart,
    /// Report `MusicFinished`.
    Finished,
    /// Not playing (already reported or stopped).
    Ignore,
}

/// Which streams are playing and which of them loop.
///
/// Pure bookkeeping so the playback rules hold without an audio device.
#[derive(Debug, Default)]
pub struct Playlist {
    playing: FxHashSet<String>,
    looped: FxHashSet<String>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing.contains(id)
    }

    pub fn is_looped(&self, id: &str) -> bool {
        self.looped.contains(id)
    }

    /// Record a (re)start of `id`.
    pub fn start(&mut self, id: &str, looped: bool) {
        self.playing.insert(id.to_string());
        if looped {
            self.looped.insert(id.to_string());
        } else {
            self.looped.remove(id);
        }
    }

    /// Returns `true` when `id` was playing; stopping anything else is a no-op.
    pub fn stop(&mut self, id: &str) -> bool {
        self.playing.remove(id)
    }

    /// Drop every trace of `id`. Returns `true` when it was playing.
    pub fn forget(&mut self, id: &str) -> bool {
        self.looped.remove(id);
        self.playing.remove(id)
    }

    /// Decide what an ended stream does. A non-looped stream is reported once.
    pub fn ended(&mut self, id: &str) -> StreamEnd {
        if !self.playing.contains(id) {
            StreamEnd::Ignore
        } else if self.looped.contains(id) {
            StreamEnd::Restart
        } else {
            self.playing.remove(id);
            StreamEnd::Finished
        }
    }

    /// Ids currently playing.
    pub fn playing(&self) -> impl Iterator<Item = &String> {
        self.playing.iter()
    }

    /// Empty the playlist, yielding what was playing.
    pub fn drain(&mut self) -> Vec<String> {
        self.looped.clear();
        self.playing.drain().collect()
    }
}

/// Streams and output state owned by the audio thread.
struct Deck<'a> {
    audio: &'a RaylibAudio,
    replies: Sender<AudioMessage>,
    streams: FxHashMap<String, Music<'a>>,
    playlist: Playlist,
    suspended: bool,
    /// Master volume to restore on resume.
    level: f32,
}

impl<'a> Deck<'a> {
    fn reply(&self, msg: AudioMessage) {
        // Receiver gone means the world is shutting down
        let _ = self.replies.send(msg);
    }

    fn load(&mut self, id: String, path: String) {
        match self.audio.new_music(&path) {
            Ok(music) => {
                info!("[audio] '{}' loaded from '{}'", id, path);
                self.streams.insert(id.clone(), music);
                self.reply(AudioMessage::MusicLoaded { id });
            }
            Err(e) => {
                error!("[audio] cannot load '{}' from '{}': {}", id, path, e);
                self.reply(AudioMessage::MusicLoadFailed {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }

    fn play(&mut self, id: String, looped: bool) {
        let Some(music) = self.streams.get_mut(&id) else {
            warn!("[audio] '{}' is not loaded, play ignored", id);
            return;
        };
        if self.suspended {
            warn!("[audio] '{}' starts while the output is suspended", id);
        }
        debug!("[audio] '{}' play looped={}", id, looped);
        // raylib loads every stream looping; a one-shot must stop at its end
        music.looping = looped;
        music.seek_stream(0.0);
        music.play_stream();
        self.playlist.start(&id, looped);
        self.reply(AudioMessage::MusicPlayStarted { id });
    }

    /// Stopping a stream that is not playing does nothing.
    fn stop(&mut self, id: String) {
        if !self.playlist.stop(&id) {
            return;
        }
        if let Some(music) = self.streams.get(&id) {
            debug!("[audio] '{}' stop", id);
            music.stop_stream();
        }
        self.reply(AudioMessage::MusicStopped { id });
    }

    fn set_volume(&mut self, id: String, vol: f32) {
        if let Some(music) = self.streams.get(&id) {
            let vol = vol.clamp(0.0, 1.0);
            music.set_volume(vol);
            self.reply(AudioMessage::MusicVolumeChanged { id, vol });
        }
    }

    fn unload(&mut self, id: String) {
        let Some(music) = self.streams.remove(&id) else {
            return;
        };
        if self.playlist.forget(&id) {
            music.stop_stream();
        }
        debug!("[audio] '{}' unloaded", id);
        self.reply(AudioMessage::MusicUnloaded { id });
    }

    fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        self.level = self.audio.get_master_volume();
        self.audio.set_master_volume(0.0);
        self.suspended = true;
        info!("[audio] output suspended");
        self.reply(AudioMessage::OutputSuspended);
    }

    fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.audio.set_master_volume(self.level);
        self.suspended = false;
        info!("[audio] output resumed");
        self.reply(AudioMessage::OutputResumed);
    }

    /// Stop everything and drop every stream.
    fn release(&mut self) {
        for id in self.playlist.drain() {
            if let Some(music) = self.streams.get(&id) {
                music.stop_stream();
            }
        }
        self.streams.clear();
    }

    /// Handle one command. Returns `false` on shutdown.
    fn apply(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::LoadMusic { id, path } => self.load(id, path),
            AudioCmd::PlayMusic { id, looped } => self.play(id, looped),
            AudioCmd::StopMusic { id } => self.stop(id),
            AudioCmd::VolumeMusic { id, vol } => self.set_volume(id, vol),
            AudioCmd::UnloadMusic { id } => self.unload(id),
            AudioCmd::SuspendOutput => self.suspend(),
            AudioCmd::ResumeOutput => self.resume(),
            AudioCmd::Shutdown => {
                info!("[audio] shutdown requested");
                self.release();
                return false;
            }
        }
        true
    }

    /// Feed playing streams and handle the ones that ran out.
    ///
    /// raylib wraps looped streams itself; the restart here only covers a
    /// looped stream that stopped anyway.
    fn pump(&mut self) {
        let mut ended: Vec<String> = Vec::new();
        for id in self.playlist.playing() {
            let Some(music) = self.streams.get(id) else {
                continue;
            };
            if music.is_stream_playing() {
                music.update_stream();
            } else {
                ended.push(id.clone());
            }
        }
        for id in ended {
            match self.playlist.ended(&id) {
                StreamEnd::Restart => {
                    if let Some(music) = self.streams.get(&id) {
                        music.seek_stream(0.0);
                        music.play_stream();
                    }
                }
                StreamEnd::Finished => {
                    debug!("[audio] '{}' finished", id);
                    self.reply(AudioMessage::MusicFinished { id });
                }
                StreamEnd::Ignore => {}
            }
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Opens the raylib audio device, owns every `Music` handle and serves
/// [`AudioCmd`]s until [`AudioCmd::Shutdown`], answering with
/// [`AudioMessage`]s. Returns right away if the device cannot be opened; later
/// `LoadMusic` requests then go unanswered and players stay inert.
pub fn audio_thread(
    rx_cmd: Receiver<AudioCmd>,
    tx_evt: Sender<AudioMessage>,
    options: AudioThreadOptions,
) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("[audio] no audio device: {}", e);
            return;
        }
    };
    info!("[audio] thread up ({:?})", std::thread::current().id());

    let mut deck = Deck {
        audio: &audio,
        replies: tx_evt,
        streams: FxHashMap::default(),
        playlist: Playlist::new(),
        suspended: false,
        level: audio.get_master_volume(),
    };
    if options.start_suspended {
        deck.suspend();
    }

    'serve: loop {
        for cmd in rx_cmd.try_iter() {
            if !deck.apply(cmd) {
                break 'serve;
            }
        }
        deck.pump();
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    // Streams must drop before the device closes
    drop(deck);
    info!("[audio] thread down");
}
