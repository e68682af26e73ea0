//! Music playback systems.
//!
//! - [`music_load_system`] asks the audio thread to load every newly added
//!   [`MusicPlayer`].
//! - [`music_state_system`] applies audio thread replies to the players.
//! - [`music_toggle_observer`] starts or stops playback on every
//!   [`ToggleEvent`] of an entity carrying a `MusicPlayer`.
//! - [`music_teardown_system`] stops and unloads the stream of a player that
//!   was removed or despawned.
//!
//! The tracker's `active` flag mirrors whether the music is playing, so a
//! toggle that could not start playback (still loading, failed) leaves the
//! tracker inactive and the next press tries again.

use bevy_ecs::prelude::*;
use log::{error, info};
use rustc_hash::FxHashMap;

use crate::components::activation::ActivationTracker;
use crate::components::musicplayer::{MusicPlayer, PlaybackState};
use crate::events::activation::ToggleEvent;
use crate::events::audio::{AudioCmd, AudioMessage};

/// Send `LoadMusic` for players added since the last run.
pub fn music_load_system(
    added: Query<&MusicPlayer, Added<MusicPlayer>>,
    mut audio_cmd_writer: MessageWriter<AudioCmd>,
) {
    for player in added.iter() {
        info!("loading music '{}' from '{}'", player.id, player.path);
        audio_cmd_writer.write(player.load_cmd());
    }
}

/// Stop and unload streams whose player went away.
///
/// Keeps its own map of live players since the component is gone by the time
/// the removal is seen.
pub fn music_teardown_system(
    added: Query<(Entity, &MusicPlayer), Added<MusicPlayer>>,
    mut removed: RemovedComponents<MusicPlayer>,
    mut live: Local<FxHashMap<Entity, String>>,
    mut audio_cmd_writer: MessageWriter<AudioCmd>,
) {
    for (entity, player) in added.iter() {
        live.insert(entity, player.id.clone());
    }
    for entity in removed.read() {
        if let Some(id) = live.remove(&entity) {
            info!("music '{}' torn down", id);
            audio_cmd_writer.write(AudioCmd::StopMusic { id: id.clone() });
            audio_cmd_writer.write(AudioCmd::UnloadMusic { id });
        }
    }
}

/// Apply load results and natural stream ends to matching players.
pub fn music_state_system(
    mut reader: MessageReader<AudioMessage>,
    mut players: Query<(&mut MusicPlayer, Option<&mut ActivationTracker>)>,
) {
    for msg in reader.read() {
        match msg {
            AudioMessage::MusicLoaded { id } => {
                for (mut player, _) in players.iter_mut() {
                    if player.id == *id && player.state == PlaybackState::Loading {
                        player.state = PlaybackState::Ready;
                    }
                }
            }
            AudioMessage::MusicLoadFailed { id, error: err } => {
                for (mut player, _) in players.iter_mut() {
                    if player.id == *id {
                        error!("music '{}' unavailable: {}", id, err);
                        player.state = PlaybackState::Failed;
                    }
                }
            }
            AudioMessage::MusicFinished { id } => {
                for (mut player, tracker) in players.iter_mut() {
                    if player.id == *id && player.is_playing() {
                        player.state = PlaybackState::Ready;
                        if let Some(mut tracker) = tracker {
                            tracker.active = false;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Toggle playback for the entity whose tracker flipped.
pub fn music_toggle_observer(
    trigger: On<ToggleEvent>,
    mut players: Query<(&mut MusicPlayer, &mut ActivationTracker)>,
    mut audio_cmd_writer: MessageWriter<AudioCmd>,
) {
    let event = trigger.event();
    let Ok((mut player, mut tracker)) = players.get_mut(event.entity) else {
        return;
    };

    let cmds = player.toggle();
    if !cmds.is_empty() {
        info!(
            "music '{}' {}",
            player.id,
            if player.is_playing() { "playing" } else { "stopped" }
        );
    }
    audio_cmd_writer.write_batch(cmds);
    tracker.active = player.is_playing();
}
