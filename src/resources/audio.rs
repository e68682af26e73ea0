//! ECS resources that bridge the main thread with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`AudioBridge`] plus the `Messages<AudioCmd>` and
//! `Messages<AudioMessage>` resources. Call [`shutdown_audio`] during teardown:
//! it stops every playing stream and closes the device before returning.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::{AudioThreadOptions, audio_thread};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{info, warn};

/// Shared bridge between the ECS world and the audio thread.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread and register bridge resources.
///
/// With `start_suspended` the output device starts muted and is resumed by the
/// first [`AudioCmd::ResumeOutput`], mirroring autoplay restrictions where
/// sound may only start after a user gesture.
pub fn setup_audio(world: &mut World, start_suspended: bool) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let options = AudioThreadOptions { start_suspended };
    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg, options));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.init_resource::<Messages<AudioMessage>>();
    world.init_resource::<Messages<AudioCmd>>();
}

/// Stop playback, release the device and join the audio thread.
///
/// Blocks until the thread has exited. Does nothing if audio was never set up.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        info!("shutting down audio thread");
        if bridge.tx_cmd.send(AudioCmd::Shutdown).is_err() {
            warn!("audio thread already gone");
        }
        if bridge.handle.join().is_err() {
            warn!("audio thread panicked");
        }
    }
}
