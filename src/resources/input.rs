//! Per-frame input resource.
//!
//! Holds the keyboard keys some [`ActivationTracker`] is watching and the
//! button state of the two hand controllers. The
//! [`update_input_state`](crate::systems::input::update_input_state) system
//! fills it from raylib every frame; tests write it directly.
//!
//! A controller that is not connected is `None` and reads as "never pressed".
//!
//! [`ActivationTracker`]: crate::components::activation::ActivationTracker

use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;
use smallvec::SmallVec;

use crate::components::activation::{ControllerButton, Handedness};

/// Button state of one connected hand controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// Indexed by [`ControllerButton::index`].
    pub buttons: [bool; 2],
}

impl ControllerState {
    pub fn is_down(&self, button: ControllerButton) -> bool {
        self.buttons[button.index()]
    }

    pub fn set(&mut self, button: ControllerButton, down: bool) {
        self.buttons[button.index()] = down;
    }
}

/// Resource capturing the per-frame input relevant to activation sources.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    /// Watched keys and whether each is held this frame.
    pub keys: SmallVec<[(KeyboardKey, bool); 4]>,
    pub left_controller: Option<ControllerState>,
    pub right_controller: Option<ControllerState>,
}

impl InputState {
    /// Record the held state of a key, adding it to the watched set if new.
    pub fn set_key(&mut self, key: KeyboardKey, down: bool) {
        if let Some(entry) = self.keys.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = down;
        } else {
            self.keys.push((key, down));
        }
    }

    /// Whether `key` is held. Unwatched keys read as released.
    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.keys
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, down)| *down)
            .unwrap_or(false)
    }

    pub fn controller(&self, hand: Handedness) -> Option<&ControllerState> {
        match hand {
            Handedness::Left => self.left_controller.as_ref(),
            Handedness::Right => self.right_controller.as_ref(),
        }
    }

    pub fn set_controller(&mut self, hand: Handedness, state: Option<ControllerState>) {
        match hand {
            Handedness::Left => self.left_controller = state,
            Handedness::Right => self.right_controller = state,
        }
    }
}
