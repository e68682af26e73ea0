//! Input systems.
//!
//! [`update_input_state`] reads hardware input from Raylib each frame and
//! writes the results into [`InputState`]:
//!
//! - every keyboard key some [`ActivationTracker`] watches;
//! - the configured gamepad, standing in for the pair of hand controllers.
//!   Its left shoulder buttons are the left controller and its right shoulder
//!   buttons the right controller (lower shoulder = trigger, upper = squeeze).
//!   A gamepad that is not connected leaves both hands `None`.
use bevy_ecs::prelude::*;
use raylib::prelude::GamepadButton;

use crate::components::activation::{ActivationTracker, ControllerButton, Handedness};
use crate::resources::input::{ControllerState, InputState};

/// Gamepad index polled as the hand controllers.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ControllerGamepad(pub i32);

/// Raylib button backing a hand controller button.
pub fn gamepad_button(hand: Handedness, button: ControllerButton) -> GamepadButton {
    match (hand, button) {
        (Handedness::Left, ControllerButton::Trigger) => GamepadButton::GAMEPAD_BUTTON_LEFT_TRIGGER_2,
        (Handedness::Left, ControllerButton::Squeeze) => GamepadButton::GAMEPAD_BUTTON_LEFT_TRIGGER_1,
        (Handedness::Right, ControllerButton::Trigger) => {
            GamepadButton::GAMEPAD_BUTTON_RIGHT_TRIGGER_2
        }
        (Handedness::Right, ControllerButton::Squeeze) => {
            GamepadButton::GAMEPAD_BUTTON_RIGHT_TRIGGER_1
        }
    }
}

/// Poll Raylib for keyboard and gamepad input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    gamepad: Option<Res<ControllerGamepad>>,
    trackers: Query<&ActivationTracker>,
) {
    for tracker in trackers.iter() {
        for key in tracker.keyboard_keys() {
            input.set_key(key, rl.is_key_down(key));
        }
    }

    let pad = gamepad.map(|g| g.0).unwrap_or(0);
    let available = rl.is_gamepad_available(pad);
    for hand in [Handedness::Left, Handedness::Right] {
        let state = available.then(|| {
            let mut state = ControllerState::default();
            for button in [ControllerButton::Trigger, ControllerButton::Squeeze] {
                state.set(button, rl.is_gamepad_button_down(pad, gamepad_button(hand, button)));
            }
            state
        });
        input.set_controller(hand, state);
    }
}
