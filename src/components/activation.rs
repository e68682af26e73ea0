//! Edge-triggered activation over several input sources.
//!
//! An [`ActivationTracker`] owns a small list of [`ActivationSource`]s (a
//! keyboard key, a controller button on one hand) and a shared `active` flag.
//! Every frame the [`activation_system`] samples all sources against the
//! current [`InputState`]; a source that goes from unpressed to pressed is a
//! *rising edge*, and any rising edge flips `active` exactly once.
//!
//! Holding a button does not retrigger, and pressing the keyboard key and the
//! controller button in the same frame still produces a single toggle.
//!
//! # Related
//!
//! - [`crate::systems::activation::activation_system`] – samples trackers each frame
//! - [`crate::events::activation::ToggleEvent`] – emitted on every toggle
//! - [`crate::resources::input::InputState`] – polled hardware state
//!
//! [`activation_system`]: crate::systems::activation::activation_system

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Component;
use raylib::prelude::KeyboardKey;
use smallvec::SmallVec;

use crate::resources::input::InputState;

/// Which hand a controller is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

/// Controller button used as an activation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    /// Index finger trigger, gamepad button index 0.
    Trigger,
    /// Grip/squeeze button, gamepad button index 1.
    Squeeze,
}

impl ControllerButton {
    /// Button index on the controller's gamepad layout.
    pub fn index(self) -> usize {
        match self {
            ControllerButton::Trigger => 0,
            ControllerButton::Squeeze => 1,
        }
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            other => Err(format!("unknown handedness '{}'", other)),
        }
    }
}

impl FromStr for ControllerButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trigger" => Ok(ControllerButton::Trigger),
            "squeeze" => Ok(ControllerButton::Squeeze),
            other => Err(format!("unknown controller button '{}'", other)),
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for ControllerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerButton::Trigger => write!(f, "trigger"),
            ControllerButton::Squeeze => write!(f, "squeeze"),
        }
    }
}

/// Anything that can report a pressed/unpressed state from polled input.
pub trait SampleSource {
    /// Whether the source is held down this frame.
    fn is_pressed(&self, input: &InputState) -> bool;
}

/// A keyboard key used as an activation source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardSource {
    pub key: KeyboardKey,
}

impl SampleSource for KeyboardSource {
    fn is_pressed(&self, input: &InputState) -> bool {
        input.is_key_down(self.key)
    }
}

/// A button on the controller held in a given hand.
///
/// A disconnected controller reads as unpressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSource {
    pub handedness: Handedness,
    pub button: ControllerButton,
}

impl SampleSource for ControllerSource {
    fn is_pressed(&self, input: &InputState) -> bool {
        input
            .controller(self.handedness)
            .map(|c| c.is_down(self.button))
            .unwrap_or(false)
    }
}

/// One configured input channel contributing to a shared toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationSource {
    Keyboard(KeyboardSource),
    Controller(ControllerSource),
}

impl ActivationSource {
    pub fn keyboard(key: KeyboardKey) -> Self {
        ActivationSource::Keyboard(KeyboardSource { key })
    }

    pub fn controller(handedness: Handedness, button: ControllerButton) -> Self {
        ActivationSource::Controller(ControllerSource { handedness, button })
    }
}

impl SampleSource for ActivationSource {
    fn is_pressed(&self, input: &InputState) -> bool {
        match self {
            ActivationSource::Keyboard(k) => k.is_pressed(input),
            ActivationSource::Controller(c) => c.is_pressed(input),
        }
    }
}

/// A source plus the pressed state observed on the previous sample.
#[derive(Debug, Clone, Copy)]
pub struct TrackedSource {
    pub source: ActivationSource,
    pub pressed_last_tick: bool,
}

/// Result of a sample that flipped the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// The new value of `active`.
    pub active: bool,
}

/// Debounced toggle shared by every configured source.
#[derive(Component, Debug, Clone)]
pub struct ActivationTracker {
    pub sources: SmallVec<[TrackedSource; 2]>,
    /// Toggled on every rising edge of any source.
    pub active: bool,
}

impl Default for ActivationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self {
            sources: SmallVec::new(),
            active: false,
        }
    }

    /// Builder method adding one more source.
    pub fn with_source(mut self, source: ActivationSource) -> Self {
        self.sources.push(TrackedSource {
            source,
            pressed_last_tick: false,
        });
        self
    }

    /// Keyboard keys watched by this tracker.
    pub fn keyboard_keys(&self) -> impl Iterator<Item = KeyboardKey> + '_ {
        self.sources.iter().filter_map(|s| match s.source {
            ActivationSource::Keyboard(k) => Some(k.key),
            ActivationSource::Controller(_) => None,
        })
    }

    /// Sample all sources once.
    ///
    /// Every source's previous state is updated, even after an earlier source
    /// already produced a rising edge. Returns `Some` when `active` flipped.
    pub fn sample(&mut self, input: &InputState) -> Option<Toggled> {
        let mut rising = false;
        for tracked in self.sources.iter_mut() {
            let pressed = tracked.source.is_pressed(input);
            if pressed && !tracked.pressed_last_tick {
                rising = true;
            }
            tracked.pressed_last_tick = pressed;
        }
        if rising {
            self.active = !self.active;
            Some(Toggled {
                active: self.active,
            })
        } else {
            None
        }
    }

    /// Drop the toggle and the per-source history.
    pub fn reset(&mut self) {
        self.active = false;
        for tracked in self.sources.iter_mut() {
            tracked.pressed_last_tick = false;
        }
    }
}
