//! Scene configuration resource.
//!
//! Manages spawner, music, input and window settings loaded from an INI
//! configuration file. Provides defaults for safe startup and methods to
//! load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [spawner]
//! targets = apple, banana
//! interval = 2.0
//! spread = 0.5
//! offset = 0, 0, 0
//! random_area = 0, 0, 0
//! button = trigger
//! handedness = right
//! key = space
//! lifetime = 0
//!
//! [music]
//! path = ./assets/music.ogg
//! volume = 0.5
//! loop = true
//! button = squeeze
//! handedness = left
//! key = m
//! start_suspended = true
//!
//! [input]
//! gamepad = 0
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//! ```
//!
//! Missing values keep their defaults. Values that fail to parse are logged
//! and also keep their defaults.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use raylib::prelude::{KeyboardKey, Vector3};
use std::path::PathBuf;

use crate::components::activation::{ControllerButton, Handedness};
use crate::components::schedule::MIN_SPAWN_INTERVAL;
use crate::components::spawner::{DEFAULT_SPREAD, parse_name_list};

/// Default safe values for startup
const DEFAULT_TARGETS: &str = "apple,banana";
const DEFAULT_SPAWN_INTERVAL: f32 = 2.0;
const DEFAULT_MUSIC_PATH: &str = "./assets/music.ogg";
const DEFAULT_VOLUME: f32 = 0.5;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Input binding shared by the spawner and the music player sections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputBinding {
    pub button: ControllerButton,
    pub handedness: Handedness,
    pub key: KeyboardKey,
}

/// Scene configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct SceneConfig {
    /// Prefab names resolved at startup, duplicates allowed.
    pub spawn_targets: Vec<String>,
    /// Nominal spawn period in seconds, never below [`MIN_SPAWN_INTERVAL`].
    pub spawn_interval: f32,
    /// Horizontal jitter width in meters.
    pub spawn_spread: f32,
    /// Reserved.
    pub spawn_offset: Vector3,
    /// Reserved.
    pub spawn_random_area: Vector3,
    /// Seconds before spawned objects despawn, 0 keeps them.
    pub spawn_lifetime: f32,
    pub spawn_binding: InputBinding,
    pub music_path: String,
    /// Gain in `0.0..=1.0`.
    pub music_volume: f32,
    pub music_loop: bool,
    pub music_binding: InputBinding,
    /// Keep the audio output muted until the first play request.
    pub music_start_suspended: bool,
    /// Raylib gamepad index standing in for the hand controllers.
    pub gamepad: i32,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            spawn_targets: parse_name_list(DEFAULT_TARGETS),
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            spawn_spread: DEFAULT_SPREAD,
            spawn_offset: Vector3::zero(),
            spawn_random_area: Vector3::zero(),
            spawn_lifetime: 0.0,
            spawn_binding: InputBinding {
                button: ControllerButton::Trigger,
                handedness: Handedness::Right,
                key: KeyboardKey::KEY_SPACE,
            },
            music_path: DEFAULT_MUSIC_PATH.to_string(),
            music_volume: DEFAULT_VOLUME,
            music_loop: true,
            music_binding: InputBinding {
                button: ControllerButton::Squeeze,
                handedness: Handedness::Left,
                key: KeyboardKey::KEY_M,
            },
            music_start_suspended: true,
            gamepad: 0,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [spawner] section
        if let Some(list) = config.get("spawner", "targets") {
            self.spawn_targets = parse_name_list(&list);
            if self.spawn_targets.is_empty() {
                warn!("config: spawner.targets is empty, nothing will spawn");
            }
        }
        if let Some(interval) = read_float(config, "spawner", "interval") {
            if interval < MIN_SPAWN_INTERVAL {
                warn!(
                    "config: spawner.interval {} below floor, using {}",
                    interval, MIN_SPAWN_INTERVAL
                );
            }
            self.spawn_interval = interval.max(MIN_SPAWN_INTERVAL);
        }
        if let Some(spread) = read_float(config, "spawner", "spread") {
            self.spawn_spread = spread.abs();
        }
        if let Some(offset) = read_vector(config, "spawner", "offset") {
            self.spawn_offset = offset;
        }
        if let Some(area) = read_vector(config, "spawner", "random_area") {
            self.spawn_random_area = area;
        }
        if let Some(lifetime) = read_float(config, "spawner", "lifetime") {
            self.spawn_lifetime = lifetime.max(0.0);
        }
        read_binding(config, "spawner", &mut self.spawn_binding);

        // [music] section
        if let Some(path) = config.get("music", "path") {
            self.music_path = path;
        }
        if let Some(volume) = read_float(config, "music", "volume") {
            self.music_volume = volume.clamp(0.0, 1.0);
        }
        if let Some(looped) = read_bool(config, "music", "loop") {
            self.music_loop = looped;
        }
        if let Some(suspended) = read_bool(config, "music", "start_suspended") {
            self.music_start_suspended = suspended;
        }
        read_binding(config, "music", &mut self.music_binding);

        // [input] section
        match config.getint("input", "gamepad") {
            Ok(Some(index)) => self.gamepad = index as i32,
            Ok(None) => {}
            Err(e) => warn!("config: input.gamepad: {}", e),
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        info!(
            "Loaded config: targets={:?} interval={} spread={} music='{}' volume={} loop={}",
            self.spawn_targets,
            self.spawn_interval,
            self.spawn_spread,
            self.music_path,
            self.music_volume,
            self.music_loop
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("spawner", "targets", Some(self.spawn_targets.join(", ")));
        config.set("spawner", "interval", Some(self.spawn_interval.to_string()));
        config.set("spawner", "spread", Some(self.spawn_spread.to_string()));
        config.set("spawner", "offset", Some(format_vector(self.spawn_offset)));
        config.set(
            "spawner",
            "random_area",
            Some(format_vector(self.spawn_random_area)),
        );
        config.set("spawner", "lifetime", Some(self.spawn_lifetime.to_string()));
        write_binding(&mut config, "spawner", &self.spawn_binding);

        config.set("music", "path", Some(self.music_path.clone()));
        config.set("music", "volume", Some(self.music_volume.to_string()));
        config.set("music", "loop", Some(self.music_loop.to_string()));
        config.set(
            "music",
            "start_suspended",
            Some(self.music_start_suspended.to_string()),
        );
        write_binding(&mut config, "music", &self.music_binding);

        config.set("input", "gamepad", Some(self.gamepad.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

fn read_float(config: &Ini, section: &str, key: &str) -> Option<f32> {
    match config.getfloat(section, key) {
        Ok(Some(v)) if v.is_finite() => Some(v as f32),
        Ok(Some(v)) => {
            warn!("config: {}.{} = {} is not finite", section, key, v);
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!("config: {}.{}: {}", section, key, e);
            None
        }
    }
}

fn read_bool(config: &Ini, section: &str, key: &str) -> Option<bool> {
    match config.getbool(section, key) {
        Ok(v) => v,
        Err(e) => {
            warn!("config: {}.{}: {}", section, key, e);
            None
        }
    }
}

fn read_vector(config: &Ini, section: &str, key: &str) -> Option<Vector3> {
    let text = config.get(section, key)?;
    let parsed = parse_vector(&text);
    if parsed.is_none() {
        warn!("config: {}.{} = '{}' is not an x,y,z vector", section, key, text);
    }
    parsed
}

fn read_binding(config: &Ini, section: &str, binding: &mut InputBinding) {
    if let Some(text) = config.get(section, "button") {
        match text.parse::<ControllerButton>() {
            Ok(button) => binding.button = button,
            Err(e) => warn!("config: {}.button: {}", section, e),
        }
    }
    if let Some(text) = config.get(section, "handedness") {
        match text.parse::<Handedness>() {
            Ok(hand) => binding.handedness = hand,
            Err(e) => warn!("config: {}.handedness: {}", section, e),
        }
    }
    if let Some(text) = config.get(section, "key") {
        match parse_key(&text) {
            Some(key) => binding.key = key,
            None => warn!("config: {}.key: unknown key '{}'", section, text),
        }
    }
}

fn write_binding(config: &mut Ini, section: &str, binding: &InputBinding) {
    config.set(section, "button", Some(binding.button.to_string()));
    config.set(section, "handedness", Some(binding.handedness.to_string()));
    config.set(section, "key", key_name(binding.key).map(String::from));
}

/// Parse `"x, y, z"` into a vector.
pub fn parse_vector(text: &str) -> Option<Vector3> {
    let parts: Vec<f32> = text
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x, y, z] => Some(Vector3::new(*x, *y, *z)),
        _ => None,
    }
}

fn format_vector(v: Vector3) -> String {
    format!("{}, {}, {}", v.x, v.y, v.z)
}

const KEY_NAMES: &[(&str, KeyboardKey)] = &[
    ("space", KeyboardKey::KEY_SPACE),
    ("enter", KeyboardKey::KEY_ENTER),
    ("tab", KeyboardKey::KEY_TAB),
    ("backspace", KeyboardKey::KEY_BACKSPACE),
    ("a", KeyboardKey::KEY_A),
    ("b", KeyboardKey::KEY_B),
    ("c", KeyboardKey::KEY_C),
    ("d", KeyboardKey::KEY_D),
    ("e", KeyboardKey::KEY_E),
    ("f", KeyboardKey::KEY_F),
    ("g", KeyboardKey::KEY_G),
    ("h", KeyboardKey::KEY_H),
    ("i", KeyboardKey::KEY_I),
    ("j", KeyboardKey::KEY_J),
    ("k", KeyboardKey::KEY_K),
    ("l", KeyboardKey::KEY_L),
    ("m", KeyboardKey::KEY_M),
    ("n", KeyboardKey::KEY_N),
    ("o", KeyboardKey::KEY_O),
    ("p", KeyboardKey::KEY_P),
    ("q", KeyboardKey::KEY_Q),
    ("r", KeyboardKey::KEY_R),
    ("s", KeyboardKey::KEY_S),
    ("t", KeyboardKey::KEY_T),
    ("u", KeyboardKey::KEY_U),
    ("v", KeyboardKey::KEY_V),
    ("w", KeyboardKey::KEY_W),
    ("x", KeyboardKey::KEY_X),
    ("y", KeyboardKey::KEY_Y),
    ("z", KeyboardKey::KEY_Z),
];

/// Map a key name (`space`, `enter`, `tab`, `backspace`, `a`..`z`) to a key.
pub fn parse_key(name: &str) -> Option<KeyboardKey> {
    let name = name.trim().to_ascii_lowercase();
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, key)| *key)
}

fn key_name(key: KeyboardKey) -> Option<&'static str> {
    KEY_NAMES.iter().find(|(_, k)| *k == key).map(|(n, _)| *n)
}
