//! Event types used by the engine.
//!
//! Events decouple the systems that detect something (a toggle, a schedule
//! firing, an audio state change) from the observers and systems that act on
//! it.
//!
//! Submodules:
//! - [`activation`] – toggles produced by activation trackers
//! - [`audio`] – commands and messages for the background audio thread
//! - [`spawn`] – fires produced by recurring schedules
pub mod activation;
pub mod audio;
pub mod spawn;
