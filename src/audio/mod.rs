//! Drone synthesis and playback lifecycle.
//!
//! A [`PlaybackController`] owns at most one [`AudioSession`]. Each session
//! gets a fresh [`AudioContext`] from a [`ContextFactory`], and
//! [`build_drone`] wires the chord into it. [`SynthGraph`] is the headless
//! context; [`DeviceContext`] renders the same graph through cpal and Glicol.

mod context;
mod controller;
mod device;
mod drone;
mod error;
mod graph;

// Re-export public types
pub use context::{AudioContext, ContextFactory, NodeId, Port, Waveform};
pub use controller::{AudioSession, PlaybackController, PlaybackState};
pub use device::{DeviceContext, DeviceContextFactory};
pub use drone::{build_drone, drone_patch};
pub use error::AudioError;
pub use graph::{Edge, Node, OscillatorState, SynthGraph};
