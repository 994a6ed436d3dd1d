//! Audio error type.

use super::context::{NodeId, Port};
use super::graph::OscillatorState;

/// Failures raised by audio contexts and the drone builder
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio context is closed")]
    ContextClosed,

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Cannot {action} oscillator {node} while {state}")]
    InvalidState {
        node: NodeId,
        state: OscillatorState,
        action: &'static str,
    },

    #[error("Cannot connect {from} to {to}")]
    InvalidConnection { from: NodeId, to: Port },

    #[error("No audio output device found")]
    NoOutputDevice,

    #[error("Failed to get audio config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Failed to pause audio stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[error("Glicol engine rejected patch: {0}")]
    Patch(String),
}
