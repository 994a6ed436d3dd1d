//! Audio context seam: the node/edge operations a synthesis backend offers.

use std::fmt;

use super::AudioError;

/// Handle of a node inside one audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connection target of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// Audio input of a gain stage or the destination sink (inputs are summed)
    Input(NodeId),

    /// Frequency parameter of an oscillator (inputs are added to the base frequency)
    Frequency(NodeId),
}

impl Port {
    /// Node that owns this port
    pub fn node(&self) -> NodeId {
        match *self {
            Port::Input(node) | Port::Frequency(node) => node,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Input(node) => write!(f, "{}.input", node),
            Port::Frequency(node) => write!(f, "{}.frequency", node),
        }
    }
}

/// Oscillator waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Glicol node name for this shape
    pub fn glicol_name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sin",
            Waveform::Triangle => "tri",
        }
    }
}

/// Audio processing context: one clock, one output sink, a graph of nodes.
///
/// Parameters are fixed at creation time. Oscillators can be started once and
/// stopped once. Every operation on a closed context fails with
/// [`AudioError::ContextClosed`].
pub trait AudioContext {
    /// Output sink of this context
    fn destination(&self) -> NodeId;

    /// Create an (idle) oscillator
    fn create_oscillator(
        &mut self,
        waveform: Waveform,
        frequency_hz: f32,
    ) -> Result<NodeId, AudioError>;

    /// Create a gain stage
    fn create_gain(&mut self, gain: f32) -> Result<NodeId, AudioError>;

    /// Route the output of `from` into `to`
    fn connect(&mut self, from: NodeId, to: Port) -> Result<(), AudioError>;

    /// Start an idle oscillator
    fn start(&mut self, oscillator: NodeId) -> Result<(), AudioError>;

    /// Stop a running oscillator
    fn stop(&mut self, oscillator: NodeId) -> Result<(), AudioError>;

    /// Release the context and everything reachable through it
    fn close(&mut self) -> Result<(), AudioError>;

    fn is_closed(&self) -> bool;
}

/// Creates fresh audio contexts for the playback controller
pub trait ContextFactory {
    type Context: AudioContext;

    fn create(&mut self) -> Result<Self::Context, AudioError>;
}
