//! Explicit synthesis graph.
//!
//! Every node and every edge, parameter modulation included, is recorded in
//! plain vectors so teardown and rendering can walk the graph structurally.
//! The graph doubles as a headless [`AudioContext`] and knows how to compile
//! its audible part into a Glicol composition.

use std::fmt;

use super::context::{AudioContext, NodeId, Port, Waveform};
use super::AudioError;

/// Lifecycle of an oscillator node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorState {
    /// Created, never started
    Idle,
    Running,
    /// Stopped for good (oscillators cannot restart)
    Stopped,
}

impl fmt::Display for OscillatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OscillatorState::Idle => "idle",
            OscillatorState::Running => "running",
            OscillatorState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Graph node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Output sink (always node 0)
    Destination,
    Oscillator {
        waveform: Waveform,
        frequency_hz: f32,
        state: OscillatorState,
    },
    Gain {
        gain: f32,
    },
}

/// Directed edge from a node output to a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: Port,
}

#[derive(Clone, Copy, PartialEq)]
enum Liveness {
    Unknown,
    Visiting,
    Live,
    Silent,
}

/// Headless audio context holding an explicit node/edge graph
#[derive(Debug, Clone)]
pub struct SynthGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    closed: bool,
}

impl Default for SynthGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthGraph {
    /// Create an empty graph containing only the destination sink
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Destination],
            edges: Vec::new(),
            closed: false,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// State of an oscillator node (None for unknown ids and non-oscillators)
    pub fn oscillator_state(&self, id: NodeId) -> Option<OscillatorState> {
        match self.node(id)? {
            Node::Oscillator { state, .. } => Some(*state),
            _ => None,
        }
    }

    /// Number of oscillators currently running
    pub fn running_oscillators(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| {
                matches!(
                    node,
                    Node::Oscillator {
                        state: OscillatorState::Running,
                        ..
                    }
                )
            })
            .count()
    }

    /// Whether audio leaving `id` reaches the destination through input edges
    pub fn reaches_destination(&self, id: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if current == self.destination() {
                return true;
            }
            match visited.get_mut(current.0) {
                Some(seen) if !*seen => *seen = true,
                _ => continue,
            }
            stack.extend(self.edges.iter().filter_map(|edge| match edge.to {
                Port::Input(target) if edge.from == current => Some(target),
                _ => None,
            }));
        }
        false
    }

    /// Nodes feeding `port`
    pub fn inputs(&self, port: Port) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .filter(move |edge| edge.to == port)
            .map(|edge| edge.from)
    }

    /// Compile the audible part of the graph into a Glicol composition.
    ///
    /// Returns `None` when nothing running reaches the destination, in which
    /// case the output is silence.
    pub fn compile(&self) -> Option<String> {
        let mut liveness = vec![Liveness::Unknown; self.nodes.len()];
        let destination = self.destination();

        let sources = self.live_inputs(Port::Input(destination), &mut liveness);
        if sources.is_empty() {
            return None;
        }

        // Walk back from the sink so unreachable LFO chains are left out
        let mut needed = vec![false; self.nodes.len()];
        let mut stack = sources.clone();
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut needed[id.0], true) {
                continue;
            }
            stack.extend(self.live_inputs(Port::Input(id), &mut liveness));
            stack.extend(self.live_inputs(Port::Frequency(id), &mut liveness));
        }

        let mut lines = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if !needed[index] {
                continue;
            }
            let id = NodeId(index);
            match node {
                Node::Oscillator {
                    waveform,
                    frequency_hz,
                    ..
                } => {
                    let modulators = self.live_inputs(Port::Frequency(id), &mut liveness);
                    if modulators.is_empty() {
                        lines.push(format!(
                            "~n{}: {} {:?}",
                            index,
                            waveform.glicol_name(),
                            frequency_hz
                        ));
                    } else {
                        lines.push(format!(
                            "~f{}: mix {} >> add {:?}",
                            index,
                            references(&modulators),
                            frequency_hz
                        ));
                        lines.push(format!("~n{}: {} ~f{}", index, waveform.glicol_name(), index));
                    }
                }
                Node::Gain { gain } => {
                    let inputs = self.live_inputs(Port::Input(id), &mut liveness);
                    lines.push(format!("~n{}: mix {} >> mul {:?}", index, references(&inputs), gain));
                }
                Node::Destination => {}
            }
        }
        lines.push(format!("o: mix {}", references(&sources)));

        Some(lines.join("\n"))
    }

    fn live_inputs(&self, port: Port, liveness: &mut [Liveness]) -> Vec<NodeId> {
        let inputs: Vec<NodeId> = self.inputs(port).collect();
        inputs
            .into_iter()
            .filter(|&id| self.is_live(id, liveness))
            .collect()
    }

    /// A node is live when it produces sound: a running oscillator, or a gain
    /// stage with at least one live input. Cycles count as silent.
    fn is_live(&self, id: NodeId, liveness: &mut [Liveness]) -> bool {
        match liveness[id.0] {
            Liveness::Live => return true,
            Liveness::Silent | Liveness::Visiting => return false,
            Liveness::Unknown => {}
        }
        liveness[id.0] = Liveness::Visiting;

        let live = match &self.nodes[id.0] {
            Node::Oscillator { state, .. } => *state == OscillatorState::Running,
            Node::Gain { .. } => !self.live_inputs(Port::Input(id), liveness).is_empty(),
            Node::Destination => false,
        };

        liveness[id.0] = if live {
            Liveness::Live
        } else {
            Liveness::Silent
        };
        live
    }

    fn check_open(&self) -> Result<(), AudioError> {
        if self.closed {
            Err(AudioError::ContextClosed)
        } else {
            Ok(())
        }
    }

    fn push(&mut self, node: Node) -> Result<NodeId, AudioError> {
        self.check_open()?;
        self.nodes.push(node);
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn transition(
        &mut self,
        id: NodeId,
        from: OscillatorState,
        to: OscillatorState,
        action: &'static str,
    ) -> Result<(), AudioError> {
        self.check_open()?;
        match self.nodes.get_mut(id.0) {
            Some(Node::Oscillator { state, .. }) if *state == from => {
                *state = to;
                Ok(())
            }
            Some(Node::Oscillator { state, .. }) => Err(AudioError::InvalidState {
                node: id,
                state: *state,
                action,
            }),
            _ => Err(AudioError::UnknownNode(id)),
        }
    }
}

fn references(ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| format!("~n{}", id.0))
        .collect::<Vec<_>>()
        .join(" ")
}

impl AudioContext for SynthGraph {
    fn destination(&self) -> NodeId {
        NodeId(0)
    }

    fn create_oscillator(
        &mut self,
        waveform: Waveform,
        frequency_hz: f32,
    ) -> Result<NodeId, AudioError> {
        self.push(Node::Oscillator {
            waveform,
            frequency_hz,
            state: OscillatorState::Idle,
        })
    }

    fn create_gain(&mut self, gain: f32) -> Result<NodeId, AudioError> {
        self.push(Node::Gain { gain })
    }

    fn connect(&mut self, from: NodeId, to: Port) -> Result<(), AudioError> {
        self.check_open()?;

        let source = self.node(from).ok_or(AudioError::UnknownNode(from))?;
        let target = self.node(to.node()).ok_or(AudioError::UnknownNode(to.node()))?;

        let valid = from != to.node()
            && !matches!(source, Node::Destination)
            && match to {
                Port::Input(_) => matches!(target, Node::Gain { .. } | Node::Destination),
                Port::Frequency(_) => matches!(target, Node::Oscillator { .. }),
            };
        if !valid {
            return Err(AudioError::InvalidConnection { from, to });
        }

        self.edges.push(Edge { from, to });
        Ok(())
    }

    fn start(&mut self, oscillator: NodeId) -> Result<(), AudioError> {
        self.transition(
            oscillator,
            OscillatorState::Idle,
            OscillatorState::Running,
            "start",
        )
    }

    fn stop(&mut self, oscillator: NodeId) -> Result<(), AudioError> {
        self.transition(
            oscillator,
            OscillatorState::Running,
            OscillatorState::Stopped,
            "stop",
        )
    }

    fn close(&mut self) -> Result<(), AudioError> {
        self.check_open()?;
        // Everything still running is released with the context
        for node in &mut self.nodes {
            if let Node::Oscillator { state, .. } = node {
                if *state == OscillatorState::Running {
                    *state = OscillatorState::Stopped;
                }
            }
        }
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
