//! Drone patch construction.

use tracing::debug;

use super::context::{AudioContext, NodeId, Port, Waveform};
use super::graph::SynthGraph;
use super::AudioError;
use crate::params::DroneParams;

/// Build the drone chord on `ctx` and return its carriers in voice order.
///
/// Graph per voice:
///
/// ```text
/// lfo >> depth ─┐ (frequency)
///               carrier >> level >> master >> destination
/// ```
///
/// The vibrato LFOs are started here and keep running until the context is
/// closed. Carriers are left idle; starting them is the caller's job.
pub fn build_drone<C: AudioContext>(
    ctx: &mut C,
    params: &DroneParams,
) -> Result<Vec<NodeId>, AudioError> {
    let master = ctx.create_gain(params.master_gain)?;
    let destination = ctx.destination();
    ctx.connect(master, Port::Input(destination))?;

    let mut carriers = Vec::with_capacity(params.voices.len());

    for (i, voice) in params.voices.iter().enumerate() {
        let frequency_hz = params.voice_frequency_hz(voice);

        let carrier = ctx.create_oscillator(voice.waveform, frequency_hz)?;
        let level = ctx.create_gain(voice.amplitude)?;

        // Gentle vibrato
        let lfo = ctx.create_oscillator(Waveform::Sine, params.lfo_rate_hz(i))?;
        let depth = ctx.create_gain(params.vibrato_depth_hz)?;
        ctx.connect(lfo, Port::Input(depth))?;
        ctx.connect(depth, Port::Frequency(carrier))?;
        ctx.start(lfo)?;

        ctx.connect(carrier, Port::Input(level))?;
        ctx.connect(level, Port::Input(master))?;

        debug!(
            voice = i,
            frequency_hz,
            waveform = ?voice.waveform,
            amplitude = voice.amplitude,
            "Built drone voice"
        );
        carriers.push(carrier);
    }

    Ok(carriers)
}

/// Glicol patch of the drone while playing, built on a headless graph
pub fn drone_patch(params: &DroneParams) -> Result<String, AudioError> {
    let mut graph = SynthGraph::new();
    for carrier in build_drone(&mut graph, params)? {
        graph.start(carrier)?;
    }
    graph
        .compile()
        .ok_or_else(|| AudioError::Patch("drone has no audible voices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Node, OscillatorState};

    fn built() -> (SynthGraph, Vec<NodeId>) {
        let mut graph = SynthGraph::new();
        let carriers = build_drone(&mut graph, &DroneParams::default()).unwrap();
        (graph, carriers)
    }

    #[test]
    fn test_three_carriers_reach_destination() {
        let (graph, carriers) = built();

        assert_eq!(carriers.len(), 3);
        for &carrier in &carriers {
            assert!(graph.reaches_destination(carrier));
            assert_eq!(graph.oscillator_state(carrier), Some(OscillatorState::Idle));
        }
    }

    #[test]
    fn test_fundamental_has_distinct_waveform() {
        let (graph, carriers) = built();

        let waveform = |id: NodeId| match graph.node(id) {
            Some(Node::Oscillator { waveform, .. }) => *waveform,
            other => panic!("not an oscillator: {:?}", other),
        };

        assert_eq!(waveform(carriers[0]), Waveform::Sine);
        assert_eq!(waveform(carriers[1]), Waveform::Triangle);
        assert_eq!(waveform(carriers[2]), Waveform::Triangle);
    }

    #[test]
    fn test_carriers_tuned_to_harmonics() {
        let params = DroneParams {
            base_frequency_hz: 110.0,
            ..DroneParams::default()
        };
        let mut graph = SynthGraph::new();
        let carriers = build_drone(&mut graph, &params).unwrap();

        for (carrier, voice) in carriers.iter().zip(&params.voices) {
            match graph.node(*carrier) {
                Some(Node::Oscillator { frequency_hz, .. }) => {
                    assert_eq!(*frequency_hz, params.voice_frequency_hz(voice));
                }
                other => panic!("not an oscillator: {:?}", other),
            }
        }
    }

    #[test]
    fn test_modulators_run_before_carriers() {
        let (graph, carriers) = built();

        // One LFO per voice, all running, carriers still idle
        assert_eq!(graph.running_oscillators(), 3);

        for &carrier in &carriers {
            let depth: Vec<NodeId> = graph.inputs(Port::Frequency(carrier)).collect();
            assert_eq!(depth.len(), 1);
            assert!(matches!(graph.node(depth[0]), Some(Node::Gain { gain }) if *gain == 2.0));

            let lfo: Vec<NodeId> = graph.inputs(Port::Input(depth[0])).collect();
            assert_eq!(graph.oscillator_state(lfo[0]), Some(OscillatorState::Running));
            assert!(!graph.reaches_destination(lfo[0]));
        }
    }

    #[test]
    fn test_patch_compiles_once_carriers_start() {
        let (mut graph, carriers) = built();
        assert_eq!(graph.compile(), None);

        for &carrier in &carriers {
            graph.start(carrier).unwrap();
        }

        let patch = graph.compile().unwrap();
        let fundamental = format!("~n{}: sin ~f{}", carriers[0].0, carriers[0].0);
        assert!(patch.contains(&fundamental));
        assert!(patch.contains(">> add 136.1"));
        assert!(patch.contains(">> add 272.2"));
        assert!(patch.contains("tri ~f"));
        assert!(patch.contains("sin 0.5"));
        assert!(patch.contains(">> mul 0.15"));
        assert!(patch.ends_with("o: mix ~n1"));
    }

    #[test]
    fn test_drone_patch() {
        let patch = drone_patch(&DroneParams::default()).unwrap();
        assert_eq!(patch.lines().filter(|line| line.contains("tri ~f")).count(), 2);
        assert!(patch.lines().last().unwrap().starts_with("o: mix"));

        let silent = DroneParams {
            voices: Vec::new(),
            ..DroneParams::default()
        };
        assert!(matches!(drone_patch(&silent), Err(AudioError::Patch(_))));
    }

    #[test]
    fn test_build_on_closed_context_fails() {
        let mut graph = SynthGraph::new();
        graph.close().unwrap();

        let result = build_drone(&mut graph, &DroneParams::default());
        assert!(matches!(result, Err(AudioError::ContextClosed)));
        assert_eq!(graph.nodes().len(), 1);
    }
}
