//! Audio context backed by the default output device.
//!
//! The graph is mirrored into a Glicol engine whenever an oscillator starts
//! or stops; the cpal callback pulls blocks from the engine while at least one
//! carrier is audible and writes silence otherwise.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use super::context::{AudioContext, ContextFactory, NodeId, Port, Waveform};
use super::graph::SynthGraph;
use super::AudioError;
use crate::params::audio_constants::{BLOCK_SIZE, OUTPUT_LIMIT};

/// Audio context rendering its graph to the default output device
pub struct DeviceContext {
    graph: SynthGraph,

    /// Shared with the audio callback
    engine: Arc<Mutex<Engine<BLOCK_SIZE>>>,

    /// Whether the engine holds an audible patch
    patch_live: Arc<AtomicBool>,

    /// Output stream (None once closed)
    stream: Option<cpal::Stream>,
}

impl DeviceContext {
    /// Open the default output device and start its (silent) stream
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            "Opened audio context"
        );

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        let engine = Arc::new(Mutex::new(engine));
        let patch_live = Arc::new(AtomicBool::new(false));

        let engine_clone = Arc::clone(&engine);
        let patch_live_clone = Arc::clone(&patch_live);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if !patch_live_clone.load(Ordering::Acquire) {
                    data.fill(0.0);
                    return;
                }
                let Ok(mut engine) = engine_clone.lock() else {
                    data.fill(0.0);
                    return;
                };

                let frames_needed = data.len() / channels;
                let mut frame_idx = 0;

                // Generate multiple blocks if needed to fill the entire buffer
                while frame_idx < frames_needed {
                    let (buffers, _) = engine.next_block(vec![]);
                    let samples_to_copy = (frames_needed - frame_idx).min(BLOCK_SIZE);

                    for i in 0..samples_to_copy {
                        let left = buffers[0][i];
                        let right = buffers.get(1).map_or(left, |buffer| buffer[i]);

                        let start = (frame_idx + i) * channels;
                        write_frame(&mut data[start..start + channels], left, right);
                    }

                    frame_idx += samples_to_copy;
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            graph: SynthGraph::new(),
            engine,
            patch_live,
            stream: Some(stream),
        })
    }

    /// Push the current audible graph to the engine
    fn sync(&mut self) -> Result<(), AudioError> {
        let code = self.graph.compile();
        let live = {
            let mut engine = self
                .engine
                .lock()
                .map_err(|_| AudioError::Patch("engine lock poisoned".to_string()))?;
            load_patch(&mut engine, code.as_deref())?
        };
        self.patch_live.store(live, Ordering::Release);
        debug!(live, patch = code.as_deref().unwrap_or(""), "Patch synced");
        Ok(())
    }
}

/// Load `code` into the engine; returns whether the output should be live.
///
/// A silent graph (no code) leaves the engine untouched.
fn load_patch(engine: &mut Engine<BLOCK_SIZE>, code: Option<&str>) -> Result<bool, AudioError> {
    let Some(code) = code else {
        return Ok(false);
    };
    engine.update_with_code(code);
    engine
        .update()
        .map_err(|e| AudioError::Patch(format!("{:?}", e)))?;
    Ok(true)
}

/// Write one interleaved frame, safety-limited (even channels left, odd right)
fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    let left = left.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
    let right = right.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
    for (channel, sample) in frame.iter_mut().enumerate() {
        *sample = if channel % 2 == 0 { left } else { right };
    }
}

impl AudioContext for DeviceContext {
    fn destination(&self) -> NodeId {
        self.graph.destination()
    }

    fn create_oscillator(
        &mut self,
        waveform: Waveform,
        frequency_hz: f32,
    ) -> Result<NodeId, AudioError> {
        self.graph.create_oscillator(waveform, frequency_hz)
    }

    fn create_gain(&mut self, gain: f32) -> Result<NodeId, AudioError> {
        self.graph.create_gain(gain)
    }

    fn connect(&mut self, from: NodeId, to: Port) -> Result<(), AudioError> {
        self.graph.connect(from, to)
    }

    fn start(&mut self, oscillator: NodeId) -> Result<(), AudioError> {
        self.graph.start(oscillator)?;
        self.sync()
    }

    fn stop(&mut self, oscillator: NodeId) -> Result<(), AudioError> {
        self.graph.stop(oscillator)?;
        self.sync()
    }

    fn close(&mut self) -> Result<(), AudioError> {
        self.graph.close()?;
        self.patch_live.store(false, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            stream.pause()?;
        }
        info!("Closed audio context");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.graph.is_closed()
    }
}

/// Opens a [`DeviceContext`] on the default output device per session
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceContextFactory;

impl ContextFactory for DeviceContextFactory {
    type Context = DeviceContext;

    fn create(&mut self) -> Result<DeviceContext, AudioError> {
        DeviceContext::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::drone_patch;
    use crate::params::DroneParams;

    fn engine() -> Engine<BLOCK_SIZE> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(44100);
        engine
    }

    #[test]
    fn test_silent_graph_is_not_live() {
        let mut engine = engine();
        let mut graph = SynthGraph::new();
        let osc = graph.create_oscillator(Waveform::Sine, 220.0).unwrap();
        let destination = graph.destination();
        graph.connect(osc, Port::Input(destination)).unwrap();

        assert!(!load_patch(&mut engine, graph.compile().as_deref()).unwrap());
    }

    #[test]
    fn test_drone_patch_goes_live() {
        let mut engine = engine();
        let patch = drone_patch(&DroneParams::default()).unwrap();

        assert!(load_patch(&mut engine, Some(patch.as_str())).unwrap());

        // Stopping everything silences the output again
        assert!(!load_patch(&mut engine, None).unwrap());
    }

    #[test]
    fn test_rejected_patch_is_an_error() {
        let mut engine = engine();

        let result = load_patch(&mut engine, Some("o: >> 1"));
        assert!(matches!(result, Err(AudioError::Patch(_))));
    }

    #[test]
    fn test_write_frame_stereo() {
        let mut frame = [0.0; 2];
        write_frame(&mut frame, 0.25, -0.25);
        assert_eq!(frame, [0.25, -0.25]);
    }

    #[test]
    fn test_write_frame_limits_output() {
        let mut frame = [0.0; 2];
        write_frame(&mut frame, 2.0, -3.0);
        assert_eq!(frame, [OUTPUT_LIMIT, -OUTPUT_LIMIT]);
    }

    #[test]
    fn test_write_frame_surround_alternates() {
        let mut frame = [0.0; 6];
        write_frame(&mut frame, 0.1, 0.2);
        assert_eq!(frame, [0.1, 0.2, 0.1, 0.2, 0.1, 0.2]);

        let mut mono = [0.0; 1];
        write_frame(&mut mono, 0.3, 0.4);
        assert_eq!(mono, [0.3]);
    }
}
