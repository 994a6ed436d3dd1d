//! Drone synthesis parameters and audio constants.

use crate::audio::Waveform;

/// One voice of the drone chord
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    /// Carrier waveform
    pub waveform: Waveform,

    /// Multiple of the fundamental (dimensionless, 1 = fundamental)
    pub harmonic: f32,

    /// Per-voice gain before the master stage (0.0 - 1.0)
    pub amplitude: f32,
}

/// Drone patch parameters
///
/// Defaults reproduce the reference chord: 136.1 Hz ("OM" tuning) with its
/// second and third harmonics, a quiet master stage, and a slow vibrato
/// whose rate rises a little with each voice.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneParams {
    /// Fundamental frequency (Hz)
    pub base_frequency_hz: f32,

    /// Master gain applied to the summed voices (0.0 - 1.0)
    /// 0.15 keeps three voices well clear of clipping
    pub master_gain: f32,

    /// Vibrato LFO rate of voice 0 (Hz)
    pub lfo_base_hz: f32,

    /// Added LFO rate per voice index (Hz)
    pub lfo_step_hz: f32,

    /// Vibrato depth: LFO output gain fed into the carrier frequency (Hz)
    pub vibrato_depth_hz: f32,

    /// Voices in build order
    pub voices: Vec<VoiceParams>,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            base_frequency_hz: 136.1,
            master_gain: 0.15,
            lfo_base_hz: 0.5,
            lfo_step_hz: 0.2,
            vibrato_depth_hz: 2.0,
            voices: vec![
                VoiceParams {
                    waveform: Waveform::Sine,
                    harmonic: 1.0,
                    amplitude: 0.4,
                },
                VoiceParams {
                    waveform: Waveform::Triangle,
                    harmonic: 2.0,
                    amplitude: 0.2,
                },
                VoiceParams {
                    waveform: Waveform::Triangle,
                    harmonic: 3.0,
                    amplitude: 0.2,
                },
            ],
        }
    }
}

impl DroneParams {
    /// Carrier frequency of `voice` (Hz)
    pub fn voice_frequency_hz(&self, voice: &VoiceParams) -> f32 {
        self.base_frequency_hz * voice.harmonic
    }

    /// Vibrato LFO rate of voice `index` (Hz)
    pub fn lfo_rate_hz(&self, index: usize) -> f32 {
        self.lfo_base_hz + index as f32 * self.lfo_step_hz
    }

    /// Validate ranges (positive frequencies, gains within 0..=1)
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_frequency_hz > 0.0) {
            return Err(format!(
                "Base frequency must be > 0 Hz, got {}",
                self.base_frequency_hz
            ));
        }
        if !(0.0..=1.0).contains(&self.master_gain) {
            return Err(format!(
                "Master gain must be within 0..=1, got {}",
                self.master_gain
            ));
        }
        for (i, voice) in self.voices.iter().enumerate() {
            if !(voice.harmonic > 0.0) {
                return Err(format!("Voice {} harmonic must be > 0", i));
            }
            if !(0.0..=1.0).contains(&voice.amplitude) {
                return Err(format!(
                    "Voice {} amplitude must be within 0..=1, got {}",
                    i, voice.amplitude
                ));
            }
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Output safety limiter (absolute sample value)
    pub const OUTPUT_LIMIT: f32 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chord() {
        let params = DroneParams::default();

        assert_eq!(params.voices.len(), 3);
        let frequencies: Vec<f32> = params
            .voices
            .iter()
            .map(|voice| params.voice_frequency_hz(voice))
            .collect();
        assert!((frequencies[0] - 136.1).abs() < 1e-3);
        assert!((frequencies[1] - 272.2).abs() < 1e-3);
        assert!((frequencies[2] - 408.3).abs() < 1e-3);
    }

    #[test]
    fn test_lfo_rates_stay_sub_audible() {
        let params = DroneParams::default();

        assert!((params.lfo_rate_hz(0) - 0.5).abs() < 1e-6);
        assert!((params.lfo_rate_hz(2) - 0.9).abs() < 1e-6);
        for i in 0..params.voices.len() {
            assert!(params.lfo_rate_hz(i) < 1.0);
        }
    }

    #[test]
    fn test_validate() {
        assert!(DroneParams::default().validate().is_ok());

        let mut params = DroneParams::default();
        params.master_gain = 1.5;
        assert!(params.validate().is_err());

        let mut params = DroneParams::default();
        params.base_frequency_hz = 0.0;
        assert!(params.validate().is_err());

        let mut params = DroneParams::default();
        params.voices[1].amplitude = -0.1;
        assert!(params.validate().is_err());
    }
}
