//! Command-line argument parsing.

use clap::Parser;

use crate::params::{DroneParams, ParticleParams, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Mantra")]
#[command(about = "Tap the sacred circle to start or stop an ambient drone", long_about = None)]
pub struct Args {
    /// Seed for the particle layout (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Particles scattered over the window at startup
    #[arg(long, value_name = "COUNT", default_value = "30")]
    pub particles: usize,

    /// Drone fundamental (Hz)
    #[arg(long, value_name = "HZ", default_value = "136.1")]
    pub base_freq: f32,

    /// Master gain applied to the summed voices (0.0 - 1.0)
    #[arg(long, value_name = "GAIN", default_value = "0.15")]
    pub master_gain: f32,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Print the Glicol patch of the playing drone and exit
    #[arg(long)]
    pub print_patch: bool,
}

impl Args {
    /// Drone parameters with command-line overrides applied
    pub fn drone_params(&self) -> DroneParams {
        DroneParams {
            base_frequency_hz: self.base_freq,
            master_gain: self.master_gain,
            ..DroneParams::default()
        }
    }

    pub fn particle_params(&self) -> ParticleParams {
        ParticleParams {
            initial_count: self.particles,
            ..ParticleParams::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }
}
