//! Decorative particle parameters.

/// Particle field parameters (positions in percent of the window)
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Particles scattered over the window at startup
    pub initial_count: usize,

    /// Particles appended around the centre on each activation
    pub burst_count: usize,

    /// Side of the square around the centre that bursts land in (percent)
    pub burst_spread_pct: f32,

    /// Upper bound of the random float-animation delay (seconds)
    pub max_delay_s: f32,

    /// Float cycle length before the per-particle delay is added (seconds)
    /// Each particle loops every `base_period_s + delay_s`
    pub base_period_s: f32,

    /// Dot radius (pixels)
    pub radius_px: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            initial_count: 30,
            burst_count: 12,
            burst_spread_pct: 20.0,
            max_delay_s: 5.0,
            base_period_s: 8.0,
            radius_px: 2.0,
        }
    }
}
