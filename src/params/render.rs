//! Window, palette, and animation timing configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Radius of the main circle at scale 1.0 (pixels)
    pub circle_radius_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            circle_radius_px: 104.0,
        }
    }
}

/// Linear RGBA colour
pub type Rgba = [f32; 4];

/// Convert an sRGB hex triple plus alpha into linear RGBA
pub fn hex(rgb: u32, alpha: f32) -> Rgba {
    [
        srgb_to_linear(((rgb >> 16) & 0xff) as f32 / 255.0),
        srgb_to_linear(((rgb >> 8) & 0xff) as f32 / 255.0),
        srgb_to_linear((rgb & 0xff) as f32 / 255.0),
        alpha,
    ]
}

// Gamma 2.2 approximation, good enough for a palette
fn srgb_to_linear(c: f32) -> f32 {
    c * c * (0.2 + 0.8 * c)
}

/// Scene palette
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Rgba,
    pub gold: Rgba,
    pub saffron: Rgba,
    pub maroon: Rgba,
    pub ember: Rgba,
    pub cream: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: hex(0x0A0506, 1.0),
            gold: hex(0xC9A227, 1.0),
            saffron: hex(0xE07C24, 1.0),
            maroon: hex(0x4A0E0E, 1.0),
            ember: hex(0x1A0808, 1.0),
            cream: hex(0xFFF8E7, 1.0),
        }
    }
}

/// Animation timings (seconds unless noted)
#[derive(Debug, Clone)]
pub struct AnimationTimings {
    /// Dashed ring revolution while playing
    pub dashed_ring_period_s: f32,

    /// Dotted ring revolution while playing (counter-rotating)
    pub dotted_ring_period_s: f32,

    /// Main circle breathing cycle while playing
    pub pulse_period_s: f32,

    /// Outer glow fade in/out
    pub glow_transition_s: f32,

    /// Main circle scale and colour change
    pub circle_transition_s: f32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            dashed_ring_period_s: 30.0,
            dotted_ring_period_s: 20.0,
            pulse_period_s: 3.0,
            glow_transition_s: 1.0,
            circle_transition_s: 0.5,
        }
    }
}
