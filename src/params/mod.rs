//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, seconds, pixels, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod particles;
mod render;

// Re-export all types
pub use audio::{audio_constants, DroneParams, VoiceParams};
pub use particles::ParticleParams;
pub use render::{hex, AnimationTimings, Palette, RenderConfig, Rgba};
