//! Mantra library - tap-to-play ambient drone with decorative particles

pub mod audio;
pub mod cli;
pub mod logging;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod scene;
