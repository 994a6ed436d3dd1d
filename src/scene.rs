//! Presentation state: turns "is playing", hover, particles, and time into
//! circles and rings for the renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::f32::consts::TAU;

use crate::params::{AnimationTimings, Palette, RenderConfig, Rgba};
use crate::particles::ParticleField;

/// Accessible label of the toggle
pub fn toggle_label(playing: bool) -> &'static str {
    if playing {
        "Stop Gayatri Mantra"
    } else {
        "Play Gayatri Mantra"
    }
}

/// Status line under the circle
pub fn status_label(playing: bool) -> &'static str {
    if playing {
        "Chanting..."
    } else {
        "Tap to Begin"
    }
}

/// Window title carrying both labels
pub fn window_title(playing: bool) -> String {
    format!("{} · {}", toggle_label(playing), status_label(playing))
}

/// One instanced shape: a filled disc (`thickness == 0`) or a ring
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// Centre (pixels, origin top-left)
    pub center: [f32; 2],
    /// Disc radius or ring centre-line radius (pixels)
    pub radius: f32,
    /// Ring stroke width (pixels), 0 for discs
    pub thickness: f32,
    /// Rim colour (discs) or stroke colour (rings)
    pub color: Rgba,
    /// Gradient centre colour (discs)
    pub core_color: Rgba,
    /// Gradient centre offset in radii
    pub highlight: [f32; 2],
    /// Edge feather (pixels); large values give a glow
    pub softness: f32,
    /// Dash count around a ring, 0 for solid
    pub dashes: f32,
    /// Dash pattern rotation (radians)
    pub rotation: f32,
}

impl ShapeInstance {
    fn disc(center: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            center: center.to_array(),
            radius,
            thickness: 0.0,
            color,
            core_color: color,
            highlight: [0.0, 0.0],
            softness: 1.0,
            dashes: 0.0,
            rotation: 0.0,
        }
    }

    fn glow(center: Vec2, radius: f32, core: Rgba) -> Self {
        Self {
            core_color: core,
            color: with_alpha(core, 0.0),
            softness: radius,
            ..Self::disc(center, radius, core)
        }
    }

    fn ring(center: Vec2, radius: f32, color: Rgba, dashes: f32, rotation: f32) -> Self {
        Self {
            thickness: 1.0,
            dashes,
            rotation,
            ..Self::disc(center, radius, color)
        }
    }
}

/// Eased value heading towards a target
#[derive(Debug, Clone, Copy)]
struct Transition {
    from: f32,
    to: f32,
    start_s: f32,
    duration_s: f32,
}

impl Transition {
    fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start_s: 0.0,
            duration_s: 0.0,
        }
    }

    fn value(&self, now_s: f32) -> f32 {
        if self.duration_s <= 0.0 {
            return self.to;
        }
        let u = ((now_s - self.start_s) / self.duration_s).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - u) * (1.0 - u);
        self.from + (self.to - self.from) * eased
    }

    fn retarget(&mut self, to: f32, now_s: f32, duration_s: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value(now_s);
        self.to = to;
        self.start_s = now_s;
        self.duration_s = duration_s;
    }
}

// Sizes relative to the main circle radius
const GLOW_RADIUS: f32 = 1.54;
const DASHED_RING_RADIUS: f32 = 1.385;
const DOTTED_RING_RADIUS: f32 = 1.23;
const INNER_RING_INSET_PX: f32 = 24.0;
const STATUS_DOT_OFFSET: f32 = 2.4;

/// Presentation state driven by the playback flag
pub struct Scene {
    config: RenderConfig,
    palette: Palette,
    timings: AnimationTimings,
    playing: bool,
    /// When playback last started (seconds)
    play_started_s: f32,
    glow: Transition,
    circle: Transition,
    hover: Transition,
}

impl Scene {
    pub fn new(config: RenderConfig, palette: Palette, timings: AnimationTimings) -> Self {
        Self {
            config,
            palette,
            timings,
            playing: false,
            play_started_s: 0.0,
            glow: Transition::settled(0.0),
            circle: Transition::settled(0.0),
            hover: Transition::settled(0.0),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_playing(&mut self, playing: bool, now_s: f32) {
        if playing && !self.playing {
            self.play_started_s = now_s;
        }
        self.playing = playing;

        let target = if playing { 1.0 } else { 0.0 };
        self.glow
            .retarget(target, now_s, self.timings.glow_transition_s);
        self.circle
            .retarget(target, now_s, self.timings.circle_transition_s);
    }

    pub fn set_hovered(&mut self, hovered: bool, now_s: f32) {
        let target = if hovered { 1.0 } else { 0.0 };
        self.hover
            .retarget(target, now_s, self.timings.circle_transition_s);
    }

    /// Main circle scale: 1.05 on hover, breathing 1.10-1.15 while playing
    pub fn circle_scale(&self, now_s: f32) -> f32 {
        let play = self.circle.value(now_s);
        let resting = 1.0 + 0.05 * self.hover.value(now_s);

        let pulse = if self.playing {
            let phase = (now_s - self.play_started_s) / self.timings.pulse_period_s;
            0.5 - 0.5 * (TAU * phase).cos()
        } else {
            0.0
        };
        let playing = 1.1 + 0.05 * pulse;

        resting + (playing - resting) * play
    }

    /// Ring angle for a ring revolving every `period_s` (zero while stopped)
    pub fn ring_rotation(&self, period_s: f32, now_s: f32) -> f32 {
        if !self.playing {
            return 0.0;
        }
        ((now_s - self.play_started_s) / period_s).fract() * TAU
    }

    /// Whether `cursor` (pixels) is inside the main circle
    pub fn hit_test(&self, cursor: Vec2, window: Vec2, now_s: f32) -> bool {
        let radius = self.config.circle_radius_px * self.circle_scale(now_s);
        cursor.distance(window * 0.5) <= radius
    }

    /// Shapes to draw this frame, back to front
    pub fn instances(
        &self,
        particles: &ParticleField,
        window: Vec2,
        now_s: f32,
    ) -> Vec<ShapeInstance> {
        let p = &self.palette;
        let center = window * 0.5;
        let base = self.config.circle_radius_px;
        let extent = window.max_element();
        let play = self.circle.value(now_s);
        let glow = self.glow.value(now_s);
        let scale = self.circle_scale(now_s);

        let mut shapes = Vec::with_capacity(particles.particles().len() + 12);

        // Background nebula
        shapes.push(ShapeInstance::glow(
            window * Vec2::new(0.5, 0.3),
            extent * 0.5,
            with_alpha(p.saffron, 0.15 * 0.6),
        ));
        shapes.push(ShapeInstance::glow(
            window * Vec2::new(0.2, 0.8),
            extent * 0.4,
            with_alpha(p.maroon, 0.3 * 0.6),
        ));
        shapes.push(ShapeInstance::glow(
            window * Vec2::new(0.8, 0.7),
            extent * 0.4,
            with_alpha(p.gold, 0.1 * 0.6),
        ));

        for particle in particles.particles() {
            let pose = particle.pose(now_s, particles.params());
            let position = window * Vec2::new(particle.x, particle.y) / 100.0 + pose.offset_px;
            shapes.push(ShapeInstance::disc(
                position,
                particles.params().radius_px,
                with_alpha(p.gold, pose.opacity),
            ));
        }

        // Outer glow swells while playing
        shapes.push(ShapeInstance::glow(
            center,
            base * GLOW_RADIUS * (1.0 + 0.5 * glow),
            with_alpha(p.saffron, 0.3 * 0.2 * glow),
        ));

        shapes.push(ShapeInstance::ring(
            center,
            base * DASHED_RING_RADIUS,
            with_alpha(p.gold, 0.2),
            48.0,
            self.ring_rotation(self.timings.dashed_ring_period_s, now_s),
        ));
        shapes.push(ShapeInstance::ring(
            center,
            base * DOTTED_RING_RADIUS,
            with_alpha(p.saffron, 0.15),
            120.0,
            -self.ring_rotation(self.timings.dotted_ring_period_s, now_s),
        ));

        // Shadow halo behind the circle
        let radius = base * scale;
        let halo_px = 30.0 + 30.0 * play;
        shapes.push(ShapeInstance::glow(
            center,
            radius + halo_px,
            mix(with_alpha(p.maroon, 0.5), with_alpha(p.saffron, 0.6), play),
        ));

        shapes.push(ShapeInstance {
            core_color: mix(p.maroon, p.saffron, play),
            color: mix(p.ember, p.maroon, play),
            highlight: [-0.4, -0.4],
            softness: 1.5,
            ..ShapeInstance::disc(center, radius, p.ember)
        });

        shapes.push(ShapeInstance::ring(
            center,
            radius - INNER_RING_INSET_PX * scale,
            mix(with_alpha(p.gold, 0.2), with_alpha(p.cream, 0.4), play),
            0.0,
            0.0,
        ));

        // Status indicator
        let blink = if self.playing {
            0.75 + 0.25 * (TAU * now_s).cos()
        } else {
            1.0
        };
        shapes.push(ShapeInstance::disc(
            center + Vec2::new(0.0, base * STATUS_DOT_OFFSET),
            4.0,
            with_alpha(mix(p.maroon, p.saffron, play), blink),
        ));

        shapes
    }
}

fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

fn mix(a: Rgba, b: Rgba, t: f32) -> Rgba {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParticleParams;

    const WINDOW: Vec2 = Vec2::new(1280.0, 720.0);

    fn scene() -> Scene {
        Scene::new(
            RenderConfig::default(),
            Palette::default(),
            AnimationTimings::default(),
        )
    }

    #[test]
    fn test_labels() {
        assert_eq!(toggle_label(false), "Play Gayatri Mantra");
        assert_eq!(toggle_label(true), "Stop Gayatri Mantra");
        assert!(window_title(true).contains("Chanting..."));
        assert!(window_title(false).contains("Tap to Begin"));
    }

    #[test]
    fn test_hit_test_follows_scale() {
        let mut scene = scene();
        let center = WINDOW * 0.5;
        let radius = RenderConfig::default().circle_radius_px;

        assert!(scene.hit_test(center, WINDOW, 0.0));
        assert!(!scene.hit_test(center + Vec2::new(radius * 1.08, 0.0), WINDOW, 0.0));

        // Once the grow transition settles the circle is at least 10% larger
        scene.set_playing(true, 0.0);
        assert!(scene.hit_test(center + Vec2::new(radius * 1.08, 0.0), WINDOW, 5.0));
    }

    #[test]
    fn test_hover_grows_circle() {
        let mut scene = scene();
        assert!((scene.circle_scale(0.0) - 1.0).abs() < 1e-6);

        scene.set_hovered(true, 0.0);
        assert!((scene.circle_scale(1.0) - 1.05).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_range_while_playing() {
        let mut scene = scene();
        scene.set_playing(true, 0.0);

        for step in 0..60 {
            let scale = scene.circle_scale(1.0 + step as f32 * 0.1);
            assert!((1.1 - 1e-4..=1.15 + 1e-4).contains(&scale), "scale {}", scale);
        }
    }

    #[test]
    fn test_rings_still_while_stopped() {
        let mut scene = scene();
        assert_eq!(scene.ring_rotation(30.0, 12.0), 0.0);

        scene.set_playing(true, 10.0);
        assert!((scene.ring_rotation(30.0, 17.5) - TAU / 4.0).abs() < 1e-4);

        scene.set_playing(false, 20.0);
        assert_eq!(scene.ring_rotation(30.0, 25.0), 0.0);
    }

    #[test]
    fn test_transition_eases_to_target() {
        let mut transition = Transition::settled(0.0);
        transition.retarget(1.0, 2.0, 1.0);

        assert_eq!(transition.value(2.0), 0.0);
        assert!(transition.value(2.5) > 0.5);
        assert_eq!(transition.value(3.0), 1.0);

        // Reversing mid-flight starts from the current value
        transition.retarget(0.0, 2.5, 1.0);
        assert!(transition.value(2.5) > 0.5);
        assert_eq!(transition.value(4.0), 0.0);
    }

    #[test]
    fn test_instances_cover_particles() {
        let scene = scene();
        let mut field = ParticleField::new(ParticleParams::default(), Some(3));
        let before = scene.instances(&field, WINDOW, 0.0).len();

        field.burst(0.0);
        let after = scene.instances(&field, WINDOW, 0.0).len();

        assert_eq!(after - before, 12);
        assert_eq!(before, 30 + 10);
    }
}
