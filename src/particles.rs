//! Decorative floating particles.
//!
//! Purely cosmetic: a random scatter at startup plus a burst around the
//! centre each time playback starts. Particles are never removed.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::ParticleParams;

/// Float keyframes: (cycle fraction, offset in pixels with y down, opacity)
const FLOAT_KEYFRAMES: [(f32, [f32; 2], f32); 5] = [
    (0.0, [0.0, 0.0], 0.4),
    (0.25, [10.0, -20.0], 0.6),
    (0.5, [-5.0, -10.0], 0.3),
    (0.75, [5.0, -30.0], 0.5),
    (1.0, [0.0, 0.0], 0.4),
];

/// One decorative dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorativeParticle {
    /// Unique within its field
    pub id: u64,

    /// Horizontal position (percent of window width, 0..100)
    pub x: f32,

    /// Vertical position (percent of window height, 0..100)
    pub y: f32,

    /// Float animation delay (seconds)
    pub delay_s: f32,

    /// Time the particle was added (seconds since startup)
    pub born_s: f32,
}

/// Sampled float animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPose {
    pub offset_px: Vec2,
    pub opacity: f32,
}

impl FloatPose {
    /// Pose before the animation kicks in
    pub const REST: FloatPose = FloatPose {
        offset_px: Vec2::ZERO,
        opacity: 0.4,
    };
}

impl DecorativeParticle {
    /// Float cycle length (seconds)
    pub fn period_s(&self, params: &ParticleParams) -> f32 {
        params.base_period_s + self.delay_s
    }

    /// Float pose at `now_s`
    pub fn pose(&self, now_s: f32, params: &ParticleParams) -> FloatPose {
        let elapsed = now_s - self.born_s - self.delay_s;
        if elapsed < 0.0 {
            return FloatPose::REST;
        }
        float_pose((elapsed / self.period_s(params)).fract())
    }
}

/// Sample the float keyframes at cycle fraction `t` (0..1), easing in and out
/// of every keyframe
pub fn float_pose(t: f32) -> FloatPose {
    let t = t.clamp(0.0, 1.0);
    let segment = FLOAT_KEYFRAMES
        .windows(2)
        .find(|pair| t <= pair[1].0)
        .unwrap_or(&FLOAT_KEYFRAMES[3..5]);
    let (t0, offset0, opacity0) = segment[0];
    let (t1, offset1, opacity1) = segment[1];

    let u = ease_in_out((t - t0) / (t1 - t0));
    FloatPose {
        offset_px: Vec2::from_array(offset0).lerp(Vec2::from_array(offset1), u),
        opacity: opacity0 + (opacity1 - opacity0) * u,
    }
}

fn ease_in_out(u: f32) -> f32 {
    u * u * (3.0 - 2.0 * u)
}

/// All particles on screen plus the generator that adds more
pub struct ParticleField {
    particles: Vec<DecorativeParticle>,
    next_id: u64,
    rng: StdRng,
    params: ParticleParams,
}

impl ParticleField {
    /// Scatter `params.initial_count` particles over the window.
    ///
    /// A seed makes the layout reproducible.
    pub fn new(params: ParticleParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            particles: Vec::with_capacity(params.initial_count),
            next_id: 0,
            rng,
            params,
        };

        for _ in 0..field.params.initial_count {
            let particle = DecorativeParticle {
                id: field.take_id(),
                x: field.rng.gen_range(0.0..100.0),
                y: field.rng.gen_range(0.0..100.0),
                delay_s: field.rng.gen_range(0.0..field.params.max_delay_s),
                born_s: 0.0,
            };
            field.particles.push(particle);
        }
        field
    }

    pub fn particles(&self) -> &[DecorativeParticle] {
        &self.particles
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    /// Append a burst around the centre; returns the new particles
    pub fn burst(&mut self, now_s: f32) -> &[DecorativeParticle] {
        let first = self.particles.len();
        let spread = self.params.burst_spread_pct;

        for _ in 0..self.params.burst_count {
            let particle = DecorativeParticle {
                id: self.take_id(),
                x: 50.0 + (self.rng.gen::<f32>() - 0.5) * spread,
                y: 50.0 + (self.rng.gen::<f32>() - 0.5) * spread,
                delay_s: 0.0,
                born_s: now_s,
            };
            self.particles.push(particle);
        }

        &self.particles[first..]
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_initial_scatter() {
        let field = ParticleField::new(ParticleParams::default(), Some(7));

        assert_eq!(field.particles().len(), 30);
        for p in field.particles() {
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..100.0).contains(&p.y));
            assert!((0.0..5.0).contains(&p.delay_s));
            assert_eq!(p.born_s, 0.0);
        }
    }

    #[test]
    fn test_burst_lands_near_centre() {
        let mut field = ParticleField::new(ParticleParams::default(), Some(7));

        let burst = field.burst(12.5).to_vec();

        assert_eq!(burst.len(), 12);
        for p in &burst {
            assert!((40.0..60.0).contains(&p.x));
            assert!((40.0..60.0).contains(&p.y));
            assert_eq!(p.delay_s, 0.0);
            assert_eq!(p.born_s, 12.5);
        }
        assert_eq!(field.particles().len(), 42);
    }

    #[test]
    fn test_ids_unique_across_bursts() {
        let mut field = ParticleField::new(ParticleParams::default(), None);
        field.burst(1.0);
        field.burst(2.0);

        let ids: HashSet<u64> = field.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), field.particles().len());
    }

    #[test]
    fn test_seed_reproduces_layout() {
        let a = ParticleField::new(ParticleParams::default(), Some(99));
        let b = ParticleField::new(ParticleParams::default(), Some(99));
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_float_keyframes() {
        let start = float_pose(0.0);
        assert_eq!(start.offset_px, Vec2::ZERO);
        assert!(close(start.opacity, 0.4));

        let quarter = float_pose(0.25);
        assert!(close(quarter.offset_px.x, 10.0));
        assert!(close(quarter.offset_px.y, -20.0));
        assert!(close(quarter.opacity, 0.6));

        let end = float_pose(1.0);
        assert!(close(end.offset_px.length(), 0.0));
        assert!(close(end.opacity, 0.4));

        // Halfway between 0.25 and 0.5 the easing is symmetric
        let between = float_pose(0.375);
        assert!(close(between.offset_px.x, 2.5));
        assert!(close(between.opacity, 0.45));
    }

    #[test]
    fn test_pose_waits_for_delay() {
        let params = ParticleParams::default();
        let particle = DecorativeParticle {
            id: 0,
            x: 10.0,
            y: 10.0,
            delay_s: 2.0,
            born_s: 1.0,
        };

        assert_eq!(particle.pose(2.5, &params), FloatPose::REST);

        // Period is 8 + 2 = 10 s, so 2.5 s into the cycle is the 25% keyframe
        let pose = particle.pose(1.0 + 2.0 + 2.5, &params);
        assert!(close(pose.offset_px.y, -20.0));

        // And the cycle repeats
        let again = particle.pose(1.0 + 2.0 + 12.5, &params);
        assert!(close(again.offset_px.y, -20.0));
    }
}
