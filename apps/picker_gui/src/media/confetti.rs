//! Confetti particles launched when a winner is revealed.
//!
//! Motion follows the usual browser confetti model: each particle leaves the
//! origin inside the spread cone, slows down by a fixed decay per tick, falls
//! under constant gravity and fades out over a fixed number of ticks.

use egui::{Color32, Painter, Pos2, Rect, Vec2};
use rand::Rng;
use shared::domain::{parse_hex_color, ConfettiBurst};

const START_VELOCITY: f32 = 45.0;
const DECAY: f32 = 0.9;
const GRAVITY: f32 = 3.0;
const TOTAL_TICKS: f32 = 200.0;
const TICKS_PER_SECOND: f32 = 60.0;
const PARTICLE_SIZE: f32 = 7.0;

struct ConfettiParticle {
    pos: Pos2,
    angle: f32,
    velocity: f32,
    wobble: f32,
    wobble_speed: f32,
    tilt: f32,
    color: Color32,
    ticks: f32,
}

impl ConfettiParticle {
    fn opacity(&self) -> f32 {
        (1.0 - self.ticks / TOTAL_TICKS).clamp(0.0, 1.0)
    }
}

#[derive(Default)]
pub struct ConfettiField {
    particles: Vec<ConfettiParticle>,
}

impl ConfettiField {
    pub fn burst<R: Rng + ?Sized>(&mut self, burst: &ConfettiBurst, viewport: Rect, rng: &mut R) {
        let mut palette: Vec<Color32> = burst
            .colors
            .iter()
            .filter_map(|hex| parse_hex_color(hex))
            .map(|[r, g, b]| Color32::from_rgb(r, g, b))
            .collect();
        if palette.is_empty() {
            palette.push(Color32::WHITE);
        }

        let origin = Pos2::new(
            viewport.left() + viewport.width() * burst.origin.x,
            viewport.top() + viewport.height() * burst.origin.y,
        );
        // Straight up, in screen coordinates where y grows downwards.
        let launch = -std::f32::consts::FRAC_PI_2;
        let spread = burst.spread_degrees.to_radians();

        for index in 0..burst.particle_count as usize {
            self.particles.push(ConfettiParticle {
                pos: origin,
                angle: launch + (0.5 * spread - rng.random::<f32>() * spread),
                velocity: START_VELOCITY * 0.5 + rng.random::<f32>() * START_VELOCITY,
                wobble: rng.random::<f32>() * 10.0,
                wobble_speed: 0.05 + rng.random::<f32>() * 0.05,
                tilt: rng.random::<f32>() * std::f32::consts::PI,
                color: palette[index % palette.len()],
                ticks: 0.0,
            });
        }
    }

    /// Advances the simulation by `dt` seconds and drops finished particles.
    pub fn update(&mut self, dt: f32) {
        let ticks = (dt * TICKS_PER_SECOND).clamp(0.0, 4.0);
        for particle in &mut self.particles {
            let step = Vec2::new(particle.angle.cos(), particle.angle.sin()) * particle.velocity;
            particle.pos += (step + Vec2::new(0.0, GRAVITY)) * ticks;
            particle.velocity *= DECAY.powf(ticks);
            particle.wobble += particle.wobble_speed * ticks;
            particle.tilt += 0.1 * ticks;
            particle.ticks += ticks;
        }
        self.particles.retain(|particle| particle.ticks < TOTAL_TICKS);
    }

    pub fn paint(&self, painter: &Painter) {
        for particle in &self.particles {
            let size = PARTICLE_SIZE * (0.6 + 0.4 * particle.wobble.sin().abs());
            let half = Vec2::new(size * particle.tilt.cos().abs().max(0.2), size) * 0.5;
            let rect = Rect::from_center_size(particle.pos, half * 2.0);
            painter.rect_filled(rect, 1.0, particle.color.gamma_multiply(particle.opacity()));
        }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(500.0, 800.0))
    }

    #[test]
    fn burst_spawns_configured_particle_count_at_origin() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(1);
        field.burst(&ConfettiBurst::default(), viewport(), &mut rng);

        assert_eq!(field.len(), 100);
        for particle in &field.particles {
            assert_eq!(particle.pos, Pos2::new(500.0 * 0.5, 800.0 * 0.6));
        }
    }

    #[test]
    fn launch_angles_stay_inside_the_spread_cone() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(2);
        field.burst(&ConfettiBurst::default(), viewport(), &mut rng);

        let half_spread = 35f32.to_radians() + 1e-4;
        for particle in &field.particles {
            let offset = particle.angle + std::f32::consts::FRAC_PI_2;
            assert!(offset.abs() <= half_spread, "angle offset {offset}");
        }
    }

    #[test]
    fn uses_only_palette_colors() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(3);
        field.burst(&ConfettiBurst::default(), viewport(), &mut rng);

        let blue = Color32::from_rgb(0x2d, 0x61, 0xa7);
        let orange = Color32::from_rgb(0xf7, 0x8f, 0x25);
        assert!(field
            .particles
            .iter()
            .all(|particle| particle.color == blue || particle.color == orange));
    }

    #[test]
    fn particles_rise_then_fall_and_expire() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(4);
        field.burst(&ConfettiBurst::default(), viewport(), &mut rng);
        let origin_y = 800.0 * 0.6;

        field.update(1.0 / 60.0);
        let mean_y = |field: &ConfettiField| {
            field.particles.iter().map(|p| p.pos.y).sum::<f32>() / field.len() as f32
        };
        assert!(mean_y(&field) < origin_y);

        for _ in 0..120 {
            field.update(1.0 / 60.0);
        }
        assert!(field.is_active());

        for _ in 0..120 {
            field.update(1.0 / 60.0);
        }
        assert!(!field.is_active());
    }
}
