//! Twinkling sparkles scattered over the winner banner.

use egui::{Color32, Painter, Pos2, Rect, Stroke};
use rand::Rng;

pub const SPARKLE_COUNT: usize = 50;
const PERIOD_SECS: f32 = 1.0;
const MAX_DELAY_SECS: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    /// Position inside the banner, as fractions of its width and height.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub delay: f32,
    pub color: Color32,
}

impl Sparkle {
    /// Scale at `elapsed` seconds after the banner appeared: 0 until the
    /// delay passes, then 0 -> 1 -> 0 once per period.
    pub fn scale_at(&self, elapsed: f32) -> f32 {
        if elapsed < self.delay {
            return 0.0;
        }
        let phase = ((elapsed - self.delay) % PERIOD_SECS) / PERIOD_SECS;
        1.0 - (2.0 * phase - 1.0).abs()
    }
}

pub struct SparkleField {
    sparkles: Vec<Sparkle>,
}

impl SparkleField {
    pub fn scatter<R: Rng + ?Sized>(palette: [Color32; 2], rng: &mut R) -> Self {
        let sparkles = (0..SPARKLE_COUNT)
            .map(|_| Sparkle {
                x: rng.random::<f32>(),
                y: rng.random::<f32>(),
                size: 5.0 + rng.random::<f32>() * 10.0,
                delay: rng.random::<f32>() * MAX_DELAY_SECS,
                color: if rng.random_bool(0.5) {
                    palette[0]
                } else {
                    palette[1]
                },
            })
            .collect();
        Self { sparkles }
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    /// Draws each sparkle as a four-pointed star clipped to `rect`.
    pub fn paint(&self, painter: &Painter, rect: Rect, elapsed: f32) {
        let painter = painter.with_clip_rect(rect);
        for sparkle in &self.sparkles {
            let radius = 0.5 * sparkle.size * sparkle.scale_at(elapsed);
            if radius < 0.5 {
                continue;
            }
            let center = Pos2::new(
                rect.left() + rect.width() * sparkle.x,
                rect.top() + rect.height() * sparkle.y,
            );
            let stroke = Stroke::new(1.5, sparkle.color);
            painter.line_segment(
                [center - egui::vec2(radius, 0.0), center + egui::vec2(radius, 0.0)],
                stroke,
            );
            painter.line_segment(
                [center - egui::vec2(0.0, radius), center + egui::vec2(0.0, radius)],
                stroke,
            );
            painter.circle_filled(center, radius * 0.25, Color32::WHITE);
        }
    }
}
