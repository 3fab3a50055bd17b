//! Cosmetic name scrambling shown during shuffle stages. Nothing here feeds
//! into the winner draw.

use rand::{seq::SliceRandom, Rng};

pub struct ShuffleAnimation {
    buffer: Vec<String>,
    frames_left: u32,
}

impl ShuffleAnimation {
    pub fn new(names: Vec<String>, frames: u32) -> Self {
        Self {
            buffer: names,
            frames_left: frames,
        }
    }

    /// Reorders the buffer once and returns the new frame, or `None` once all
    /// frames have been produced.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&[String]> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;
        self.buffer.shuffle(rng);
        Some(&self.buffer)
    }
}
