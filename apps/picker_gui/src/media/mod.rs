//! Effects layer: confetti, sparkles, the logo texture and optional audio.

#[cfg(feature = "audio")]
pub mod audio;
pub mod confetti;
pub mod logo;
pub mod sparkles;
