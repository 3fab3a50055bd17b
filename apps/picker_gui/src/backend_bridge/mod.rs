//! Bridge between the egui thread and the tokio worker running the draw.

pub mod commands;
pub mod runtime;
