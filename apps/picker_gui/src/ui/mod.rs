//! UI layer: the picker window and its brand theme.

pub mod app;
pub mod theme;

pub use app::PickerApp;
