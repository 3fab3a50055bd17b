use std::path::Path;

use anyhow::Context;
use egui::{ColorImage, TextureHandle, TextureOptions};

/// Longest edge of the logo texture; the header shows it at 120 points.
const MAX_DIMENSION: u32 = 240;

pub fn load_logo_image(path: &Path) -> anyhow::Result<ColorImage> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to open logo '{}'", path.display()))?;
    let decoded = if decoded.width().max(decoded.height()) > MAX_DIMENSION {
        decoded.resize(
            MAX_DIMENSION,
            MAX_DIMENSION,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

pub fn load_logo_texture(ctx: &egui::Context, path: &Path) -> anyhow::Result<TextureHandle> {
    let image = load_logo_image(path)?;
    Ok(ctx.load_texture("company-logo", image, TextureOptions::LINEAR))
}
