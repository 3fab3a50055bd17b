use egui::Color32;

pub const BRAND_BLUE: Color32 = Color32::from_rgb(0x2d, 0x61, 0xa7);
pub const BRAND_ORANGE: Color32 = Color32::from_rgb(0xf7, 0x8f, 0x25);
pub const ORANGE_HOVER: Color32 = Color32::from_rgb(0xe6, 0x7d, 0x14);
pub const STAGE_CARD_FILL: Color32 = Color32::from_rgb(0xe6, 0xf0, 0xff);
pub const PROGRESS_TRACK: Color32 = Color32::from_rgb(0xb3, 0xd1, 0xff);
pub const PAGE_BACKGROUND: Color32 = Color32::from_rgb(0xf3, 0xf4, 0xf6);
pub const CARD_BACKGROUND: Color32 = Color32::WHITE;
pub const MUTED_TEXT: Color32 = Color32::from_rgb(0x4b, 0x55, 0x63);
pub const ERROR_FILL: Color32 = Color32::from_rgb(0xfd, 0xe8, 0xe8);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(0xc8, 0x4b, 0x4b);

pub fn picker_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = PAGE_BACKGROUND;
    visuals.window_fill = CARD_BACKGROUND;
    visuals.extreme_bg_color = CARD_BACKGROUND;
    visuals.hyperlink_color = BRAND_BLUE;
    visuals.selection.bg_fill = BRAND_BLUE.gamma_multiply(0.35);
    visuals.selection.stroke = egui::Stroke::new(1.0, BRAND_BLUE);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, BRAND_BLUE);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.5, BRAND_BLUE);
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
    visuals
}

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals = picker_visuals();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    ctx.set_style(style);
}
