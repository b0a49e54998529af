use eframe::egui::{self, Color32, Rect, Vec2};

pub const WINDOW_BACKGROUND: Color32 = Color32::from_rgb(0x2E, 0x34, 0x40);
pub const TEXT_COLOR: Color32 = Color32::from_rgb(0xEC, 0xEF, 0xF4);
pub const DROP_AREA_FILL: Color32 = Color32::from_rgb(0x3B, 0x42, 0x52);
pub const DROP_AREA_BORDER: Color32 = Color32::from_rgb(0x4C, 0x56, 0x6A);
pub const DROP_AREA_HOVER: Color32 = Color32::from_rgb(0x88, 0xC0, 0xD0);
pub const DROP_AREA_TEXT: Color32 = Color32::from_rgb(0xD8, 0xDE, 0xE9);
/// Neutral grey behind result images so transparent regions stay visible.
pub const RESULT_BACKGROUND: Color32 = Color32::from_rgb(0x50, 0x50, 0x50);

/// Where an image of `image_size` lands when fitted and centered in `canvas`.
pub struct ImageMetrics {
    pub image_rect: Rect,
    pub image_size: Vec2,
    pub scale: f32,
}

impl ImageMetrics {
    pub fn new(canvas: Rect, image_size: Vec2) -> Self {
        let (display, scale) = fit_within(image_size, canvas.size());
        let offset = (canvas.size() - display) * 0.5;
        let image_rect = Rect::from_min_size(canvas.min + offset, display);
        Self {
            image_rect,
            image_size,
            scale,
        }
    }
}

pub fn fit_within(image_size: Vec2, available: Vec2) -> (Vec2, f32) {
    let safe_size = egui::vec2(image_size.x.max(1.0), image_size.y.max(1.0));
    let scale = (available.x / safe_size.x)
        .min(available.y / safe_size.y)
        .max(0.01);
    (safe_size * scale, scale)
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = WINDOW_BACKGROUND;
    visuals.window_fill = WINDOW_BACKGROUND;
    visuals.override_text_color = Some(TEXT_COLOR);
    ctx.set_visuals(visuals);
}
