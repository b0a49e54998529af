use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32};

use crate::ui::{ImageMetrics, RESULT_BACKGROUND};

use super::loader::{LoadState, Loader};

pub const LOADING_TEXT: &str = "Loading image...";
pub const DECODE_FAILED_TEXT: &str = "Unable to load the result image.";

enum Content {
    Loading(Loader),
    Texture {
        texture: egui::TextureHandle,
        image_size: egui::Vec2,
    },
    Placeholder(String),
}

/// An independent window showing one result image, fitted to the window and
/// refitted on every resize.
pub struct ResultViewer {
    pub viewport_id: egui::ViewportId,
    pub path: PathBuf,
    pub open: bool,
    content: Content,
}

impl ResultViewer {
    pub fn new(ctx: &egui::Context, serial: u64, path: PathBuf) -> Self {
        let repaint_ctx = ctx.clone();
        let loader = Loader::spawn(path.clone(), move || repaint_ctx.request_repaint());
        Self {
            viewport_id: egui::ViewportId::from_hash_of(("cutout-result", serial)),
            path,
            open: true,
            content: Content::Loading(loader),
        }
    }

    pub fn title(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("Result - {name}")
    }

    fn update_content(&mut self, ctx: &egui::Context) {
        let Content::Loading(loader) = &mut self.content else {
            return;
        };
        match loader.poll() {
            LoadState::Loading => {}
            LoadState::Ready(loaded) => {
                let texture = ctx.load_texture(
                    format!("cutout-result-{}", self.path.display()),
                    loaded.color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.content = Content::Texture {
                    texture,
                    image_size: egui::vec2(loaded.size[0] as f32, loaded.size[1] as f32),
                };
            }
            LoadState::Failed(_) => {
                self.content = Content::Placeholder(DECODE_FAILED_TEXT.to_string());
            }
        }
    }

    /// Id of the in-window fallback used when the backend embeds viewports.
    pub fn window_id(&self) -> egui::Id {
        egui::Id::new(self.viewport_id)
    }

    /// Shows the window for this frame. Must be called every frame while open.
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }
        self.update_content(ctx);

        let title = Self::title(&self.path);
        let window_id = self.window_id();
        let builder = egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([600.0, 600.0])
            .with_min_inner_size([400.0, 400.0]);

        ctx.show_viewport_immediate(self.viewport_id, builder, |ctx, class| {
            if class == egui::ViewportClass::Embedded {
                // No native window available: draw inside the main one instead.
                let mut open = true;
                egui::Window::new(title.as_str())
                    .id(window_id)
                    .open(&mut open)
                    .default_size([400.0, 400.0])
                    .frame(egui::Frame::window(&ctx.style()).fill(RESULT_BACKGROUND))
                    .show(ctx, |ui| paint_content(ui, &self.content));
                if !open {
                    self.open = false;
                }
                return;
            }

            egui::CentralPanel::default()
                .frame(egui::Frame::new().fill(RESULT_BACKGROUND))
                .show(ctx, |ui| paint_content(ui, &self.content));

            if ctx.input(|input| input.viewport().close_requested()) {
                self.open = false;
            }
        });
    }
}

fn paint_content(ui: &mut egui::Ui, content: &Content) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let text = match content {
        Content::Texture {
            texture,
            image_size,
        } => {
            let metrics = ImageMetrics::new(rect, *image_size);
            painter.image(
                texture.id(),
                metrics.image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
            return;
        }
        Content::Loading(_) => LOADING_TEXT,
        Content::Placeholder(text) => text.as_str(),
    };
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(18.0),
        Color32::WHITE,
    );
}
