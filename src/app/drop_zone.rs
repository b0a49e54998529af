use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, Stroke};

use crate::{
    fs_utils::is_supported_image,
    ui::{DROP_AREA_BORDER, DROP_AREA_FILL, DROP_AREA_HOVER, DROP_AREA_TEXT},
};

pub const PROMPT: &str = "👇\n\nDrop an image file here\n(.jpg, .png, .webp)";
pub const BUSY_PROMPT: &str = "Processing...";

/// A validated input path, produced by an accepted drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub path: PathBuf,
}

/// Accepts exactly one local file with a supported extension. Everything
/// else is ignored without feedback.
pub fn accept_paths<'a, I>(candidates: I) -> Option<ImageRequest>
where
    I: IntoIterator<Item = Option<&'a Path>>,
{
    let mut iter = candidates.into_iter();
    let only = iter.next()??;
    if iter.next().is_some() || !is_supported_image(only) {
        return None;
    }
    Some(ImageRequest {
        path: only.to_path_buf(),
    })
}

pub struct DropZone {
    pub enabled: bool,
    pub prompt: String,
}

impl Default for DropZone {
    fn default() -> Self {
        Self::new()
    }
}

impl DropZone {
    pub fn new() -> Self {
        Self {
            enabled: true,
            prompt: PROMPT.to_string(),
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.prompt = BUSY_PROMPT.to_string();
    }

    pub fn reset(&mut self) {
        self.enabled = true;
        self.prompt = PROMPT.to_string();
    }

    /// Files without a local path (e.g. web drops) carry `path: None`.
    pub fn accept(&self, dropped: &[egui::DroppedFile]) -> Option<ImageRequest> {
        if !self.enabled {
            return None;
        }
        accept_paths(dropped.iter().map(|file| file.path.as_deref()))
    }

    pub fn would_accept(&self, hovered: &[egui::HoveredFile]) -> bool {
        self.enabled && accept_paths(hovered.iter().map(|file| file.path.as_deref())).is_some()
    }

    /// Draws the zone into `rect` and returns an accepted drop, if any.
    pub fn show(&self, ui: &mut egui::Ui, rect: egui::Rect) -> Option<ImageRequest> {
        let (hovered, dropped) = ui.ctx().input(|input| {
            (input.raw.hovered_files.clone(), input.raw.dropped_files.clone())
        });
        let highlight = self.would_accept(&hovered);

        let painter = ui.painter_at(rect);
        let fill = if self.enabled {
            DROP_AREA_FILL
        } else {
            DROP_AREA_FILL.gamma_multiply(0.6)
        };
        let border = if highlight { DROP_AREA_HOVER } else { DROP_AREA_BORDER };
        painter.rect_filled(rect, 15.0, fill);
        painter.rect_stroke(rect, 15.0, Stroke::new(2.0, border), egui::StrokeKind::Inside);

        let text_color = if self.enabled {
            DROP_AREA_TEXT
        } else {
            Color32::from_gray(140)
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &self.prompt,
            egui::FontId::proportional(22.0),
            text_color,
        );

        self.accept(&dropped)
    }
}
