pub mod drop_zone;
pub mod loader;
pub mod session;
pub mod viewer;
pub mod worker;

use std::{path::PathBuf, sync::Arc};

use eframe::{
    egui::{self, Color32},
    App, Frame,
};
use tracing::info;

use crate::{isolate::BackgroundRemover, ui::apply_theme};

use self::{
    drop_zone::ImageRequest,
    session::{Phase, Session},
    viewer::ResultViewer,
    worker::WorkerHandle,
};

pub struct CutoutApp {
    pub session: Session,
    pub processor: Arc<dyn BackgroundRemover>,
    pub output_dir: PathBuf,
    pub worker: Option<WorkerHandle>,
    pub viewers: Vec<ResultViewer>,
    pub next_viewer_serial: u64,
}

impl CutoutApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        processor: Arc<dyn BackgroundRemover>,
        output_dir: PathBuf,
    ) -> Self {
        apply_theme(&cc.egui_ctx);
        Self {
            session: Session::new(),
            processor,
            output_dir,
            worker: None,
            viewers: Vec::new(),
            next_viewer_serial: 0,
        }
    }

    fn start_processing(&mut self, ctx: &egui::Context, request: ImageRequest) {
        if !self.session.begin(&request) {
            return;
        }
        info!(path = %request.path.display(), "processing started");
        let repaint_ctx = ctx.clone();
        self.worker = Some(WorkerHandle::spawn(
            request,
            Arc::clone(&self.processor),
            self.output_dir.clone(),
            move || repaint_ctx.request_repaint(),
        ));
    }

    fn drain_worker(&mut self) {
        let Some(worker) = self.worker.as_mut() else {
            return;
        };
        for event in worker.poll() {
            self.session.handle(event);
        }
        if worker.is_finished() {
            self.worker = None;
        }
    }

    fn show_result(&mut self, ctx: &egui::Context, path: PathBuf) {
        let serial = self.next_viewer_serial;
        self.next_viewer_serial += 1;
        self.viewers.push(ResultViewer::new(ctx, serial, path));
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        match self.session.phase.clone() {
            Phase::Confirming(path) => {
                let mut answer = None;
                let modal = egui::Modal::new(egui::Id::new("cutout-success")).show(ctx, |ui| {
                    ui.heading("Success");
                    ui.label("Background removed successfully!");
                    ui.label("Click OK to view the result in a new window.");
                    ui.weak(path.display().to_string());
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        answer = Some(true);
                    }
                });
                if answer.is_none() && modal.should_close() {
                    answer = Some(false);
                }
                if let Some(accepted) = answer {
                    if let Some(path) = self.session.confirm(accepted) {
                        self.show_result(ctx, path);
                    }
                }
            }
            Phase::Reporting(message) => {
                let mut dismissed = false;
                let modal = egui::Modal::new(egui::Id::new("cutout-error")).show(ctx, |ui| {
                    ui.heading("Error");
                    ui.colored_label(Color32::from_rgb(0xBF, 0x61, 0x6A), message.as_str());
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
                if dismissed || modal.should_close() {
                    self.session.dismiss_error();
                }
            }
            Phase::Idle | Phase::Processing => {}
        }
    }
}

impl App for CutoutApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        let _ = frame;

        self.drain_worker();

        let mut dropped = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(20.0))
            .show(ctx, |ui| {
                let status_height = 30.0;
                let available = ui.available_rect_before_wrap();
                let drop_rect = egui::Rect::from_min_max(
                    available.min,
                    egui::pos2(available.max.x, available.max.y - status_height),
                );
                let status_rect = egui::Rect::from_min_max(
                    egui::pos2(available.min.x, available.max.y - status_height),
                    available.max,
                );

                dropped = self.session.drop_zone.show(ui, drop_rect);

                ui.painter_at(status_rect).text(
                    status_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    &self.session.status,
                    egui::FontId::proportional(13.0),
                    ui.visuals().text_color(),
                );
            });

        if let Some(request) = dropped {
            if self.session.is_idle() {
                self.start_processing(ctx, request);
            }
        }

        self.show_dialogs(ctx);

        for viewer in &mut self.viewers {
            viewer.show(ctx);
        }
        self.viewers.retain(|viewer| viewer.open);
    }
}
