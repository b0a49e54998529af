use cutout::ui::*;
use eframe::egui::{self, Rect, Vec2};

#[test]
fn image_metrics_center_image_and_compute_scale() {
    let canvas = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(200.0, 100.0));
    let metrics = ImageMetrics::new(canvas, Vec2::new(50.0, 50.0));
    assert!(metrics.scale > 0.0);
    assert_eq!(metrics.image_size, Vec2::new(50.0, 50.0));
    assert!((metrics.image_rect.center() - canvas.center()).length_sq() < 1.0);
}

#[test]
fn image_metrics_follow_canvas_resize() {
    let image = Vec2::new(500.0, 500.0);
    let small = ImageMetrics::new(Rect::from_min_size(egui::Pos2::ZERO, Vec2::new(400.0, 300.0)), image);
    let large = ImageMetrics::new(Rect::from_min_size(egui::Pos2::ZERO, Vec2::new(800.0, 900.0)), image);
    assert!((small.image_rect.size() - Vec2::new(300.0, 300.0)).length() < 0.01);
    assert!((large.image_rect.size() - Vec2::new(800.0, 800.0)).length() < 0.01);
}

#[test]
fn fit_within_respects_available_bounds() {
    let (display, scale) = fit_within(Vec2::new(400.0, 100.0), Vec2::new(200.0, 200.0));
    assert_eq!(display.x, 200.0);
    assert!(display.y <= 200.0);
    assert_eq!(scale, 0.5);
}

#[test]
fn fit_within_keeps_aspect_ratio() {
    let (display, _) = fit_within(Vec2::new(300.0, 200.0), Vec2::new(600.0, 1000.0));
    assert!((display.x / display.y - 1.5).abs() < 1e-4);
}
