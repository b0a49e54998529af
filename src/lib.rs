pub mod app;
pub mod engine;
pub mod fs_utils;
pub mod image_utils;
pub mod isolate;
pub mod logging;
pub mod ui;
