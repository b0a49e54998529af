#![allow(dead_code)]

use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use cutout::isolate::{BackgroundRemover, ProcessingFailure};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("failed to encode png");
    bytes
}

/// Stand-in for the isolated processor with a canned answer.
pub struct FakeRemover {
    pub answer: Result<Vec<u8>, ProcessingFailure>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeRemover {
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            answer: Ok(bytes),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str, trace: &str) -> Self {
        Self {
            answer: Err(ProcessingFailure::new(message, trace)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl BackgroundRemover for FakeRemover {
    fn remove_background(&self, _image: &[u8]) -> Result<Vec<u8>, ProcessingFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub struct PanickingRemover;

impl BackgroundRemover for PanickingRemover {
    fn remove_background(&self, _image: &[u8]) -> Result<Vec<u8>, ProcessingFailure> {
        panic!("native code blew up");
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}
