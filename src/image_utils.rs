use std::path::PathBuf;

use anyhow::{anyhow, Result};
use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::DynamicImage;

/// Longest edge of a result texture. Larger images are downscaled before upload.
pub const MAX_TEXTURE_EDGE: u32 = 4096;

pub struct LoadedImage {
    pub path: PathBuf,
    /// Dimensions of the decoded file, before any downscaling.
    pub size: [u32; 2],
    pub color_image: egui::ColorImage,
}

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

/// Target size that fits within `max_edge` on both axes, keeping the aspect ratio.
pub fn bounded_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }
    let ratio = width as f64 / height.max(1) as f64;
    if width >= height {
        (max_edge, ((max_edge as f64 / ratio) as u32).max(1))
    } else {
        (((max_edge as f64 * ratio) as u32).max(1), max_edge)
    }
}

pub fn downscale(image: DynamicImage, max_edge: u32) -> Result<DynamicImage> {
    let (new_w, new_h) = bounded_size(image.width(), image.height(), max_edge);
    if (new_w, new_h) == (image.width(), image.height()) {
        return Ok(image);
    }

    // Results carry alpha, so everything goes through RGBA8.
    let rgba = image.to_rgba8();
    let src_image = Image::from_vec_u8(rgba.width(), rgba.height(), rgba.into_raw(), PixelType::U8x4)?;
    let mut dst_image = Image::new(new_w, new_h, PixelType::U8x4);
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &ResizeOptions::default())?;

    image::RgbaImage::from_raw(new_w, new_h, dst_image.into_vec())
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| anyhow!("Resized buffer does not match {new_w}x{new_h}"))
}

pub fn decode_result(path: PathBuf, bytes: &[u8]) -> Result<LoadedImage> {
    let image = image::load_from_memory(bytes)?;
    let size = [image.width(), image.height()];
    let image = downscale(image, MAX_TEXTURE_EDGE)?;
    Ok(LoadedImage {
        path,
        size,
        color_image: to_color_image(&image),
    })
}
