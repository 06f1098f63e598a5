//! Shared fixtures for integration tests and benchmarks

#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};

pub use visual_inspect_mcp::pdf::minimal_pdf;

/// Solid-colour RGB test image
pub fn solid_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 90])))
}

/// Rasterization tests return early when PDFium cannot be bound
pub fn pdfium_or_skip() -> bool {
    let available = visual_inspect_mcp::pdf::pdfium_available();
    if !available {
        eprintln!("PDFium library not available, skipping");
    }
    available
}
