// PNG export of the canvas.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use sketch_core::EncodedImage;
use thiserror::Error;
use tracing::debug;

use crate::editor::Canvas;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pixel buffer does not match a {width}x{height} canvas")]
    BufferSize { width: u32, height: u32 },

    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode the full canvas as a lossless PNG.
pub fn encode_png(canvas: &Canvas) -> Result<EncodedImage, ExportError> {
    let (width, height) = (canvas.width(), canvas.height());
    let buffer = RgbaImage::from_raw(width, height, canvas.to_rgba_bytes())
        .ok_or(ExportError::BufferSize { width, height })?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(buffer).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    debug!("Encoded {}x{} canvas into {} PNG bytes", width, height, bytes.len());

    Ok(EncodedImage::png(bytes))
}
