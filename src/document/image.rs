use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::foundation::error::OpafResult;

/// Default longest edge, in pixels, for images embedded in a package.
pub const DEFAULT_IMAGE_MAX_DIM: u32 = 1000;

/// Turns an image file into the opaque bytes stored in a package.
pub trait ImageCodec {
    fn encode(&self, path: &Path, max_dim: u32) -> OpafResult<Vec<u8>>;
}

/// Shrinks images to fit `max_dim` and re-encodes them: PNG when the source
/// has an alpha channel, JPEG otherwise.
#[derive(Clone, Copy, Debug)]
pub struct ThumbnailCodec {
    pub jpeg_quality: u8,
}

impl Default for ThumbnailCodec {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

impl ImageCodec for ThumbnailCodec {
    fn encode(&self, path: &Path, max_dim: u32) -> OpafResult<Vec<u8>> {
        let img = image::open(path).with_context(|| format!("open image {}", path.display()))?;
        let img = if img.width() > max_dim || img.height() > max_dim {
            img.thumbnail(max_dim, max_dim)
        } else {
            img
        };

        let mut buf = Vec::new();
        if img.color().has_alpha() {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .context("encode png thumbnail")?;
        } else {
            let encoder = JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .context("encode jpeg thumbnail")?;
        }
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/image.rs"]
mod tests;
