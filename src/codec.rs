use crate::error::{Error, Result};
use image::DynamicImage;

/// Seam between the conversion pipeline and the actual pixel-format work.
///
/// Implementations decode JPEG/PNG bytes and encode WebP at the given
/// quality percentage. The pipeline treats any failure here as a
/// [`Error::Codec`] for that one file.
pub trait WebpCodec: Send + Sync {
    /// Encodes `input` (JPEG or PNG bytes) as WebP at `quality` (0-100).
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be decoded or the WebP
    /// encoder rejects it.
    fn encode(&self, input: &[u8], quality: u8) -> Result<Vec<u8>>;
}

/// Default codec backed by the `image` and `webp` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl WebpCodec for ImageCodec {
    fn encode(&self, input: &[u8], quality: u8) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(input)
            .map_err(|e| Error::codec(format!("decode failed: {e}")))?;

        // libwebp only accepts 8-bit RGB/RGBA buffers.
        let decoded = match decoded {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => decoded,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        };

        let encoder = webp::Encoder::from_image(&decoded)
            .map_err(|e| Error::codec(format!("unsupported pixel format: {e}")))?;

        Ok(encoder.encode(f32::from(quality)).to_vec())
    }
}
