use anyhow::{Context, Result};
use posekit_geometry::DecodedImage;
use std::path::Path;

/// Decodes any format the `image` crate recognises into top-down RGBA8.
pub fn load_image(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .with_context(|| format!("decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    let image = DecodedImage::new(width, height, decoded.into_raw())
        .with_context(|| format!("invalid image {}", path.display()))?;
    tracing::debug!(path = %path.display(), width, height, "image decoded");
    Ok(image)
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let decoded = image::load_from_memory(bytes)
        .context("decode image bytes")?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(DecodedImage::new(width, height, decoded.into_raw())?)
}
