use posekit_base::{Error, Result};

/// RGBA8 pixels as produced by a decoder, rows ordered top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParameter(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "RGBA buffer for {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// Same pixels with the row order reversed.
    pub fn flipped_vertically(&self) -> Self {
        let row = self.row_bytes();
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for chunk in self.pixels.chunks_exact(row).rev() {
            pixels.extend_from_slice(chunk);
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}
