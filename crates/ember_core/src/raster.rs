//! Decoded pixel buffers backing image textures.

use std::path::Path;

use ember_math::Color;
use thiserror::Error;

/// Errors from loading a texture's backing image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image held as linear RGB floats, row-major, top row first.
#[derive(Clone, Debug)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an image file into linear floats.
    ///
    /// Source bytes are assumed sRGB-encoded and are linearized, since the
    /// renderer works in linear light throughout.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)?.to_rgb8();
        let (width, height) = decoded.dimensions();

        let pixels = decoded
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self::new(width, height, pixels))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at integer coordinates, clamped to the buffer bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(Color::ZERO)
    }
}

fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
