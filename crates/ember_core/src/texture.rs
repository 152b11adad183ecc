//! Texture trait and the built-in texture variants.

use std::path::Path;
use std::sync::Arc;

use ember_math::{Color, Vec3};

use crate::perlin::Perlin;
use crate::raster::RasterImage;

/// Substitute color for textures whose backing image failed to load; chosen
/// to be unmistakable in a rendered image.
const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Maps a surface parameterization to a color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// The same color everywhere.
#[derive(Clone, Debug)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern alternating two sub-textures.
///
/// The pattern is spatial, not UV-based: the parity of the summed integer
/// lattice coordinates of `p / scale` picks the sub-texture.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let x = (self.inv_scale * p.x).floor() as i64;
        let y = (self.inv_scale * p.y).floor() as i64;
        let z = (self.inv_scale * p.z).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like pattern driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32) -> Self {
        Self::with_seed(scale, Perlin::DEFAULT_SEED)
    }

    pub fn with_seed(scale: f32, seed: u64) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        // Phase-shift a sine along z by the turbulence amplitude; the sine
        // keeps the result in [0, 1] after remapping.
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, 7);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}

/// Lookup into a decoded image, clamped at the borders.
pub struct ImageTexture {
    image: Option<RasterImage>,
}

impl ImageTexture {
    pub fn new(image: RasterImage) -> Self {
        Self { image: Some(image) }
    }

    /// Load the backing image, falling back to a diagnostic color on failure.
    ///
    /// A missing or corrupt file is not fatal to a render, so this constructor
    /// is infallible; it logs the failure and remembers that there is no data.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = match RasterImage::load(path) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!(
                    "texture {} failed to load, substituting diagnostic color: {err}",
                    path.display()
                );
                None
            }
        };
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        let u = u.clamp(0.0, 1.0);
        // Image rows run top to bottom; v runs bottom to top.
        let v = 1.0 - v.clamp(0.0, 1.0);

        let x = (u * image.width() as f32) as u32;
        let y = (v * image.height() as f32) as u32;
        image.pixel(x, y)
    }
}
