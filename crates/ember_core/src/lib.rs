//! Texture evaluation for the ember path tracer.
//!
//! A [`Texture`] maps a surface parameterization `(u, v)` plus the hit point
//! to a color. The variants cover solid colors, a 3D checker, layered
//! gradient noise, and image-backed lookups. Image decoding is delegated to
//! the `image` crate; a texture that fails to load renders as a diagnostic
//! color instead of aborting the render.

mod perlin;
mod raster;
mod texture;

pub use perlin::Perlin;
pub use raster::{RasterImage, TextureError, TextureResult};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
