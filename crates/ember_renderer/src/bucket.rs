//! Bucketed tile decomposition of the image for parallel rendering.
//!
//! Each bucket renders into its own pixel vector, so workers never share a
//! write target; the buffers are stitched together once all buckets finish.

use ember_math::Color;

use crate::camera::CameraFrame;
use crate::hittable::Hittable;
use crate::renderer::{pixel_rng, render_pixel};

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// Top-left corner.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Cover a width x height image with buckets of at most `bucket_size` on a
/// side; edge buckets shrink to fit.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh));
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Render one bucket; pixels come back row-major within the bucket.
///
/// Every pixel gets its own generator derived from the frame seed, so the
/// result does not depend on which worker renders which bucket.
pub fn render_bucket(
    bucket: &Bucket,
    frame: &CameraFrame,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let mut rng = pixel_rng(frame.seed(), x, y);
            pixels.push(render_pixel(frame, world, lights, x, y, &mut rng));
        }
    }

    pixels
}

/// A finished bucket and its pixels.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
