//! Camera configuration and primary ray generation.

use std::path::Path;

use ember_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::Hittable;
use crate::renderer::{render_image, RenderError};
use crate::sampling::{gen_f32, random_in_unit_disk};

/// Render configuration plus viewing parameters.
///
/// Fields are plain data set up once before rendering; `render` borrows the
/// camera immutably and derives the viewport internally, so the same camera
/// can be re-aimed and rendered repeatedly.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Width over height of the output image.
    pub aspect_ratio: f32,
    /// Output width in pixels; height follows from the aspect ratio.
    pub image_width: u32,
    /// Rays averaged per pixel.
    pub samples_per_pixel: u32,
    /// Bounce limit per path.
    pub max_depth: u32,
    /// Radiance for rays that leave the scene.
    pub background: Color,

    /// Vertical field of view in degrees.
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    /// Aperture cone angle in degrees; 0 disables depth of field.
    pub defocus_angle: f32,
    /// Distance to the plane of perfect focus.
    pub focus_dist: f32,

    /// Root seed; every pixel derives its own generator from this.
    pub seed: u64,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 50,
            background: Color::ZERO,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: -Vec3::Z,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            seed: 0,
        }
    }

    pub fn with_image(mut self, aspect_ratio: f32, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_view(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Render with pure material-density sampling and write a P3 image.
    pub fn render(&self, world: &dyn Hittable, path: impl AsRef<Path>) -> Result<(), RenderError> {
        render_image(self, world, None).save_ppm(path)
    }

    /// Render with mixture importance sampling toward `lights` and write a
    /// P3 image.
    pub fn render_with_lights(
        &self,
        world: &dyn Hittable,
        lights: &dyn Hittable,
        path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        render_image(self, world, Some(lights)).save_ppm(path)
    }

    /// Derive the viewport geometry for one render.
    pub fn frame(&self) -> CameraFrame {
        let image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        let center = self.look_from;

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / image_height as f32);

        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / self.image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - self.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();

        CameraFrame {
            image_width: self.image_width,
            image_height,
            samples_per_pixel: self.samples_per_pixel.max(1),
            max_depth: self.max_depth,
            background: self.background,
            seed: self.seed,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            defocus_angle: self.defocus_angle,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport geometry derived from a [`Camera`] at render start.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    background: Color,
    seed: u64,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_angle: f32,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl CameraFrame {
    #[inline]
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    #[inline]
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    #[inline]
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ray through a jittered position inside pixel (i, j), originating on
    /// the defocus disk when depth of field is enabled, tagged with a random
    /// time in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset.x) * self.pixel_delta_u
            + (j as f32 + offset.y) * self.pixel_delta_v;

        let origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let time = gen_f32(rng);
        Ray::new(origin, pixel_sample - origin, time)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

/// Jitter offset in the unit pixel footprint, centered on zero.
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}
