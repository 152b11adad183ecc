//! Path integrator, pixel accumulation, and image output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ember_math::{Color, Interval, Ray};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::{Camera, CameraFrame};
use crate::hittable::{HitRecord, Hittable};
use crate::material::ScatterResult;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};

/// Failures that abort a render. Everything else degrades silently.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write image: {0}")]
    Io(#[from] io::Error),
}

/// Radiance arriving along `ray`.
///
/// The logically recursive estimator runs as a loop carrying the accumulated
/// radiance and the running throughput, bounded by `max_depth`. When a light
/// list is supplied, diffuse bounces sample from an even mixture of the
/// material's density and the light-directed density; the estimator weight is
/// scattering_pdf / sampled_pdf.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    background: Color,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let mut rec = HitRecord::default();
        if !world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
            radiance += throughput * background;
            break;
        }

        radiance += throughput * rec.material.emitted(&rec);

        let Some(scatter) = rec.material.scatter(&ray, &rec, rng) else {
            // Absorbed; the path ends with whatever was emitted.
            break;
        };

        match scatter {
            ScatterResult::Specular {
                attenuation,
                scattered,
            } => {
                throughput *= attenuation;
                ray = scattered;
            }
            ScatterResult::Diffuse { attenuation, pdf } => {
                let (direction, pdf_value) = match lights {
                    Some(lights) => {
                        let light_pdf = HittablePdf::new(lights, rec.p);
                        let mixture = MixturePdf::new(&light_pdf, &pdf);
                        let direction = mixture.generate(rng);
                        (direction, mixture.value(direction, rng))
                    }
                    None => {
                        let direction = pdf.generate(rng);
                        (direction, pdf.value(direction, rng))
                    }
                };

                // A degenerate density would divide to NaN; end the path.
                if pdf_value <= 0.0 {
                    break;
                }

                let scattered = Ray::new(rec.p, direction, ray.time);
                let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scattered);

                throughput *= attenuation * scattering_pdf / pdf_value;
                ray = scattered;
            }
        }
    }

    radiance
}

/// Average `samples_per_pixel` jittered rays through pixel (x, y).
pub fn render_pixel(
    frame: &CameraFrame,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;
    for _ in 0..frame.samples_per_pixel() {
        let ray = frame.get_ray(x, y, rng);
        pixel_color += ray_color(
            &ray,
            world,
            lights,
            frame.background(),
            frame.max_depth(),
            rng,
        );
    }
    pixel_color / frame.samples_per_pixel() as f32
}

/// Generator for one pixel, derived from the root seed and the pixel
/// coordinates. Identical regardless of which worker renders the pixel.
pub(crate) fn pixel_rng(seed: u64, x: u32, y: u32) -> SmallRng {
    let coord = ((y as u64) << 32) | x as u64;
    SmallRng::seed_from_u64(seed ^ coord.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render the whole image, buckets in parallel.
pub fn render_image(
    camera: &Camera,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
) -> ImageBuffer {
    let frame = camera.frame();
    let (width, height) = (frame.image_width(), frame.image_height());

    log::info!(
        "rendering {}x{} at {} spp, max depth {}",
        width,
        height,
        frame.samples_per_pixel(),
        frame.max_depth()
    );
    let start = std::time::Instant::now();

    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, &frame, world, lights)))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        let bucket = result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                image.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    log::info!("render finished in {:.2?}", start.elapsed());
    image
}

/// Gamma-2 transfer for display: linear radiance to sqrt encoding.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct, clamp, and quantize a color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 1.0);
    let r = (255.0 * intensity.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * intensity.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * intensity.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b]
}

/// Accumulated render output in linear space.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Write the image as plain (ASCII) PPM, top row first.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for y in 0..self.height {
            for x in 0..self.width {
                let [r, g, b] = color_to_rgb8(self.get(x, y));
                writeln!(writer, "{r} {g} {b}")?;
            }
        }
        Ok(())
    }

    /// Write a PPM file at `path`; the one fatal failure mode of a render.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_ppm(&mut writer)?;
        writer.flush()?;
        log::info!("wrote {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::BvhNode;
    use crate::hittable::HittableList;
    use crate::material::{DiffuseLight, Lambertian};
    use crate::quad::Quad;
    use crate::sphere::Sphere;
    use ember_math::Vec3;
    use std::sync::Arc;

    #[test]
    fn test_empty_scene_is_background_everywhere() {
        let background = Color::new(0.25, 0.5, 1.0);
        let camera = Camera::new()
            .with_image(1.0, 8)
            .with_quality(4, 10)
            .with_background(background);
        let world = HittableList::new();

        let image = render_image(&camera, &world, None);
        assert_eq!(image.width, 8);
        assert_eq!(image.height, 8);
        for y in 0..image.height {
            for x in 0..image.width {
                let pixel = image.get(x, y);
                assert!(
                    (pixel - background).length() < 1e-5,
                    "pixel ({x}, {y}) was {pixel:?}"
                );
            }
        }
    }

    fn lit_sphere_scene(emission: f32) -> (BvhNode, HittableList) {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::from_color(Color::splat(0.73))),
        )));

        let light_quad = Arc::new(Quad::new(
            Vec3::new(-1.0, 3.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Arc::new(DiffuseLight::from_color(Color::splat(emission))),
        ));
        world.add(light_quad.clone());

        let mut lights = HittableList::new();
        lights.add(light_quad);

        (BvhNode::from_list(world), lights)
    }

    fn apex_camera() -> Camera {
        Camera::new()
            .with_image(1.0, 11)
            .with_quality(64, 20)
            .with_view(Vec3::new(0.0, 2.0, 2.5), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
            .with_lens(35.0, 0.0, 1.0)
            .with_seed(7)
    }

    fn luminance(c: Color) -> f32 {
        c.x + c.y + c.z
    }

    #[test]
    fn test_fixed_seed_renders_are_identical() {
        let (world, lights) = lit_sphere_scene(4.0);
        let camera = apex_camera();

        let first = render_image(&camera, &world, Some(&lights));
        let second = render_image(&camera, &world, Some(&lights));

        for (a, b) in first.pixels().iter().zip(second.pixels()) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn test_brighter_light_brightens_sphere_apex() {
        let camera = apex_camera();

        let (dim_world, dim_lights) = lit_sphere_scene(4.0);
        let dim = render_image(&camera, &dim_world, Some(&dim_lights));

        let (bright_world, bright_lights) = lit_sphere_scene(16.0);
        let bright = render_image(&camera, &bright_world, Some(&bright_lights));

        // The image center looks at the top of the sphere.
        let (cx, cy) = (dim.width / 2, dim.height / 2);
        let dim_apex = luminance(dim.get(cx, cy));
        let bright_apex = luminance(bright.get(cx, cy));

        assert!(dim_apex > 0.0, "apex received no light");
        assert!(
            bright_apex > dim_apex,
            "brighter light did not brighten the apex: {bright_apex} <= {dim_apex}"
        );
    }

    #[test]
    fn test_light_sampling_and_material_sampling_agree() {
        // Both integrator modes estimate the same image; with enough samples
        // their averages converge. This is a coarse sanity bound, not a
        // statistical test.
        let (world, lights) = lit_sphere_scene(4.0);
        let camera = apex_camera().with_quality(256, 20);

        let with_lights = render_image(&camera, &world, Some(&lights));
        let without = render_image(&camera, &world, None);

        let (cx, cy) = (with_lights.width / 2, with_lights.height / 2);
        let a = luminance(with_lights.get(cx, cy));
        let b = luminance(without.get(cx, cy));
        assert!(a > 0.0 && b > 0.0);
        let ratio = a / b;
        assert!(
            (0.3..3.0).contains(&ratio),
            "integrator modes disagree wildly: {a} vs {b}"
        );
    }

    #[test]
    fn test_depth_zero_contributes_nothing() {
        let (world, _) = lit_sphere_scene(4.0);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let mut rng = pixel_rng(1, 0, 0);

        let color = ray_color(&ray, &world, None, Color::ONE, 0, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_ppm_output_format() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 1, Color::new(0.0, 0.25, 1.0));

        let mut bytes = Vec::new();
        image.write_ppm(&mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("2 2"));
        assert_eq!(lines.next(), Some("255"));
        assert_eq!(lines.next(), Some("255 0 0"));
        // Remaining three pixels, row-major; gamma makes 0.25 into 0.5.
        assert_eq!(lines.next(), Some("0 0 0"));
        assert_eq!(lines.next(), Some("0 0 0"));
        assert_eq!(lines.next(), Some("0 127 255"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_color_to_rgb8_clamps_and_gammas() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        // Values past 1 clamp instead of wrapping.
        assert_eq!(color_to_rgb8(Color::splat(9.0)), [255, 255, 255]);
        // 0.25 in linear is 0.5 after gamma 2.
        assert_eq!(color_to_rgb8(Color::splat(0.25))[0], 127);
        // Negative values clamp to zero rather than going NaN through sqrt.
        assert_eq!(color_to_rgb8(Color::splat(-1.0)), [0, 0, 0]);
    }

    #[test]
    fn test_pixel_rng_is_coordinate_stable() {
        let mut a = pixel_rng(42, 3, 5);
        let mut b = pixel_rng(42, 3, 5);
        let mut c = pixel_rng(42, 5, 3);
        assert_eq!(a.next_u64(), b.next_u64());
        // Transposed coordinates get a different stream.
        assert_ne!(a.next_u64(), c.next_u64());
    }
}
