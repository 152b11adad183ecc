//! ember renderer - CPU Monte Carlo path tracing.
//!
//! The scene is a tree of [`Hittable`] shapes referencing shared
//! [`Material`]s, which in turn reference shared textures. A [`Camera`]
//! generates primary rays; the integrator follows each path through
//! scattering events, optionally importance-sampling toward an explicit
//! light list, and the result is written as a plain PPM image.
//!
//! The scene graph is immutable once built, so rendering parallelizes over
//! image buckets with nothing shared but read-only references.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod pdf;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraFrame};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, ScatterPdf, SpherePdf};
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render_image, render_pixel, ImageBuffer,
    RenderError,
};
pub use sampling::{
    gen_f32, gen_range, random_cosine_direction, random_in_unit_disk, random_to_sphere,
    random_unit_vector,
};
pub use sphere::Sphere;
pub use transform::{RotateY, Translate};

/// Re-export the math types scene construction needs.
pub use ember_math::{Aabb, Color, Interval, Onb, Ray, Vec3};

/// Re-export the texture layer so drivers only import one crate.
pub use ember_core::{
    CheckerTexture, ImageTexture, NoiseTexture, Perlin, SolidColor, Texture,
};
