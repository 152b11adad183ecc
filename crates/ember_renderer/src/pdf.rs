//! Probability densities over directions, used for importance sampling.

use ember_math::{Onb, Vec3};
use rand::RngCore;

use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};

/// A sampleable density over directions from a fixed point.
pub trait Pdf {
    /// Density of this distribution at `direction`; always >= 0.
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32;

    /// Draw a direction from this distribution.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted density over the hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::new(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        let cos_theta = direction.normalize().dot(self.uvw.w());
        (cos_theta / std::f32::consts::PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(random_cosine_direction(rng))
    }
}

/// Uniform density over the full sphere of directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        1.0 / (4.0 * std::f32::consts::PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Density of directions from `origin` toward a target shape, typically a
/// light. Delegates to the shape's own surface sampling.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.objects.pdf_value(self.origin, direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random(self.origin, rng)
    }
}

/// Even blend of two densities.
///
/// Sampling flips a fair coin between the sources; the density is the
/// arithmetic mean, which keeps the estimator unbiased while covering both
/// the material lobe and direct light directions.
pub struct MixturePdf<'a> {
    sources: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(a: &'a dyn Pdf, b: &'a dyn Pdf) -> Self {
        Self { sources: [a, b] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        0.5 * self.sources[0].value(direction, rng) + 0.5 * self.sources[1].value(direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.sources[0].generate(rng)
        } else {
            self.sources[1].generate(rng)
        }
    }
}

/// The density a material hands to the integrator.
///
/// An enum rather than a boxed trait object so the per-bounce hot path does
/// not allocate.
#[derive(Debug, Clone, Copy)]
pub enum ScatterPdf {
    /// Cosine lobe around the surface normal (Lambertian).
    Cosine(CosinePdf),
    /// Uniform over the sphere (isotropic phase function).
    Uniform(SpherePdf),
}

impl Pdf for ScatterPdf {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        match self {
            ScatterPdf::Cosine(pdf) => pdf.value(direction, rng),
            ScatterPdf::Uniform(pdf) => pdf.value(direction, rng),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            ScatterPdf::Cosine(pdf) => pdf.generate(rng),
            ScatterPdf::Uniform(pdf) => pdf.generate(rng),
        }
    }
}
