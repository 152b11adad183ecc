//! Material trait and the surface/volume scattering models.

use std::sync::Arc;

use ember_core::{SolidColor, Texture};
use ember_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, ScatterPdf, SpherePdf};
use crate::sampling::{gen_f32, random_unit_vector};

/// Outcome of a scattering event.
pub enum ScatterResult {
    /// A single outgoing ray with no associated density; the integrator
    /// follows it directly (mirrors, glass).
    Specular { attenuation: Color, scattered: Ray },
    /// An attenuation plus the density the integrator should draw the
    /// outgoing direction from.
    Diffuse {
        attenuation: Color,
        pdf: ScatterPdf,
    },
}

/// How light interacts with a surface or medium.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray at a hit point.
    ///
    /// `None` means the ray was absorbed; only emission contributes.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light emitted at the hit point. Non-emissive materials return black.
    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::ZERO
    }

    /// This material's own density for the direction of `scattered`, used to
    /// weight directions drawn from a different (mixture) density.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Diffuse surface scattering with a cosine lobe.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult::Diffuse {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            pdf: ScatterPdf::Cosine(CosinePdf::new(rec.normal)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cos_theta = rec.normal.dot(scattered.direction.normalize());
        (cos_theta / std::f32::consts::PI).max(0.0)
    }
}

/// Reflective surface with optional roughness.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]; 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // A perturbed ray that dips below the surface is absorbed.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult::Specular {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Clear refractive material (glass, water, diamond).
pub struct Dielectric {
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's reflectance approximation, clamped so grazing incidence
    /// cannot push the probability out of [0, 1].
    fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        (r0 + (1.0 - r0) * (1.0 - cosine).powi(5)).clamp(0.0, 1.0)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult::Specular {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Area light; emits from its front face and never scatters.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, rec: &HitRecord) -> Color {
        // One-sided: nothing radiates from the back of a light.
        if !rec.front_face {
            return Color::ZERO;
        }
        self.texture.value(rec.u, rec.v, rec.p)
    }
}

/// Phase function for participating media; scatters uniformly in all
/// directions.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult::Diffuse {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            pdf: ScatterPdf::Uniform(SpherePdf),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * std::f32::consts::PI)
    }
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
