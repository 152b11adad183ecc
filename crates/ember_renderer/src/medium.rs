//! Homogeneous participating medium bounded by a closed shape.

use std::sync::Arc;

use ember_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Isotropic, Material};
use crate::sampling::gen_f32;

/// Constant-density volume (fog, smoke) inside a boundary shape.
///
/// A ray crossing the boundary scatters with probability proportional to the
/// distance traveled inside; the free-flight distance is drawn from an
/// exponential distribution parameterized by the density. The boundary must
/// be closed and convex with respect to the rays that reach it.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, phase_function: Arc<dyn Material>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }

    /// Medium with an isotropic single-color phase function.
    pub fn from_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::new(boundary, density, Arc::new(Isotropic::from_color(albedo)))
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Find where the ray enters and leaves the boundary, unrestricted by
        // the query interval so an origin inside the volume still works.
        let mut entry = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }

        let mut exit = HitRecord::default();
        if !self.boundary.hit(
            ray,
            Interval::new(entry.t + 0.0001, f32::INFINITY),
            &mut exit,
            rng,
        ) {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        // Flew clean through.
        if hit_distance > distance_inside {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // A scatter point has no meaningful surface orientation.
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
