//! Parallelogram primitive and the box built from six of them.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;
use crate::sampling::gen_f32;

/// Flat parallelogram spanned by two edge vectors from a corner point.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// Plane basis vector: normal scaled by 1 / (n . n), used to project hit
    /// points onto the (u, v) edge coordinates.
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let bbox_diag0 = Aabb::from_points(q, q + u + v);
        let bbox_diag1 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
            bbox: Aabb::surrounding(&bbox_diag0, &bbox_diag1),
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction);

        // Parallel to the plane.
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        // Express the planar hit point in edge coordinates.
        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        let mut rec = HitRecord::default();
        let ray = Ray::new_simple(origin, direction);
        if !self.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng) {
            return 0.0;
        }

        // Convert the uniform area density to a solid-angle density.
        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        if cosine <= 1e-8 || self.area <= 0.0 {
            return 0.0;
        }
        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        p - origin
    }
}

/// Closed rectangular prism spanning the two opposite corners `a` and `b`,
/// assembled from six quads sharing one material.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    ))); // front
    sides.add(Arc::new(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    ))); // right
    sides.add(Arc::new(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    ))); // back
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    ))); // left
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    ))); // top
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    ))); // bottom

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::Color;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Color::splat(0.5)))
    }

    fn unit_quad() -> Quad {
        // Unit square in the xy plane at z = 0.
        Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, grey())
    }

    #[test]
    fn test_interior_points_hit() {
        let quad = unit_quad();
        let mut rng = SmallRng::seed_from_u64(41);
        let interval = Interval::new(0.001, f32::INFINITY);

        for &(alpha, beta) in &[(0.5, 0.5), (0.01, 0.99), (0.25, 0.7)] {
            let target = Vec3::new(alpha, beta, 0.0);
            let origin = target + Vec3::new(0.0, 0.0, 3.0);
            let ray = Ray::new_simple(origin, -Vec3::Z);

            let mut rec = HitRecord::default();
            assert!(quad.hit(&ray, interval, &mut rec, &mut rng), "missed interior ({alpha}, {beta})");
            assert!((rec.t - 3.0).abs() < 1e-5);
            assert!((rec.u - alpha).abs() < 1e-5);
            assert!((rec.v - beta).abs() < 1e-5);
            assert!((rec.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_exterior_points_miss() {
        let quad = unit_quad();
        let mut rng = SmallRng::seed_from_u64(42);
        let interval = Interval::new(0.001, f32::INFINITY);

        for &(alpha, beta) in &[(-0.1, 0.5), (1.1, 0.5), (0.5, -0.2), (0.5, 1.3)] {
            let target = Vec3::new(alpha, beta, 0.0);
            let origin = target + Vec3::new(0.0, 0.0, 3.0);
            let ray = Ray::new_simple(origin, -Vec3::Z);

            let mut rec = HitRecord::default();
            assert!(!quad.hit(&ray, interval, &mut rec, &mut rng), "hit exterior ({alpha}, {beta})");
        }
    }

    #[test]
    fn test_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 1.0), Vec3::X);
        let mut rec = HitRecord::default();
        let mut rng = SmallRng::seed_from_u64(43);

        assert!(!quad.hit(
            &ray,
            Interval::new(0.001, f32::INFINITY),
            &mut rec,
            &mut rng
        ));
    }

    #[test]
    fn test_pdf_matches_solid_angle_directly_below() {
        // A 2x2 quad seen from straight on at distance 4: density is
        // distance^2 / (cos * area) with cos = 1.
        let quad = Quad::new(
            Vec3::new(-1.0, 4.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            grey(),
        );
        let mut rng = SmallRng::seed_from_u64(44);

        let value = quad.pdf_value(Vec3::ZERO, Vec3::Y, &mut rng);
        let expected = 16.0 / 4.0;
        assert!((value - expected).abs() < 1e-4, "pdf value was {value}");
    }

    #[test]
    fn test_random_directions_land_on_quad() {
        let quad = Quad::new(
            Vec3::new(-1.0, 4.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            grey(),
        );
        let mut rng = SmallRng::seed_from_u64(45);

        for _ in 0..200 {
            let direction = quad.random(Vec3::ZERO, &mut rng);
            let ray = Ray::new_simple(Vec3::ZERO, direction);
            let mut rec = HitRecord::default();
            assert!(quad.hit(
                &ray,
                Interval::new(0.001, f32::INFINITY),
                &mut rec,
                &mut rng
            ));
        }
    }

    #[test]
    fn test_box_is_closed() {
        let sides = make_box(Vec3::ZERO, Vec3::splat(2.0), grey());
        assert_eq!(sides.len(), 6);
        let mut rng = SmallRng::seed_from_u64(46);
        let interval = Interval::new(0.001, f32::INFINITY);

        // Rays through the center along every axis hit an entry face.
        for (origin, direction) in [
            (Vec3::new(1.0, 1.0, 5.0), -Vec3::Z),
            (Vec3::new(1.0, 1.0, -5.0), Vec3::Z),
            (Vec3::new(5.0, 1.0, 1.0), -Vec3::X),
            (Vec3::new(1.0, 5.0, 1.0), -Vec3::Y),
        ] {
            let ray = Ray::new_simple(origin, direction);
            let mut rec = HitRecord::default();
            assert!(sides.hit(&ray, interval, &mut rec, &mut rng));
            assert!((rec.t - 3.0).abs() < 1e-4);
        }
    }
}
