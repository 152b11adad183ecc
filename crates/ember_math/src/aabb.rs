use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box, stored as one interval per axis.
///
/// Boxes are padded so no axis has zero extent; flat primitives (quads) would
/// otherwise produce degenerate slabs that the hit test cannot handle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanning two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// The union of two boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn axis_interval(&self, axis: usize) -> Interval {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does `ray` pass through the box within `ray_t`?
    ///
    /// Each axis narrows the surviving parameter range; a negative direction
    /// component swaps the slab entry and exit.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let inv_dir = 1.0 / ray.direction[axis];

            let mut t0 = (slab.min - origin) * inv_dir;
            let mut t1 = (slab.max - origin) * inv_dir;
            if inv_dir < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Box moved by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.shift(offset.x),
            y: self.y.shift(offset.y),
            z: self.z.shift(offset.z),
        }
    }

    /// Index of the widest axis, used to pick BVH split directions.
    pub fn longest_axis(&self) -> usize {
        let x = self.x.size();
        let y = self.y.size();
        let z = self.z.size();
        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            0.5 * (self.x.min + self.x.max),
            0.5 * (self.y.min + self.y.max),
            0.5 * (self.z.min + self.z.max),
        )
    }

    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_from_every_side() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        assert!(aabb.hit(&Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), t));
        assert!(aabb.hit(&Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z), t));
        assert!(aabb.hit(&Ray::new_simple(Vec3::new(-5.0, 0.0, 0.0), Vec3::X), t));

        // Pointing away.
        assert!(!aabb.hit(&Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z), t));
        // Offset past the corner.
        assert!(!aabb.hit(&Ray::new_simple(Vec3::new(3.0, 0.0, -5.0), Vec3::Z), t));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 4.0));
        assert!(flat.y.size() > 0.0);

        // A ray straight down through the middle of the (padded) slab.
        let ray = Ray::new_simple(Vec3::new(2.0, 5.0, 2.0), -Vec3::Y);
        assert!(flat.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_surrounding_union() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_points(Vec3::splat(2.0), Vec3::splat(3.0));
        let u = Aabb::surrounding(&a, &b);
        assert_eq!(u.x.min, 0.0);
        assert_eq!(u.x.max, 3.0);
    }

    #[test]
    fn test_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 8.0, 4.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(1.0, 4.0, 2.0));
    }

    #[test]
    fn test_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::splat(1.0));
        let moved = aabb.translate(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(moved.y.min, 10.0);
        assert_eq!(moved.y.max, 11.0);
    }
}
