//! Bounding volume hierarchy over the scene's primitives.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};

/// Largest primitive count kept in a single leaf.
const LEAF_MAX_SIZE: usize = 2;

/// Binary BVH node.
///
/// An enum rather than trait objects for the internal nodes keeps traversal
/// free of dynamic dispatch; only the leaf primitives are dispatched.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    Empty,
}

impl BvhNode {
    /// Build a BVH over a flat primitive list.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        let count = objects.len();
        let root = Self::build(objects);
        log::debug!("built BVH over {count} primitives");
        root
    }

    /// Build from a populated scene list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive median split.
    ///
    /// Primitives are ordered by bounding-box centroid along the widest axis
    /// of the centroid bounds and divided in half.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if objects.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            let c = o.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let ca = a.bounding_box().centroid()[axis];
            let cb = b.bounding_box().centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;
                for object in objects {
                    if object.hit(ray, Interval::new(ray_t.min, closest), rec, rng) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);
                // The right child only needs to beat the closest hit so far.
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sampling::{gen_range, random_unit_vector};
    use crate::sphere::Sphere;
    use ember_math::{Color, Vec3};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn random_scene(count: usize, rng: &mut SmallRng) -> Vec<Arc<dyn Hittable>> {
        let material = Arc::new(Lambertian::from_color(Color::splat(0.5)));
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    gen_range(rng, -20.0, 20.0),
                    gen_range(rng, -20.0, 20.0),
                    gen_range(rng, -20.0, 20.0),
                );
                let radius = gen_range(rng, 0.1, 2.0);
                Arc::new(Sphere::new(center, radius, material.clone())) as Arc<dyn Hittable>
            })
            .collect()
    }

    #[test]
    fn test_empty_bvh_never_hits() {
        let bvh = BvhNode::new(Vec::new());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();
        let mut rng = SmallRng::seed_from_u64(71);

        assert!(matches!(bvh, BvhNode::Empty));
        assert!(!bvh.hit(
            &ray,
            Interval::new(0.001, f32::INFINITY),
            &mut rec,
            &mut rng
        ));
    }

    #[test]
    fn test_single_primitive_is_leaf() {
        let mut rng = SmallRng::seed_from_u64(72);
        let bvh = BvhNode::new(random_scene(1, &mut rng));
        assert!(matches!(bvh, BvhNode::Leaf { .. }));
    }

    #[test]
    fn test_traversal_matches_linear_scan() {
        let mut rng = SmallRng::seed_from_u64(73);
        let objects = random_scene(200, &mut rng);

        let mut list = HittableList::new();
        for object in &objects {
            list.add(object.clone());
        }
        let bvh = BvhNode::new(objects);

        let interval = Interval::new(0.001, f32::INFINITY);
        let mut agreements = 0;
        for _ in 0..2000 {
            let origin = 30.0 * random_unit_vector(&mut rng);
            let direction = random_unit_vector(&mut rng);
            let ray = Ray::new_simple(origin, direction);

            let mut bvh_rec = HitRecord::default();
            let mut list_rec = HitRecord::default();
            let bvh_hit = bvh.hit(&ray, interval, &mut bvh_rec, &mut rng);
            let list_hit = list.hit(&ray, interval, &mut list_rec, &mut rng);

            assert_eq!(bvh_hit, list_hit, "hit/miss mismatch for {ray:?}");
            if bvh_hit {
                assert!(
                    (bvh_rec.t - list_rec.t).abs() < 1e-4,
                    "t mismatch: {} vs {}",
                    bvh_rec.t,
                    list_rec.t
                );
                agreements += 1;
            }
        }
        // The scene is dense enough that plenty of rays must hit something.
        assert!(agreements > 100, "only {agreements} rays hit the scene");
    }

    #[test]
    fn test_bbox_is_union_of_children() {
        let mut rng = SmallRng::seed_from_u64(74);
        let objects = random_scene(50, &mut rng);
        let expected = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });
        let bvh = BvhNode::new(objects);
        assert_eq!(bvh.bounding_box(), expected);

        if let BvhNode::Branch { left, right, bbox } = &bvh {
            let union = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
            assert_eq!(*bbox, union);
        } else {
            panic!("50 primitives must produce a branch root");
        }
    }
}
