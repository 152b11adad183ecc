//! Math foundation for the ember path tracer.
//!
//! Everything vector-shaped comes from `glam`, re-exported here so the other
//! crates only name one math dependency. On top of that this crate owns the
//! handful of types ray tracing needs that glam does not provide: rays with a
//! time parameter, scalar intervals, axis-aligned bounding boxes, and
//! orthonormal bases for sampling.

pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// RGB color carried as a `Vec3` in linear space, components nominally 0-1
/// before tone mapping (emissive values may exceed 1).
pub type Color = Vec3;
