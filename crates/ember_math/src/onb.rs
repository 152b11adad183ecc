use crate::Vec3;

/// Orthonormal basis built around a surface normal.
///
/// Sampling routines draw directions in a canonical frame with +Z up; this
/// rotates them so the frame's z axis matches the given normal.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    axis: [Vec3; 3],
}

impl Onb {
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { axis: [u, v, w] }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.axis[0]
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.axis[1]
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.axis[2]
    }

    /// Map a vector from basis-local coordinates to world space.
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        v.x * self.axis[0] + v.y * self.axis[1] + v.z * self.axis[2]
    }
}
