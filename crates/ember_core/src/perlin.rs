//! Lattice gradient noise.

use ember_math::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const POINT_COUNT: usize = 256;

/// Gradient noise over an integer lattice.
///
/// Each lattice point carries a pseudo-random unit gradient; evaluation
/// trilinearly blends the dot products against the eight surrounding corners
/// with Hermite-smoothed weights. The tables are built once from an explicit
/// seed, so a given seed always produces the same pattern.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Seed used when the caller does not care about a specific pattern.
    pub const DEFAULT_SEED: u64 = 0x5eed_1a77;

    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);

        let gradients = (0..POINT_COUNT)
            .map(|_| random_unit_gradient(&mut rng))
            .collect();

        Self {
            gradients,
            perm_x: shuffled_indices(&mut rng),
            perm_y: shuffled_indices(&mut rng),
            perm_z: shuffled_indices(&mut rng),
        }
    }

    /// Raw noise value in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let ix = self.perm_x[((i + di as i64) & 255) as usize];
                    let iy = self.perm_y[((j + dj as i64) & 255) as usize];
                    let iz = self.perm_z[((k + dk as i64) & 255) as usize];
                    *corner = self.gradients[ix ^ iy ^ iz];
                }
            }
        }

        trilinear_interp(&corners, u, v, w)
    }

    /// Sum of `depth` octaves at doubling frequency and halving amplitude.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut sample_point = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(sample_point);
            weight *= 0.5;
            sample_point *= 2.0;
        }

        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

fn random_unit_gradient(rng: &mut SmallRng) -> Vec3 {
    // Rejection-sample the unit ball so normalization is well conditioned.
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

fn shuffled_indices(rng: &mut SmallRng) -> Vec<usize> {
    use rand::seq::SliceRandom;

    let mut indices: Vec<usize> = (0..POINT_COUNT).collect();
    indices.shuffle(rng);
    indices
}

fn trilinear_interp(corners: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // Hermite smoothing removes the visible lattice artifacts of plain
    // trilinear weights.
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in corners.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
