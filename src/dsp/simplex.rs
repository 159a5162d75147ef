//! Seeded 2D simplex noise and its 1D projection.
//!
//! The glottis uses slow simplex noise for vocal jitter: vibrato wander,
//! tenseness drift and breath-noise amplitude. A 1D value is read off a
//! straight diagonal line through the 2D field so that successive calls with
//! a slowly increasing `x` give a smooth, non-repeating curve.

use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg32;

/// 2D simplex noise generator with a shuffled permutation table.
#[derive(Clone)]
pub struct SimplexNoise {
    /// Permutation table (256 values, doubled for wrapping).
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Skewing factor for 2D: (sqrt(3) - 1) / 2
    const F2: f64 = 0.366_025_403_784_438_6;
    /// Unskewing factor for 2D: (3 - sqrt(3)) / 6
    const G2: f64 = 0.211_324_865_405_187_13;

    const GRAD2: [[f64; 2]; 12] = [
        [1.0, 1.0],
        [-1.0, 1.0],
        [1.0, -1.0],
        [-1.0, -1.0],
        [1.0, 0.0],
        [-1.0, 0.0],
        [1.0, 0.0],
        [-1.0, 0.0],
        [0.0, 1.0],
        [0.0, -1.0],
        [0.0, 1.0],
        [0.0, -1.0],
    ];

    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut source: [u8; 256] = std::array::from_fn(|i| i as u8);
        source.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&source);
        perm[256..].copy_from_slice(&source);

        Self { perm }
    }

    #[inline]
    fn grad(hash: usize, x: f64, y: f64) -> f64 {
        let g = &Self::GRAD2[hash % 12];
        g[0] * x + g[1] * y
    }

    #[inline]
    fn corner(hash: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let t2 = t * t;
            t2 * t2 * Self::grad(hash, x, y)
        }
    }

    /// Sample the field at `(x, y)`. Output lies roughly in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * Self::F2;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;

        let t = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let perm = &self.perm;

        let gi0 = perm[ii + perm[jj] as usize] as usize;
        let gi1 = perm[ii + i1 + perm[jj + j1] as usize] as usize;
        let gi2 = perm[ii + 1 + perm[jj + 1] as usize] as usize;

        70.0 * (Self::corner(gi0, x0, y0) + Self::corner(gi1, x1, y1) + Self::corner(gi2, x2, y2))
    }

    /// 1D noise along the line `(1.2x, -0.7x)`.
    #[inline]
    pub fn sample1(&self, x: f64) -> f64 {
        self.sample(x * 1.2, -x * 0.7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = SimplexNoise::new(42);
        let b = SimplexNoise::new(42);
        for i in 0..100 {
            let x = i as f64 * 0.37;
            assert_eq!(a.sample1(x), b.sample1(x));
        }
    }

    #[test]
    fn output_stays_near_unit_range() {
        let noise = SimplexNoise::new(7);
        for i in 0..20_000 {
            let v = noise.sample1(i as f64 * 0.013 - 50.0);
            assert!(v.abs() <= 1.1, "simplex value {v} out of range");
        }
    }

    #[test]
    fn consecutive_samples_are_smooth() {
        let noise = SimplexNoise::new(3);
        let step = 2048.0 / 48_000.0 * 4.07;
        let mut prev = noise.sample1(0.0);
        for i in 1..500 {
            let v = noise.sample1(i as f64 * step * 0.01);
            assert!((v - prev).abs() < 0.2);
            prev = v;
        }
    }

    #[test]
    fn integer_lattice_points_are_zero() {
        let noise = SimplexNoise::new(11);
        assert_eq!(noise.sample(0.0, 0.0), 0.0);
    }
}
