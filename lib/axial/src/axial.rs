use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{Add, Neg, Sub},
};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Address of a hex cell in axial space.
///
/// Components are stored as floats so callers can carry fractional intermediates, but
/// anything coming out of [`Axial::from_fractional`] is integral. Equality, ordering and
/// hashing work on the exact stored bits (no epsilon); the only snapping is that `-0.0`
/// and `0.0` are treated as the same value.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Serialize)]
#[display("({q}, {r})")]
pub struct Axial {
    pub q: f32,
    pub r: f32,
}

/// Redundant three component form of [`Axial`], `x + y + z == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cube {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// -0.0 + 0.0 == +0.0, everything else passes through untouched
fn snap(v: f32) -> f32 { v + 0. }

impl Axial {
    pub fn new(q: f32, r: f32) -> Self {
        Self { q: snap(q), r: snap(r) }
    }

    /// Rounds a fractional axial pair to the nearest hex cell using cube rounding.
    pub fn from_fractional(q0: f64, r0: f64) -> Axial {
        let s0 = -q0-r0;
        let mut q = q0.round();
        let mut r = r0.round();
        let s = s0.round();

        let q_diff = (q - q0).abs();
        let r_diff = (r - r0).abs();
        let s_diff = (s - s0).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r-s;
        } else if r_diff > s_diff {
            r = -q-s;
        }

        Axial::new(q as f32, r as f32)
    }

    pub fn to_cube(&self) -> Cube {
        Cube { x: self.q, y: self.r, z: -self.q-self.r }
    }

    pub fn from_cube(cube: Cube) -> Axial {
        Axial::new(cube.x, cube.y)
    }

    /// Rotates 60° about the origin.
    pub fn rotate_left(&self) -> Axial {
        let Cube { x, y, z } = self.to_cube();
        Axial::from_cube(Cube { x: -z, y: -x, z: -y })
    }
}

impl PartialEq for Axial {
    fn eq(&self, other: &Self) -> bool {
        snap(self.q).to_bits() == snap(other.q).to_bits()
            && snap(self.r).to_bits() == snap(other.r).to_bits()
    }
}

impl Eq for Axial {}

impl Hash for Axial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        snap(self.q).to_bits().hash(state);
        snap(self.r).to_bits().hash(state);
    }
}

impl Ord for Axial {
    fn cmp(&self, other: &Self) -> Ordering {
        snap(self.q).total_cmp(&snap(other.q))
            .then_with(|| snap(self.r).total_cmp(&snap(other.r)))
    }
}

impl PartialOrd for Axial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add<Axial> for Axial {
    type Output = Axial;
    fn add(self, rhs: Axial) -> Self::Output {
        Axial::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub<Axial> for Axial {
    type Output = Axial;
    fn sub(self, rhs: Axial) -> Self::Output {
        Axial::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Neg for Axial {
    type Output = Axial;
    fn neg(self) -> Self::Output {
        Axial::new(-self.q, -self.r)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    // ===== ROUNDING TESTS =====

    #[test]
    fn test_round_exact_integers() {
        assert_eq!(Axial::from_fractional(3., -2.), Axial::new(3., -2.));
        assert_eq!(Axial::from_fractional(0., 0.), Axial::default());
    }

    #[test]
    fn test_round_near_centre() {
        assert_eq!(Axial::from_fractional(1.1, -0.2), Axial::new(1., 0.));
        assert_eq!(Axial::from_fractional(-2.9, 1.05), Axial::new(-3., 1.));
    }

    #[test]
    fn test_round_fixes_largest_error_component() {
        // (0, 0, -1) breaks the cube invariant, q has the largest error
        let hex = Axial::from_fractional(0.45, 0.4);
        assert_eq!(hex, Axial::new(1., 0.));

        // same rounding, r has the largest error
        let hex = Axial::from_fractional(0.2, 0.45);
        assert_eq!(hex, Axial::new(0., 1.));

        // s has the largest error and is simply dropped
        let hex = Axial::from_fractional(0.2, 0.2);
        assert_eq!(hex, Axial::new(0., 0.));

        let cube = Axial::from_fractional(0.6, 0.3).to_cube();
        assert_eq!(cube.x + cube.y + cube.z, 0.);
    }

    #[test]
    fn test_round_never_yields_negative_zero() {
        let hex = Axial::from_fractional(-0.2, -0.1);
        assert_eq!(hex.q.to_bits(), 0f32.to_bits());
        assert_eq!(hex.r.to_bits(), 0f32.to_bits());
        assert_eq!(format!("{hex}"), "(0, 0)");
    }

    #[test]
    fn test_round_is_symmetric_under_rotation() {
        let mut rng = StdRng::seed_from_u64(0x4e58);
        for _ in 0..10_000 {
            let q: f64 = rng.random_range(-40.0..40.0);
            let r: f64 = rng.random_range(-40.0..40.0);
            // 60° about the origin in axial form: (q, r) -> (q + r, -q)
            let rotated = Axial::from_fractional(q + r, -q);
            let expected = Axial::from_fractional(q, r).rotate_left();
            assert_eq!(rotated, expected, "rotation broke rounding for ({q}, {r})");
        }
    }

    #[test]
    fn test_rotate_left_six_times_is_identity() {
        let start = Axial::new(3., -1.);
        let mut hex = start;
        for _ in 0..6 { hex = hex.rotate_left(); }
        assert_eq!(hex, start);
        assert_ne!(start.rotate_left(), start);
    }

    // ===== CUBE TESTS =====

    #[test]
    fn test_cube_invariant_holds_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let hex = Axial::new(rng.random_range(-1e4..1e4), rng.random_range(-1e4..1e4));
            let Cube { x, y, z } = hex.to_cube();
            assert_eq!(x + y + z, 0., "cube invariant broken for {hex:?}");
        }
    }

    #[test]
    fn test_cube_conversion_is_lossless() {
        let hex = Axial::new(-7., 12.);
        assert_eq!(Axial::from_cube(hex.to_cube()), hex);
        assert_eq!(hex.to_cube(), Cube { x: -7., y: 12., z: -5. });
    }

    // ===== EQUALITY TESTS =====

    #[test]
    fn test_negative_zero_is_same_key() {
        let a = Axial { q: -0., r: 1. };
        let b = Axial { q: 0., r: 1. };
        assert_eq!(a, b);

        let set: HashSet<Axial> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_equality_has_no_tolerance() {
        let a = Axial::new(1., 2.);
        let b = Axial::new(1. + f32::EPSILON, 2.);
        assert_ne!(a, b);
    }

    #[test]
    fn test_arithmetic() {
        let a = Axial::new(1., 2.);
        let b = Axial::new(-3., 5.);
        assert_eq!(a + b, Axial::new(-2., 7.));
        assert_eq!(a - b, Axial::new(4., -3.));
        assert_eq!(-a, Axial::new(-1., -2.));
        assert_eq!(a - a, Axial::default());
    }

    #[test]
    fn test_ordering_is_q_then_r() {
        let mut hexes = vec![Axial::new(1., -1.), Axial::new(-1., 4.), Axial::new(1., -3.)];
        hexes.sort();
        assert_eq!(hexes, vec![Axial::new(-1., 4.), Axial::new(1., -3.), Axial::new(1., -1.)]);
    }
}
