//! # Plane: World Space ⇄ Hex Space Projection
//!
//! A `Plane` describes the square editing surface the hex grid is drawn on and converts
//! between world positions (`Vec3`) and hex addresses (`Axial`).
//!
//! ## Pipeline
//!
//! ```text
//! world (x, z) ──► normalized [-1, 1] / cell_size ──► fractional (q, r) ──► Axial
//! ```
//!
//! - **World → normalized**: each horizontal axis is mapped linearly from `[-extent, extent]`
//!   to `[-1, 1]`, divided by the cell size and negated, so increasing q/r moves toward
//!   positive world axes the way the grid is drawn.
//! - **Normalized → fractional**: a fixed linear basis (`ORIENTATION`).
//! - **Fractional → Axial**: cube rounding, see [`Axial::from_fractional`].
//!
//! [`Plane::hex_to_point`] is the exact inverse and yields cell centres at the plane's
//! elevation.
//!
//! ## Example
//!
//! ```rust
//! use axial::{Axial, Convert, Plane};
//! use glam::Vec3;
//!
//! let plane = Plane::new(5.0, 0.1, 0.0);
//!
//! let hex = Axial::new(2., -1.);
//! let centre: Vec3 = plane.convert(hex);
//! let recovered: Axial = plane.convert(centre);
//! assert_eq!(hex, recovered);
//! ```

use glam::{DVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::axial::Axial;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Linear basis between normalized plane space and axial space.
/// Format: (axial → normalized, normalized → axial), each `[xq, xr, yq, yr]`.
const ORIENTATION: ([f64; 4], [f64; 4]) = (
    [3./2., 0., SQRT_3/2., SQRT_3],
    [2./3., 0., -1./3., SQRT_3/3.],
);

/// Trait for bidirectional coordinate conversion
pub trait Convert<T,U> {
    /// Convert from type T to type U
    fn convert(&self, it: T) -> U;
}

/// The bounded square plane a hex grid is laid over.
///
/// # Fields
///
/// - `extent`: half the side length of the plane in world units
/// - `cell_size`: hex size relative to the normalized plane; must be positive
/// - `elevation`: world Y of the plane, used for cell centres
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Plane {
    extent: f32,
    cell_size: f32,
    elevation: f32,
}

impl Plane {
    /// Callers validate `extent` and `cell_size` are positive before building a plane.
    pub fn new(extent: f32, cell_size: f32, elevation: f32) -> Self {
        debug_assert!(extent > 0. && cell_size > 0., "plane extent and cell size must be positive");
        Self { extent, cell_size, elevation }
    }

    pub fn extent(&self) -> f32 { self.extent }
    pub fn cell_size(&self) -> f32 { self.cell_size }
    pub fn elevation(&self) -> f32 { self.elevation }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.extent && point.z.abs() <= self.extent
    }

    pub fn world_to_normalized(&self, point: Vec3) -> DVec2 {
        let extent = self.extent as f64;
        let cell_size = self.cell_size as f64;
        DVec2 {
            x: -(point.x as f64 / extent) / cell_size,
            y: -(point.z as f64 / extent) / cell_size,
        }
    }

    pub fn normalized_to_world(&self, normalized: DVec2) -> Vec3 {
        let scale = self.extent as f64 * self.cell_size as f64;
        Vec3 {
            x: (-normalized.x * scale) as f32,
            y: self.elevation,
            z: (-normalized.y * scale) as f32,
        }
    }

    /// Fractional (unrounded) axial position of a normalized plane point.
    pub fn normalized_to_fractional(normalized: DVec2) -> DVec2 {
        DVec2 {
            x: ORIENTATION.1[0] * normalized.x + ORIENTATION.1[1] * normalized.y,
            y: ORIENTATION.1[2] * normalized.x + ORIENTATION.1[3] * normalized.y,
        }
    }

    pub fn fractional_to_normalized(fractional: DVec2) -> DVec2 {
        DVec2 {
            x: ORIENTATION.0[0] * fractional.x + ORIENTATION.0[1] * fractional.y,
            y: ORIENTATION.0[2] * fractional.x + ORIENTATION.0[3] * fractional.y,
        }
    }

    pub fn point_to_hex(&self, point: Vec3) -> Axial {
        let fractional = Self::normalized_to_fractional(self.world_to_normalized(point));
        Axial::from_fractional(fractional.x, fractional.y)
    }

    pub fn hex_to_point(&self, hex: Axial) -> Vec3 {
        let fractional = DVec2 { x: hex.q as f64, y: hex.r as f64 };
        self.normalized_to_world(Self::fractional_to_normalized(fractional))
    }
}

impl Convert<Vec3,Axial> for Plane {
    fn convert(&self, point: Vec3) -> Axial {
        self.point_to_hex(point)
    }
}

impl Convert<Axial,Vec3> for Plane {
    fn convert(&self, hex: Axial) -> Vec3 {
        self.hex_to_point(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== PLANE BASIC TESTS =====

    #[test]
    fn test_plane_creation() {
        let plane = Plane::new(5.0, 0.1, 0.25);
        assert_eq!(plane.extent(), 5.0);
        assert_eq!(plane.cell_size(), 0.1);
        assert_eq!(plane.elevation(), 0.25);
    }

    #[test]
    fn test_contains() {
        let plane = Plane::new(5.0, 0.1, 0.);
        assert!(plane.contains(Vec3::ZERO));
        assert!(plane.contains(Vec3::new(5.0, 3.0, -5.0)), "bounds are inclusive, y is ignored");
        assert!(!plane.contains(Vec3::new(5.1, 0., 0.)));
        assert!(!plane.contains(Vec3::new(0., 0., -7.)));
    }

    // ===== NORMALIZATION TESTS =====

    #[test]
    fn test_world_to_normalized_maps_extent_to_unit() {
        let plane = Plane::new(5.0, 1.0, 0.);
        let corner = plane.world_to_normalized(Vec3::new(5.0, 0., -5.0));
        // negated: +extent lands on -1
        assert!((corner.x + 1.).abs() < 1e-9, "got {}", corner.x);
        assert!((corner.y - 1.).abs() < 1e-9, "got {}", corner.y);
    }

    #[test]
    fn test_world_to_normalized_divides_by_cell_size() {
        let plane = Plane::new(5.0, 0.1, 0.);
        let n = plane.world_to_normalized(Vec3::new(-2.5, 0., 0.));
        assert!((n.x - 5.).abs() < 1e-6, "got {}", n.x);
        assert!(n.y.abs() < 1e-12);
    }

    #[test]
    fn test_fractional_basis() {
        let f = Plane::normalized_to_fractional(DVec2 { x: 3., y: 0. });
        assert!((f.x - 2.).abs() < 1e-12);
        assert!((f.y + 1.).abs() < 1e-12);

        let f = Plane::normalized_to_fractional(DVec2 { x: 0., y: SQRT_3 });
        assert!(f.x.abs() < 1e-12);
        assert!((f.y - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_basis_is_inverse() {
        let fractional = DVec2 { x: -4.25, y: 7.5 };
        let back = Plane::normalized_to_fractional(Plane::fractional_to_normalized(fractional));
        assert!((back - fractional).length() < 1e-12);
    }

    // ===== COORDINATE CONVERSION TESTS =====

    #[test]
    fn test_origin_converts_to_plane_centre() {
        let plane = Plane::new(5.0, 0.1, 0.8);
        let centre = plane.hex_to_point(Axial::default());
        assert_eq!(centre, Vec3::new(0., 0.8, 0.));
        assert_eq!(plane.point_to_hex(Vec3::ZERO), Axial::default());
    }

    #[test]
    fn test_positive_q_moves_toward_negative_world_x() {
        let plane = Plane::new(5.0, 0.1, 0.);
        let pos = plane.hex_to_point(Axial::new(1., 0.));
        assert!(pos.x < 0., "got {pos:?}");
    }

    #[test]
    fn test_conversion_roundtrip_grid() {
        for cell_size in [0.05, 0.1, 0.37, 1.0, 2.0] {
            let plane = Plane::new(5.0, cell_size, 0.);
            for q in -20..=20 {
                for r in -20..=20 {
                    let hex = Axial::new(q as f32, r as f32);
                    let recovered = plane.point_to_hex(plane.hex_to_point(hex));
                    assert_eq!(hex, recovered, "roundtrip failed for {hex} at cell size {cell_size}");
                }
            }
        }
    }

    #[test]
    fn test_points_near_centre_resolve_to_cell() {
        let plane = Plane::new(5.0, 0.1, 0.);
        let hex = Axial::new(2., -3.);
        let centre = plane.hex_to_point(hex);
        // a hex at cell size 0.1 on a 5.0 extent is 0.5 world units centre to corner
        for offset in [Vec3::new(0.2, 0., 0.), Vec3::new(0., 0., -0.2), Vec3::new(-0.15, 0., 0.15)] {
            assert_eq!(plane.point_to_hex(centre + offset), hex, "offset {offset:?}");
        }
    }

    #[test]
    fn test_convert_trait_matches_methods() {
        let plane = Plane::new(5.0, 0.25, 0.);
        let hex = Axial::new(-3., 1.);
        let point: Vec3 = plane.convert(hex);
        assert_eq!(point, plane.hex_to_point(hex));
        let back: Axial = plane.convert(point);
        assert_eq!(back, hex);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let plane = Plane::new(5.0, 0.1, 0.);
        let hex = Axial::new(3., -1.);
        assert_eq!(plane.hex_to_point(hex), plane.hex_to_point(hex));
    }
}
