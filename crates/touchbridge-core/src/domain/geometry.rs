//! Surface geometry and coordinate mapping.
//!
//! Two surfaces participate in every translation: the small touch source
//! (where fingers land) and the large gesture target (where synthetic
//! strokes are played back). Mapping between them is purely proportional:
//! each axis is scaled by `target_dim / source_dim`, carried out in `f64`
//! so repeated drag updates accumulate no truncation error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when mapping between surfaces.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    /// A surface reported a zero or negative dimension; the sample that
    /// triggered the mapping must be dropped.
    #[error("invalid geometry: {width_px}x{height_px} (dimensions must be positive)")]
    InvalidGeometry { width_px: f64, height_px: f64 },
}

/// A point in a surface's pixel coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Manhattan distance to `other` (sum of per-axis displacements).
    pub fn manhattan_to(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Pixel dimensions of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    /// Width in pixels.
    pub width_px: f64,
    /// Height in pixels.
    pub height_px: f64,
}

impl SurfaceGeometry {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }

    /// Returns an error unless both dimensions are strictly positive.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.width_px <= 0.0 || self.height_px <= 0.0 {
            return Err(GeometryError::InvalidGeometry {
                width_px: self.width_px,
                height_px: self.height_px,
            });
        }
        Ok(())
    }

    /// The center point of the surface.
    pub fn center(&self) -> Point {
        Point::new(self.width_px * 0.5, self.height_px * 0.5)
    }

    /// Clamps a point into the surface's addressable pixel range
    /// `[0, dim - 1]` per axis.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, (self.width_px - 1.0).max(0.0)),
            p.y.clamp(0.0, (self.height_px - 1.0).max(0.0)),
        )
    }
}

/// Maps a point from `source` pixel space to `target` pixel space.
///
/// Each axis is scaled independently: `target_dim * (p / source_dim)`.
/// The mapping is deterministic and has no side effects.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] if either surface has a
/// zero or negative dimension; the caller is expected to drop the sample
/// without touching any interaction state.
pub fn map_point(
    p: Point,
    source: &SurfaceGeometry,
    target: &SurfaceGeometry,
) -> Result<Point, GeometryError> {
    source.validate()?;
    target.validate()?;
    Ok(Point::new(
        target.width_px * (p.x / source.width_px),
        target.height_px * (p.y / source.height_px),
    ))
}

/// The source/target surface pair the engine maps across.
///
/// Carried as one value so that a topology change replaces both halves
/// atomically; no sample is ever mapped with half-old, half-new
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    pub source: SurfaceGeometry,
    pub target: SurfaceGeometry,
}

impl SurfaceMapping {
    pub fn new(source: SurfaceGeometry, target: SurfaceGeometry) -> Self {
        Self { source, target }
    }

    /// Maps a source-space point into target space.
    pub fn map(&self, p: Point) -> Result<Point, GeometryError> {
        map_point(p, &self.source, &self.target)
    }

    /// Vertical scale factor applied to scroll deltas
    /// (`target_height / source_height`).
    pub fn scroll_scale(&self) -> f64 {
        self.target.height_px / self.source.height_px
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(w: f64, h: f64) -> SurfaceGeometry {
        SurfaceGeometry::new(w, h)
    }

    // ── map_point ─────────────────────────────────────────────────────────────

    #[test]
    fn test_map_point_is_identity_for_equal_geometries() {
        let g = geom(1080.0, 2640.0);
        let p = Point::new(123.5, 987.25);
        assert_eq!(map_point(p, &g, &g).unwrap(), p);
    }

    #[test]
    fn test_map_point_scales_each_axis_independently() {
        let source = geom(1000.0, 500.0);
        let target = geom(2000.0, 2000.0);
        let mapped = map_point(Point::new(250.0, 250.0), &source, &target).unwrap();
        assert_eq!(mapped, Point::new(500.0, 1000.0));
    }

    #[test]
    fn test_map_point_maps_corners_to_corners() {
        let source = geom(1080.0, 2640.0);
        let target = geom(2560.0, 1600.0);
        assert_eq!(
            map_point(Point::new(0.0, 0.0), &source, &target).unwrap(),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            map_point(Point::new(1080.0, 2640.0), &source, &target).unwrap(),
            Point::new(2560.0, 1600.0)
        );
    }

    #[test]
    fn test_map_point_is_monotonic_per_axis() {
        let source = geom(1080.0, 2640.0);
        let target = geom(2560.0, 1600.0);
        let a = map_point(Point::new(100.0, 100.0), &source, &target).unwrap();
        let b = map_point(Point::new(101.0, 100.0), &source, &target).unwrap();
        let c = map_point(Point::new(101.0, 101.0), &source, &target).unwrap();
        assert!(b.x > a.x);
        assert_eq!(b.y, a.y);
        assert!(c.y > b.y);
    }

    #[test]
    fn test_map_point_round_trips_with_swapped_geometries() {
        let source = geom(1080.0, 2640.0);
        let target = geom(2560.0, 1600.0);
        let original = Point::new(333.0, 1717.0);
        let there = map_point(original, &source, &target).unwrap();
        let back = map_point(there, &target, &source).unwrap();
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn test_map_point_rejects_zero_source_width() {
        let source = geom(0.0, 2640.0);
        let target = geom(2560.0, 1600.0);
        let result = map_point(Point::new(10.0, 10.0), &source, &target);
        assert_eq!(
            result,
            Err(GeometryError::InvalidGeometry {
                width_px: 0.0,
                height_px: 2640.0
            })
        );
    }

    #[test]
    fn test_map_point_rejects_negative_target_height() {
        let source = geom(1080.0, 2640.0);
        let target = geom(2560.0, -1.0);
        assert!(map_point(Point::new(10.0, 10.0), &source, &target).is_err());
    }

    // ── SurfaceGeometry helpers ───────────────────────────────────────────────

    #[test]
    fn test_center_is_half_of_each_dimension() {
        assert_eq!(geom(2560.0, 1600.0).center(), Point::new(1280.0, 800.0));
    }

    #[test]
    fn test_clamp_limits_points_to_addressable_range() {
        let g = geom(100.0, 100.0);
        assert_eq!(g.clamp(Point::new(-5.0, 50.0)), Point::new(0.0, 50.0));
        assert_eq!(g.clamp(Point::new(250.0, 250.0)), Point::new(99.0, 99.0));
        assert_eq!(g.clamp(Point::new(42.0, 7.0)), Point::new(42.0, 7.0));
    }

    // ── SurfaceMapping ────────────────────────────────────────────────────────

    #[test]
    fn test_scroll_scale_is_target_over_source_height() {
        let mapping = SurfaceMapping::new(geom(1080.0, 2640.0), geom(2560.0, 1320.0));
        assert!((mapping.scroll_scale() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mapping_map_uses_both_surfaces() {
        let mapping = SurfaceMapping::new(geom(1000.0, 1000.0), geom(3000.0, 1500.0));
        let mapped = mapping.map(Point::new(500.0, 500.0)).unwrap();
        assert_eq!(mapped, Point::new(1500.0, 750.0));
    }

    // ── Point helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_distance_to_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_manhattan_to_sums_axis_displacements() {
        let a = Point::new(100.0, 100.0);
        let b = Point::new(105.0, 102.0);
        assert!((a.manhattan_to(&b) - 7.0).abs() < 1e-12);
    }
}
