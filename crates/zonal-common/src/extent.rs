//! Geographic extent type and operations.

use serde::{Deserialize, Serialize};

use crate::error::{ZonalError, ZonalResult};

/// A GDAL-style geographic extent: `[min_x, min_y, max_x, max_y]`.
///
/// Coordinates are in the raster's CRS (EPSG:4326 degrees for coverage
/// requests).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Create a new extent from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the extent in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the extent in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this extent (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Reject non-canonical extents.
    ///
    /// An extent with `min_x > max_x` is either malformed or "wraps" the
    /// antimeridian; wrapping is not implemented anywhere in this engine,
    /// so both cases are hard errors.
    pub fn validate(&self) -> ZonalResult<()> {
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(ZonalError::malformed_extent(format!(
                "extent [{}, {}, {}, {}] is malformed or wraps the antimeridian",
                self.min_x, self.min_y, self.max_x, self.max_y
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let extent = Extent::new(-100.0, 30.0, -90.0, 40.0);
        assert!((extent.width() - 10.0).abs() < f64::EPSILON);
        assert!((extent.height() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_point() {
        let extent = Extent::new(-100.0, 30.0, -90.0, 40.0);
        assert!(extent.contains_point(-95.0, 35.0));
        assert!(extent.contains_point(-100.0, 30.0));
        assert!(!extent.contains_point(-105.0, 35.0));
        assert!(!extent.contains_point(-95.0, 45.0));
    }

    #[test]
    fn test_validate_rejects_wrapping() {
        assert!(Extent::new(170.0, 0.0, -170.0, 10.0).validate().is_err());
        assert!(Extent::new(0.0, 10.0, 10.0, 0.0).validate().is_err());
        assert!(Extent::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());
    }
}
