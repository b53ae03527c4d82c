//! Test data generators for predictable pixel grids and boundaries.

use zonal_common::{Feature, Geometry};

/// Create a grid whose samples count up from 1 in row-major order.
///
/// A 4x4 grid holds `[1.0, 2.0, ..., 16.0]`, which makes expected
/// aggregates easy to compute by hand in tests.
///
/// # Example
///
/// ```
/// use test_utils::sequential_grid;
///
/// let grid = sequential_grid(4, 4);
/// assert_eq!(grid.len(), 16);
/// assert_eq!(grid[0], 1.0);
/// assert_eq!(grid[15], 16.0);
/// ```
pub fn sequential_grid(width: usize, height: usize) -> Vec<f64> {
    (1..=width * height).map(|v| v as f64).collect()
}

/// Create a grid filled with a constant value.
pub fn constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Build a closed rectangular polygon feature spanning the given corners.
///
/// The ring runs counter-clockwise and is explicitly closed (first
/// position repeated at the end), matching the boundary GeoJSON servers
/// deliver.
pub fn square_feature(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Feature {
    Feature::new(Geometry::Polygon {
        coordinates: vec![vec![
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
            [min_x, min_y],
        ]],
    })
}

/// Build a square feature with a square hole in the middle.
pub fn square_feature_with_hole(
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    hole_inset: f64,
) -> Feature {
    Feature::new(Geometry::Polygon {
        coordinates: vec![
            vec![
                [min_x, min_y],
                [max_x, min_y],
                [max_x, max_y],
                [min_x, max_y],
                [min_x, min_y],
            ],
            // Holes wind the opposite way by convention; the even-odd
            // test does not care, but keep fixtures realistic.
            vec![
                [min_x + hole_inset, min_y + hole_inset],
                [min_x + hole_inset, max_y - hole_inset],
                [max_x - hole_inset, max_y - hole_inset],
                [max_x - hole_inset, min_y + hole_inset],
                [min_x + hole_inset, min_y + hole_inset],
            ],
        ],
    })
}
