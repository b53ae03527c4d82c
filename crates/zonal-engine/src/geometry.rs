//! Point-in-polygon tests and raster pixel selection.

use geotiff_decoder::PixelBuffer;
use zonal_common::{Extent, Feature, Geometry, ZonalResult};

use crate::transform::GeoTransform;

/// A raster pixel placed at its geocoordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Edge-in-range overlap test between a feature's bounding box and the
/// image extent. A feature counts as intersecting when either of its X
/// edges lies within the image's X span and either of its Y edges lies
/// within the image's Y span.
pub fn feature_intersects_image(feature_bbox: &Extent, image_bbox: &Extent) -> bool {
    let in_x = |v: f64| v >= image_bbox.min_x && v <= image_bbox.max_x;
    let in_y = |v: f64| v >= image_bbox.min_y && v <= image_bbox.max_y;
    (in_x(feature_bbox.min_x) || in_x(feature_bbox.max_x))
        && (in_y(feature_bbox.min_y) || in_y(feature_bbox.max_y))
}

/// Ray-cast a point against a single ring. `ignore_boundary` controls
/// whether a point lying exactly on an edge counts as inside.
///
/// Closed rings (first vertex repeated at the end) have the duplicate
/// endpoint dropped before iteration.
fn in_ring(x: f64, y: f64, ring: &[[f64; 2]], ignore_boundary: bool) -> bool {
    let mut ring = ring;
    if ring.len() > 1 && ring[0] == ring[ring.len() - 1] {
        ring = &ring[..ring.len() - 1];
    }
    if ring.is_empty() {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];

        let on_boundary = y * (xi - xj) + yi * (xj - x) + yj * (x - xi) == 0.0
            && (xi - x) * (xj - x) <= 0.0
            && (yi - y) * (yj - y) <= 0.0;
        if on_boundary {
            return !ignore_boundary;
        }

        let intersects =
            (yi > y) != (yj > y) && x < ((xj - xi) * (y - yi)) / (yj - yi) + xi;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True when the point lies inside the polygon described by `rings`
/// (outer ring first, holes after). Points on the outer boundary are
/// inside; points on a hole boundary are also inside.
fn in_polygon(x: f64, y: f64, rings: &[Vec<[f64; 2]>]) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    if !in_ring(x, y, outer, false) {
        return false;
    }
    for hole in &rings[1..] {
        if in_ring(x, y, hole, true) {
            return false;
        }
    }
    true
}

/// Exact containment test against a feature's geometry. MultiPolygons
/// accept a point inside any member polygon.
pub fn point_in_feature(x: f64, y: f64, geometry: &Geometry) -> bool {
    geometry
        .polygons()
        .iter()
        .any(|rings| in_polygon(x, y, rings))
}

/// Filter raster points down to those inside the feature, using a
/// strict bounding-box pre-filter before the exact polygon test.
pub fn filter_points_by_feature(points: &[RasterPoint], feature: &Feature) -> Vec<RasterPoint> {
    let bbox = feature.bbox();
    points
        .iter()
        .filter(|p| {
            p.x > bbox.min_x
                && p.x < bbox.max_x
                && p.y > bbox.min_y
                && p.y < bbox.max_y
                && point_in_feature(p.x, p.y, &feature.geometry)
        })
        .copied()
        .collect()
}

/// Collect the pixel values falling inside a feature.
///
/// The feature's bounding box is mapped to a row/column window (clamped
/// to the raster edges), then each pixel in the window is tested
/// against the exact geometry at its geocoordinate.
pub fn pixels_in_feature(
    feature: &Feature,
    pixels: &PixelBuffer,
    transform: &GeoTransform,
) -> ZonalResult<Vec<f64>> {
    let bbox = feature.bbox();

    // Top-left geocorner maps to the starting row/col, bottom-right to
    // the ending row/col.
    let start = transform.geo_to_pixel(bbox.min_x, bbox.max_y)?;
    let end = transform.geo_to_pixel(bbox.max_x, bbox.min_y)?;

    let clamp = |v: i64, max: usize| v.clamp(0, max as i64) as usize;
    let start_row = clamp(start.row, pixels.height);
    let end_row = clamp(end.row, pixels.height);
    let start_col = clamp(start.col, pixels.width);
    let end_col = clamp(end.col, pixels.width);

    let mut values = Vec::new();
    for row in start_row..end_row {
        let offset = row * pixels.width;
        for col in start_col..end_col {
            let index = offset + col;
            let point = transform.pixel_to_geo(index, pixels.width);
            if point_in_feature(point.x, point.y, &feature.geometry) {
                values.push(pixels.data[index]);
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<[f64; 2]> {
        vec![[min, min], [max, min], [max, max], [min, max], [min, min]]
    }

    #[test]
    fn test_point_in_simple_square() {
        let rings = vec![square(0.0, 4.0)];
        assert!(in_polygon(2.0, 2.0, &rings));
        assert!(!in_polygon(5.0, 2.0, &rings));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let rings = vec![square(0.0, 4.0)];
        assert!(in_polygon(0.0, 2.0, &rings));
        assert!(in_polygon(4.0, 4.0, &rings));
    }

    #[test]
    fn test_hole_excludes_interior() {
        let rings = vec![square(0.0, 10.0), square(4.0, 6.0)];
        assert!(!in_polygon(5.0, 5.0, &rings));
        assert!(in_polygon(2.0, 2.0, &rings));
        // Points on a hole's boundary stay inside the polygon.
        assert!(in_polygon(4.0, 5.0, &rings));
    }

    #[test]
    fn test_multipolygon_any_member() {
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![vec![square(0.0, 1.0)], vec![square(10.0, 11.0)]],
        };
        assert!(point_in_feature(0.5, 0.5, &geometry));
        assert!(point_in_feature(10.5, 10.5, &geometry));
        assert!(!point_in_feature(5.0, 5.0, &geometry));
    }

    #[test]
    fn test_intersects_edge_in_range() {
        let image = Extent::new(0.0, 0.0, 10.0, 10.0);
        let inside = Extent::new(2.0, 2.0, 8.0, 8.0);
        let straddling = Extent::new(8.0, 8.0, 12.0, 12.0);
        let outside = Extent::new(20.0, 20.0, 30.0, 30.0);
        assert!(feature_intersects_image(&inside, &image));
        assert!(feature_intersects_image(&straddling, &image));
        assert!(!feature_intersects_image(&outside, &image));
    }

    #[test]
    fn test_filter_points_strict_bbox() {
        let feature = Feature::new(Geometry::Polygon {
            coordinates: vec![square(0.0, 4.0)],
        });
        let points = vec![
            RasterPoint { x: 2.0, y: 2.0, value: 1.0 },
            // On the bbox edge, dropped by the strict pre-filter.
            RasterPoint { x: 0.0, y: 2.0, value: 2.0 },
            RasterPoint { x: 9.0, y: 9.0, value: 3.0 },
        ];
        let kept = filter_points_by_feature(&points, &feature);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, 1.0);
    }

    #[test]
    fn test_pixels_in_aligned_square() {
        // 4x4 raster, origin (0, 4), 1x1 pixels; values 1..=16.
        let pixels = PixelBuffer {
            data: (1..=16).map(|v| v as f64).collect(),
            width: 4,
            height: 4,
        };
        let transform = GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0]);
        let feature = Feature::new(Geometry::Polygon {
            coordinates: vec![vec![
                [0.0, 2.0],
                [2.0, 2.0],
                [2.0, 4.0],
                [0.0, 4.0],
                [0.0, 2.0],
            ]],
        });
        let values = pixels_in_feature(&feature, &pixels, &transform).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_pixels_clamped_to_raster() {
        let pixels = PixelBuffer {
            data: vec![7.0; 4],
            width: 2,
            height: 2,
        };
        let transform = GeoTransform::new([0.0, 1.0, 0.0, 2.0, 0.0, -1.0]);
        // Feature extends far beyond the raster in every direction.
        let feature = Feature::new(Geometry::Polygon {
            coordinates: vec![square(-10.0, 10.0)],
        });
        let values = pixels_in_feature(&feature, &pixels, &transform).unwrap();
        assert_eq!(values.len(), 4);
    }
}
