//! Affine pixel/geocoordinate mapping.

use geotiff_decoder::RasterImage;
use zonal_common::{ZonalError, ZonalResult};

/// GDAL-style geotransform coefficients:
/// `[origin_x, pixel_width, rot_x, origin_y, rot_y, -pixel_height]`.
///
/// The Y scale is negative because raster rows increase downward while
/// geographic Y increases upward. Only axis-aligned (no-rotation)
/// transforms are supported by this engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

/// A geocoordinate produced by the forward mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

/// A raster grid position produced by the inverse mapping. May be
/// negative or past the raster edge when the input coordinate lies
/// outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCol {
    pub row: i64,
    pub col: i64,
}

impl GeoTransform {
    /// Create a transform from raw coefficients.
    pub fn new(coefficients: [f64; 6]) -> Self {
        Self(coefficients)
    }

    /// Derive the transform from a decoded raster's tie point and pixel
    /// scale.
    ///
    /// Fails with `UnsupportedRasterGeometry` when the image carries no
    /// geometry metadata, or when its model transformation matrix has
    /// rotation terms.
    pub fn from_image(image: &RasterImage) -> ZonalResult<Self> {
        if let Some(matrix) = &image.model_transformation {
            if matrix.len() >= 8 {
                // Row-major 4x4: [sx, rx, _, tx, ry, -sy, _, ty, ...]
                if matrix[1] != 0.0 || matrix[4] != 0.0 {
                    return Err(ZonalError::unsupported_geometry(
                        "model transformation contains rotation terms",
                    ));
                }
                return Ok(Self([
                    matrix[3], matrix[0], 0.0, matrix[7], 0.0, matrix[5],
                ]));
            }
        }

        let tie = image.tie_point.ok_or_else(|| {
            ZonalError::unsupported_geometry("image has no ModelTiepoint")
        })?;
        let [sx, sy, _] = image.pixel_scale.ok_or_else(|| {
            ZonalError::unsupported_geometry("image has no ModelPixelScale")
        })?;

        // Anchor the grid at pixel (0, 0); tie points are almost always
        // given there but the general form is handled anyway.
        let origin_x = tie.x - tie.i * sx;
        let origin_y = tie.y + tie.j * sy;

        Ok(Self([origin_x, sx, 0.0, origin_y, 0.0, -sy]))
    }

    /// Map a flat pixel index to its geocoordinate, using `width` as the
    /// row stride. The coordinate is the pixel's grid position, not its
    /// center.
    pub fn pixel_to_geo(&self, index: usize, width: usize) -> GeoPoint {
        let t = &self.0;
        let col = (index % width) as f64;
        let row = (index / width) as f64;
        GeoPoint {
            x: t[0] + col * t[1] + row * t[2],
            y: t[3] + col * t[4] + row * t[5],
        }
    }

    /// Map a geocoordinate to the nearest raster row/column.
    ///
    /// Fails with `RotatedTransformUnsupported` when the off-diagonal
    /// terms are non-zero; the inverse is only implemented for
    /// axis-aligned transforms.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> ZonalResult<RowCol> {
        let t = &self.0;
        if t[2] + t[4] != 0.0 {
            return Err(ZonalError::RotatedTransformUnsupported);
        }
        Ok(RowCol {
            col: ((x - t[0]) / t[1] + 0.5).floor() as i64,
            row: ((y - t[3]) / t[5] + 0.5).floor() as i64,
        })
    }

    /// The raw coefficients.
    pub fn coefficients(&self) -> &[f64; 6] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotiff_decoder::{SampleFormat, TiePoint};

    fn image(
        tie_point: Option<TiePoint>,
        pixel_scale: Option<[f64; 3]>,
        model_transformation: Option<Vec<f64>>,
    ) -> RasterImage {
        RasterImage {
            width: 4,
            height: 4,
            bits_per_sample: 64,
            sample_format: SampleFormat::Float,
            pixel_scale,
            tie_point,
            model_transformation,
            no_data: None,
        }
    }

    fn anchored(x: f64, y: f64) -> TiePoint {
        TiePoint {
            i: 0.0,
            j: 0.0,
            k: 0.0,
            x,
            y,
            z: 0.0,
        }
    }

    #[test]
    fn test_from_image_negates_y_scale() {
        let image = image(Some(anchored(10.0, 50.0)), Some([0.5, 0.25, 0.0]), None);
        let transform = GeoTransform::from_image(&image).unwrap();
        assert_eq!(
            transform.coefficients(),
            &[10.0, 0.5, 0.0, 50.0, 0.0, -0.25]
        );
    }

    #[test]
    fn test_from_image_missing_metadata() {
        let err = GeoTransform::from_image(&image(None, None, None)).unwrap_err();
        assert!(matches!(err, ZonalError::UnsupportedRasterGeometry(_)));
    }

    #[test]
    fn test_from_image_rejects_rotation() {
        let matrix = vec![1.0, 0.2, 0.0, 10.0, 0.0, -1.0, 0.0, 50.0];
        let err = GeoTransform::from_image(&image(None, None, Some(matrix))).unwrap_err();
        assert!(matches!(err, ZonalError::UnsupportedRasterGeometry(_)));
    }

    #[test]
    fn test_pixel_to_geo_row_major() {
        let transform = GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0]);
        // index 5 in a 4-wide raster is col 1, row 1
        let point = transform.pixel_to_geo(5, 4);
        assert_eq!(point.x, 1.0);
        assert_eq!(point.y, 3.0);
    }

    #[test]
    fn test_geo_to_pixel_rounds_to_nearest() {
        let transform = GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0]);
        let rc = transform.geo_to_pixel(1.4, 2.6).unwrap();
        assert_eq!(rc.col, 1);
        assert_eq!(rc.row, 1);

        // Coordinates left of / above the origin go negative.
        let rc = transform.geo_to_pixel(-2.0, 6.0).unwrap();
        assert_eq!(rc.col, -2);
        assert_eq!(rc.row, -2);
    }

    #[test]
    fn test_geo_to_pixel_rejects_rotation() {
        let transform = GeoTransform::new([0.0, 1.0, 0.1, 4.0, 0.1, -1.0]);
        let err = transform.geo_to_pixel(1.0, 1.0).unwrap_err();
        assert!(matches!(err, ZonalError::RotatedTransformUnsupported));
    }
}
