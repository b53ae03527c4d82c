//! Decoded raster image handle and pixel buffer.

use zonal_common::Extent;

/// How sample bytes are to be interpreted (TIFF SampleFormat).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned integer samples (the TIFF default).
    UnsignedInt,
    /// Two's-complement signed integer samples.
    SignedInt,
    /// IEEE floating-point samples.
    Float,
}

/// A GeoTIFF model tie point: pixel `(i, j, k)` maps to geocoordinate
/// `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiePoint {
    pub i: f64,
    pub j: f64,
    pub k: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Opaque handle over a decoded single-band GeoTIFF.
///
/// Immutable once decoded. Geometry metadata (tie point, pixel scale) is
/// optional at this layer; deriving a transform from an image without it
/// is an error reported upstream.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Bits per sample (8, 16, 32, or 64).
    pub bits_per_sample: u16,
    /// Sample interpretation.
    pub sample_format: SampleFormat,
    /// Per-axis pixel scale `[sx, sy, sz]` from ModelPixelScale.
    pub pixel_scale: Option<[f64; 3]>,
    /// First model tie point (upper-left corner anchor).
    pub tie_point: Option<TiePoint>,
    /// Full 4x4 model transformation matrix, present instead of (or
    /// alongside) tie point + scale in rasters that may be rotated.
    pub model_transformation: Option<Vec<f64>>,
    /// No-data sentinel from GDAL_NODATA, if present.
    pub no_data: Option<f64>,
}

impl RasterImage {
    /// Bytes per pixel for the single band.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_sample as usize / 8
    }

    /// Geographic bounding box `[min_x, min_y, max_x, max_y]` derived
    /// from the tie point and pixel scale. `None` when the image carries
    /// no geometry metadata.
    pub fn geo_extent(&self) -> Option<Extent> {
        let tie = self.tie_point?;
        let [sx, sy, _] = self.pixel_scale?;

        // Anchor the raster grid at pixel (0, 0); tie points are almost
        // always given there but the general form is handled anyway.
        let origin_x = tie.x - tie.i * sx;
        let origin_y = tie.y + tie.j * sy;

        Some(Extent::new(
            origin_x,
            origin_y - self.height as f64 * sy,
            origin_x + self.width as f64 * sx,
            origin_y,
        ))
    }
}

/// Flat single-band sample buffer, logically 2-D via row-major arithmetic
/// with `width` as stride.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    /// Sample values in row-major order, length = width * height.
    pub data: Vec<f64>,
    /// Row stride in samples.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl PixelBuffer {
    /// Get the value at a column/row position.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_geo() -> RasterImage {
        RasterImage {
            width: 4,
            height: 4,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
            pixel_scale: Some([1.0, 1.0, 0.0]),
            tie_point: Some(TiePoint {
                i: 0.0,
                j: 0.0,
                k: 0.0,
                x: 10.0,
                y: 50.0,
                z: 0.0,
            }),
            model_transformation: None,
            no_data: None,
        }
    }

    #[test]
    fn test_geo_extent() {
        let extent = image_with_geo().geo_extent().unwrap();
        assert_eq!(extent.min_x, 10.0);
        assert_eq!(extent.min_y, 46.0);
        assert_eq!(extent.max_x, 14.0);
        assert_eq!(extent.max_y, 50.0);
    }

    #[test]
    fn test_geo_extent_missing_metadata() {
        let mut image = image_with_geo();
        image.pixel_scale = None;
        assert!(image.geo_extent().is_none());
    }

    #[test]
    fn test_pixel_buffer_access() {
        let buffer = PixelBuffer {
            data: (0..12).map(|v| v as f64).collect(),
            width: 4,
            height: 3,
        };
        assert_eq!(buffer.get(0, 0), Some(0.0));
        assert_eq!(buffer.get(3, 2), Some(11.0));
        assert_eq!(buffer.get(4, 0), None);
        assert_eq!(buffer.get(0, 3), None);
    }
}
