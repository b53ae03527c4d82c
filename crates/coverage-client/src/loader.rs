//! Fetch-and-decode of coverage responses.

use std::time::Duration;

use tracing::{debug, instrument};
use zonal_common::{Extent, ZonalError, ZonalResult};

use geotiff_decoder::{decode, PixelBuffer, RasterImage};
use zonal_engine::{GeoTransform, RasterInput};

/// A fetched coverage, decoded and positioned in geographic space.
#[derive(Debug)]
pub struct LoadedRaster {
    pub image: RasterImage,
    pub pixels: PixelBuffer,
    pub transform: GeoTransform,
    pub extent: Extent,
}

impl LoadedRaster {
    /// Borrow the raster in the form the analysis driver consumes.
    pub fn as_input(&self) -> RasterInput<'_> {
        RasterInput {
            pixels: &self.pixels,
            transform: &self.transform,
            extent: self.extent,
            no_data: self.image.no_data,
        }
    }
}

/// HTTP loader for coverage rasters. One fetch and one decode per call;
/// retries and caching belong to the caller.
pub struct RasterLoader {
    client: reqwest::Client,
}

impl RasterLoader {
    /// Build a loader whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> ZonalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ZonalError::network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch a coverage URL and decode the GeoTIFF payload.
    #[instrument(skip(self))]
    pub async fn load(&self, url: &str) -> ZonalResult<LoadedRaster> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ZonalError::network(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ZonalError::network(e.to_string()))?;

        debug!(bytes = body.len(), "coverage response received");
        decode_coverage(&body)
    }
}

/// Decode coverage bytes into a positioned raster. Split out of the
/// async path so the decode step is testable without a server.
pub fn decode_coverage(body: &[u8]) -> ZonalResult<LoadedRaster> {
    let (image, pixels) = decode(body).map_err(|e| ZonalError::decode(e.to_string()))?;
    let transform = GeoTransform::from_image(&image)?;
    let extent = image
        .geo_extent()
        .ok_or_else(|| ZonalError::unsupported_geometry("coverage has no geo extent"))?;

    Ok(LoadedRaster {
        image,
        pixels,
        transform,
        extent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{encode_geotiff_f64, sequential_grid};

    #[test]
    fn test_decode_coverage_positions_raster() {
        let bytes = encode_geotiff_f64(&sequential_grid(4, 4), 4, 4, (0.0, 4.0), (1.0, 1.0), None);
        let raster = decode_coverage(&bytes).unwrap();

        assert_eq!(raster.extent, Extent::new(0.0, 0.0, 4.0, 4.0));
        let origin = raster.transform.pixel_to_geo(0, 4);
        assert_eq!((origin.x, origin.y), (0.0, 4.0));

        let input = raster.as_input();
        assert_eq!(input.pixels.data.len(), 16);
        assert_eq!(input.no_data, None);
    }

    #[test]
    fn test_decode_coverage_rejects_junk() {
        let err = decode_coverage(b"<ServiceExceptionReport/>").unwrap_err();
        assert!(matches!(err, ZonalError::DecodeError(_)));
    }

    #[test]
    fn test_load_reports_transport_failure() {
        let loader = RasterLoader::new(Duration::from_secs(1)).unwrap();
        let err = tokio_test::block_on(loader.load("not a url")).unwrap_err();
        assert!(matches!(err, ZonalError::NetworkError(_)));
    }
}
