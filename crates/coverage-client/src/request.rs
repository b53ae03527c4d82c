//! WCS GetCoverage request serialization.

use chrono::NaiveDate;
use zonal_common::{Extent, ZonalError, ZonalResult};

/// Pixels per degree requested from the coverage server.
pub const DEFAULT_RESOLUTION: u32 = 256;

/// Upper bound on either output dimension of a single request.
pub const DEFAULT_MAX_PIXELS: u32 = 5096;

/// A WCS 1.0.0 GetCoverage request against a single coverage layer.
#[derive(Debug, Clone)]
pub struct CoverageRequest {
    pub base_url: String,
    pub layer: String,
    pub extent: Extent,
    pub time: Option<NaiveDate>,
    /// Pixels per degree.
    pub resolution: u32,
    /// Cap on either requested dimension.
    pub max_pixels: u32,
}

impl CoverageRequest {
    /// Request over an extent with the default resolution and pixel cap.
    pub fn new(base_url: impl Into<String>, layer: impl Into<String>, extent: Extent) -> Self {
        Self {
            base_url: base_url.into(),
            layer: layer.into(),
            extent,
            time: None,
            resolution: DEFAULT_RESOLUTION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Set the `time=` parameter.
    pub fn with_time(mut self, time: NaiveDate) -> Self {
        self.time = Some(time);
        self
    }

    fn validate(&self) -> ZonalResult<()> {
        let e = &self.extent;
        if !e.min_x.is_finite() || !e.min_y.is_finite() || !e.max_x.is_finite() || !e.max_y.is_finite()
        {
            return Err(ZonalError::malformed_extent("non-finite coordinate"));
        }
        // Antimeridian-wrapping extents are rejected, never normalized.
        if e.min_x > e.max_x || e.min_y > e.max_y {
            return Err(ZonalError::malformed_extent(format!(
                "inverted extent [{}, {}, {}, {}]",
                e.min_x, e.min_y, e.max_x, e.max_y
            )));
        }
        Ok(())
    }

    /// Output width and height in pixels: the larger dimension gets
    /// `min(max_pixels, x_range*res, y_range*res)` pixels and the other
    /// scales proportionally, so aspect ratio survives the cap.
    pub fn scaled_size(&self) -> ZonalResult<(u32, u32)> {
        self.validate()?;
        let x_range = self.extent.width();
        let y_range = self.extent.height();
        let res = self.resolution as f64;

        let max_dim = (self.max_pixels as f64)
            .min(x_range * res)
            .min(y_range * res);
        let scale = max_dim / x_range.max(y_range);

        Ok((
            (x_range * scale).ceil() as u32,
            (y_range * scale).ceil() as u32,
        ))
    }

    /// Serialize the single-request form.
    pub fn to_url(&self) -> ZonalResult<String> {
        let (width, height) = self.scaled_size()?;
        Ok(self.url_for(&self.extent, width, height))
    }

    /// Serialize the tiled form: one GetCoverage URL per grid cell of
    /// `pixels_per_tile / resolution` degrees, covering the extent in
    /// row-major order (x fastest). Cell edges come from raw
    /// multiplication, so the last row and column may overshoot the
    /// extent.
    pub fn tile_urls(&self, pixels_per_tile: u32) -> ZonalResult<Vec<String>> {
        self.validate()?;
        let deg_per_tile = pixels_per_tile as f64 / self.resolution as f64;
        let x_tiles = number_of_tiles(self.extent.width(), self.resolution, pixels_per_tile);
        let y_tiles = number_of_tiles(self.extent.height(), self.resolution, pixels_per_tile);

        let mut urls = Vec::with_capacity((x_tiles * y_tiles) as usize);
        for ty in 0..y_tiles {
            for tx in 0..x_tiles {
                let cell = Extent::new(
                    self.extent.min_x + tx as f64 * deg_per_tile,
                    self.extent.min_y + ty as f64 * deg_per_tile,
                    self.extent.min_x + (tx + 1) as f64 * deg_per_tile,
                    self.extent.min_y + (ty + 1) as f64 * deg_per_tile,
                );
                urls.push(self.url_for(&cell, pixels_per_tile, pixels_per_tile));
            }
        }
        Ok(urls)
    }

    fn url_for(&self, extent: &Extent, width: u32, height: u32) -> String {
        let mut url = format!(
            "{}?service=WCS&request=GetCoverage&version=1.0.0&coverage={}&crs=EPSG:4326\
             &bbox={:.1},{:.1},{:.1},{:.1}&width={}&height={}&format=GeoTIFF",
            self.base_url,
            self.layer,
            extent.min_x,
            extent.min_y,
            extent.max_x,
            extent.max_y,
            width,
            height,
        );
        if let Some(time) = self.time {
            url.push_str(&format!("&time={}", time.format("%Y-%m-%d")));
        }
        url
    }
}

/// Tile count needed to cover `range` degrees at `resolution` pixels per
/// degree with tiles of `pixels_per_tile` pixels.
pub fn number_of_tiles(range: f64, resolution: u32, pixels_per_tile: u32) -> u32 {
    (range * resolution as f64 / pixels_per_tile as f64).ceil() as u32
}
