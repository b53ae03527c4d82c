//! WCS coverage access: GetCoverage request serialization and async
//! fetch-and-decode of the returned GeoTIFF payloads.

pub mod loader;
pub mod request;

pub use loader::{decode_coverage, LoadedRaster, RasterLoader};
pub use request::{
    number_of_tiles, CoverageRequest, DEFAULT_MAX_PIXELS, DEFAULT_RESOLUTION,
};
