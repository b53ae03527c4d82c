//! Error types for zonal-stats operations.

use thiserror::Error;

/// Result type alias using ZonalError.
pub type ZonalResult<T> = Result<T, ZonalError>;

/// Primary error type for zonal aggregation operations.
///
/// All variants are fatal for the single request they occur in. None of
/// them leave shared state behind, so a failed date/extent/layer
/// combination never blocks aggregation of a different one.
#[derive(Debug, Error)]
pub enum ZonalError {
    /// The extent is non-canonical (min > max) or wraps the antimeridian.
    /// Wrapping extents are rejected, never normalized.
    #[error("malformed extent: {0}")]
    MalformedExtent(String),

    /// The raster carries geometry metadata this engine does not support
    /// (missing tie point / pixel scale, or a rotated model transform).
    #[error("unsupported raster geometry: {0}")]
    UnsupportedRasterGeometry(String),

    /// The affine transform contains rotation terms. Inverse mapping is
    /// only implemented for axis-aligned transforms.
    #[error("transform contains rotations, inverse mapping is not implemented")]
    RotatedTransformUnsupported,

    /// Transport failure fetching the raster. Retry policy belongs to the
    /// caller, not this engine.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The raster payload is corrupt or uses an unsupported encoding.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Aggregation was invoked before boundary reference data was loaded.
    #[error("boundary layer not loaded")]
    BoundaryNotLoaded,
}

impl ZonalError {
    /// Create a MalformedExtent error.
    pub fn malformed_extent(msg: impl Into<String>) -> Self {
        Self::MalformedExtent(msg.into())
    }

    /// Create an UnsupportedRasterGeometry error.
    pub fn unsupported_geometry(msg: impl Into<String>) -> Self {
        Self::UnsupportedRasterGeometry(msg.into())
    }

    /// Create a NetworkError.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a DecodeError.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

impl From<serde_json::Error> for ZonalError {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(format!("JSON error: {}", err))
    }
}
