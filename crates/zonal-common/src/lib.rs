//! Common types and utilities shared across all zonal-stats crates.

pub mod baseline;
pub mod error;
pub mod extent;
pub mod geojson;
pub mod style;

pub use baseline::{AdminCodeIndex, BaselineLayer, DataRecord};
pub use error::{ZonalError, ZonalResult};
pub use extent::Extent;
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use style::LegendStop;
