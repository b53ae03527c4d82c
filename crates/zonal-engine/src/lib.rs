//! Zonal statistics engine: maps decoded raster pixels onto boundary
//! polygons and aggregates per-zone statistics.
//!
//! The pipeline is transform (pixel index to geocoordinate), geometry
//! (which pixels fall inside a zone), stats (aggregate and filter), and
//! analysis (fan out over a boundary collection, derive legend and
//! table).

pub mod analysis;
pub mod geometry;
pub mod legend;
pub mod stats;
pub mod table;
pub mod transform;

pub use analysis::{
    analyze, AggregationParams, AnalysisResult, BoundaryFields, RasterInput, BASELINE_PROPERTY,
};
pub use geometry::{
    feature_intersects_image, filter_points_by_feature, pixels_in_feature, point_in_feature,
    RasterPoint,
};
pub use legend::{create_legend_from_features, ANALYSIS_COLORS};
pub use stats::{scale_value_if_defined, threshold_or_nan, Operation, Threshold};
pub use table::{quote_and_escape_cell, to_csv, TableRow};
pub use transform::{GeoPoint, GeoTransform, RowCol};
