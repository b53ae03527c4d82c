//! Per-zone analysis driver: fans the aggregation out over boundary
//! features and assembles the result collection, legend, and table.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zonal_common::{
    AdminCodeIndex, Extent, Feature, FeatureCollection, LegendStop, ZonalResult,
};

use crate::geometry::{feature_intersects_image, pixels_in_feature};
use crate::legend::create_legend_from_features;
use crate::stats::{scale_value_if_defined, threshold_or_nan, Operation, Threshold};
use crate::table::TableRow;
use crate::transform::GeoTransform;

/// Property key under which a matched baseline value is attached to
/// result features.
pub const BASELINE_PROPERTY: &str = "baseline_value";

/// Property names to read off each boundary feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryFields {
    pub admin_code: String,
    pub name: String,
    pub local_name: String,
}

/// How pixel values are cleaned and the aggregate is filtered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AggregationParams {
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    #[serde(default)]
    pub threshold: Threshold,
}

/// A decoded raster positioned in geographic space.
pub struct RasterInput<'a> {
    pub pixels: &'a geotiff_decoder::PixelBuffer,
    pub transform: &'a GeoTransform,
    pub extent: Extent,
    pub no_data: Option<f64>,
}

/// Output of [`analyze`]: surviving features with the statistic (and any
/// baseline value) attached, the derived legend, and the flat table.
pub struct AnalysisResult {
    pub operation: Operation,
    pub features: FeatureCollection,
    pub legend: Vec<LegendStop>,
    pub table: Vec<TableRow>,
}

/// Compute a zonal statistic for every boundary feature.
///
/// Features whose bounding box misses the raster, or whose aggregate
/// fails the threshold, are dropped. Survivor order follows the input
/// collection. The baseline index, when provided, is probed with each
/// feature's admin code and the matched value is attached under
/// [`BASELINE_PROPERTY`].
pub fn analyze(
    boundaries: &FeatureCollection,
    raster: &RasterInput<'_>,
    operation: Operation,
    params: &AggregationParams,
    fields: &BoundaryFields,
    baseline: Option<&AdminCodeIndex>,
) -> ZonalResult<AnalysisResult> {
    debug!(
        features = boundaries.features.len(),
        operation = operation.name(),
        "starting zonal analysis"
    );

    let per_feature: Vec<Option<(Feature, TableRow)>> = boundaries
        .features
        .par_iter()
        .map(|feature| aggregate_feature(feature, raster, operation, params, fields, baseline))
        .collect::<ZonalResult<_>>()?;

    let mut features = Vec::new();
    let mut table = Vec::new();
    for (feature, row) in per_feature.into_iter().flatten() {
        features.push(feature);
        table.push(row);
    }

    let legend = create_legend_from_features(&features, operation.name());
    info!(
        survivors = features.len(),
        dropped = boundaries.features.len() - features.len(),
        "zonal analysis complete"
    );

    Ok(AnalysisResult {
        operation,
        features: FeatureCollection::from_features(features),
        legend,
        table,
    })
}

fn aggregate_feature(
    feature: &Feature,
    raster: &RasterInput<'_>,
    operation: Operation,
    params: &AggregationParams,
    fields: &BoundaryFields,
    baseline: Option<&AdminCodeIndex>,
) -> ZonalResult<Option<(Feature, TableRow)>> {
    let stat = if feature_intersects_image(&feature.bbox(), &raster.extent) {
        let mut values = pixels_in_feature(feature, raster.pixels, raster.transform)?;
        if let Some(no_data) = raster.no_data {
            values.retain(|&v| v != no_data);
        }
        // Scale/offset transforms the aggregate, not the pixels; for
        // sum the two are not equivalent.
        scale_value_if_defined(operation.apply(&values), params.scale, params.offset)
    } else {
        f64::NAN
    };

    let value = threshold_or_nan(stat, &params.threshold);
    if value.is_nan() {
        return Ok(None);
    }

    let admin_code = feature
        .string_property(&fields.admin_code)
        .unwrap_or_default()
        .to_string();
    let baseline_value = baseline
        .and_then(|index| index.lookup(&admin_code))
        .and_then(|record| record.numeric_value());

    let mut result = feature.clone().with_property(operation.name(), value);
    if let Some(baseline_value) = baseline_value {
        result = result.with_property(BASELINE_PROPERTY, baseline_value);
    }

    let row = TableRow {
        admin_code,
        name: feature
            .string_property(&fields.name)
            .unwrap_or_default()
            .to_string(),
        local_name: feature
            .string_property(&fields.local_name)
            .unwrap_or_default()
            .to_string(),
        value,
        baseline: baseline_value,
    };

    Ok(Some((result, row)))
}
