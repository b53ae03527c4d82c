//! Equal-interval legend derivation over computed zone statistics.

use zonal_common::{Feature, LegendStop};

/// Sequential red ramp used for analysis results, light to dark.
pub const ANALYSIS_COLORS: [&str; 5] =
    ["#fee5d9", "#fcae91", "#fb6a4a", "#de2d26", "#a50f15"];

/// Build an equal-interval legend from the named statistic property of
/// the result features.
///
/// Breakpoints are `ceil(min + (i + 1) * delta)` for each color band,
/// clamped to the observed maximum; duplicate breakpoints produced by
/// narrow value ranges are collapsed so stops stay strictly ascending.
/// Features without the property, or with a NaN value, are ignored. An
/// empty value set yields an empty legend.
pub fn create_legend_from_features(features: &[Feature], stat_key: &str) -> Vec<LegendStop> {
    let values: Vec<f64> = features
        .iter()
        .filter_map(|f| f.numeric_property(stat_key))
        .filter(|v| !v.is_nan())
        .collect();
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let delta = (max - min) / ANALYSIS_COLORS.len() as f64;

    let mut stops: Vec<LegendStop> = Vec::with_capacity(ANALYSIS_COLORS.len());
    for (i, color) in ANALYSIS_COLORS.iter().enumerate() {
        let breakpoint = (min + (i + 1) as f64 * delta).ceil().min(max);
        if stops.last().map_or(true, |last| breakpoint > last.value) {
            stops.push(LegendStop {
                value: breakpoint,
                color: (*color).to_string(),
            });
        }
    }
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonal_common::Geometry;

    fn feature_with_value(key: &str, value: f64) -> Feature {
        Feature::new(Geometry::Polygon {
            coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        })
        .with_property(key, value)
    }

    #[test]
    fn test_five_stops_over_wide_range() {
        let features: Vec<Feature> = [0.0, 100.0]
            .iter()
            .map(|&v| feature_with_value("stats_mean", v))
            .collect();
        let legend = create_legend_from_features(&features, "stats_mean");
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0].value, 20.0);
        assert_eq!(legend[4].value, 100.0);
        assert_eq!(legend[0].color, "#fee5d9");
        assert_eq!(legend[4].color, "#a50f15");
    }

    #[test]
    fn test_breakpoints_are_ceiled_and_clamped() {
        let features: Vec<Feature> = [1.0, 2.0]
            .iter()
            .map(|&v| feature_with_value("stats_mean", v))
            .collect();
        let legend = create_legend_from_features(&features, "stats_mean");
        // delta = 0.2; ceiled breakpoints collapse to a single 2.0 stop.
        assert_eq!(legend.len(), 1);
        assert_eq!(legend[0].value, 2.0);
    }

    #[test]
    fn test_nan_and_missing_values_ignored() {
        let mut features = vec![
            feature_with_value("stats_mean", f64::NAN),
            Feature::new(Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            }),
        ];
        assert!(create_legend_from_features(&features, "stats_mean").is_empty());

        features.push(feature_with_value("stats_mean", 10.0));
        features.push(feature_with_value("stats_mean", 60.0));
        let legend = create_legend_from_features(&features, "stats_mean");
        assert_eq!(legend[0].value, 20.0);
    }
}
