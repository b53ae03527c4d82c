//! Aggregation operations and value transforms.

use serde::{Deserialize, Serialize};

/// Statistic computed over the pixel values of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Min,
    Max,
    Mean,
    Median,
    Sum,
}

impl Operation {
    /// Lowercase name, used for result property keys and table headers.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::Mean => "mean",
            Operation::Median => "median",
            Operation::Sum => "sum",
        }
    }

    /// Apply the statistic to a set of values. `Sum` of an empty set is
    /// zero; the other operations yield NaN so the zone can be dropped.
    pub fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return match self {
                Operation::Sum => 0.0,
                _ => f64::NAN,
            };
        }
        match self {
            Operation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Operation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Operation::Sum => values.iter().sum(),
            Operation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Operation::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 1 {
                    sorted[mid]
                } else {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                }
            }
        }
    }
}

/// Inclusive bounds a zone statistic must satisfy to be kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub above: Option<f64>,
    pub below: Option<f64>,
}

/// NaN when the value falls outside the threshold, unchanged otherwise.
/// `above` is a lower bound (value must be >= it), `below` an upper
/// bound (value must be <= it).
pub fn threshold_or_nan(value: f64, threshold: &Threshold) -> f64 {
    let above_ok = threshold.above.map_or(true, |t| value >= t);
    let below_ok = threshold.below.map_or(true, |t| value <= t);
    if above_ok && below_ok {
        value
    } else {
        f64::NAN
    }
}

/// Apply `raw * scale + offset`, but only when BOTH are configured.
/// A partial configuration leaves the value untouched.
pub fn scale_value_if_defined(raw: f64, scale: Option<f64>, offset: Option<f64>) -> f64 {
    match (scale, offset) {
        (Some(scale), Some(offset)) => raw * scale + offset,
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(Operation::Median.apply(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(Operation::Median.apply(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(Operation::Mean.apply(&[2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn test_min_max() {
        let values = [5.0, -1.0, 3.0];
        assert_eq!(Operation::Min.apply(&values), -1.0);
        assert_eq!(Operation::Max.apply(&values), 5.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(Operation::Sum.apply(&[]), 0.0);
        assert!(Operation::Mean.apply(&[]).is_nan());
        assert!(Operation::Median.apply(&[]).is_nan());
        assert!(Operation::Min.apply(&[]).is_nan());
    }

    #[test]
    fn test_threshold_above_is_inclusive() {
        let threshold = Threshold { above: Some(10.0), below: None };
        assert!(threshold_or_nan(9.999, &threshold).is_nan());
        assert_eq!(threshold_or_nan(10.0, &threshold), 10.0);
    }

    #[test]
    fn test_threshold_below_is_inclusive() {
        let threshold = Threshold { above: None, below: Some(5.0) };
        assert_eq!(threshold_or_nan(5.0, &threshold), 5.0);
        assert!(threshold_or_nan(5.001, &threshold).is_nan());
    }

    #[test]
    fn test_threshold_band_requires_both_bounds() {
        let band = Threshold { above: Some(10.0), below: Some(20.0) };
        assert!(threshold_or_nan(9.0, &band).is_nan());
        assert_eq!(threshold_or_nan(15.0, &band), 15.0);
        assert!(threshold_or_nan(20.5, &band).is_nan());
        // Bounds themselves are in the band.
        assert_eq!(threshold_or_nan(10.0, &band), 10.0);
        assert_eq!(threshold_or_nan(20.0, &band), 20.0);
    }

    #[test]
    fn test_scale_requires_both_parameters() {
        assert_eq!(scale_value_if_defined(600.0, Some(0.1), Some(-50.0)), 10.0);
        assert_eq!(scale_value_if_defined(600.0, Some(0.1), None), 600.0);
        assert_eq!(scale_value_if_defined(600.0, None, Some(-50.0)), 600.0);
    }

    #[test]
    fn test_operation_serde_names() {
        let op: Operation = serde_json::from_str("\"median\"").unwrap();
        assert_eq!(op, Operation::Median);
        assert_eq!(serde_json::to_string(&Operation::Sum).unwrap(), "\"sum\"");
    }
}
