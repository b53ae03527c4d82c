//! Legend types for rendering aggregation results.
//!
//! The engine emits legend stops as plain data; rendering them is the
//! caller's concern.

use serde::{Deserialize, Serialize};

/// One legend stop: the upper end of a class interval and its color.
///
/// A legend is an ordered list of stops, strictly ascending by value,
/// mapped 1:1 to display colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegendStop {
    /// The data value at this stop.
    pub value: f64,

    /// Hex color string, e.g. `"#fee5d9"`.
    pub color: String,
}

impl LegendStop {
    /// Create a new legend stop.
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }
}
