//! GeoJSON types for administrative boundary data.
//!
//! Boundary collections are loaded once per session and treated as
//! read-only reference data. Aggregation never mutates boundary geometry;
//! computed properties are attached to copies of the original features.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extent::Extent;

/// A GeoJSON FeatureCollection of boundary polygons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of boundary features.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Create a FeatureCollection from a list of features.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature: one administrative boundary polygon with its
/// property bag.
///
/// The property bag is expected to carry a unique admin code string plus
/// the human-readable admin-level names the caller wants echoed in
/// results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// The polygon or multi-polygon geometry of this boundary.
    pub geometry: Geometry,

    /// Properties, including the admin code and display names.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a feature from a geometry with empty properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry,
            properties: Map::new(),
        }
    }

    /// Set a property, consuming and returning the feature.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a string property, e.g. the admin code.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Look up a numeric property.
    pub fn numeric_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Axis-aligned bounding box of the feature geometry.
    pub fn bbox(&self) -> Extent {
        self.geometry.bbox()
    }
}

/// GeoJSON geometry types accepted for boundaries.
///
/// Positions are `[x, y]` pairs; each polygon is a list of rings where
/// the first ring is the outer boundary and the rest are holes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single polygon (outer ring plus optional holes).
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },

    /// Multiple polygons, each with its own rings.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Iterate over the polygons of this geometry as ring lists.
    ///
    /// A `Polygon` yields one entry; a `MultiPolygon` yields one per
    /// member polygon.
    pub fn polygons(&self) -> Vec<&[Vec<[f64; 2]>]> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates.as_slice()],
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(|p| p.as_slice()).collect()
            }
        }
    }

    /// Axis-aligned bounding box over every position in the geometry.
    pub fn bbox(&self) -> Extent {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for rings in self.polygons() {
            for ring in rings {
                for &[x, y] in ring {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        Extent::new(min_x, min_y, max_x, max_y)
    }
}
