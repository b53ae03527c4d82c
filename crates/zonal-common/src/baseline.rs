//! Baseline (admin-level) data layers and admin-code lookup.
//!
//! A baseline layer pairs tabular per-admin-unit records with the boundary
//! features they describe. Admin codes are hierarchical strings where a
//! shorter code is a prefix of every descendant code, so records are
//! matched to boundaries by prefix, not equality.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{ZonalError, ZonalResult};
use crate::geojson::{Feature, FeatureCollection};

/// One baseline record: a value attached to an admin boundary code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataRecord {
    /// Refers to a specific admin boundary feature. May sit at a coarser
    /// admin level than the boundaries it is matched against.
    pub admin_key: String,

    /// Raw value; servers deliver numbers, numeric strings, or null.
    pub value: Value,
}

impl DataRecord {
    /// Coerce the raw value to a number. Strings are parsed, null and
    /// non-numeric values yield `None`.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Prefix-match index over baseline records, built once per layer.
///
/// The lookup is behaviorally equivalent to a linear scan returning the
/// first record whose `admin_key` is a prefix of the boundary code:
/// when several records match via prefix, the earliest record in input
/// order wins. Admin codes are short, so the lookup probes each prefix
/// of the boundary code against a hash map instead of scanning every
/// record.
#[derive(Debug, Clone)]
pub struct AdminCodeIndex {
    records: Vec<DataRecord>,
    // admin_key -> earliest position in `records`
    by_key: HashMap<String, usize>,
}

impl AdminCodeIndex {
    /// Build the index from records in their original order.
    pub fn new(records: impl IntoIterator<Item = DataRecord>) -> Self {
        let records: Vec<DataRecord> = records.into_iter().collect();
        let mut by_key = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            by_key.entry(record.admin_key.clone()).or_insert(pos);
        }
        Self { records, by_key }
    }

    /// Find the first record (in input order) whose admin key is a prefix
    /// of `boundary_code`.
    pub fn lookup(&self, boundary_code: &str) -> Option<&DataRecord> {
        let mut best: Option<usize> = None;
        for end in 1..=boundary_code.len() {
            if !boundary_code.is_char_boundary(end) {
                continue;
            }
            if let Some(&pos) = self.by_key.get(&boundary_code[..end]) {
                best = Some(best.map_or(pos, |b: usize| b.min(pos)));
            }
        }
        best.map(|pos| &self.records[pos])
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A baseline data layer: boundary features annotated with baseline
/// values, plus the flat records they were derived from.
#[derive(Debug, Clone)]
pub struct BaselineLayer {
    /// Boundary features that matched a baseline record, each annotated
    /// with the record value under `data` and the configured data field.
    pub features: FeatureCollection,

    /// The baseline records in server order.
    pub records: Vec<DataRecord>,
}

impl BaselineLayer {
    /// Assemble a baseline layer from raw server rows and loaded
    /// boundaries.
    ///
    /// Fails with `BoundaryNotLoaded` when invoked before the boundary
    /// reference data is available; this is a precondition violation and
    /// is never silently recovered.
    pub fn build(
        rows: &[Map<String, Value>],
        admin_code_field: &str,
        data_field: &str,
        boundaries: Option<&FeatureCollection>,
    ) -> ZonalResult<Self> {
        let boundaries = boundaries.ok_or(ZonalError::BoundaryNotLoaded)?;

        let records: Vec<DataRecord> = rows
            .iter()
            .filter_map(|row| {
                let admin_key = row.get(admin_code_field)?.as_str()?.to_string();
                let value = row.get(data_field).cloned().unwrap_or(Value::Null);
                Some(DataRecord { admin_key, value })
            })
            .collect();

        let index = AdminCodeIndex::new(records.clone());

        let features: Vec<Feature> = boundaries
            .features
            .iter()
            .filter_map(|feature| {
                let code = feature.string_property(admin_code_field)?;
                let record = index.lookup(code)?;
                let value = record.numeric_value()?;
                Some(
                    feature
                        .clone()
                        .with_property("data", value)
                        .with_property(data_field, value),
                )
            })
            .collect();

        Ok(Self {
            features: FeatureCollection::from_features(features),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(key: &str, value: Value) -> DataRecord {
        DataRecord {
            admin_key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_numeric_value_coercion() {
        assert_eq!(record("01", json!(42)).numeric_value(), Some(42.0));
        assert_eq!(record("01", json!("3.5")).numeric_value(), Some(3.5));
        assert_eq!(record("01", Value::Null).numeric_value(), None);
        assert_eq!(record("01", json!("n/a")).numeric_value(), None);
    }

    #[test]
    fn test_prefix_lookup() {
        let index = AdminCodeIndex::new(vec![
            record("15", json!(1)),
            record("23", json!(2)),
        ]);

        // "1501" descends from "15"
        assert_eq!(index.lookup("1501").unwrap().admin_key, "15");
        assert_eq!(index.lookup("2304").unwrap().admin_key, "23");
        assert!(index.lookup("99").is_none());
    }

    #[test]
    fn test_first_match_wins_over_longer_prefix() {
        // Both "15" and "1501" are prefixes of "150102". The earliest
        // record in input order wins, matching a linear first-match scan.
        let index = AdminCodeIndex::new(vec![
            record("15", json!("province")),
            record("1501", json!("district")),
        ]);
        assert_eq!(index.lookup("150102").unwrap().admin_key, "15");

        let reversed = AdminCodeIndex::new(vec![
            record("1501", json!("district")),
            record("15", json!("province")),
        ]);
        assert_eq!(reversed.lookup("150102").unwrap().admin_key, "1501");
    }

    #[test]
    fn test_build_requires_boundaries() {
        let err = BaselineLayer::build(&[], "code", "pop", None).unwrap_err();
        assert!(matches!(err, ZonalError::BoundaryNotLoaded));
    }
}
