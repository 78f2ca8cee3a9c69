//! Processed aid datasets and the world geometry.
//!
//! The documents are produced by an external aggregation step; their shapes
//! are fixed here and decoded with simd-json.

pub mod loader;
pub mod topology;

use crate::error::{AtlasError, Result};
use crate::geo::GeoFeature;
use crate::index::Role;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

pub const TOTALS_FILE: &str = "country_totals.json";
pub const RECEIVED_FILE: &str = "country_purposes_received.json";
pub const DONATED_FILE: &str = "country_purposes_donated.json";
pub const TOP_PURPOSES_FILE: &str = "purposes_top5.json";
pub const TOP_DONORS_FILE: &str = "top_donors_by_recipient_purpose.json";
pub const CHORD_FILE: &str = "chord_flows.json";
pub const TEMPORAL_FILE: &str = "temporal_purposes.json";

#[derive(Debug, Clone, Deserialize)]
pub struct CountryTotals {
    #[serde(default)]
    pub countries: Vec<CountryTotal>,
}

/// Per-country sums; any `net` in the source is ignored and recomputed
#[derive(Debug, Clone, Deserialize)]
pub struct CountryTotal {
    pub iso2: String,
    #[serde(default)]
    pub donated: f64,
    #[serde(default)]
    pub received: f64,
}

/// iso2 -> purpose -> amount
pub type PurposeBreakdown = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Clone, Deserialize)]
pub struct TopPurposes {
    pub purposes: Vec<String>,
    /// purpose -> iso2 -> received amount
    #[serde(default)]
    pub per_purpose: HashMap<String, HashMap<String, f64>>,
}

/// recipient iso2 -> purpose -> [(donor iso2, amount)], largest first
pub type TopDonors = HashMap<String, HashMap<String, Vec<(String, f64)>>>;

#[derive(Debug, Clone, Deserialize)]
pub struct ChordFlows {
    pub countries: Vec<String>,
    #[serde(default)]
    pub names: HashMap<String, String>,
    #[serde(default)]
    pub roles: HashMap<String, Role>,
    /// matrix[i][j] is the flow from donor i to recipient j
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub totals: HashMap<String, FlowTotals>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FlowTotals {
    #[serde(default)]
    pub donated: f64,
    #[serde(default)]
    pub received: f64,
}

impl ChordFlows {
    /// Reject matrices that are not square over `countries`
    pub fn validate(self) -> Result<Self> {
        let n = self.countries.len();
        if self.matrix.len() != n {
            return Err(AtlasError::InvalidDataset {
                dataset: CHORD_FILE,
                message: format!("{} countries but {} matrix rows", n, self.matrix.len()),
            });
        }
        if let Some((i, row)) = self.matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(AtlasError::InvalidDataset {
                dataset: CHORD_FILE,
                message: format!("row {} has {} columns, expected {}", i, row.len(), n),
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemporalSeries {
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default)]
    pub purposes: Vec<String>,
    #[serde(default)]
    pub data: Vec<TemporalPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemporalPoint {
    pub year: i32,
    pub purpose: String,
    pub amount: f64,
}

/// Decode a JSON document. simd-json parses in place, so the buffer is consumed.
pub fn parse_json<T: DeserializeOwned>(mut bytes: Vec<u8>) -> Result<T> {
    Ok(simd_json::serde::from_slice(&mut bytes)?)
}

/// Everything fetched at startup, each piece succeeding or failing on its own
pub struct Datasets {
    pub totals: Result<CountryTotals>,
    pub received: Result<PurposeBreakdown>,
    pub donated: Result<PurposeBreakdown>,
    pub top_purposes: Result<TopPurposes>,
    pub top_donors: Result<TopDonors>,
    pub chord: Result<ChordFlows>,
    pub temporal: Result<TemporalSeries>,
    pub geometry: Result<Vec<GeoFeature>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_totals_ignores_net() {
        let json = br#"{"countries":[{"iso2":"US","donated":50e9,"received":2e9,"net":1}]}"#;
        let totals: CountryTotals = parse_json(json.to_vec()).unwrap();
        assert_eq!(totals.countries.len(), 1);
        assert_eq!(totals.countries[0].iso2, "US");
        assert_eq!(totals.countries[0].donated, 50e9);
    }

    #[test]
    fn test_parse_top_donors_pairs() {
        let json = br#"{"KE":{"Health":[["US",3.0],["GB",2.0]]}}"#;
        let donors: TopDonors = parse_json(json.to_vec()).unwrap();
        assert_eq!(donors["KE"]["Health"][0], ("US".to_string(), 3.0));
    }

    #[test]
    fn test_chord_roles_and_validation() {
        let json = br#"{"countries":["US","KE"],"roles":{"US":"donor","KE":"recipient"},
            "matrix":[[0,5],[0,0]]}"#;
        let chord: ChordFlows = parse_json(json.to_vec()).unwrap();
        assert_eq!(chord.roles["KE"], Role::Recipient);
        assert!(chord.validate().is_ok());
    }

    #[test]
    fn test_chord_rejects_ragged_matrix() {
        let json = br#"{"countries":["US","KE"],"matrix":[[0,5],[0]]}"#;
        let chord: ChordFlows = parse_json(json.to_vec()).unwrap();
        let err = chord.validate().unwrap_err();
        assert!(matches!(err, AtlasError::InvalidDataset { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result: Result<CountryTotals> = parse_json(b"{not json".to_vec());
        assert!(matches!(result, Err(AtlasError::Json(_))));
    }
}
