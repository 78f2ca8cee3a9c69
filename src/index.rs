//! Country index: one record per country in the totals, joined with the
//! purpose breakdowns and the world geometry by alpha-2 code.

use crate::codes;
use crate::data::{CountryTotals, PurposeBreakdown};
use crate::geo::GeoFeature;
use serde::Deserialize;
use std::collections::HashMap;

/// Below this absolute net balance a country counts as mixed on the maps
pub const NET_THRESHOLD: f64 = 100e6;

/// Donor / recipient grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Recipient,
    Mixed,
}

impl Role {
    /// Ratio rule: one side at least twice the other wins, otherwise mixed
    pub fn from_ratio(donated: f64, received: f64) -> Role {
        if donated <= 0.0 && received <= 0.0 {
            Role::Mixed
        } else if received >= 2.0 * donated {
            Role::Recipient
        } else if donated >= 2.0 * received {
            Role::Donor
        } else {
            Role::Mixed
        }
    }

    /// Map grouping: small net balances are mixed regardless of ratio
    pub fn classify(donated: f64, received: f64) -> Role {
        if (received - donated).abs() < NET_THRESHOLD {
            Role::Mixed
        } else {
            Role::from_ratio(donated, received)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Recipient => "recipient",
            Role::Mixed => "mixed",
        }
    }

    /// Donor against recipient; mixed opposes nothing
    pub fn opposes(self, other: Role) -> bool {
        matches!(
            (self, other),
            (Role::Donor, Role::Recipient) | (Role::Recipient, Role::Donor)
        )
    }
}

/// Resolve a display name: code table, then geometry name, then the code itself
pub fn display_name(code: Option<&str>, feature_name: Option<&str>) -> String {
    if let Some(name) = code.and_then(codes::country_name) {
        return name.to_string();
    }
    if let Some(name) = feature_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match code {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => "Unknown".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct CountryRecord {
    pub iso2: String,
    pub name: String,
    pub donated: f64,
    pub received: f64,
    pub net: f64,
    /// (purpose, amount), largest first
    pub received_by_purpose: Vec<(String, f64)>,
    pub donated_by_purpose: Vec<(String, f64)>,
}

impl CountryRecord {
    pub fn role(&self) -> Role {
        Role::classify(self.donated, self.received)
    }

    /// Present on both log axes of the scatter
    pub fn plottable(&self) -> bool {
        self.donated > 0.0 && self.received > 0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    records: Vec<CountryRecord>,
    by_code: HashMap<String, usize>,
}

impl CountryIndex {
    pub fn build(
        totals: &CountryTotals,
        received: Option<&PurposeBreakdown>,
        donated: Option<&PurposeBreakdown>,
    ) -> Self {
        let mut index = CountryIndex::default();
        let received = keyed_by_code(received);
        let donated = keyed_by_code(donated);

        for total in &totals.countries {
            let iso2 = total.iso2.trim().to_ascii_uppercase();
            if iso2.is_empty() {
                tracing::warn!("skipping totals entry without a country code");
                continue;
            }
            if index.by_code.contains_key(&iso2) {
                tracing::warn!("duplicate totals entry for {}, keeping the first", iso2);
                continue;
            }

            let record = CountryRecord {
                name: display_name(Some(&iso2), None),
                donated: total.donated,
                received: total.received,
                net: total.received - total.donated,
                received_by_purpose: sorted_breakdown(&received, &iso2),
                donated_by_purpose: sorted_breakdown(&donated, &iso2),
                iso2: iso2.clone(),
            };
            index.by_code.insert(iso2, index.records.len());
            index.records.push(record);
        }

        tracing::debug!("indexed {} countries", index.records.len());
        index
    }

    pub fn get(&self, iso2: &str) -> Option<&CountryRecord> {
        let key = iso2.trim().to_ascii_uppercase();
        self.by_code.get(&key).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Breakdown keyed by the same upper-cased code the totals use
fn keyed_by_code(breakdown: Option<&PurposeBreakdown>) -> HashMap<String, &HashMap<String, f64>> {
    breakdown
        .into_iter()
        .flatten()
        .map(|(code, purposes)| (code.trim().to_ascii_uppercase(), purposes))
        .collect()
}

fn sorted_breakdown(breakdown: &HashMap<String, &HashMap<String, f64>>, iso2: &str) -> Vec<(String, f64)> {
    let mut list: Vec<(String, f64)> = breakdown
        .get(iso2)
        .map(|purposes| purposes.iter().map(|(p, v)| (p.clone(), *v)).collect())
        .unwrap_or_default();
    list.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    list
}

/// World geometry with each feature resolved to an alpha-2 code (or not)
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    pub features: Vec<GeoFeature>,
    codes: Vec<Option<&'static str>>,
    by_code: HashMap<&'static str, Vec<usize>>,
}

impl WorldMap {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        let codes: Vec<Option<&'static str>> = features
            .iter()
            .map(|f| f.id.as_deref().and_then(codes::alpha2_for_numeric))
            .collect();

        let mut by_code: HashMap<&'static str, Vec<usize>> = HashMap::new();
        for (i, code) in codes.iter().enumerate() {
            if let Some(code) = *code {
                by_code.entry(code).or_default().push(i);
            }
        }

        let unresolved = codes.iter().filter(|c| c.is_none()).count();
        if unresolved > 0 {
            tracing::debug!("{} geometry features have no country code", unresolved);
        }

        Self {
            features,
            codes,
            by_code,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn code(&self, feature: usize) -> Option<&'static str> {
        self.codes.get(feature).copied().flatten()
    }

    pub fn name(&self, feature: usize) -> String {
        let geo_name = self.features.get(feature).and_then(|f| f.name.as_deref());
        display_name(self.code(feature), geo_name)
    }

    /// Features drawn for a country (some countries span several)
    pub fn features_for(&self, iso2: &str) -> &[usize] {
        self.by_code.get(iso2).map(Vec::as_slice).unwrap_or(&[])
    }
}
