//! Static country code tables.
//!
//! Every lookup here is total: an identifier that is not in a table comes
//! back as `None` (or an empty slice), never as a panic. Tables are built
//! once on first use and shared for the life of the process.

mod borders;
mod names;
mod numeric;
mod regions;

use std::collections::HashMap;
use std::sync::LazyLock;

/// World region used for roll-up summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    NorthAmerica,
    LatinAmerica,
    EuropeCentralAsia,
    MiddleEastNorthAfrica,
    SubSaharanAfrica,
    SouthAsia,
    EastAsiaPacific,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::NorthAmerica,
        Region::LatinAmerica,
        Region::EuropeCentralAsia,
        Region::MiddleEastNorthAfrica,
        Region::SubSaharanAfrica,
        Region::SouthAsia,
        Region::EastAsiaPacific,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::LatinAmerica => "Latin America & Caribbean",
            Region::EuropeCentralAsia => "Europe & Central Asia",
            Region::MiddleEastNorthAfrica => "Middle East & North Africa",
            Region::SubSaharanAfrica => "Sub-Saharan Africa",
            Region::SouthAsia => "South Asia",
            Region::EastAsiaPacific => "East Asia & Pacific",
        }
    }
}

static NAME_BY_ALPHA2: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| names::NAMES.iter().copied().collect());

static ALPHA2_BY_NUMERIC: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| numeric::NUMERIC.iter().copied().collect());

static NEIGHBORS: LazyLock<HashMap<&'static str, Vec<&'static str>>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
    for &(a, b) in borders::BORDERS {
        map.entry(a).or_default().push(b);
        map.entry(b).or_default().push(a);
    }
    for list in map.values_mut() {
        list.sort_unstable();
        list.dedup();
    }
    map
});

static REGION_BY_ALPHA2: LazyLock<HashMap<&'static str, Region>> = LazyLock::new(|| {
    regions::REGIONS
        .iter()
        .flat_map(|(region, codes)| codes.iter().map(move |code| (*code, *region)))
        .collect()
});

/// Normalize a numeric feature id to the three-digit form ("4" -> "004").
/// Returns `None` for ids that are not purely numeric.
pub fn normalize_numeric(id: &str) -> Option<String> {
    let trimmed = id.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>3}", trimmed))
}

/// Resolve a geometry feature id to its alpha-2 code
pub fn alpha2_for_numeric(id: &str) -> Option<&'static str> {
    let key = normalize_numeric(id)?;
    ALPHA2_BY_NUMERIC.get(key.as_str()).copied()
}

/// Display name for an alpha-2 code (case-insensitive)
pub fn country_name(iso2: &str) -> Option<&'static str> {
    NAME_BY_ALPHA2.get(iso2.trim().to_ascii_uppercase().as_str()).copied()
}

/// Land neighbours of a country; empty for islands and unknown codes
pub fn neighbors(iso2: &str) -> &'static [&'static str] {
    NEIGHBORS
        .get(iso2.trim().to_ascii_uppercase().as_str())
        .map(|list| list.as_slice())
        .unwrap_or(&[])
}

pub fn region_of(iso2: &str) -> Option<Region> {
    REGION_BY_ALPHA2.get(iso2.trim().to_ascii_uppercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_lookup_pads_ids() {
        assert_eq!(alpha2_for_numeric("840"), Some("US"));
        assert_eq!(alpha2_for_numeric("4"), Some("AF"));
        assert_eq!(alpha2_for_numeric("004"), Some("AF"));
        assert_eq!(alpha2_for_numeric("36"), Some("AU"));
    }

    #[test]
    fn test_unknown_ids_are_none() {
        assert_eq!(alpha2_for_numeric("999"), None);
        assert_eq!(alpha2_for_numeric(""), None);
        assert_eq!(alpha2_for_numeric("-99"), None);
        assert_eq!(alpha2_for_numeric("Kosovo"), None);
    }

    #[test]
    fn test_names_case_insensitive() {
        assert_eq!(country_name("us"), Some("United States"));
        assert_eq!(country_name("CI"), Some("Côte d'Ivoire"));
        assert_eq!(country_name("ZZ"), None);
    }

    #[test]
    fn test_every_numeric_target_has_a_name() {
        for (_, iso2) in numeric::NUMERIC {
            assert!(country_name(iso2).is_some(), "missing name for {iso2}");
        }
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        assert!(neighbors("FR").contains(&"DE"));
        assert!(neighbors("DE").contains(&"FR"));
        for (a, b) in borders::BORDERS {
            assert!(neighbors(a).contains(b));
            assert!(neighbors(b).contains(a));
        }
    }

    #[test]
    fn test_islands_have_no_neighbors() {
        assert!(neighbors("JP").is_empty());
        assert!(neighbors("??").is_empty());
    }

    #[test]
    fn test_regions() {
        assert_eq!(region_of("ke"), Some(Region::SubSaharanAfrica));
        assert_eq!(region_of("IN"), Some(Region::SouthAsia));
        assert_eq!(region_of("AQ"), None);
    }

    #[test]
    fn test_border_codes_are_known() {
        for (a, b) in borders::BORDERS {
            assert!(country_name(a).is_some(), "unknown code {a}");
            assert!(country_name(b).is_some(), "unknown code {b}");
        }
    }
}
