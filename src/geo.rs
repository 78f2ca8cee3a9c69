/// A closed ring of (lon, lat) coordinates
pub type Ring = Vec<(f64, f64)>;

/// One polygon: exterior ring first, holes after
pub type Polygon = Vec<Ring>;

/// A country shape from the world geometry
#[derive(Debug, Clone, Default)]
pub struct GeoFeature {
    /// Normalized identifier (numeric ids are zero-padded to three digits)
    pub id: Option<String>,
    /// `name` property when the geometry carries one
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl GeoFeature {
    /// Every ring of every polygon, exteriors and holes alike
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }
}

/// Normalize longitude into [-180, 180)
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Clamp latitude into [-90, 90]
#[inline(always)]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-180.0), -180.0);
        assert_eq!(normalize_lon(45.0), 45.0);
        assert_eq!(clamp_lat(95.0), 90.0);
    }
}
