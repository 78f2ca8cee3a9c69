use clap::Parser;
use std::path::PathBuf;

/// Geometry tried in order when no `--geometry` is given. The trailing
/// relative entry is resolved against the data base.
pub const DEFAULT_GEOMETRY: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json",
    "https://unpkg.com/world-atlas@2/countries-110m.json",
    "world/countries-110m.json",
];

#[derive(Debug, Clone, Parser)]
#[command(name = "aid-atlas")]
#[command(about = "Explore international aid flows in the terminal")]
pub struct Config {
    /// Directory or URL prefix holding the processed JSON datasets
    #[arg(long, default_value = "data/processed")]
    pub data: String,

    /// Geometry source (URL or path), repeat to build a fallback list
    #[arg(long = "geometry")]
    pub geometry: Vec<String>,

    #[arg(long, default_value = "aid-atlas.log")]
    pub log_file: PathBuf,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Config {
    /// The ordered geometry fallback list
    pub fn geometry_sources(&self) -> Vec<String> {
        if self.geometry.is_empty() {
            DEFAULT_GEOMETRY.iter().map(|s| s.to_string()).collect()
        } else {
            self.geometry.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["aid-atlas"]);
        assert_eq!(config.data, "data/processed");
        assert_eq!(config.geometry_sources().len(), 3);
        assert!(config.geometry_sources()[0].starts_with("https://"));
        assert!(!config.verbose);
    }

    #[test]
    fn test_geometry_override_keeps_order() {
        let config = Config::parse_from([
            "aid-atlas",
            "--geometry",
            "a.json",
            "--geometry",
            "https://example.org/b.json",
        ]);
        assert_eq!(
            config.geometry_sources(),
            vec!["a.json".to_string(), "https://example.org/b.json".to_string()]
        );
    }
}
