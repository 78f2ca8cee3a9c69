use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} answered with status {status}")]
    Status { source_name: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] simd_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("invalid topology: {message}")]
    Topology { message: String },

    #[error("invalid dataset {dataset}: {message}")]
    InvalidDataset {
        dataset: &'static str,
        message: String,
    },

    #[error("no sources to try")]
    NoSources,

    #[error("all {attempts} geometry sources failed, last error: {last}")]
    GeometryUnavailable {
        attempts: usize,
        last: Box<AtlasError>,
    },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
