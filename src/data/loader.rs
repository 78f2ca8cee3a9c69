//! Startup fetching.
//!
//! Every dataset is requested concurrently and kept as its own `Result`, so
//! one missing file only disables the views that need it. Geometry goes
//! through an ordered fallback list, first success wins.

use crate::config::Config;
use crate::data::{
    parse_json, topology, ChordFlows, CountryTotals, Datasets, PurposeBreakdown, TemporalSeries,
    TopDonors, TopPurposes, CHORD_FILE, DONATED_FILE, RECEIVED_FILE, TEMPORAL_FILE,
    TOP_DONORS_FILE, TOP_PURPOSES_FILE, TOTALS_FILE,
};
use crate::error::{AtlasError, Result};
use crate::geo::GeoFeature;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

/// Where a document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(String),
    Local(PathBuf),
}

impl Source {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Remote(raw.to_string())
        } else {
            Source::Local(PathBuf::from(raw))
        }
    }

    /// Resolve `name` against this source used as a base directory / prefix
    pub fn join(&self, name: &str) -> Self {
        match self {
            Source::Remote(base) => {
                Source::Remote(format!("{}/{}", base.trim_end_matches('/'), name))
            }
            Source::Local(dir) => Source::Local(dir.join(name)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{}", url),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads documents from disk or over HTTP
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn fetch_bytes(&self, source: &Source) -> Result<Vec<u8>> {
        tracing::debug!("fetching {}", source);
        match source {
            Source::Remote(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AtlasError::Status {
                        source_name: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            Source::Local(path) => Ok(tokio::fs::read(path).await?),
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, source: &Source) -> Result<T> {
        let bytes = self.fetch_bytes(source).await?;
        let value = parse_json(bytes);
        match &value {
            Ok(_) => tracing::info!("loaded {}", source),
            Err(e) => tracing::warn!("failed to load {}: {}", source, e),
        }
        value
    }
}

/// Run `tasks` one after another and return the first success.
/// When all fail, the last error is returned; an empty list is `NoSources`.
pub async fn first_ok<T, F, Fut, I>(tasks: I) -> Result<T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for task in tasks {
        match task().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("source failed, trying next: {}", e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or(AtlasError::NoSources))
}

/// Fetch and decode world geometry from the first source that works
pub async fn load_geometry(fetcher: &Fetcher, sources: &[Source]) -> Result<Vec<GeoFeature>> {
    let attempts = sources.len();
    let tasks = sources.iter().map(|source| {
        move || async move {
            let bytes = fetcher.fetch_bytes(source).await?;
            let features = topology::decode_world(bytes)?;
            tracing::info!("loaded {} geometry features from {}", features.len(), source);
            Ok::<_, AtlasError>(features)
        }
    });

    first_ok(tasks).await.map_err(|last| match last {
        AtlasError::NoSources => AtlasError::NoSources,
        last => {
            tracing::warn!("world geometry unavailable after {} attempts", attempts);
            AtlasError::GeometryUnavailable {
                attempts,
                last: Box::new(last),
            }
        }
    })
}

/// Relative geometry entries resolve against the data base; absolute paths
/// and URLs are used as they are
pub fn geometry_sources(config: &Config, data: &Source) -> Vec<Source> {
    config
        .geometry_sources()
        .iter()
        .map(|raw| match Source::parse(raw) {
            Source::Local(path) if path.is_relative() && config.geometry.is_empty() => {
                data.join(raw)
            }
            other => other,
        })
        .collect()
}

/// Issue every startup fetch at once and gather the outcomes
pub async fn load_all(config: &Config) -> Datasets {
    let fetcher = Fetcher::new();
    let data = Source::parse(&config.data);
    let geometry = geometry_sources(config, &data);
    load_from(&fetcher, &data, &geometry).await
}

pub async fn load_from(fetcher: &Fetcher, data: &Source, geometry: &[Source]) -> Datasets {
    tracing::info!("loading datasets from {}", data);

    let totals_src = data.join(TOTALS_FILE);
    let received_src = data.join(RECEIVED_FILE);
    let donated_src = data.join(DONATED_FILE);
    let top_purposes_src = data.join(TOP_PURPOSES_FILE);
    let top_donors_src = data.join(TOP_DONORS_FILE);
    let chord_src = data.join(CHORD_FILE);
    let temporal_src = data.join(TEMPORAL_FILE);

    let (totals, received, donated, top_purposes, top_donors, chord, temporal, geometry) = tokio::join!(
        fetcher.fetch_json::<CountryTotals>(&totals_src),
        fetcher.fetch_json::<PurposeBreakdown>(&received_src),
        fetcher.fetch_json::<PurposeBreakdown>(&donated_src),
        fetcher.fetch_json::<TopPurposes>(&top_purposes_src),
        fetcher.fetch_json::<TopDonors>(&top_donors_src),
        fetcher.fetch_json::<ChordFlows>(&chord_src),
        fetcher.fetch_json::<TemporalSeries>(&temporal_src),
        load_geometry(fetcher, geometry),
    );

    Datasets {
        totals,
        received,
        donated,
        top_purposes,
        top_donors,
        chord: chord.and_then(ChordFlows::validate),
        temporal,
        geometry,
    }
}
