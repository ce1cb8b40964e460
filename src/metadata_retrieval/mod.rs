/// Data structures and traits for TV series metadata retrieval.
///
/// This module provides the shaped show, season and episode metadata handed
/// to callers, the error type shared by all operations, and the
/// `SeriesService` trait that abstracts the series-management server.
mod resolver;
mod sonarr;
mod sonarr_types;
mod transient;

pub use resolver::{MetadataResolver, ResolverSettings};
pub use sonarr::SonarrClient;
pub use sonarr_types::{
    AddOptions, NewSeason, NewSeries, SonarrEpisode, SonarrImage, SonarrRatings, SonarrSeason,
    SonarrSeasonStatistics, SonarrSeries,
};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Internal identifier of a tracked series
pub type SeriesId = u64;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the series service failed at the transport level
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The series service answered with an unexpected HTTP status
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse the service's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The supplied configuration cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested series is neither tracked nor could it be registered
    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    /// The series has no season with the requested number
    #[error("Season {season} not found for '{title}'")]
    SeasonNotFound { title: String, season: u32 },

    /// The series has no episode with the requested numbers
    #[error("Episode S{season:02}E{episode:02} not found for '{title}'")]
    EpisodeNotFound {
        title: String,
        season: u32,
        episode: u32,
    },
}

impl MetadataRetrievalError {
    /// Returns true if the error means "nothing matched" rather than a
    /// failing or misbehaving service.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SeriesNotFound(_) | Self::SeasonNotFound { .. } | Self::EpisodeNotFound { .. }
        )
    }
}

/// Granularity of a metadata request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataQuery {
    /// Show-level metadata
    Show,
    /// Episode count summary of one season
    Season(u32),
    /// A single episode
    Episode { season: u32, episode: u32 },
}

impl MetadataQuery {
    /// Builds a query from optional season and episode numbers.
    ///
    /// A number of 0 counts as not given: season 0 yields a show-level
    /// query and episode 0 a season-level one. An episode number without a
    /// season number is ignored as well. Use `MetadataQuery::Season(0)`
    /// directly to ask for the specials season.
    pub fn from_parts(season: Option<u32>, episode: Option<u32>) -> Self {
        let season = season.filter(|&s| s != 0);
        let episode = episode.filter(|&e| e != 0);

        match (season, episode) {
            (Some(season), Some(episode)) => Self::Episode { season, episode },
            (Some(season), None) => Self::Season(season),
            (None, _) => Self::Show,
        }
    }
}

/// Show-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMetadata {
    pub title: String,
    pub description: String,
    pub year: u32,
    /// Genres joined with ", " (empty if the series has none)
    pub genres: String,
    pub status: String,
    /// Rating value, serialized as "N/A" when the series is unrated
    #[serde(serialize_with = "rating_or_na")]
    pub rating: Option<f64>,
    /// Remote URL of the first poster image
    pub poster_url: Option<String>,
}

/// Season-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonMetadata {
    pub season: u32,
    pub total_episodes: u32,
}

/// Episode-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeMetadata {
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub description: String,
    pub air_date: Option<String>,
}

/// Metadata at the granularity that was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metadata {
    Series(SeriesMetadata),
    Season(SeasonMetadata),
    Episode(EpisodeMetadata),
}

fn rating_or_na<S>(rating: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match rating {
        Some(value) => serializer.serialize_f64(*value),
        None => serializer.serialize_str("N/A"),
    }
}

/// Outcome of an attempt to register a series.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// The series was added; carries the record created by the service
    Added(SonarrSeries),
    /// The catalog lookup returned no candidates
    NoCandidates,
    /// The best candidate scored below the registration threshold
    LowConfidence { title: String, score: u8 },
}

/// Outcome of an attempt to remove a tracked series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistration {
    /// The series was removed (media files preserved)
    Removed(SeriesId),
    /// No tracked series matched the title
    NotTracked,
}

/// Trait for series-management services such as Sonarr.
///
/// Implementors expose the handful of endpoints the resolver needs. Any
/// transport failure or non-success status is reported as an error; the
/// resolver decides which of those are fatal.
pub trait SeriesService {
    /// Lists all tracked series.
    fn list_series(&self) -> Result<Vec<SonarrSeries>, MetadataRetrievalError>;

    /// Searches the external catalog for series matching `term`.
    fn lookup_series(&self, term: &str) -> Result<Vec<SonarrSeries>, MetadataRetrievalError>;

    /// Starts tracking a series and returns the created record.
    fn add_series(&self, series: &NewSeries) -> Result<SonarrSeries, MetadataRetrievalError>;

    /// Stops tracking a series. Media files are only removed if
    /// `delete_files` is true.
    fn delete_series(
        &self,
        id: SeriesId,
        delete_files: bool,
    ) -> Result<(), MetadataRetrievalError>;

    /// Fetches a single tracked series.
    fn get_series(&self, id: SeriesId) -> Result<SonarrSeries, MetadataRetrievalError>;

    /// Lists all episodes of a tracked series.
    fn list_episodes(&self, id: SeriesId) -> Result<Vec<SonarrEpisode>, MetadataRetrievalError>;
}
