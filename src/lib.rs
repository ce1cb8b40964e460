//! SeriesScout - Look up TV series metadata through Sonarr
//!
//! This library resolves free-form series titles against the series tracked
//! by a Sonarr instance, registers missing series without monitoring them,
//! and retrieves show, season or episode metadata. Series registered only to
//! answer a metadata request are removed again before the request returns.

mod config;
mod metadata_retrieval;
mod similarity;

pub use config::{
    DEFAULT_QUALITY_PROFILE_ID, DEFAULT_REGISTER_THRESHOLD, DEFAULT_RESOLVE_THRESHOLD,
    SonarrConfig,
};
pub use metadata_retrieval::{
    AddOptions, EpisodeMetadata, Metadata, MetadataQuery, MetadataResolver,
    MetadataRetrievalError, NewSeason, NewSeries, Registration, ResolverSettings, SeasonMetadata,
    SeriesId, SeriesMetadata, SeriesService, SonarrClient, SonarrEpisode, SonarrImage,
    SonarrRatings, SonarrSeason, SonarrSeasonStatistics, SonarrSeries, Unregistration,
};
pub use similarity::{best_match, token_set_ratio};
