//! Title resolution and tiered metadata retrieval
//!
//! `MetadataResolver` maps free-form titles onto tracked series, registers
//! series that are not tracked yet, and shapes show, season or episode
//! metadata from the records of a `SeriesService`.

use super::sonarr_types::{NewSeries, SonarrEpisode, SonarrSeason, SonarrSeries};
use super::transient::TransientRegistration;
use super::{
    EpisodeMetadata, Metadata, MetadataQuery, MetadataRetrievalError, Registration,
    SeasonMetadata, SeriesId, SeriesMetadata, SeriesService, SonarrClient, Unregistration,
};
use crate::config::{
    DEFAULT_QUALITY_PROFILE_ID, DEFAULT_REGISTER_THRESHOLD, DEFAULT_RESOLVE_THRESHOLD,
    SonarrConfig,
};
use crate::similarity::best_match;
use tracing::{debug, info, warn};

/// Matching and registration settings of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Minimum score to accept a tracked series as a title match
    pub resolve_threshold: u8,
    /// Minimum score to register a catalog candidate
    pub register_threshold: u8,
    /// Quality profile assigned on registration
    pub quality_profile_id: u32,
    /// Root folder assigned on registration
    pub root_folder: String,
}

impl ResolverSettings {
    /// Default thresholds and quality profile with the given root folder
    pub fn new(root_folder: impl Into<String>) -> Self {
        Self {
            resolve_threshold: DEFAULT_RESOLVE_THRESHOLD,
            register_threshold: DEFAULT_REGISTER_THRESHOLD,
            quality_profile_id: DEFAULT_QUALITY_PROFILE_ID,
            root_folder: root_folder.into(),
        }
    }
}

impl From<&SonarrConfig> for ResolverSettings {
    fn from(config: &SonarrConfig) -> Self {
        Self {
            resolve_threshold: config.resolve_threshold,
            register_threshold: config.register_threshold,
            quality_profile_id: config.quality_profile_id,
            root_folder: config.root_folder.clone(),
        }
    }
}

/// Resolves titles against a series service and retrieves their metadata.
pub struct MetadataResolver<S>
where
    S: SeriesService,
{
    service: S,
    settings: ResolverSettings,
}

impl MetadataResolver<SonarrClient> {
    /// Creates a resolver talking to the Sonarr instance in `config`.
    pub fn from_config(config: &SonarrConfig) -> Result<Self, MetadataRetrievalError> {
        Ok(Self::new(SonarrClient::new(config)?, config.into()))
    }
}

impl<S> MetadataResolver<S>
where
    S: SeriesService,
{
    pub fn new(service: S, settings: ResolverSettings) -> Self {
        Self { service, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Returns the underlying series service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Looks up the id of the tracked series best matching `title`.
    ///
    /// The best match is only accepted if its score reaches the resolve
    /// threshold. On equal scores the series listed first wins.
    ///
    /// # Errors
    ///
    /// Fails if the tracked series cannot be listed.
    pub fn resolve_series_id(&self, title: &str) -> Result<Option<SeriesId>, MetadataRetrievalError> {
        let tracked = self.service.list_series()?;

        let Some((index, score)) = best_match(title, tracked.iter().map(|s| s.title.as_str()))
        else {
            debug!(title, "No tracked series to match against");
            return Ok(None);
        };

        let candidate = &tracked[index];
        if score == 0 || score < self.settings.resolve_threshold {
            debug!(
                title,
                best = %candidate.title,
                score,
                threshold = self.settings.resolve_threshold,
                "Best tracked series below threshold"
            );
            return Ok(None);
        }

        debug!(title, matched = %candidate.title, score, id = ?candidate.id, "Resolved tracked series");
        Ok(candidate.id)
    }

    /// Registers the catalog series best matching `title`.
    ///
    /// The registration is inert: neither the series nor any of its seasons
    /// are monitored and no search for missing episodes is started.
    ///
    /// # Errors
    ///
    /// Fails if the catalog lookup fails or the service refuses to add the
    /// series. Finding no good candidate is not an error.
    pub fn register_series(&self, title: &str) -> Result<Registration, MetadataRetrievalError> {
        let candidates = self.service.lookup_series(title)?;

        let Some((index, score)) = best_match(title, candidates.iter().map(|s| s.title.as_str()))
        else {
            info!(title, "Series not found in catalog");
            return Ok(Registration::NoCandidates);
        };

        let candidate = &candidates[index];
        if score == 0 || score < self.settings.register_threshold {
            info!(
                title,
                best = %candidate.title,
                score,
                threshold = self.settings.register_threshold,
                "No good catalog match"
            );
            return Ok(Registration::LowConfidence {
                title: candidate.title.clone(),
                score,
            });
        }

        let payload = NewSeries::inert(
            candidate,
            self.settings.quality_profile_id,
            &self.settings.root_folder,
        );

        match self.service.add_series(&payload) {
            Ok(created) => {
                info!(title, added = %created.title, id = ?created.id, tvdb_id = created.tvdb_id, "Registered series");
                Ok(Registration::Added(created))
            }
            Err(e) => {
                warn!(title, error = %e, "Failed to add series");
                Err(e)
            }
        }
    }

    /// Stops tracking the series best matching `title`.
    ///
    /// Media files on disk are always preserved.
    pub fn unregister_series(&self, title: &str) -> Result<Unregistration, MetadataRetrievalError> {
        let Some(id) = self.resolve_series_id(title)? else {
            info!(title, "Series not tracked, nothing to remove");
            return Ok(Unregistration::NotTracked);
        };

        if let Err(e) = self.service.delete_series(id, false) {
            warn!(title, id, error = %e, "Failed to remove series");
            return Err(e);
        }

        info!(title, id, "Removed series");
        Ok(Unregistration::Removed(id))
    }

    /// Retrieves metadata for `title` at the granularity of `query`.
    ///
    /// Series that are not tracked yet are registered for the duration of
    /// the call and removed again before it returns, whatever the outcome.
    /// Episodes are only fetched for episode queries.
    ///
    /// # Errors
    ///
    /// Returns one of the `*NotFound` variants if the series, season or
    /// episode does not exist, and the service error if a request fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use series_scout::{MetadataQuery, MetadataResolver, SonarrConfig};
    ///
    /// let config = SonarrConfig::new("http://localhost:8989", "api-key", "/srv/tv");
    /// let resolver = MetadataResolver::from_config(&config).unwrap();
    ///
    /// let episode = resolver
    ///     .get_metadata("Solo Leveling", MetadataQuery::from_parts(Some(1), Some(1)))
    ///     .unwrap();
    /// println!("{:?}", episode);
    /// ```
    pub fn get_metadata(
        &self,
        title: &str,
        query: MetadataQuery,
    ) -> Result<Metadata, MetadataRetrievalError> {
        let (id, _registration) = match self.resolve_series_id(title)? {
            Some(id) => (id, None),
            None => {
                let registration = self.register_series(title)?;

                let added_id = match &registration {
                    Registration::Added(created) => match created.id {
                        Some(id) => Some(id),
                        None => self.tracked_id_by_tvdb(created.tvdb_id),
                    },
                    _ => None,
                };
                let mut guard =
                    added_id.map(|id| TransientRegistration::new(&self.service, id, title));

                let Some(id) = self.resolve_series_id(title)? else {
                    return Err(MetadataRetrievalError::SeriesNotFound(title.to_string()));
                };

                if guard.is_none() && matches!(registration, Registration::Added(_)) {
                    guard = Some(TransientRegistration::new(&self.service, id, title));
                }

                if let Some(guard) = &guard {
                    debug!(title, id = guard.id(), "Serving metadata from transient registration");
                }

                (id, guard)
            }
        };

        let series = self.service.get_series(id)?;

        match query {
            MetadataQuery::Show => Ok(Metadata::Series(shape_series(&series))),
            MetadataQuery::Season(season) => series
                .seasons
                .iter()
                .find(|s| s.season_number == season)
                .map(|s| Metadata::Season(shape_season(s)))
                .ok_or_else(|| {
                    info!(title, season, "Season not found");
                    MetadataRetrievalError::SeasonNotFound {
                        title: series.title.clone(),
                        season,
                    }
                }),
            MetadataQuery::Episode { season, episode } => self
                .service
                .list_episodes(id)?
                .into_iter()
                .find(|e| e.season_number == season && e.episode_number == episode)
                .map(|e| Metadata::Episode(shape_episode(e)))
                .ok_or_else(|| {
                    info!(title, season, episode, "Episode not found");
                    MetadataRetrievalError::EpisodeNotFound {
                        title: series.title.clone(),
                        season,
                        episode,
                    }
                }),
        }
    }
}

impl<S> MetadataResolver<S>
where
    S: SeriesService,
{
    /// Finds a tracked series by its TVDB id, for created records that come
    /// back without an id. Listing failures are logged and yield `None`.
    fn tracked_id_by_tvdb(&self, tvdb_id: u64) -> Option<SeriesId> {
        match self.service.list_series() {
            Ok(tracked) => tracked
                .iter()
                .find(|s| s.tvdb_id == tvdb_id)
                .and_then(|s| s.id),
            Err(e) => {
                warn!(tvdb_id, error = %e, "Failed to look up registered series");
                None
            }
        }
    }
}

fn shape_series(series: &SonarrSeries) -> SeriesMetadata {
    SeriesMetadata {
        title: series.title.clone(),
        description: series.overview.clone().unwrap_or_default(),
        year: series.year,
        genres: series.genres.join(", "),
        status: series.status.clone().unwrap_or_default(),
        rating: series.ratings.as_ref().map(|r| r.value),
        poster_url: series
            .images
            .iter()
            .find(|image| image.cover_type == "poster")
            .and_then(|image| image.remote_url.clone()),
    }
}

fn shape_season(season: &SonarrSeason) -> SeasonMetadata {
    SeasonMetadata {
        season: season.season_number,
        total_episodes: season
            .statistics
            .as_ref()
            .map(|s| s.total_episode_count)
            .unwrap_or(0),
    }
}

fn shape_episode(episode: SonarrEpisode) -> EpisodeMetadata {
    EpisodeMetadata {
        title: episode.title.unwrap_or_else(|| "TBA".to_string()),
        season: episode.season_number,
        episode: episode.episode_number,
        description: episode.overview.unwrap_or_default(),
        air_date: episode.air_date,
    }
}
