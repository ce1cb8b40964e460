/// Sonarr v3 API types for (de)serialization.
///
/// These structures mirror the JSON format of the Sonarr series, lookup and
/// episode endpoints. Only the fields this crate reads or forwards are kept.
use serde::{Deserialize, Serialize};

/// A series record as returned by `/api/v3/series` and `/api/v3/series/lookup`.
///
/// Catalog lookup results are not tracked yet and therefore carry no `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeries {
    /// Internal Sonarr identifier (absent on catalog lookup results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Series title
    pub title: String,
    /// TheTVDB identifier, the catalog id used for registration
    #[serde(default)]
    pub tvdb_id: u64,
    /// URL-safe slug of the title
    #[serde(default)]
    pub title_slug: String,
    /// Artwork (posters, banners, fanart)
    #[serde(default)]
    pub images: Vec<SonarrImage>,
    /// Seasons in the order Sonarr reports them
    #[serde(default)]
    pub seasons: Vec<SonarrSeason>,
    /// Plot overview
    #[serde(default)]
    pub overview: Option<String>,
    /// First air year (0 when unknown)
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Airing status, e.g. "continuing" or "ended"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ratings: Option<SonarrRatings>,
}

/// A single artwork entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrImage {
    /// Artwork kind, e.g. "poster", "banner" or "fanart"
    pub cover_type: String,
    /// Sonarr-local URL of the cached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upstream URL of the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

/// A season entry of a series record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeason {
    pub season_number: u32,
    #[serde(default)]
    pub monitored: bool,
    /// Only present on tracked series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SonarrSeasonStatistics>,
}

/// Per-season episode counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeasonStatistics {
    /// Number of monitored episodes
    #[serde(default)]
    pub episode_count: u32,
    /// Number of episodes regardless of monitoring
    #[serde(default)]
    pub total_episode_count: u32,
    #[serde(default)]
    pub episode_file_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonarrRatings {
    #[serde(default)]
    pub votes: u64,
    pub value: f64,
}

/// A single episode from `/api/v3/episode?seriesId=`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrEpisode {
    pub season_number: u32,
    pub episode_number: u32,
    /// Episode title (may be null for episodes not yet named)
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Local air date as `YYYY-MM-DD`
    #[serde(default)]
    pub air_date: Option<String>,
}

/// Request body for `POST /api/v3/series`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub tvdb_id: u64,
    pub title: String,
    pub quality_profile_id: u32,
    pub title_slug: String,
    pub images: Vec<SonarrImage>,
    pub seasons: Vec<NewSeason>,
    pub monitored: bool,
    pub root_folder_path: String,
    pub add_options: AddOptions,
}

/// Season entry of a registration request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeason {
    pub season_number: u32,
    pub monitored: bool,
}

/// Options that control what Sonarr does right after adding a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOptions {
    pub search_for_missing_episodes: bool,
    /// Monitoring preset, "none" keeps every episode unmonitored
    pub monitor: String,
}

impl NewSeries {
    /// Builds an inert registration request from a catalog lookup result.
    ///
    /// The series and every season are unmonitored and no search for
    /// missing episodes is triggered, whatever the catalog data says.
    pub fn inert(candidate: &SonarrSeries, quality_profile_id: u32, root_folder_path: &str) -> Self {
        Self {
            tvdb_id: candidate.tvdb_id,
            title: candidate.title.clone(),
            quality_profile_id,
            title_slug: candidate.title_slug.clone(),
            images: candidate.images.clone(),
            seasons: candidate
                .seasons
                .iter()
                .map(|s| NewSeason {
                    season_number: s.season_number,
                    monitored: false,
                })
                .collect(),
            monitored: false,
            root_folder_path: root_folder_path.to_string(),
            add_options: AddOptions {
                search_for_missing_episodes: false,
                monitor: "none".to_string(),
            },
        }
    }
}
