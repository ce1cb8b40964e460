/// Sonarr series service implementation.
use super::sonarr_types::{NewSeries, SonarrEpisode, SonarrSeries};
use super::{MetadataRetrievalError, SeriesId, SeriesService};
use crate::config::SonarrConfig;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the Sonarr API key (`X-Api-Key`)
const API_KEY_HEADER: &str = "x-api-key";

/// Series service backed by the Sonarr v3 REST API.
///
/// Every request carries the configured API key. Requests are blocking and
/// are never retried.
pub struct SonarrClient {
    client: Client,
    api_root: String,
}

impl SonarrClient {
    /// Creates a client for the Sonarr instance described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate or the
    /// API key cannot be used as a header value, and `RequestError` if the
    /// HTTP client cannot be built.
    pub fn new(config: &SonarrConfig) -> Result<Self, MetadataRetrievalError> {
        config.validate()?;

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|e| {
            MetadataRetrievalError::InvalidConfig(format!("API key is not a valid header: {}", e))
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    /// Turns a response into an error unless its status is `expected`
    /// (or any success status when `expected` is `None`).
    fn check_status(
        response: Response,
        expected: Option<StatusCode>,
    ) -> Result<Response, MetadataRetrievalError> {
        let status = response.status();
        let accepted = match expected {
            Some(expected) => status == expected,
            None => status.is_success(),
        };

        if accepted {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(MetadataRetrievalError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }

    fn parse<T: DeserializeOwned>(response: Response) -> Result<T, MetadataRetrievalError> {
        response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MetadataRetrievalError> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        Self::parse(Self::check_status(response, None)?)
    }
}

impl SeriesService for SonarrClient {
    fn list_series(&self) -> Result<Vec<SonarrSeries>, MetadataRetrievalError> {
        self.get_json("series", &[])
    }

    fn lookup_series(&self, term: &str) -> Result<Vec<SonarrSeries>, MetadataRetrievalError> {
        self.get_json("series/lookup", &[("term", term)])
    }

    fn add_series(&self, series: &NewSeries) -> Result<SonarrSeries, MetadataRetrievalError> {
        let url = self.url("series");
        debug!(%url, tvdb_id = series.tvdb_id, title = %series.title, "POST");

        let response = self
            .client
            .post(&url)
            .json(series)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        Self::parse(Self::check_status(response, Some(StatusCode::CREATED))?)
    }

    fn delete_series(
        &self,
        id: SeriesId,
        delete_files: bool,
    ) -> Result<(), MetadataRetrievalError> {
        let url = self.url(&format!("series/{}", id));
        debug!(%url, delete_files, "DELETE");

        let response = self
            .client
            .delete(&url)
            .query(&[("deleteFiles", delete_files)])
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        Self::check_status(response, None)?;
        Ok(())
    }

    fn get_series(&self, id: SeriesId) -> Result<SonarrSeries, MetadataRetrievalError> {
        self.get_json(&format!("series/{}", id), &[])
    }

    fn list_episodes(&self, id: SeriesId) -> Result<Vec<SonarrEpisode>, MetadataRetrievalError> {
        let id = id.to_string();
        self.get_json("episode", &[("seriesId", id.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SonarrConfig::new("localhost:8989", "secret", "/srv/tv");
        assert!(matches!(
            SonarrClient::new(&config),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_rejects_api_key_with_newline() {
        let config = SonarrConfig::new("http://localhost:8989", "abc\ndef", "/srv/tv");
        assert!(matches!(
            SonarrClient::new(&config),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_url_building() {
        let config = SonarrConfig::new("http://localhost:8989/", "secret", "/srv/tv");
        let client = SonarrClient::new(&config).unwrap();
        assert_eq!(client.url("series/lookup"), "http://localhost:8989/api/v3/series/lookup");
    }
}
