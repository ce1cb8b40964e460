//! Connection and matching configuration
//!
//! All settings are supplied by the caller and injected into the client and
//! resolver at construction time.

use crate::metadata_retrieval::MetadataRetrievalError;
use std::time::Duration;

/// Minimum score for picking an already tracked series by title
pub const DEFAULT_RESOLVE_THRESHOLD: u8 = 80;

/// Minimum score for registering a catalog lookup result
pub const DEFAULT_REGISTER_THRESHOLD: u8 = 70;

/// Quality profile assigned to registered series
pub const DEFAULT_QUALITY_PROFILE_ID: u32 = 4;

/// Configuration for talking to a Sonarr instance
#[derive(Debug, Clone)]
pub struct SonarrConfig {
    /// Base URL of the Sonarr instance, e.g. `http://localhost:8989`
    pub base_url: String,
    /// API key sent as `X-Api-Key` with every request
    pub api_key: String,
    /// Root folder newly registered series are placed under
    pub root_folder: String,
    /// Quality profile id used when registering a series
    pub quality_profile_id: u32,
    /// Minimum score (0-100) to accept a tracked series as a title match
    pub resolve_threshold: u8,
    /// Minimum score (0-100) to register a catalog candidate
    pub register_threshold: u8,
    /// Request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
}

impl SonarrConfig {
    /// Creates a configuration with default quality profile and thresholds.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        root_folder: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            root_folder: root_folder.into(),
            quality_profile_id: DEFAULT_QUALITY_PROFILE_ID,
            resolve_threshold: DEFAULT_RESOLVE_THRESHOLD,
            register_threshold: DEFAULT_REGISTER_THRESHOLD,
            timeout: None,
        }
    }

    pub fn with_quality_profile_id(mut self, quality_profile_id: u32) -> Self {
        self.quality_profile_id = quality_profile_id;
        self
    }

    pub fn with_resolve_threshold(mut self, threshold: u8) -> Self {
        self.resolve_threshold = threshold;
        self
    }

    pub fn with_register_threshold(mut self, threshold: u8) -> Self {
        self.register_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Checks that the configuration can be used to build a client.
    ///
    /// The base URL must be an absolute `http` or `https` URL, the API key
    /// must not be blank and both thresholds must lie within 0..=100.
    pub fn validate(&self) -> Result<(), MetadataRetrievalError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            MetadataRetrievalError::InvalidConfig(format!("base URL '{}': {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(MetadataRetrievalError::InvalidConfig(format!(
                "base URL '{}' must use http or https",
                self.base_url
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(MetadataRetrievalError::InvalidConfig(
                "API key must not be empty".to_string(),
            ));
        }

        for (name, threshold) in [
            ("resolve", self.resolve_threshold),
            ("register", self.register_threshold),
        ] {
            if threshold > 100 {
                return Err(MetadataRetrievalError::InvalidConfig(format!(
                    "{} threshold {} exceeds 100",
                    name, threshold
                )));
            }
        }

        Ok(())
    }

    /// Base URL without trailing slashes, ready for path concatenation
    pub(crate) fn api_root(&self) -> String {
        format!("{}/api/v3", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SonarrConfig {
        SonarrConfig::new("http://localhost:8989", "secret", "/srv/tv")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.quality_profile_id, 4);
        assert_eq!(config.resolve_threshold, 80);
        assert_eq!(config.register_threshold, 70);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = config()
            .with_quality_profile_id(7)
            .with_resolve_threshold(90)
            .with_register_threshold(60)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.quality_profile_id, 7);
        assert_eq!(config.resolve_threshold, 90);
        assert_eq!(config.register_threshold, 60);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_api_root_strips_trailing_slash() {
        let config = SonarrConfig::new("http://nas.local:8989/", "secret", "/srv/tv");
        assert_eq!(config.api_root(), "http://nas.local:8989/api/v3");
        assert_eq!(self::config().api_root(), "http://localhost:8989/api/v3");
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let bad = SonarrConfig::new("not a url", "secret", "/srv/tv");
        assert!(matches!(
            bad.validate(),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));

        let ftp = SonarrConfig::new("ftp://localhost", "secret", "/srv/tv");
        assert!(matches!(
            ftp.validate(),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_api_key() {
        let blank = SonarrConfig::new("http://localhost:8989", "  ", "/srv/tv");
        assert!(matches!(
            blank.validate(),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_threshold_above_100() {
        let config = config().with_register_threshold(101);
        assert!(matches!(
            config.validate(),
            Err(MetadataRetrievalError::InvalidConfig(_))
        ));
    }
}
