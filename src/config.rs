use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Movie catalog CSV (columns `ID`, `Title`, `Release Date`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Precomputed similarity matrix (`.json`, otherwise bincode)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a payload's `poster_path`
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for metadata lookups
    #[serde(default = "default_gateway_timeout_secs")]
    pub gateway_timeout_secs: u64,

    /// Redis connection URL; caching of metadata payloads is off when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Number of distinct strings the title normalizer memoizes
    #[serde(default = "default_normalizer_cache_size")]
    pub normalizer_cache_size: usize,

    /// Minimum similarity ratio for a "did you mean" suggestion
    #[serde(default = "default_suggestion_cutoff")]
    pub suggestion_cutoff: f64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> String {
    "model/movie_cleaned.csv".to_string()
}

fn default_similarity_path() -> String {
    "model/similarities.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_gateway_timeout_secs() -> u64 {
    5
}

fn default_normalizer_cache_size() -> usize {
    5000
}

fn default_suggestion_cutoff() -> f64 {
    0.5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validated()
    }

    fn validated(self) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&self.suggestion_cutoff) {
            anyhow::bail!(
                "SUGGESTION_CUTOFF must be within [0, 1], got {}",
                self.suggestion_cutoff
            );
        }
        if self.normalizer_cache_size == 0 {
            anyhow::bail!("NORMALIZER_CACHE_SIZE must be greater than zero");
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.catalog_path, "model/movie_cleaned.csv");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.gateway_timeout(), Duration::from_secs(5));
        assert_eq!(config.normalizer_cache_size, 5000);
        assert_eq!(config.redis_url, None);
        assert!((config.suggestion_cutoff - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result = envy::from_iter::<_, Config>(vars(&[("PORT", "8080")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("SUGGESTION_CUTOFF", "0.6"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert!((config.suggestion_cutoff - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cutoff_out_of_range_rejected() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("SUGGESTION_CUTOFF", "1.5"),
        ]))
        .unwrap();

        assert!(config.validated().is_err());
    }
}
