//! TOML configuration for the server and the three upstream providers.
//!
//! Credentials, base URLs, and timeouts are explicit fields handed to each
//! adapter at construction; there is no ambient global state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,
    pub isochrone: ProviderConfig,
    pub places: ProviderConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

/// A keyed upstream provider (OpenRouteService, Google Places).
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Nominatim needs no key, only a timeout and an optional base URL override.
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_nominatim_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let toml = r#"
            [isochrone]
            base_url = "https://api.openrouteservice.org"
            api_key = "ors-key"

            [places]
            base_url = "https://places.googleapis.com"
            api_key = "goog-key"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.listen, "0.0.0.0:3000");
        assert_eq!(config.isochrone.timeout(), Duration::from_secs(10));
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
    }

    #[test]
    fn overrides_apply() {
        let toml = r#"
            listen = "127.0.0.1:8080"

            [isochrone]
            base_url = "http://localhost:9100"
            api_key = "k"
            timeout_secs = 3

            [places]
            base_url = "http://localhost:9200"
            api_key = "k"

            [geocoder]
            base_url = "http://localhost:9300"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.isochrone.timeout(), Duration::from_secs(3));
        assert_eq!(config.geocoder.base_url, "http://localhost:9300");
    }
}
