use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt, time::Duration};
use tracing::debug;

use crate::{config::ProviderConfig, provider::RawForecast};

use super::WeatherProvider;

/// Blocks of the forecast document the screen never reads.
const EXCLUDED_BLOCKS: &str = "minutely,daily,alerts,flags";

/// Client for the Dark Sky forecast API and services that speak the same
/// protocol.
#[derive(Clone)]
pub struct DarkSkyProvider {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
    http: Client,
}

impl DarkSkyProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for weather provider")?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            http,
        })
    }

    // The key is part of the path, so reqwest errors must drop the URL.
    fn forecast_url(&self, latitude: &str, longitude: &str) -> String {
        format!("{}/forecast/{}/{latitude},{longitude}", self.base_url, self.api_key)
    }
}

impl fmt::Debug for DarkSkyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DarkSkyProvider")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherProvider for DarkSkyProvider {
    async fn fetch_weather(&self, latitude: &str, longitude: &str) -> Result<RawForecast> {
        debug!(latitude, longitude, "requesting forecast");

        let res = self
            .http
            .get(self.forecast_url(latitude, longitude))
            .query(&[
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
                ("exclude", EXCLUDED_BLOCKS),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send forecast request")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: RawForecast =
            serde_json::from_str(&body).context("Failed to parse forecast JSON")?;

        debug!(points = parsed.hourly.data.len(), "forecast received");

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_url_places_key_and_coordinates_in_path() {
        let mut cfg = ProviderConfig::new("SECRET".into());
        cfg.base_url = "http://localhost:1234/".into();
        let provider = DarkSkyProvider::new(&cfg).expect("client");

        assert_eq!(
            provider.forecast_url("55.7", "13.19"),
            "http://localhost:1234/forecast/SECRET/55.7,13.19"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = DarkSkyProvider::new(&ProviderConfig::new("SUPERSECRETKEY".into()))
            .expect("client");

        let debug = format!("{provider:?}");
        assert!(debug.contains("DarkSkyProvider"));
        assert!(!debug.contains("SUPERSECRETKEY"));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "å".repeat(250);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
