use crate::{Config, provider::darksky::DarkSkyProvider};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::Debug;

pub mod darksky;

/// Forecast document in the Dark Sky layout, limited to the blocks the
/// place screen reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub currently: RawCurrently,
    pub hourly: RawHourly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCurrently {
    #[serde(deserialize_with = "number_or_text")]
    pub temperature: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHourly {
    #[serde(default)]
    pub data: Vec<RawHourPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHourPoint {
    /// Seconds since the Unix epoch.
    #[serde(deserialize_with = "integer_or_text")]
    pub time: i64,
    #[serde(deserialize_with = "number_or_text")]
    pub temperature: f64,
    #[serde(default)]
    pub icon: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Value(T),
    Text(String),
}

fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Loose::<f64>::deserialize(deserializer)? {
        Loose::Value(v) => Ok(v),
        Loose::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{s}'"))),
    }
}

fn integer_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Loose::<i64>::deserialize(deserializer)? {
        Loose::Value(v) => Ok(v),
        Loose::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an integer timestamp, got '{s}'"))),
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Coordinates are passed through as given by the caller.
    async fn fetch_weather(&self, latitude: &str, longitude: &str) -> anyhow::Result<RawForecast>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = config
        .provider
        .as_ref()
        .filter(|_| config.is_provider_configured())
        .ok_or_else(|| {
            anyhow!(
                "No API key configured for the weather provider.\n\
                 Hint: run `badplats configure` and enter your API key."
            )
        })?;

    Ok(Box::new(DarkSkyProvider::new(provider)?))
}

/// Stands in when no provider could be built, so the screen still opens and
/// only the weather step fails.
#[derive(Debug)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl WeatherProvider for UnavailableProvider {
    async fn fetch_weather(&self, _latitude: &str, _longitude: &str) -> anyhow::Result<RawForecast> {
        Err(anyhow!("{}", self.reason))
    }
}

/// Like [`provider_from_config`], but a missing or broken provider setup
/// becomes an [`UnavailableProvider`].
pub fn provider_or_unavailable(config: &Config) -> Box<dyn WeatherProvider> {
    match provider_from_config(config) {
        Ok(provider) => provider,
        Err(err) => Box::new(UnavailableProvider::new(format!("{err:#}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `badplats configure`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_at_fetch_time() {
        let provider = provider_or_unavailable(&Config::default());

        let err = provider.fetch_weather("55.7", "13.19").await.unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn accepts_numeric_fields_as_text() {
        let raw: RawForecast = serde_json::from_value(serde_json::json!({
            "currently": { "temperature": "18.9", "summary": "Klart", "icon": "clear-day" },
            "hourly": { "data": [{ "time": "1000", "temperature": "20.7", "icon": "x" }] }
        }))
        .expect("text numbers should parse");

        assert_eq!(raw.currently.temperature, 18.9);
        assert_eq!(raw.hourly.data[0].time, 1000);
        assert_eq!(raw.hourly.data[0].temperature, 20.7);
    }

    #[test]
    fn accepts_numeric_fields_as_numbers() {
        let raw: RawForecast = serde_json::from_value(serde_json::json!({
            "currently": { "temperature": -3.2, "summary": "Snö", "icon": "snow" },
            "hourly": { "data": [{ "time": 1_500_000_000, "temperature": 1, "icon": "snow" }] }
        }))
        .expect("numbers should parse");

        assert_eq!(raw.currently.temperature, -3.2);
        assert_eq!(raw.hourly.data[0].time, 1_500_000_000);
        assert_eq!(raw.hourly.data[0].temperature, 1.0);
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let res = serde_json::from_value::<RawForecast>(serde_json::json!({
            "currently": { "temperature": 1.0 },
            "hourly": { "data": [{ "time": "10a0", "temperature": 1.0 }] }
        }));

        let err = res.unwrap_err();
        assert!(err.to_string().contains("expected an integer timestamp"));
    }
}
