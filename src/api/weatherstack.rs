//! weatherstack current-conditions endpoint: one bounded GET per run, or a
//! fixed deterministic payload for offline use.

use crate::config::Config;
use crate::error::SinkError;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Thin client over the live API. No retry and no fallback here: the
/// external scheduler owns retry, and live-vs-mock is decided by
/// configuration before the run starts.
pub struct WeatherApi {
    client: reqwest::Client,
    endpoint: Url,
    access_key: String,
    query: String,
}

impl WeatherApi {
    /// Build a client with bounded connect/request timeouts.
    pub fn new(cfg: &Config) -> Result<Self, SinkError> {
        let access_key = cfg.require_api_key()?.to_string();
        let client = reqwest::Client::builder()
            .user_agent(concat!("weathersink/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.weather_api_url.clone(),
            access_key,
            query: cfg.weather_query.clone(),
        })
    }

    /// Fetch the current nested observation; non-success statuses and
    /// transport failures are errors.
    pub async fn fetch_current(&self) -> Result<Value, SinkError> {
        info!(query = %self.query, "fetching current weather");
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("query", self.query.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let payload = resp.json::<Value>().await?;
        info!("weather response received");
        Ok(payload)
    }
}

/// Fixed observation for offline runs and tests; shaped exactly like a live
/// weatherstack response.
pub fn mock_observation() -> Value {
    info!("using deterministic mock payload");
    json!({
        "request": {
            "type": "City",
            "query": "New York, United States of America",
            "language": "en",
            "unit": "m",
        },
        "location": {
            "name": "New York",
            "country": "United States of America",
            "region": "New York",
            "lat": "40.714",
            "lon": "-74.006",
            "timezone_id": "America/New_York",
            "localtime": "2025-09-20 04:36",
            "localtime_epoch": 1758342960,
            "utc_offset": "-4.0",
        },
        "current": {
            "observation_time": "08:36 AM",
            "temperature": 18,
            "weather_code": 116,
            "weather_icons": [
                "https://cdn.worldweatheronline.com/images/wsymbols01_png_64/wsymbol_0004_black_low_cloud.png"
            ],
            "weather_descriptions": ["Partly Cloudy "],
            "astro": {
                "sunrise": "06:42 AM",
                "sunset": "06:56 PM",
                "moonrise": "05:22 AM",
                "moonset": "06:27 PM",
                "moon_phase": "Waning Crescent",
                "moon_illumination": 3,
            },
            "air_quality": {
                "co": "431.05",
                "no2": "38.665",
                "o3": "38",
                "so2": "9.62",
                "pm2_5": "11.1",
                "pm10": "11.285",
                "us-epa-index": "1",
                "gb-defra-index": "1",
            },
            "wind_speed": 18,
            "wind_degree": 34,
            "wind_dir": "NNE",
            "pressure": 1022,
            "precip": 0,
            "humidity": 45,
            "cloudcover": 0,
            "feelslike": 18,
            "uv_index": 0,
            "visibility": 16,
            "is_day": "no",
        },
    })
}
