use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::model::Weather;

use super::{WeatherProvider, get_json, http_client};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `base_url` is the API root, e.g. `https://api.openweathermap.org`.
    pub fn new(base_url: &str, api_key: String) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: http_client()?,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Weather> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let lat = lat.to_string();
        let lon = lon.to_string();

        get_json(
            &self.http,
            "OpenWeather forecast",
            &url,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ],
        )
        .await
    }
}
