use crate::{
    Config,
    model::{RootCity, User, Weather},
    provider::{cities::CityApiProvider, ipapi::IpApiProvider, openweather::OpenWeatherProvider},
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};

pub mod cities;
pub mod ipapi;
pub mod openweather;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// 5-day forecast for a position.
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Weather>;
}

#[async_trait]
pub trait CityProvider: Send + Sync + Debug {
    /// One page (1-based) of cities matching `query`.
    async fn search(&self, query: &str, page: u32) -> Result<RootCity>;
}

#[async_trait]
pub trait GeoProvider: Send + Sync + Debug {
    /// Approximate location of the caller.
    async fn locate(&self) -> Result<User>;
}

pub fn weather_provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(config.weather_url(), api_key.to_owned())?))
}

pub fn city_provider_from_config(config: &Config) -> Result<Box<dyn CityProvider>> {
    Ok(Box::new(CityApiProvider::new(config.cities_url()?)?))
}

pub fn geo_provider_from_config(config: &Config) -> Result<Box<dyn GeoProvider>> {
    Ok(Box::new(IpApiProvider::new(config.geo_url())?))
}

pub(crate) fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` with `query`, failing on non-2xx status or undecodable JSON.
/// `service` names the API in error messages.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    service: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T> {
    tracing::debug!(service, url, "Sending request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {service}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {service} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{service} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {service} JSON"))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
