use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::model::User;

use super::{GeoProvider, get_json, http_client};

/// IP geolocation in the ip-api.com response format.
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    url: String,
    http: Client,
}

impl IpApiProvider {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self { url: url.to_string(), http: http_client()? })
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    async fn locate(&self) -> Result<User> {
        let user: User = get_json(&self.http, "Geolocation API", &self.url, &[]).await?;

        if !user.is_success() {
            return Err(anyhow!(
                "Geolocation lookup failed: {}",
                user.message.as_deref().unwrap_or(user.status.as_str())
            ));
        }

        tracing::debug!(city = %user.city, lat = user.lat, lon = user.lon, "Located user");
        Ok(user)
    }
}
