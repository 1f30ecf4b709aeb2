use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::model::RootCity;

use super::{CityProvider, get_json, http_client};

/// Paged city search over a JSON endpoint answering `?search=<q>&page=<n>`.
#[derive(Debug, Clone)]
pub struct CityApiProvider {
    url: String,
    http: Client,
}

impl CityApiProvider {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self { url: url.to_string(), http: http_client()? })
    }
}

#[async_trait]
impl CityProvider for CityApiProvider {
    async fn search(&self, query: &str, page: u32) -> Result<RootCity> {
        let page = page.max(1).to_string();

        get_json(
            &self.http,
            "City API",
            &self.url,
            &[("search", query), ("page", page.as_str())],
        )
        .await
    }
}
