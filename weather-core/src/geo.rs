//! Client for the PSGC geographic reference API.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    error::Result,
    http::{build_client, fetch_json},
    model::{CityOrMunicipality, Province},
};

pub const DEFAULT_GEO_BASE_URL: &str = "https://psgc.gitlab.io/api";

/// Read-only source of provinces and their cities/municipalities.
///
/// Lists are returned in whatever order the source provides; sorting is the
/// caller's concern.
#[async_trait]
pub trait GeoDirectory: Send + Sync + Debug {
    async fn provinces(&self) -> Result<Vec<Province>>;

    async fn cities_municipalities(&self, province_code: &str) -> Result<Vec<CityOrMunicipality>>;
}

#[derive(Debug, Clone)]
pub struct PsgcClient {
    base_url: String,
    http: Client,
}

impl PsgcClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_GEO_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GeoDirectory for PsgcClient {
    async fn provinces(&self) -> Result<Vec<Province>> {
        let url = format!("{}/provinces/", self.base_url);
        tracing::debug!(%url, "fetching provinces");

        let provinces: Vec<Province> = fetch_json(self.http.get(&url), "province list").await?;
        tracing::info!(count = provinces.len(), "provinces loaded");
        Ok(provinces)
    }

    async fn cities_municipalities(&self, province_code: &str) -> Result<Vec<CityOrMunicipality>> {
        let url = format!("{}/provinces/{}/cities-municipalities/", self.base_url, province_code);
        tracing::debug!(%url, "fetching cities/municipalities");

        let cities: Vec<CityOrMunicipality> =
            fetch_json(self.http.get(&url), "city/municipality list").await?;
        tracing::info!(province_code, count = cities.len(), "cities/municipalities loaded");
        Ok(cities)
    }
}
