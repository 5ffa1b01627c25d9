use mapsync::{
    details::{DetailsQuery, GeosearchResponse},
    routing::{RoutingRequest, RoutingResponse},
    shared::Coordinate,
};
use reqwest::{Url, header::ACCEPT};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const GEOSEARCH_RADIUS: &str = "200";
const GEOSEARCH_FIELDS: &str = "items.point,items.name,items.address_name,items.rubrics,\
items.contact_groups,items.schedule,items.rating,items.reviews,items.photos,\
items.attributes,items.context";

#[derive(Error, Debug)]
pub enum Error {
    #[error("2GIS API key is not configured")]
    MissingApiKey,
    #[error("Invalid upstream url: {0}")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Client for the 2GIS routing and catalog APIs.
#[derive(Clone)]
pub struct DgisClient {
    http: reqwest::Client,
    api_key: Option<String>,
    routing_url: String,
    catalog_url: String,
}

impl DgisClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            routing_url: config.routing_url.clone(),
            catalog_url: config.catalog_url.clone(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RoutingResponse, self::Error> {
        let key = self.api_key.as_deref().ok_or(self::Error::MissingApiKey)?;
        let url = Url::parse_with_params(&self.routing_url, &[("key", key)])
            .map_err(|err| self::Error::InvalidUrl(err.to_string()))?;
        debug!("Requesting car route from {from} to {to}");
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&RoutingRequest::car(from, to))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn geosearch(&self, query: &DetailsQuery) -> Result<GeosearchResponse, self::Error> {
        let key = self.api_key.as_deref().ok_or(self::Error::MissingApiKey)?;
        let point = format!("{},{}", query.lon, query.lat);
        let url = Url::parse_with_params(
            &self.catalog_url,
            &[
                ("q", query.title.as_str()),
                ("point", point.as_str()),
                ("radius", GEOSEARCH_RADIUS),
                ("key", key),
                ("fields", GEOSEARCH_FIELDS),
            ],
        )
        .map_err(|err| self::Error::InvalidUrl(err.to_string()))?;
        debug!("Searching catalog for {:?} near {point}", query.title);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, self::Error> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(self::Error::Status { status, body });
    }
    Ok(response.json().await?)
}
