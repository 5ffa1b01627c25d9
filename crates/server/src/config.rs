use std::env;

const PLACEHOLDER_KEY: &str = "your_api_key_here";

pub struct Config {
    pub port: u16,
    pub api_key: Option<String>,
    pub routing_url: String,
    pub catalog_url: String,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            api_key: None,
            routing_url: "https://routing.api.2gis.com/routing/7.0.0/global".into(),
            catalog_url: "https://catalog.api.2gis.com/3.0/items/geosearch".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl Config {
    /// Reads `DGIS_API_KEY`, `PORT`, `DGIS_ROUTING_URL` and
    /// `DGIS_CATALOG_URL`, keeping the default for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = env::var("DGIS_API_KEY")
            .ok()
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_KEY);
        if let Some(port) = env::var("PORT").ok().and_then(|port| port.parse().ok()) {
            config.port = port;
        }
        if let Ok(url) = env::var("DGIS_ROUTING_URL") {
            config.routing_url = url;
        }
        if let Ok(url) = env::var("DGIS_CATALOG_URL") {
            config.catalog_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
