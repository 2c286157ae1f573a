use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Product,
    error::{ApiError, ApiException},
    fixtures::sample_products,
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_ENDPOINT: &str = "productos";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The single fetch operation the catalog loader depends on.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn get_products(&self) -> Result<Vec<Product>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fetches the catalog as a JSON array from `GET {base_url}/{endpoint}`.
pub struct HttpProductSource {
    http: Client,
    products_url: Url,
}

impl HttpProductSource {
    pub fn new(config: &HttpSourceConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Self::with_client(http, config)
    }

    pub fn with_client(http: Client, config: &HttpSourceConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            products_url: products_url(&config.base_url, &config.endpoint)?,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn get_products(&self) -> Result<Vec<Product>, FetchError> {
        debug!(url = %self.products_url, "requesting catalog");
        let response = self.http.get(self.products_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let body = response.bytes().await?;
        let products: Vec<Product> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        validate_products(&products)?;
        debug!(count = products.len(), "catalog received");
        Ok(products)
    }
}

/// Serves the built-in sample catalog.
pub struct FixtureProductSource;

#[async_trait]
impl ProductSource for FixtureProductSource {
    async fn get_products(&self) -> Result<Vec<Product>, FetchError> {
        Ok(sample_products())
    }
}

pub struct MissingProductSource;

#[async_trait]
impl ProductSource for MissingProductSource {
    async fn get_products(&self) -> Result<Vec<Product>, FetchError> {
        Err(FetchError::Unavailable(
            "no product source configured".to_string(),
        ))
    }
}

fn products_url(base_url: &str, endpoint: &str) -> Result<Url, FetchError> {
    let mut base = Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(endpoint.trim_start_matches('/'))?)
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return ApiException::from(api_error).to_string();
    }
    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}

/// Ids must be unique and prices finite and non-negative.
fn validate_products(products: &[Product]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(FetchError::DuplicateId(product.id));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(FetchError::InvalidPrice {
                id: product.id,
                price: product.price,
            });
        }
    }
    Ok(())
}
