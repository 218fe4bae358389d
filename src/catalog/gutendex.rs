//! Gutendex HTTP client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{BookError, Result};
use crate::model::{Book, BookId};
use super::{normalize_formats, Catalog};

pub const DEFAULT_BASE_URL: &str = "https://gutendex.com";

/// One page of a Gutendex listing; only `results` is used
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<Book>,
}

/// Client for the Gutendex API.
pub struct GutendexClient {
    http: reqwest::Client,
    base_url: String,
}

impl GutendexClient {
    /// Creates a client against the public Gutendex instance.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Creates a client with a custom base URL.
    ///
    /// The URL must be absolute (`http://` or `https://`).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        match reqwest::Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(BookError::Config(format!(
                    "catalog URL {} has unsupported scheme {}",
                    base_url,
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(BookError::Config(format!(
                    "invalid catalog URL {}: {}",
                    base_url, e
                )))
            }
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.catalog_base_url, config.catalog_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, request: reqwest::RequestBuilder) -> Result<CatalogPage> {
        let page = request
            .send()
            .await?
            .error_for_status()?
            .json::<CatalogPage>()
            .await?;
        Ok(page)
    }
}

#[async_trait]
impl Catalog for GutendexClient {
    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_by_id(&self, id: &BookId) -> Result<Option<Book>> {
        debug!("Looking up book in catalog");

        let request = self
            .http
            .get(format!("{}/books/", self.base_url))
            .query(&[("ids", id.as_str())]);
        let page = self.fetch_page(request).await?;

        Ok(page.results.into_iter().next().map(normalize_formats))
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Book>> {
        debug!("Listing catalog books");

        let request = self.http.get(format!("{}/books", self.base_url));
        let page = self.fetch_page(request).await?;

        debug!(count = page.results.len(), "Received catalog listing");
        Ok(page.results.into_iter().map(normalize_formats).collect())
    }
}
