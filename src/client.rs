use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::BrowserConfig;
use crate::error::{BrowserError, Result};
use crate::model::{CategoriesResponse, MealsResponse, RawRecipeRecord};

/// Read-only access to a recipe catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Recipes whose name matches `query`; no match is an empty list
    async fn search_by_name(&self, query: &str) -> Result<Vec<RawRecipeRecord>>;

    /// Zero or one record for `id`
    async fn lookup_by_id(&self, id: &str) -> Result<Vec<RawRecipeRecord>>;

    /// `count` independent random picks; duplicates are possible
    async fn random_sample(&self, count: usize) -> Result<Vec<RawRecipeRecord>>;

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawRecipeRecord>>;

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RawRecipeRecord>>;

    /// Names of every category the catalog knows about
    async fn list_categories(&self) -> Result<Vec<String>>;
}

/// HTTP client for a TheMealDB-compatible API
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recipe-browser/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BrowserConfig) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            Some(Duration::from_secs(config.timeout)),
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} answered with status {}", url, status);
            return Err(BrowserError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn meals(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<RawRecipeRecord>> {
        let response: MealsResponse = self.get_json(endpoint, params).await?;
        Ok(response.into_records())
    }
}

#[async_trait]
impl CatalogSource for MealDbClient {
    async fn search_by_name(&self, query: &str) -> Result<Vec<RawRecipeRecord>> {
        self.meals("search.php", &[("s", query)]).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Vec<RawRecipeRecord>> {
        self.meals("lookup.php", &[("i", id)]).await
    }

    async fn random_sample(&self, count: usize) -> Result<Vec<RawRecipeRecord>> {
        let picks = (0..count).map(|_| self.meals("random.php", &[]));
        let batches = try_join_all(picks).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawRecipeRecord>> {
        self.meals("filter.php", &[("c", category)]).await
    }

    async fn filter_by_area(&self, area: &str) -> Result<Vec<RawRecipeRecord>> {
        self.meals("filter.php", &[("a", area)]).await
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let response: CategoriesResponse = self.get_json("list.php", &[("c", "list")]).await?;
        Ok(response
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }
}
