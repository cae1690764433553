//! dog.ceo API provider
//!
//! Fetches the full breed listing from `GET {base}/breeds/list/all` and picks out
//! the requested breed. Transport, HTTP status and JSON failures are all mapped
//! into [`BreedNotFound`] here, so nothing else leaks through the trait.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{BreedNotFound, BreedProvider, SubBreedList};
use crate::config::ClientConfig;

/// Envelope returned by every dog.ceo endpoint
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    /// Breed map on success, an error string otherwise
    message: Value,
}

/// Remote provider backed by the dog.ceo REST API. Does not cache.
#[derive(Debug, Clone)]
pub struct DogApiBreedProvider {
    client: reqwest::Client,
    list_all_url: String,
}

impl DogApiBreedProvider {
    /// Create a provider against the public dog.ceo API
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a provider with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        let list_all_url = config.list_all_url();
        info!("Dog API provider initialized against {}", list_all_url);

        Ok(Self {
            client,
            list_all_url,
        })
    }

    pub fn list_all_url(&self) -> &str {
        &self.list_all_url
    }

    async fn fetch_body(&self, breed: &str) -> Result<String, BreedNotFound> {
        let response = self
            .client
            .get(&self.list_all_url)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", self.list_all_url, e);
                BreedNotFound::new(breed, format!("request failed: {e}"))
            })?;

        let response = response.error_for_status().map_err(|e| {
            warn!("Dog API returned an error status: {}", e);
            BreedNotFound::new(breed, format!("unexpected HTTP status: {e}"))
        })?;

        response
            .text()
            .await
            .map_err(|e| BreedNotFound::new(breed, format!("failed to read response body: {e}")))
    }
}

#[async_trait]
impl BreedProvider for DogApiBreedProvider {
    async fn lookup(&self, breed: &str) -> Result<SubBreedList, BreedNotFound> {
        debug!("Fetching sub-breeds for '{}' from {}", breed, self.list_all_url);
        let body = self.fetch_body(breed).await?;
        sub_breeds_from_body(&body, breed)
    }
}

/// Extract the sub-breeds of `breed` from a `breeds/list/all` response body.
///
/// The breed is matched by its lowercased name. Order of the returned list is the
/// order of the JSON array.
pub fn sub_breeds_from_body(body: &str, breed: &str) -> Result<SubBreedList, BreedNotFound> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| BreedNotFound::new(breed, format!("malformed response: {e}")))?;

    if !response.status.eq_ignore_ascii_case("success") {
        return Err(BreedNotFound::new(
            breed,
            format!("unexpected response status '{}'", response.status),
        ));
    }

    let breeds = response
        .message
        .as_object()
        .ok_or_else(|| BreedNotFound::new(breed, "response message is not a breed map"))?;

    let subs = breeds
        .get(&breed.to_lowercase())
        .ok_or_else(|| BreedNotFound::new(breed, "breed not found"))?
        .as_array()
        .ok_or_else(|| BreedNotFound::new(breed, "sub-breed entry is not a list"))?;

    subs.iter()
        .map(|sub| {
            sub.as_str()
                .map(str::to_string)
                .ok_or_else(|| BreedNotFound::new(breed, "sub-breed name is not a string"))
        })
        .collect()
}
