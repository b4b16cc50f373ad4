//! HTTP implementation of the directory API port

use async_trait::async_trait;
use cowork_core::config::ClientConfig;
use cowork_core::models::{
    BlogPost, NewReport, PricingPackage, Report, Service, SpaceDetail, SpaceId,
};
use cowork_core::query::SpaceQuery;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::api::{DirectoryApi, HealthStatus, SpaceListing};
use crate::error::{ClientError, Result};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Directory API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    base_url: Url,
    api_key: Option<String>,
    retries: u32,
    client: reqwest::Client,
}

impl HttpDirectoryClient {
    /// Create a client for the API at `base_url` with a 10 second timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, None, Duration::from_secs(10), 0)
    }

    /// Create a client from layered client configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::build(
            &config.api_url.value,
            config.api_key.value.clone(),
            Duration::from_secs(config.timeout_secs.value),
            config.retries.value,
        )
    }

    fn build(base_url: &str, api_key: Option<String>, timeout: Duration, retries: u32) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, api_key, retries, client })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Number of extra attempts for retryable failures
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, keeping any base path
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the list spaces endpoint for a query
    pub fn spaces_url(&self, query: &SpaceQuery) -> Result<Url> {
        let mut url = self.endpoint(&["spaces"])?;
        let params = query.to_params();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        self.execute(Method::GET, url, None, resource).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
        resource: &str,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.send_once(method.clone(), url.clone(), body, resource).await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(%url, attempt, error = %e, "Retrying directory request");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
        resource: &str,
    ) -> Result<T> {
        tracing::debug!(%method, %url, "Sending directory request");

        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { resource: resource.to_string() });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), message: error_message(&text) });
        }

        response.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct PostsEnvelope {
    posts: Vec<BlogPost>,
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpaceListing> {
        self.get(self.spaces_url(query)?, "spaces").await
    }

    async fn get_space(&self, id: SpaceId) -> Result<SpaceDetail> {
        let id = id.to_string();
        self.get(self.endpoint(&["spaces", &id])?, &format!("space {}", id)).await
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get(self.endpoint(&["services"])?, "services").await
    }

    async fn services_for_space(&self, id: SpaceId) -> Result<Vec<Service>> {
        let id = id.to_string();
        self.get(self.endpoint(&["spaces", &id, "services"])?, &format!("services of space {}", id))
            .await
    }

    async fn pricing_for_space(&self, id: SpaceId) -> Result<Vec<PricingPackage>> {
        let id = id.to_string();
        self.get(self.endpoint(&["spaces", &id, "pricing"])?, &format!("pricing of space {}", id))
            .await
    }

    async fn submit_report(&self, report: &NewReport) -> Result<Report> {
        let body = serde_json::to_value(report).map_err(|e| ClientError::Decode(e.to_string()))?;
        let resource = format!("space {}", report.space_id);
        self.execute(Method::POST, self.endpoint(&["reports"])?, Some(&body), &resource).await
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let envelope: PostsEnvelope = self.get(self.endpoint(&["posts"])?, "posts").await?;
        Ok(envelope.posts)
    }

    async fn get_post(&self, slug: &str) -> Result<BlogPost> {
        self.get(self.endpoint(&["posts", slug])?, &format!("post {}", slug)).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get(self.endpoint(&["health"])?, "health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowork_core::models::{FilterCriteria, MapBounds, MinRating};

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpDirectoryClient::new("https://api.example.com/prod").unwrap();
        let url = client.endpoint(&["spaces", "7"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/prod/spaces/7");

        let client = HttpDirectoryClient::new("https://api.example.com/prod/").unwrap();
        let url = client.endpoint(&["services"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/prod/services");
    }

    #[test]
    fn test_spaces_url_carries_filters_and_bounds() {
        let client = HttpDirectoryClient::new("http://localhost:3001").unwrap();
        let filters = FilterCriteria::new()
            .with_min_rating(MinRating::Four)
            .with_service("wifi")
            .with_service("coffee");
        let bounds = MapBounds::new(53.0, 52.0, 14.0, 13.0).unwrap();
        let url = client.spaces_url(&SpaceQuery::new(filters, Some(bounds))).unwrap();

        let query = url.query().unwrap();
        assert!(query.contains("rating=4&services=wifi&services=coffee"));
        assert!(query.contains("north=53&south=52&east=14&west=13"));
    }

    #[test]
    fn test_spaces_url_without_params_has_no_query() {
        let client = HttpDirectoryClient::new("http://localhost:3001").unwrap();
        let url = client.spaces_url(&SpaceQuery::default()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/spaces");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(HttpDirectoryClient::new("not a url"), Err(ClientError::InvalidUrl(_))));
        assert!(matches!(HttpDirectoryClient::new("mailto:a@b.co"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        assert_eq!(error_message(r#"{"message":"Space not found"}"#), "Space not found");
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
        assert_eq!(error_message(""), "no response body");
    }

    #[test]
    fn test_from_config() {
        let mut config = ClientConfig::with_defaults();
        config.api_key.value = Some("secret".to_string());
        config.retries.value = 2;
        let client = HttpDirectoryClient::from_config(&config).unwrap();
        assert_eq!(client.api_key.as_deref(), Some("secret"));
        assert_eq!(client.retries, 2);
    }
}
