//! API client for the admin-console REST endpoints.
//!
//! This module provides the `ApiClient` for authenticating against the
//! OAuth2 endpoints and running coded-resource child queries, plus the
//! `ResourceEndpoint` adapter that binds a client to one resource path
//! and feeds the tree resolver.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::auth::{Authentication, Credentials};
use crate::models::{Page, ResourceNode};
use crate::nav::ResourceFetcher;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the console backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Arc<String>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Arc<String>) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Arc<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Obtain an [`Authentication`] from the login endpoint using HTTP
    /// Basic credentials. The session layer decides what to do with it.
    pub async fn login(&self, credentials: &Credentials) -> Result<Authentication, ApiError> {
        let url = format!("{}/oauth2/login", self.base_url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("auth payload: {}", e)))
    }

    /// Tell the server the session is over. Best-effort: the local session
    /// is already gone by the time this runs, so failures are only logged.
    pub async fn logout(&self) {
        let url = format!("{}/oauth2/logout", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        match request.send().await {
            Ok(response) => debug!(status = %response.status(), "Logout request completed"),
            Err(e) => debug!(error = %e, "Logout request failed"),
        }
    }

    /// Run one child query: the records directly under `parent_code`, one
    /// level, no descendants. `path` is the resource query path relative
    /// to the base URL, e.g. `menus/search` or `menus/me`.
    ///
    /// No retry here: the retry budget for child queries belongs to the
    /// tree resolver.
    pub async fn fetch_children(
        &self,
        path: &str,
        parent_code: &str,
        tenant_code: &str,
    ) -> Result<Vec<ResourceNode>, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(&[("pcode", parent_code), ("tenantCode", tenant_code)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        debug!(path, pcode = parent_code, "Children response received");
        Self::parse_children(&text)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Parse a children response. Deployments answer either with a bare
    /// array or with a page wrapper; try the array first.
    fn parse_children(text: &str) -> Result<Vec<ResourceNode>, ApiError> {
        if let Ok(nodes) = serde_json::from_str::<Vec<ResourceNode>>(text) {
            return Ok(nodes);
        }

        if let Ok(page) = serde_json::from_str::<Page<ResourceNode>>(text) {
            return Ok(page.content);
        }

        Err(ApiError::InvalidResponse(format!(
            "unrecognized children payload, starts with: {}",
            &text[..text.len().min(200)]
        )))
    }
}

/// Binds an [`ApiClient`] to one coded-resource query path so the tree
/// resolver can fetch child levels without knowing about HTTP.
#[derive(Clone)]
pub struct ResourceEndpoint {
    client: ApiClient,
    path: String,
}

impl ResourceEndpoint {
    /// Query the tenant-wide records of `resource` (`/<resource>/search`).
    pub fn new(client: ApiClient, resource: &str) -> Self {
        Self {
            client,
            path: format!("{}/search", resource),
        }
    }

    /// Query only the records visible to the current user
    /// (`/<resource>/me`), the shape navigation menus use.
    pub fn for_current_user(client: ApiClient, resource: &str) -> Self {
        Self {
            client,
            path: format!("{}/me", resource),
        }
    }
}

impl ResourceFetcher for ResourceEndpoint {
    async fn fetch_children(
        &self,
        parent_code: &str,
        tenant_code: &str,
    ) -> Result<Vec<ResourceNode>, ApiError> {
        self.client
            .fetch_children(&self.path, parent_code, tenant_code)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_children_bare_array() {
        let json = r#"[{"code":"a","parentCode":"0","name":"A","sortOrder":1}]"#;
        let nodes = ApiClient::parse_children(json).expect("array payload should parse");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].code, "a");
    }

    #[test]
    fn test_parse_children_page_wrapper() {
        let json = r#"{"content":[{"code":"a","parentCode":"0","name":"A"},{"code":"b","parentCode":"0","name":"B"}],"totalElements":2,"pageable":{"pageNumber":0,"pageSize":20}}"#;
        let nodes = ApiClient::parse_children(json).expect("page payload should parse");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].code, "b");
    }

    #[test]
    fn test_parse_children_rejects_garbage() {
        let err = ApiClient::parse_children("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("https://console.example.com/api/").expect("client builds");
        assert_eq!(client.base_url, "https://console.example.com/api");
    }

    #[test]
    fn test_endpoint_paths() {
        let client = ApiClient::new("https://console.example.com").expect("client builds");
        let search = ResourceEndpoint::new(client.clone(), "menus");
        assert_eq!(search.path, "menus/search");
        let me = ResourceEndpoint::for_current_user(client, "menus");
        assert_eq!(me.path, "menus/me");
    }
}
