//! HTTP client for the SupportDesk asset server.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use supportdesk_core::{Configuration, Result, SupportDeskError};
use tracing::{debug, warn};

use crate::source::{ConfigSource, DocumentSource, FlagSource};

/// Well-known path of the deployment configuration.
pub const CONFIG_PATH: &str = "/app.config.json";

/// Well-known path of the runtime feature-flags document.
pub const FLAGS_PATH: &str = "/feature-flags.json";

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for the static assets a SupportDesk deployment serves.
///
/// Every fetch is a single `GET`. There is no retry loop: a failed request
/// is reported to the caller, which decides whether cached or bundled data
/// can stand in. Requests are bounded by the configured timeout.
///
/// # Examples
///
/// ```no_run
/// use supportdeskctl::client::SupportDeskClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = SupportDeskClient::new("http://localhost:8080", 10)?;
/// let config = client.fetch_remote().await?;
/// println!("Serving {} v{}", config.app_name, config.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SupportDeskClient {
    client: Client,
    base_url: String,
}

impl SupportDeskClient {
    /// Create a client for `base_url` with a request timeout in seconds.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("supportdeskctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SupportDeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path; full URLs pass through unchanged.
    fn url_for(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Turn a response into its body text, mapping failure statuses.
    async fn handle_response(response: Response, endpoint: &str) -> Result<String> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            SupportDeskError::fetch(endpoint, format!("failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            let reason = match status {
                StatusCode::NOT_FOUND => "not found (404)".to_string(),
                StatusCode::UNAUTHORIZED => "unauthorized (401)".to_string(),
                StatusCode::FORBIDDEN => "access forbidden (403)".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR => format!("server error (500): {}", text),
                StatusCode::SERVICE_UNAVAILABLE => "service unavailable (503)".to_string(),
                _ => format!("HTTP {}: {}", status, text),
            };
            return Err(SupportDeskError::fetch(endpoint, reason));
        }

        Ok(text)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                format!("connection failed: {}", e)
            } else {
                e.to_string()
            };
            SupportDeskError::fetch(path, reason)
        })?;

        Self::handle_response(response, path).await
    }

    /// Fetch and validate the deployment configuration.
    ///
    /// A non-success status is a `Fetch` error; a body that is not a valid
    /// Configuration is a `Validation` error.
    pub async fn fetch_remote(&self) -> Result<Configuration> {
        let body = self.get_text(CONFIG_PATH).await?;
        let config = Configuration::from_json_str(&body)?;
        debug!(version = %config.version, "fetched configuration");
        Ok(config)
    }

    /// Fetch the runtime feature-flags document.
    ///
    /// Entries that are not booleans are ignored.
    pub async fn fetch_flags(&self) -> Result<HashMap<String, bool>> {
        let body = self.get_text(FLAGS_PATH).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| SupportDeskError::fetch(FLAGS_PATH, format!("invalid JSON: {}", e)))?;

        let Value::Object(entries) = value else {
            return Err(SupportDeskError::fetch(
                FLAGS_PATH,
                "expected an object of named booleans",
            ));
        };

        let mut flags = HashMap::with_capacity(entries.len());
        for (name, value) in entries {
            match value.as_bool() {
                Some(enabled) => {
                    flags.insert(name, enabled);
                }
                None => warn!(flag = %name, "ignoring non-boolean feature flag"),
            }
        }
        Ok(flags)
    }

    /// Fetch a collection manifest; the body must be a JSON array.
    pub async fn fetch_manifest(&self, path: &str) -> Result<Vec<Value>> {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| SupportDeskError::DocumentLoad {
            id: path.to_string(),
            reason: format!("invalid manifest: {}", e),
        })
    }

    /// Fetch a document body as plain text.
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        self.get_text(path).await
    }
}

#[async_trait]
impl ConfigSource for SupportDeskClient {
    async fn fetch_config(&self) -> Result<Configuration> {
        self.fetch_remote().await
    }
}

#[async_trait]
impl FlagSource for SupportDeskClient {
    async fn fetch_flags(&self) -> Result<HashMap<String, bool>> {
        SupportDeskClient::fetch_flags(self).await
    }
}

#[async_trait]
impl DocumentSource for SupportDeskClient {
    async fn fetch_manifest(&self, path: &str) -> Result<Vec<Value>> {
        SupportDeskClient::fetch_manifest(self, path).await
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        SupportDeskClient::fetch_text(self, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockServer;
    use serde_json::json;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("http://localhost:8080"),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_url("http://localhost:8080/"),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_url("http://example.com/support///"),
            "http://example.com/support"
        );
    }

    #[test]
    fn test_url_for() {
        let client = SupportDeskClient::new("http://localhost:8080/", 5).unwrap();
        assert_eq!(
            client.url_for("/app.config.json"),
            "http://localhost:8080/app.config.json"
        );
        assert_eq!(
            client.url_for("documents/wifi.md"),
            "http://localhost:8080/documents/wifi.md"
        );
        assert_eq!(
            client.url_for("https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_fetch_remote_success() {
        let (server, url) = MockServer::new().start().await.unwrap();
        let client = SupportDeskClient::new(&url, 5).unwrap();

        let config = client.fetch_remote().await.unwrap();
        assert_eq!(config.company_name, "Acme Corporation");
        assert_eq!(server.state().config_requests(), 1);
    }

    #[tokio::test]
    async fn test_fetch_remote_http_error_is_fetch_error() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server.state().set_config_status(503);
        let client = SupportDeskClient::new(&url, 5).unwrap();

        let err = client.fetch_remote().await.unwrap_err();
        assert!(err.is_fetch());
        assert!(err.to_string().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_remote_invalid_body_is_validation_error() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server.state().set_config_body("{ not json");
        let client = SupportDeskClient::new(&url, 5).unwrap();

        let err = client.fetch_remote().await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        // Bind and drop a listener to get a port nobody serves
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = SupportDeskClient::new(&format!("http://127.0.0.1:{}", port), 2).unwrap();
        let err = client.fetch_remote().await.unwrap_err();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_flags_keeps_booleans_only() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server
            .state()
            .set_flags(&json!({ "darkMode": true, "beta": false, "rollout": 25 }));
        let client = SupportDeskClient::new(&url, 5).unwrap();

        let flags = client.fetch_flags().await.unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.get("darkMode"), Some(&true));
        assert_eq!(flags.get("beta"), Some(&false));
    }

    #[tokio::test]
    async fn test_fetch_manifest_and_text() {
        let (server, url) = MockServer::new().start().await.unwrap();
        let client = SupportDeskClient::new(&url, 5).unwrap();

        let items = client
            .fetch_manifest("/documents/manifest.json")
            .await
            .unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0]["id"], json!("wifi-network"));

        server
            .state()
            .add_file("/broken/manifest.json", r#"{"id": "not-an-array"}"#);
        let err = client
            .fetch_manifest("/broken/manifest.json")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid manifest"));

        let body = client.fetch_text("/documents/wifi.md").await.unwrap();
        assert!(body.contains("{companyName}"));

        let err = client.fetch_text("/documents/nope.md").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
