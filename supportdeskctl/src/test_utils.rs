//! Test utilities
//!
//! Provides an in-process mock of a deployment's static asset server and a
//! sample configuration.

use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::client::{CONFIG_PATH, FLAGS_PATH};

/// A valid configuration for the fictional Acme Corporation.
pub fn sample_config() -> Value {
    json!({
        "$version": "1.2",
        "companyName": "Acme Corporation",
        "appName": "Acme Support",
        "appId": "com.acmecorp.support",
        "appSubtitle": "IT Help Desk",
        "domain": "acmecorp.com",
        "vpnPortal": "vpn.acmecorp.com",
        "contacts": {
            "email": "ithelpdesk@acmecorp.com",
            "emergencyEmail": "security@acmecorp.com",
            "regions": [
                {
                    "region": "Americas",
                    "city": "New York (HQ)",
                    "phone": "+1 212 555 0100",
                    "hours": "8:00-18:00 EST"
                },
                {
                    "region": "EMEA",
                    "city": "London",
                    "phone": "+44 20 7946 0958",
                    "hours": "8:00-17:00 GMT"
                },
                {
                    "region": "Americas",
                    "city": "Toronto",
                    "phone": "+1 416 555 0199",
                    "hours": "24/7"
                }
            ]
        },
        "features": {
            "tagFiltering": true,
            "pdfDocuments": true,
            "wordDocuments": true,
            "imageDocuments": false
        },
        "theme": {
            "defaultTheme": "light",
            "enableThemeSwitcher": true,
            "themes": [
                { "id": "light", "name": "Light", "enabled": true },
                { "id": "dark", "name": "Dark", "description": "Low-light reading", "enabled": true },
                { "id": "high-contrast", "name": "High Contrast", "enabled": false }
            ]
        },
        "documents": [
            { "name": "IT Guides", "path": "/documents/manifest.json", "position": 0 }
        ]
    })
}

/// The manifest served at `/documents/manifest.json`.
///
/// `missing.md` is listed but never served; `diagram.png` is an image,
/// which the sample configuration disables.
pub fn sample_manifest() -> Value {
    json!([
        {
            "id": "wifi-network",
            "title": "{companyName} Wi-Fi",
            "category": "Network",
            "icon": "wifi",
            "file": "wifi.md",
            "tags": ["network", "wifi"]
        },
        {
            "id": "vpn-setup",
            "title": "VPN Setup",
            "category": "Network",
            "icon": "vpn",
            "file": "vpn.md",
            "tags": ["network", "remote"]
        },
        {
            "id": "acceptable-use",
            "title": "Acceptable Use Policy",
            "category": "Security",
            "icon": "security",
            "file": "acceptable-use.pdf",
            "tags": ["security", "policy"]
        },
        {
            "id": "network-diagram",
            "title": "Office Network Diagram",
            "category": "Network",
            "icon": "image",
            "file": "diagram.png"
        },
        {
            "id": "printer-setup",
            "title": "Printer Setup",
            "category": "Hardware",
            "icon": "printer",
            "file": "missing.md"
        }
    ])
}

/// Mock server state, shared with the running router.
#[derive(Debug, Clone)]
pub struct MockServerState {
    config_body: Arc<Mutex<String>>,
    config_status: Arc<Mutex<u16>>,
    flags_body: Arc<Mutex<String>>,
    flags_status: Arc<Mutex<u16>>,
    /// Other assets, keyed by request path
    files: Arc<Mutex<HashMap<String, String>>>,
    config_requests: Arc<AtomicUsize>,
    flag_requests: Arc<AtomicUsize>,
}

impl Default for MockServerState {
    fn default() -> Self {
        let mut files = HashMap::new();
        files.insert(
            "/documents/manifest.json".to_string(),
            sample_manifest().to_string(),
        );
        files.insert(
            "/documents/wifi.md".to_string(),
            "# {companyName} Wi-Fi\n\nJoin {companyName.toUpperCase()}-CORP. Help: {email}"
                .to_string(),
        );
        files.insert(
            "/documents/vpn.md".to_string(),
            "# VPN\n\nPortal: {vpnPortal}\nIncidents: {emergencyEmail}".to_string(),
        );

        Self {
            config_body: Arc::new(Mutex::new(sample_config().to_string())),
            config_status: Arc::new(Mutex::new(200)),
            flags_body: Arc::new(Mutex::new(
                json!({ "newSearch": true, "betaViewer": false }).to_string(),
            )),
            flags_status: Arc::new(Mutex::new(200)),
            files: Arc::new(Mutex::new(files)),
            config_requests: Arc::new(AtomicUsize::new(0)),
            flag_requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockServerState {
    pub fn set_config(&self, config: &Value) {
        self.set_config_body(&config.to_string());
    }

    pub fn set_config_body(&self, body: &str) {
        *lock(&self.config_body) = body.to_string();
    }

    pub fn set_config_status(&self, status: u16) {
        *lock(&self.config_status) = status;
    }

    pub fn set_flags(&self, flags: &Value) {
        *lock(&self.flags_body) = flags.to_string();
    }

    pub fn set_flags_status(&self, status: u16) {
        *lock(&self.flags_status) = status;
    }

    pub fn add_file(&self, path: &str, body: &str) {
        lock(&self.files).insert(path.to_string(), body.to_string());
    }

    pub fn remove_file(&self, path: &str) {
        lock(&self.files).remove(path);
    }

    pub fn config_requests(&self) -> usize {
        self.config_requests.load(Ordering::SeqCst)
    }

    pub fn flag_requests(&self) -> usize {
        self.flag_requests.load(Ordering::SeqCst)
    }
}

/// Mock asset server
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Assigned when the server starts
        }
    }

    /// Start the mock server and return its base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route(CONFIG_PATH, get(config_handler))
            .route(FLAGS_PATH, get(flags_handler))
            .fallback(file_handler)
            .with_state(self.state.clone())
    }
}

/// Lock, recovering from poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn config_handler(State(state): State<MockServerState>) -> impl IntoResponse {
    state.config_requests.fetch_add(1, Ordering::SeqCst);
    let status = status_code(*lock(&state.config_status));
    let body = lock(&state.config_body).clone();
    (status, body)
}

async fn flags_handler(State(state): State<MockServerState>) -> impl IntoResponse {
    state.flag_requests.fetch_add(1, Ordering::SeqCst);
    let status = status_code(*lock(&state.flags_status));
    let body = lock(&state.flags_body).clone();
    (status, body)
}

async fn file_handler(State(state): State<MockServerState>, uri: Uri) -> impl IntoResponse {
    match lock(&state.files).get(uri.path()) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, "Not Found".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supportdesk_core::Configuration;

    #[test]
    fn test_sample_config_is_valid() {
        let config = Configuration::from_value(sample_config()).unwrap();
        assert_eq!(config.app_name, "Acme Support");
        assert_eq!(config.version, "1.2");
    }

    #[tokio::test]
    async fn test_mock_server_startup() {
        let (server, url) = MockServer::new().start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));

        let response = reqwest::get(format!("{}{}", url, CONFIG_PATH)).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(server.state().config_requests(), 1);
    }

    #[tokio::test]
    async fn test_status_override_and_missing_files() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server.state().set_config_status(500);

        let response = reqwest::get(format!("{}{}", url, CONFIG_PATH)).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);

        let response = reqwest::get(format!("{}/documents/missing.md", url))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }
}
