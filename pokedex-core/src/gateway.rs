//! Remote data gateway - abstraction over the catalog API transport
//!
//! The core never talks to reqwest directly; everything goes through
//! [`CatalogGateway`] so the same pipeline runs against:
//! - `HttpGateway` (the live PokeAPI or a mirror)
//! - `MemoryGateway` (fixture files for offline use and tests)

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{CatalogConfig, DEFAULT_BASE_URL};
use crate::error::{CatalogError, Result};

/// Transport for read-only GET calls against the catalog API
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// GET an absolute url or a path relative to the base url
    async fn get(&self, url_or_path: &str) -> Result<Value>;

    /// Root every relative path is resolved against
    fn base_url(&self) -> &str;

    /// Gateway identifier for logging
    fn name(&self) -> &'static str;
}

/// GET and decode into a typed record
pub async fn fetch<T: DeserializeOwned>(
    gateway: &dyn CatalogGateway,
    url_or_path: &str,
) -> Result<T> {
    let value = gateway.get(url_or_path).await?;
    serde_json::from_value(value)
        .map_err(|e| CatalogError::Shape(format!("{url_or_path}: {e}")))
}

/// URL templates for the endpoints the catalog uses
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page(&self, limit: u32, offset: u32) -> String {
        format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url)
    }

    /// Canonical detail url for a name or numeric id
    pub fn pokemon(&self, name_or_id: &str) -> String {
        format!("{}/pokemon/{name_or_id}", self.base_url)
    }

    pub fn generation(&self, id: u8) -> String {
        format!("{}/generation/{id}", self.base_url)
    }

    /// Detail url for a species url (`pokemon-species/25/` → `pokemon/25/`)
    pub fn species_to_pokemon(species_url: &str) -> String {
        species_url.replace("-species", "")
    }
}

/// Live HTTP gateway
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, url_or_path: &str) -> String {
        if url_or_path.starts_with("http://") || url_or_path.starts_with("https://") {
            return url_or_path.to_string();
        }
        format!("{}/{}", self.base_url, url_or_path.trim_start_matches('/'))
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn get(&self, url_or_path: &str) -> Result<Value> {
        let url = self.resolve(url_or_path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url));
        }
        if !status.is_success() {
            warn!("Catalog API error: HTTP {} from {}", status, url);
            return Err(CatalogError::Network(format!("HTTP {status} from {url}")));
        }

        Ok(response.json::<Value>().await?)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Fixture file understood by [`MemoryGateway::from_fixture_file`]
#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    base_url: Option<String>,
    responses: HashMap<String, Value>,
}

/// In-memory gateway serving canned JSON by path
///
/// Keys are paths relative to the base url with surrounding slashes removed,
/// e.g. `pokemon?limit=20&offset=0` or `pokemon-species/25`.
pub struct MemoryGateway {
    base_url: String,
    responses: HashMap<String, Value>,
    failures: HashSet<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MemoryGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            responses: HashMap::new(),
            failures: HashSet::new(),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Load `{"base_url": ..., "responses": {path: json}}`
    pub fn from_fixture_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: FixtureFile = serde_json::from_str(&content).map_err(|e| {
            CatalogError::Config(format!("Invalid fixture file {}: {e}", path.display()))
        })?;

        let mut gateway = Self::new(fixture.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
        for (key, value) in fixture.responses {
            gateway = gateway.with_response(&key, value);
        }
        debug!(
            "Loaded {} fixture responses from {}",
            gateway.responses.len(),
            path.display()
        );
        Ok(gateway)
    }

    pub fn with_response(mut self, url_or_path: &str, value: Value) -> Self {
        let key = self.key(url_or_path);
        self.responses.insert(key, value);
        self
    }

    /// Every request for this path fails with a network error
    pub fn with_failure(mut self, url_or_path: &str) -> Self {
        let key = self.key(url_or_path);
        self.failures.insert(key);
        self
    }

    /// Delay the response for this path
    pub fn with_delay(mut self, url_or_path: &str, delay: Duration) -> Self {
        let key = self.key(url_or_path);
        self.delays.insert(key, delay);
        self
    }

    /// Normalized keys of every request made so far, in issue order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of requests whose key starts with `prefix`
    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|key| key.starts_with(prefix))
            .count()
    }

    fn key(&self, url_or_path: &str) -> String {
        url_or_path
            .strip_prefix(&self.base_url)
            .unwrap_or(url_or_path)
            .trim_matches('/')
            .replace("/?", "?")
    }
}

#[async_trait]
impl CatalogGateway for MemoryGateway {
    async fn get(&self, url_or_path: &str) -> Result<Value> {
        let key = self.key(url_or_path);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(key.clone());

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        if self.failures.contains(&key) {
            return Err(CatalogError::Network(format!("connection reset: {key}")));
        }

        self.responses
            .get(&key)
            .cloned()
            .ok_or(CatalogError::NotFound(key))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
