//! PyPI registry checker for verifying package existence.

use crate::normalize::normalize_pypi_name;
use crate::registry::PackageRegistry;
use crate::types::{HttpConfig, LookupOutcome, NominaError, NormalizationVerdict, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://pypi.org";

/// Upper bound for the configured base delay and for any single backoff sleep.
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// PyPI JSON API response, only the fields we surface.
#[derive(Debug, Deserialize)]
struct PypiProject {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    name: String,
    version: Option<String>,
}

/// Checker for package names on PyPI (or a mirror serving the same JSON API).
pub struct PypiRegistry {
    client: Client,
    config: HttpConfig,
    base_url: Url,
}

impl PypiRegistry {
    /// Create a checker against the public PyPI instance.
    pub fn new(config: HttpConfig) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, config)
    }

    /// Create a checker against a custom base URL.
    pub fn with_base_url(base_url: &str, config: HttpConfig) -> Result<Self> {
        if config.max_attempts == 0 {
            return Err(NominaError::ConfigError(
                "max attempts must be at least 1".to_string(),
            ));
        }
        if config.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(NominaError::ConfigError(format!(
                "retry delay must be at most {} ms, got {}",
                MAX_RETRY_DELAY_MS, config.retry_delay_ms
            )));
        }

        let mut base_url = Url::parse(base_url)?;
        // `Url::join` drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Metadata endpoint for a canonical name.
    pub fn query_url(&self, canonical_name: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("pypi/{}/json", canonical_name))?)
    }

    /// Sleep before retrying after `attempt` failed, scaled linearly and capped.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = self
            .config
            .retry_delay_ms
            .saturating_mul(u64::from(attempt))
            .min(MAX_RETRY_DELAY_MS);
        Duration::from_millis(delay)
    }

    /// Turn a well-formed HTTP response into an existence verdict.
    async fn classify(&self, canonical_name: &str, response: Response) -> LookupOutcome {
        let status = response.status();

        match status {
            StatusCode::OK => {
                debug!("Package exists: {}", canonical_name);
                let raw_response = match response.json::<serde_json::Value>().await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!("Failed to read PyPI response for {}: {}", canonical_name, e);
                        None
                    }
                };
                let project = raw_response
                    .as_ref()
                    .and_then(|value| serde_json::from_value::<PypiProject>(value.clone()).ok());

                LookupOutcome {
                    exists: Some(true),
                    message: format!("Package found - Status {}", status.as_u16()),
                    status: status.as_u16(),
                    registry_name: project.as_ref().map(|p| p.info.name.clone()),
                    latest_version: project.and_then(|p| p.info.version),
                    raw_response,
                }
            }
            StatusCode::NOT_FOUND => {
                debug!("Package NOT FOUND: {}", canonical_name);
                LookupOutcome {
                    exists: Some(false),
                    message: format!("Package not found - Status {}", status.as_u16()),
                    status: status.as_u16(),
                    registry_name: None,
                    latest_version: None,
                    raw_response: None,
                }
            }
            other => {
                debug!("Unexpected status {} for {}", other, canonical_name);
                LookupOutcome {
                    exists: None,
                    message: format!("Unexpected response status: {}", other.as_u16()),
                    status: other.as_u16(),
                    registry_name: None,
                    latest_version: None,
                    raw_response: None,
                }
            }
        }
    }
}

#[async_trait]
impl PackageRegistry for PypiRegistry {
    fn name(&self) -> &str {
        "PyPI"
    }

    fn normalize(&self, raw: &str) -> NormalizationVerdict {
        normalize_pypi_name(raw)
    }

    async fn lookup(&self, canonical_name: &str) -> Result<LookupOutcome> {
        let url = self.query_url(canonical_name)?;
        let mut attempt = 1;

        loop {
            trace!("Checking PyPI (attempt {}): {}", attempt, url);

            match self.client.get(url.clone()).send().await {
                Ok(response) => return Ok(self.classify(canonical_name, response).await),
                Err(e) => {
                    if attempt >= self.config.max_attempts {
                        return Err(NominaError::RegistryUnreachable {
                            registry: self.name().to_string(),
                            attempts: attempt,
                            source: e,
                        });
                    }

                    warn!("Attempt {} for {} failed: {}", attempt, canonical_name, e);

                    if self.config.retry_delay_ms > 0 {
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Nothing listens on port 1, so every connection is refused.
    const CLOSED_PORT_URL: &str = "http://127.0.0.1:1";

    fn registry_for(base_url: &str) -> PypiRegistry {
        PypiRegistry::with_base_url(base_url, HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_query_url() {
        let registry = PypiRegistry::new(HttpConfig::default()).unwrap();
        assert_eq!(
            registry.query_url("requests").unwrap().as_str(),
            "https://pypi.org/pypi/requests/json"
        );

        let mirror = registry_for("https://mirror.example.com/index");
        assert_eq!(
            mirror.query_url("numpy").unwrap().as_str(),
            "https://mirror.example.com/index/pypi/numpy/json"
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = HttpConfig {
            max_attempts: 0,
            ..HttpConfig::default()
        };
        assert!(matches!(
            PypiRegistry::new(config),
            Err(NominaError::ConfigError(_))
        ));
    }

    #[test]
    fn test_oversized_retry_delay_rejected() {
        let config = HttpConfig {
            retry_delay_ms: u64::MAX / 2 + 1,
            max_attempts: 3,
            ..HttpConfig::default()
        };
        assert!(matches!(
            PypiRegistry::new(config),
            Err(NominaError::ConfigError(_))
        ));
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        let config = HttpConfig {
            retry_delay_ms: MAX_RETRY_DELAY_MS,
            ..HttpConfig::default()
        };
        let registry = PypiRegistry::new(config).unwrap();

        assert_eq!(registry.backoff_delay(1), Duration::from_millis(MAX_RETRY_DELAY_MS));
        assert_eq!(registry.backoff_delay(u32::MAX), Duration::from_millis(MAX_RETRY_DELAY_MS));

        let linear = PypiRegistry::new(HttpConfig {
            retry_delay_ms: 200,
            ..HttpConfig::default()
        })
        .unwrap();
        assert_eq!(linear.backoff_delay(3), Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pypi/requests/json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "info": {"name": "requests", "version": "2.32.3"},
                        "releases": {}
                    }));
            })
            .await;

        let outcome = registry_for(&server.base_url())
            .lookup("requests")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.exists, Some(true));
        assert_eq!(outcome.message, "Package found - Status 200");
        assert_eq!(outcome.registry_name.as_deref(), Some("requests"));
        assert_eq!(outcome.latest_version.as_deref(), Some("2.32.3"));
        assert!(outcome.raw_response.is_some());
    }

    #[tokio::test]
    async fn test_lookup_found_without_metadata() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pypi/odd-body/json");
                then.status(200).body("not json");
            })
            .await;

        let outcome = registry_for(&server.base_url())
            .lookup("odd-body")
            .await
            .unwrap();

        assert_eq!(outcome.exists, Some(true));
        assert_eq!(outcome.message, "Package found - Status 200");
        assert!(outcome.registry_name.is_none());
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pypi/nonexistent-package/json");
                then.status(404);
            })
            .await;

        let outcome = registry_for(&server.base_url())
            .lookup("nonexistent-package")
            .await
            .unwrap();

        assert_eq!(outcome.exists, Some(false));
        assert_eq!(outcome.message, "Package not found - Status 404");
        assert_eq!(outcome.status, 404);
    }

    #[tokio::test]
    async fn test_lookup_unexpected_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pypi/flaky/json");
                then.status(503);
            })
            .await;

        let outcome = registry_for(&server.base_url())
            .lookup("flaky")
            .await
            .unwrap();

        // A status response is not a transport error, so there is no retry.
        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(outcome.exists, None);
        assert_eq!(outcome.message, "Unexpected response status: 503");
    }

    /// Accept and immediately drop every connection, counting them.
    fn spawn_dropping_listener() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));

        let counter = accepted.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        (format!("http://{}", addr), accepted)
    }

    #[tokio::test]
    async fn test_lookup_unreachable_after_five_attempts() {
        let (base_url, accepted) = spawn_dropping_listener();

        let err = registry_for(&base_url)
            .lookup("requests")
            .await
            .unwrap_err();

        assert_eq!(accepted.load(Ordering::SeqCst), 5);
        match err {
            NominaError::RegistryUnreachable { attempts, ref registry, .. } => {
                assert_eq!(attempts, 5);
                assert_eq!(registry, "PyPI");
            }
            other => panic!("Expected RegistryUnreachable, got {:?}", other),
        }
        assert!(err.to_string().contains("Unable to connect to PyPI after 5 attempts"));
    }

    #[tokio::test]
    async fn test_lookup_refused_connection_is_transport_error() {
        let err = registry_for(CLOSED_PORT_URL)
            .lookup("requests")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NominaError::RegistryUnreachable { attempts: 5, .. }
        ));
    }

    #[tokio::test]
    async fn test_lookup_respects_configured_attempts() {
        let config = HttpConfig {
            max_attempts: 2,
            retry_delay_ms: 1,
            ..HttpConfig::default()
        };
        let registry = PypiRegistry::with_base_url(CLOSED_PORT_URL, config).unwrap();

        let err = registry.lookup("requests").await.unwrap_err();
        assert!(matches!(
            err,
            NominaError::RegistryUnreachable { attempts: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_lookup_timeout_counts_as_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pypi/slow/json");
                then.status(200).delay(Duration::from_secs(3));
            })
            .await;

        let config = HttpConfig {
            timeout_secs: Some(1),
            max_attempts: 1,
            ..HttpConfig::default()
        };
        let registry = PypiRegistry::with_base_url(&server.base_url(), config).unwrap();

        let err = registry.lookup("slow").await.unwrap_err();
        assert!(matches!(
            err,
            NominaError::RegistryUnreachable { attempts: 1, .. }
        ));
    }
}
