//! Scan configuration
//!
//! [`ScanConfig`] is the loosely typed shape produced by whatever front end
//! drives the engine (CLI flags, a config file, a test). [`ScanTarget`] is the
//! validated, immutable view the probes run against.

use crate::error::{ProbeError, Result};
use crate::models::{Family, ProbeCategory};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::warn;
use url::Url;

/// User supplied scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Target URL to scan
    pub target: String,
    /// HTTP method for header/banner probes and injection delivery (GET or POST)
    pub method: String,
    /// Custom headers, `"Name: Value"` each
    pub headers: Vec<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of in-flight requests. Non-positive values are clamped to 1.
    pub threads: i64,
    /// Category tags to run (files, headers, defaults, server, sqli, xss). Empty runs all.
    pub categories: Vec<String>,
    /// User-Agent header value
    pub user_agent: String,
    /// Form-encoded POST body used as the base for injection payloads
    pub post_data: Option<String>,
    /// Explicit injection parameters. Discovered from the target when empty.
    pub parameters: Vec<String>,
    /// Skip TLS certificate verification (test systems are often self-signed)
    pub accept_invalid_certs: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            method: "GET".to_string(),
            headers: Vec::new(),
            timeout_secs: 10,
            threads: 5,
            categories: Vec::new(),
            user_agent: "Vigil-Scanner/0.1.0".to_string(),
            post_data: None,
            parameters: Vec::new(),
            accept_invalid_certs: true,
        }
    }
}

/// Validated, immutable description of what to probe and how
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub base_url: Url,
    pub method: Method,
    pub custom_headers: Vec<String>,
    pub request_timeout: Duration,
    pub max_concurrency: usize,
    /// Empty means every category is enabled
    pub enabled_categories: BTreeSet<ProbeCategory>,
    pub user_agent: String,
    pub post_data: Option<String>,
    pub parameters: Vec<String>,
    pub accept_invalid_certs: bool,
}

impl ScanTarget {
    /// Builds a target from user settings, rejecting anything the probes cannot work with
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let base_url = Url::parse(config.target.trim())?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ProbeError::UnsupportedScheme(other.to_string())),
        }

        let method = Method::from_bytes(config.method.trim().to_uppercase().as_bytes())
            .map_err(|_| ProbeError::ConfigError(format!("Invalid HTTP method '{}'", config.method)))?;

        let enabled_categories = config
            .categories
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.parse::<ProbeCategory>())
            .collect::<Result<BTreeSet<_>>>()?;

        let timeout_secs = if config.timeout_secs == 0 {
            warn!("Timeout of 0s requested, using 1s");
            1
        } else {
            config.timeout_secs
        };

        Ok(Self {
            base_url,
            method,
            custom_headers: config.headers.clone(),
            request_timeout: Duration::from_secs(timeout_secs),
            max_concurrency: clamp_concurrency(config.threads),
            enabled_categories,
            user_agent: config.user_agent.clone(),
            post_data: config.post_data.clone().filter(|d| !d.is_empty()),
            parameters: config.parameters.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
        })
    }

    /// Shorthand for a target with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::from_config(&ScanConfig {
            target: url.to_string(),
            ..ScanConfig::default()
        })
    }

    /// Base URL without query, fragment or trailing slash, ready for path concatenation
    pub fn base(&self) -> String {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.as_str().trim_end_matches('/').to_string()
    }

    /// Base URL origin plus the given absolute path
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base())
        } else {
            format!("{}/{path}", self.base())
        }
    }

    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Effective concurrency, always a valid semaphore size
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }

    /// Whether the given category tag is selected
    pub fn is_enabled(&self, category: ProbeCategory) -> bool {
        self.enabled_categories.is_empty() || self.enabled_categories.contains(&category)
    }

    /// Whether any category served by the given family is selected
    pub fn family_enabled(&self, family: Family) -> bool {
        family_categories(family)
            .iter()
            .any(|c| self.is_enabled(*c))
    }
}

/// Category tags served by each probe family
pub fn family_categories(family: Family) -> &'static [ProbeCategory] {
    match family {
        Family::Content => &[
            ProbeCategory::Files,
            ProbeCategory::Headers,
            ProbeCategory::Defaults,
            ProbeCategory::Server,
        ],
        Family::Credentials => &[ProbeCategory::Defaults],
        Family::Injection => &[ProbeCategory::Sqli, ProbeCategory::Xss],
    }
}

/// A zero-permit semaphore would stall every worker, so anything below 1 becomes 1.
/// Values above what a semaphore can hold are capped.
pub fn clamp_concurrency(threads: i64) -> usize {
    if threads < 1 {
        warn!("Concurrency of {threads} requested, using 1");
        return 1;
    }
    match usize::try_from(threads) {
        Ok(n) if n <= Semaphore::MAX_PERMITS => n,
        _ => {
            warn!(
                "Concurrency of {threads} requested, using {}",
                Semaphore::MAX_PERMITS
            );
            Semaphore::MAX_PERMITS
        }
    }
}
