use serde::Deserialize;
use synaptic_core::SynapticError;

const DEFAULT_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const DEFAULT_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for the DuckDuckGo search tool and its default client.
///
/// Every field has a default, so an empty TOML document is valid:
///
/// ```toml
/// max_results = 5
/// timeout_secs = 20
/// proxy = "http://127.0.0.1:8080"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DuckDuckGoConfig {
    /// Maximum number of results. `None` returns only the first response page.
    pub max_results: Option<usize>,
    /// HTTP timeout of the default client, in seconds.
    pub timeout_secs: u64,
    /// Proxy URL for the default client (`http://` or `https://`).
    pub proxy: Option<String>,
    pub user_agent: String,
    /// Endpoint of DuckDuckGo's HTML interface.
    pub html_url: String,
    /// Endpoint of DuckDuckGo's Lite interface.
    pub lite_url: String,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            max_results: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            html_url: DEFAULT_HTML_URL.to_string(),
            lite_url: DEFAULT_LITE_URL.to_string(),
        }
    }
}

impl DuckDuckGoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = html_url.into();
        self
    }

    pub fn with_lite_url(mut self, lite_url: impl Into<String>) -> Self {
        self.lite_url = lite_url.into();
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, SynapticError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SynapticError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SynapticError> {
        match self.invalid_reason() {
            Some(reason) => Err(SynapticError::Config(reason.to_string())),
            None => Ok(()),
        }
    }

    pub(crate) fn invalid_reason(&self) -> Option<&'static str> {
        if self.max_results == Some(0) {
            return Some("max_results must be a positive integer");
        }
        if self.timeout_secs == 0 {
            return Some("timeout_secs must be greater than zero");
        }
        if self.html_url.is_empty() || self.lite_url.is_empty() {
            return Some("html_url and lite_url must not be empty");
        }
        None
    }
}
