use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use synaptic_core::{SynapticError, Tool};
use tracing::{debug, warn};

use crate::{
    validate_results, Backend, DuckDuckGoConfig, DuckDuckGoError, Region, SafeSearch,
    SearchResult, TextSearch, TextSearchRequest,
};

/// Name the tool is registered under.
pub const TOOL_NAME: &str = "duckduckgo_search";

/// Description advertised to the model.
pub const TOOL_DESCRIPTION: &str = "Searches DuckDuckGo for the given query and returns the results. \
You can specify max_results to control the number of results \
(if None, returns results only from the first response).";

/// Web search tool backed by a blocking [`TextSearch`] client.
///
/// Searches always use a worldwide region, moderate safe-search, no time
/// limit and automatic endpoint selection. The client call runs on tokio's
/// blocking pool.
///
/// The tool holds no mutable state; clones share the same client.
#[derive(Clone)]
pub struct DuckDuckGoSearchTool {
    client: Arc<dyn TextSearch>,
    max_results: Option<usize>,
}

impl DuckDuckGoSearchTool {
    /// Wrap an existing client. `max_results` must be positive when set.
    pub fn new(
        client: Arc<dyn TextSearch>,
        max_results: Option<usize>,
    ) -> Result<Self, DuckDuckGoError> {
        if max_results == Some(0) {
            return Err(DuckDuckGoError::Config(
                "max_results must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            client,
            max_results,
        })
    }

    /// Build the tool with a default client configured from `config`.
    pub fn from_config(config: &DuckDuckGoConfig) -> Result<Self, DuckDuckGoError> {
        if let Some(reason) = config.invalid_reason() {
            return Err(DuckDuckGoError::Config(reason.to_string()));
        }
        Self::new(default_client(config)?, config.max_results)
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// The request sent to the client for `query`.
    pub fn request(&self, query: &str) -> TextSearchRequest {
        TextSearchRequest {
            keywords: query.to_string(),
            region: Region::Worldwide,
            safesearch: SafeSearch::Moderate,
            timelimit: None,
            backend: Backend::Auto,
            max_results: self.max_results,
        }
    }

    /// Search DuckDuckGo for `query`.
    ///
    /// Fails with [`DuckDuckGoError::NoResults`] when the backend finds
    /// nothing, so callers treat an empty answer as a reason to rephrase.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DuckDuckGoError> {
        let request = self.request(query);
        let client = Arc::clone(&self.client);
        debug!(query, max_results = ?self.max_results, "dispatching DuckDuckGo search");

        let records = tokio::task::spawn_blocking(move || client.text(&request))
            .await
            .map_err(|e| DuckDuckGoError::Worker(e.to_string()))?
            .map_err(|e| {
                warn!(query, error = %e, "DuckDuckGo backend failed");
                DuckDuckGoError::Backend(e)
            })?;

        if records.is_empty() {
            warn!(query, "DuckDuckGo returned no results");
            return Err(DuckDuckGoError::NoResults);
        }

        let results = validate_results(records)?;
        debug!(query, result_count = results.len(), "DuckDuckGo search completed");
        Ok(results)
    }
}

impl fmt::Debug for DuckDuckGoSearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuckDuckGoSearchTool")
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearchTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for."
                }
            },
            "required": ["query"]
        }))
    }

    async fn call(&self, args: Value) -> Result<Value, SynapticError> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| SynapticError::Tool("missing 'query' parameter".to_string()))?;

        let results = self.search(query).await?;
        Ok(serde_json::to_value(results)?)
    }
}

/// Create the `duckduckgo_search` tool.
///
/// Reuses `client` when given; otherwise builds a [`DdgsClient`](crate::DdgsClient)
/// with default settings. Fails at setup time when no client is given and
/// the crate was built without the `ddgs` feature.
pub fn duckduckgo_search_tool(
    client: Option<Arc<dyn TextSearch>>,
    max_results: Option<usize>,
) -> Result<DuckDuckGoSearchTool, SynapticError> {
    let client = match client {
        Some(client) => client,
        None => default_client(&DuckDuckGoConfig::default())?,
    };
    Ok(DuckDuckGoSearchTool::new(client, max_results)?)
}

#[cfg(feature = "ddgs")]
fn default_client(config: &DuckDuckGoConfig) -> Result<Arc<dyn TextSearch>, DuckDuckGoError> {
    let client = crate::DdgsClient::from_config(config)
        .map_err(|e| DuckDuckGoError::Config(format!("failed to build DuckDuckGo client: {e}")))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "ddgs"))]
fn default_client(_config: &DuckDuckGoConfig) -> Result<Arc<dyn TextSearch>, DuckDuckGoError> {
    Err(DuckDuckGoError::Config(
        "Please enable the `ddgs` feature of `synaptic-duckduckgo` to use the default \
         DuckDuckGo search client, or pass your own `TextSearch` implementation"
            .to_string(),
    ))
}
