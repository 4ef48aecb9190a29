//! DuckDuckGo search tool integration for the Synaptic framework.
//!
//! This crate provides [`DuckDuckGoSearchTool`], a web search tool that
//! implements the [`Tool`](synaptic_core::Tool) trait on top of any
//! [`TextSearch`] backend. The backend is a blocking client; every search
//! runs on tokio's blocking pool so the agent's event loop keeps running.
//!
//! With the default `ddgs` feature the crate also ships [`DdgsClient`], a
//! blocking client for DuckDuckGo's HTML and Lite endpoints. No API key is
//! required.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use synaptic_duckduckgo::duckduckgo_search_tool;
//! use synaptic_tools::ToolRegistry;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tool = duckduckgo_search_tool(None, Some(5))?;
//! let registry = ToolRegistry::new();
//! registry.register(Arc::new(tool))?;
//!
//! let result = registry
//!     .call("duckduckgo_search", json!({"query": "Rust programming language"}))
//!     .await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

mod backend;
#[cfg(feature = "ddgs")]
mod client;
mod config;
mod error;
mod result;
mod search;

pub use backend::{
    Backend, BackendError, Region, SafeSearch, TextSearch, TextSearchRequest, TimeLimit,
};
#[cfg(feature = "ddgs")]
pub use client::{DdgsClient, DdgsError};
pub use config::DuckDuckGoConfig;
pub use error::DuckDuckGoError;
pub use result::{validate_results, SearchResult};
pub use search::{duckduckgo_search_tool, DuckDuckGoSearchTool, TOOL_DESCRIPTION, TOOL_NAME};

// Re-export core trait for convenience.
pub use synaptic_core::Tool;
