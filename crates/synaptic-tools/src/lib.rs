//! Tool registry for Synaptic agents.
//!
//! [`ToolRegistry`] maps tool names to shared [`Tool`] instances. Clones
//! share the same underlying map, so one registry can be handed to many
//! agent tasks.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use synaptic_core::{SynapticError, Tool, ToolDefinition};

#[derive(Clone, Default)]
pub struct ToolRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name. A tool with the same name is replaced.
    ///
    /// A poisoned registry is reported as an error here; lookups on a
    /// poisoned registry log a warning and find nothing.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), SynapticError> {
        let name = tool.name().to_string();
        let mut guard = self
            .inner
            .write()
            .map_err(|e| SynapticError::Tool(format!("registry lock poisoned: {e}")))?;
        if guard.insert(name.clone(), tool).is_some() {
            tracing::debug!(tool = %name, "replaced registered tool");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        match self.inner.read() {
            Ok(guard) => guard.get(name).cloned(),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool registry lock poisoned");
                None
            }
        }
    }

    /// Names of all registered tools, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.inner.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "tool registry lock poisoned");
                Vec::new()
            }
        };
        names.sort();
        names
    }

    /// Definitions of all registered tools, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = match self.inner.read() {
            Ok(guard) => guard.values().map(|t| t.as_tool_definition()).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "tool registry lock poisoned");
                Vec::new()
            }
        };
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Look up a tool by name and invoke it.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value, SynapticError> {
        let tool = self
            .get(name)
            .ok_or_else(|| SynapticError::ToolNotFound(name.to_string()))?;
        tool.call(args).await
    }
}
