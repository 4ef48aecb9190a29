use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::SynapticError;

/// Name, description and JSON-schema parameters advertised to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A named capability an agent can invoke with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments accepted by [`Tool::call`].
    ///
    /// `None` means the tool takes no arguments.
    fn parameters(&self) -> Option<Value> {
        None
    }

    async fn call(&self, args: Value) -> Result<Value, SynapticError>;

    /// Build the definition sent to the model alongside a chat request.
    fn as_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self
                .parameters()
                .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
        }
    }
}
