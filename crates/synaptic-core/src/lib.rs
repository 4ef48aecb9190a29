//! Core traits and types shared by Synaptic crates.
//!
//! Tool integrations implement [`Tool`] and report failures through
//! [`SynapticError`]. Registries and agents only ever see these two types.

mod error;
mod tool;

pub use error::SynapticError;
pub use tool::{Tool, ToolDefinition};
