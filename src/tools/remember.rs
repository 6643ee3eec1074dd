//! MCP `remember` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `remember` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RememberParams {
    /// Free-text memory item, appended to the caller's list.
    #[schemars(description = "Free-text fact about the user to remember, e.g. 'prefers tea over coffee'")]
    pub record: String,
}
