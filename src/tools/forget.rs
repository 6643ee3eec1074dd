//! MCP `forget` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `forget` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ForgetParams {
    /// 0-based position in the list as returned by the latest `recall`.
    #[schemars(
        description = "0-based index of the memory item to remove, as shown by the latest recall. Removing an item shifts later items down by one, so recall again before removing another."
    )]
    pub index: i64,
}
