pub mod forget;
pub mod remember;

use forget::ForgetParams;
use memlog::config::MemlogConfig;
use memlog::identity::{derive_key, resolve_identity, UserIdentity};
use memlog::memory::{AppendOutcome, MemoryStore, RecallOutcome, RemoveOutcome};
use memlog::store::DocumentStore;
use remember::RememberParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, RoleServer, ServerHandler};
use std::sync::Arc;

/// Reply to `remember` and `forget` from callers without an identity.
pub const GUEST_MESSAGE: &str = "Memory is not available for guest users.";

/// Error message in the `recall` reply for callers without an identity.
pub const GUEST_RECALL_ERROR: &str = "User not found";

/// The memlog MCP tool handler. Holds the shared memory store and config and exposes
/// the `remember`, `forget` and `recall` tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct MemlogTools {
    tool_router: ToolRouter<Self>,
    memory: MemoryStore,
    config: Arc<MemlogConfig>,
}

#[tool_router]
impl MemlogTools {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<MemlogConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            memory: MemoryStore::new(store),
            config,
        }
    }

    /// Append a memory item to the caller's list.
    #[tool(description = "Remember a fact about the current user. The record is appended to the end of the user's memory list.")]
    async fn remember(
        &self,
        Parameters(params): Parameters<RememberParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<String, String> {
        let identity = self.caller(&context);
        Ok(self.handle_remember(identity, params.record).await)
    }

    /// Remove one memory item by position.
    #[tool(description = "Forget the memory item at the given 0-based index of the current user's list. Indices shift after every removal; call recall again before removing another item.")]
    async fn forget(
        &self,
        Parameters(params): Parameters<ForgetParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<String, String> {
        let identity = self.caller(&context);
        Ok(self.handle_forget(identity, params.index).await)
    }

    /// Return the caller's whole memory list.
    #[tool(description = "Recall everything remembered about the current user, as a JSON array in insertion order.")]
    async fn recall(&self, context: RequestContext<RoleServer>) -> Result<String, String> {
        let identity = self.caller(&context);
        Ok(self.handle_recall(identity).await)
    }
}

impl MemlogTools {
    /// Identity from HTTP headers, or the configured stdio user when there are none.
    fn caller(&self, context: &RequestContext<RoleServer>) -> Option<UserIdentity> {
        match context.extensions.get::<axum::http::request::Parts>() {
            Some(parts) => resolve_identity(&parts.headers, &self.config.identity.header),
            None => self
                .config
                .identity
                .stdio_user
                .clone()
                .and_then(UserIdentity::new),
        }
    }

    /// Run a memory operation on the blocking pool (store calls are synchronous I/O).
    async fn blocking<T, F>(&self, op: F) -> Result<T, String>
    where
        F: FnOnce(MemoryStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let memory = self.memory.clone();
        tokio::task::spawn_blocking(move || op(memory))
            .await
            .map_err(|e| format!("store task failed: {e}"))
    }

    pub(crate) async fn handle_remember(
        &self,
        identity: Option<UserIdentity>,
        record: String,
    ) -> String {
        let Some(identity) = identity else {
            tracing::info!("remember called by guest");
            return GUEST_MESSAGE.to_string();
        };
        tracing::info!(record_len = record.len(), "remember called");

        let key = derive_key(&identity);
        let outcome = self
            .blocking(move |memory| memory.append(&key, &record))
            .await
            .unwrap_or_else(|message| AppendOutcome::StoreError { message });
        render_append(&outcome)
    }

    pub(crate) async fn handle_forget(&self, identity: Option<UserIdentity>, index: i64) -> String {
        let Some(identity) = identity else {
            tracing::info!("forget called by guest");
            return GUEST_MESSAGE.to_string();
        };
        tracing::info!(index, "forget called");

        let key = derive_key(&identity);
        let outcome = self
            .blocking(move |memory| memory.remove_at(&key, index))
            .await
            .unwrap_or_else(|message| RemoveOutcome::StoreError { message });
        render_remove(index, &outcome)
    }

    pub(crate) async fn handle_recall(&self, identity: Option<UserIdentity>) -> String {
        let Some(identity) = identity else {
            tracing::info!("recall called by guest");
            return error_payload(GUEST_RECALL_ERROR);
        };
        tracing::info!("recall called");

        let key = derive_key(&identity);
        let outcome = self
            .blocking(move |memory| memory.recall(&key))
            .await
            .unwrap_or_else(|message| RecallOutcome::StoreError { message });
        render_recall(&outcome)
    }
}

pub(crate) fn render_append(outcome: &AppendOutcome) -> String {
    match outcome {
        AppendOutcome::Stored { record, .. } => format!(
            "Stored memory about: {record} on {}",
            outcome.timestamp().unwrap_or_default()
        ),
        AppendOutcome::StoreError { message } => format!("Failed to store memory: {message}"),
    }
}

pub(crate) fn render_remove(index: i64, outcome: &RemoveOutcome) -> String {
    match outcome {
        RemoveOutcome::Removed { record, .. } => {
            format!("Removed memory item at index {index} about: {record}")
        }
        RemoveOutcome::NotFound { .. } => format!("No memory item found at index {index}"),
        RemoveOutcome::StoreError { message } => {
            format!("Failed to remove memory item at index {index}: {message}")
        }
    }
}

pub(crate) fn render_recall(outcome: &RecallOutcome) -> String {
    let payload = match outcome {
        RecallOutcome::Items { items } => serde_json::json!(items),
        RecallOutcome::StoreError { message } => return error_payload(message),
    };
    payload.to_string()
}

/// `{"error": <message>}` as compact JSON text.
fn error_payload(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[tool_handler]
impl ServerHandler for MemlogTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "memlog keeps a per-user list of memories. Use remember to add a fact about \
                 the user, recall to list everything with its index, and forget to remove \
                 one item by index."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
