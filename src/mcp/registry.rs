//! Tool registry and dispatcher
//!
//! Tools are registered once at startup. `invoke` is the single entry point
//! for callers: it validates, runs the handler and always answers with a
//! `ToolResponse`, whatever went wrong.

use super::models::ToolResponse;
use super::schema::InputSchema;
use crate::error::ToolError;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub type HandlerFuture = BoxFuture<'static, Result<String, ToolError>>;

/// Receives validated, defaulted arguments and renders a text reply
pub type ToolHandler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Wraps a handler taking a typed argument record.
///
/// The validated arguments are deserialized into `A` before `f` runs.
pub fn typed_handler<A, F, Fut>(f: F) -> ToolHandler
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
{
    Arc::new(move |args: Value| match serde_json::from_value::<A>(args) {
        Ok(parsed) => f(parsed).boxed(),
        Err(e) => future::ready(Err(ToolError::validation("arguments", e.to_string()))).boxed(),
    })
}

#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub handler: ToolHandler,
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    /// Entry for `tools/list`
    pub fn listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
        })
    }
}

/// Registered tools in registration order
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool; names must be unique
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateTool(descriptor.name));
        }
        tracing::debug!(tool = %descriptor.name, "Registered tool");
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// `tools/list` result body
    pub fn listing(&self) -> Value {
        json!({ "tools": self.tools.iter().map(ToolDescriptor::listing).collect::<Vec<_>>() })
    }

    /// Runs a tool and renders any failure into the response envelope
    pub async fn invoke(&self, name: &str, raw_args: Value) -> ToolResponse {
        let span = tracing::info_span!("tool", name = %name, invocation_id = %Uuid::new_v4());

        async move {
            match self.try_invoke(name, raw_args).await {
                Ok(text) => {
                    tracing::info!("Tool succeeded");
                    ToolResponse::text(text)
                }
                Err(err) => {
                    if err.is_caller_error() {
                        tracing::warn!(kind = err.kind(), error = %err, "Tool rejected");
                    } else {
                        tracing::error!(kind = err.kind(), error = %err, "Tool failed");
                    }
                    ToolResponse::error(format!("Error: {err}"))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Like `invoke`, but hands the error back instead of rendering it.
    ///
    /// The handler runs on its own task: once started, a mutation completes
    /// even if the caller stops waiting.
    pub async fn try_invoke(&self, name: &str, raw_args: Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = tool.input_schema.validate(&raw_args)?;

        let task = (tool.handler)(args).in_current_span();
        tokio::spawn(task)
            .await
            .map_err(|e| ToolError::Internal(format!("tool `{name}` did not complete: {e}")))?
    }
}
