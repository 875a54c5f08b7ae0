use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::limits::LOG_STRING_MAX_BYTES;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::redact::redact_object;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

#[derive(Debug, Clone)]
pub struct ToolCallMeta {
    pub started_at: i64,
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
}

impl ToolCallMeta {
    pub fn new(trace_id: Option<String>, span_id: Option<String>, parent: Option<String>) -> Self {
        Self {
            started_at: chrono::Utc::now().timestamp_millis(),
            trace_id: trace_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            span_id: span_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            parent_span_id: parent,
        }
    }
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(
        &self,
        tool: &str,
        args: Value,
        meta: ToolCallMeta,
    ) -> Result<Value, ToolError> {
        let Some(handler) = self.handlers.get(tool).cloned() else {
            return Err(ToolError::not_found(format!("Unknown tool: {}", tool))
                .with_hint(format!("Known tools: {}", self.tool_names().join(", "))));
        };

        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({
                "tool": tool,
                "trace_id": meta.trace_id,
                "span_id": meta.span_id,
                "args": redact_object(&args, LOG_STRING_MAX_BYTES, None),
            })),
        );

        let outcome = handler.handle(args).await;
        let duration_ms = chrono::Utc::now().timestamp_millis() - meta.started_at;

        match &outcome {
            Ok(_) => self.logger.info(
                "tool ok",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": meta.trace_id,
                    "duration_ms": duration_ms,
                })),
            ),
            Err(err) => self.logger.warn(
                "tool failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": meta.trace_id,
                    "duration_ms": duration_ms,
                    "code": err.code,
                    "message": err.message,
                })),
            ),
        }

        let result = outcome?;
        Ok(serde_json::json!({
            "result": result,
            "meta": {
                "tool": tool,
                "trace_id": meta.trace_id,
                "span_id": meta.span_id,
                "parent_span_id": meta.parent_span_id,
                "duration_ms": duration_ms,
            },
        }))
    }
}
