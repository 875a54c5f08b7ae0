use crate::errors::{ErrorCode, McpError};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

/// Accepted on every tool for tracing but hidden from `tools/list`.
pub const TOOL_SEMANTIC_FIELDS: &[&str] = &["trace_id", "span_id", "parent_span_id"];

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), McpError> {
    if tool_by_name(tool_name).is_none() {
        return Err(McpError::new(
            ErrorCode::MethodNotFound,
            format!("Unknown tool: {}", tool_name),
        ));
    }
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool_name, errors);
        return Err(McpError::new(ErrorCode::InvalidParams, message));
    }
    Ok(())
}

fn format_schema_errors(tool_name: &str, errors: jsonschema::ErrorIterator) -> String {
    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    for err in errors.take(10) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        let line = match &err.kind {
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                format!("{}: unknown field(s) {}", instance_path, unexpected.join(", "))
            }
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| property.to_string());
                format!("{}: missing required field '{}'", instance_path, prop)
            }
            _ => format!("{}: {}", instance_path, err),
        };
        lines.push(format!("- {}", line));
    }
    lines.join("\n")
}

pub fn strip_tool_semantic_fields(schema: &Value) -> Value {
    if let Some(obj) = schema.as_object() {
        let mut out = obj.clone();
        if let Some(props) = out.get_mut("properties").and_then(|v| v.as_object_mut()) {
            for key in TOOL_SEMANTIC_FIELDS.iter() {
                props.remove(*key);
            }
        }
        return Value::Object(out);
    }
    schema.clone()
}

pub fn list_tools() -> Vec<ToolDef> {
    TOOL_CATALOG
        .iter()
        .map(|tool| ToolDef {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: strip_tool_semantic_fields(&tool.input_schema),
        })
        .collect()
}
