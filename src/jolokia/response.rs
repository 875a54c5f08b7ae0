use crate::constants::jolokia::STATUS_OK;
use crate::errors::BridgeError;
use serde_json::Value;

/// Outcome of one Jolokia call, decided once from the raw HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum JolokiaResponse {
    Success {
        value: Value,
    },
    DeclaredError {
        code: Value,
        message: String,
        payload: Value,
    },
    TransportError {
        message: String,
    },
}

impl JolokiaResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, JolokiaResponse::Success { .. })
    }

    pub fn into_result(self) -> Result<Value, BridgeError> {
        match self {
            JolokiaResponse::Success { value } => Ok(value),
            JolokiaResponse::DeclaredError {
                code,
                message,
                payload,
            } => Err(BridgeError::Declared {
                code,
                message,
                payload,
            }),
            JolokiaResponse::TransportError { message } => Err(BridgeError::Transport { message }),
        }
    }
}

pub fn normalize(http_status: u16, body: &str) -> JolokiaResponse {
    if http_status != STATUS_OK {
        return JolokiaResponse::DeclaredError {
            code: Value::String(format!("HTTP {}", http_status)),
            message: body.to_string(),
            payload: Value::Null,
        };
    }

    let payload: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return JolokiaResponse::TransportError {
                message: format!("Invalid JSON response: {}", body),
            }
        }
    };

    let status = payload.get("status").and_then(Value::as_u64);
    if status == Some(u64::from(STATUS_OK)) {
        let value = payload.get("value").cloned().unwrap_or(Value::Null);
        return JolokiaResponse::Success { value };
    }

    let code = payload
        .get("status")
        .filter(|v| !v.is_null())
        .or_else(|| payload.get("error_type"))
        .cloned()
        .unwrap_or(Value::Null);
    let message = payload
        .get("error")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .unwrap_or_else(|| payload.to_string());
    JolokiaResponse::DeclaredError {
        code,
        message,
        payload,
    }
}
