use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the Jolokia bridge. All of them are recoverable at the
/// tool boundary and are rendered as text rather than returned as tool errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// Checked before any network call is attempted.
    #[error("Not authenticated - {message}")]
    Precondition { message: String },
    #[error("Transport error - {message}")]
    Transport { message: String },
    /// Non-success status reported by the broker or by Jolokia itself.
    /// `payload` holds the broker's body verbatim when it was JSON.
    #[error("{} - {message}", code_text(.code))]
    Declared {
        code: Value,
        message: String,
        payload: Value,
    },
}

impl BridgeError {
    pub fn not_authenticated() -> Self {
        Self::Precondition {
            message: "Please login first using the login tool".to_string(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn declared(code: impl Into<Value>, message: impl Into<String>) -> Self {
        Self::Declared {
            code: code.into(),
            message: message.into(),
            payload: Value::Null,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }

    /// Short label used as the `error` field of JSON results.
    pub fn label(&self) -> String {
        match self {
            Self::Precondition { .. } => "Not authenticated".to_string(),
            Self::Transport { .. } => "Transport error".to_string(),
            Self::Declared { code, .. } => code_text(code),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Precondition { message }
            | Self::Transport { message }
            | Self::Declared { message, .. } => message,
        }
    }
}

fn code_text(code: &Value) -> String {
    match code {
        Value::String(text) => text.clone(),
        Value::Null => "Unknown error".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_error_renders_string_and_numeric_codes() {
        let http = BridgeError::declared("HTTP 404", "Not Found");
        assert_eq!(http.to_string(), "HTTP 404 - Not Found");
        assert_eq!(http.label(), "HTTP 404");

        let jolokia = BridgeError::declared(403, "Forbidden");
        assert_eq!(jolokia.to_string(), "403 - Forbidden");
    }

    #[test]
    fn precondition_is_distinguishable() {
        let err = BridgeError::not_authenticated();
        assert!(err.is_precondition());
        assert_eq!(err.label(), "Not authenticated");
        assert!(!BridgeError::transport("refused").is_precondition());
    }
}
