use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::errors::{BridgeError, ToolError};
use crate::services::logger::Logger;
use crate::utils::redact::redact_text;
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, ORIGIN};
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn basic_auth_header(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }

    /// Masks the password wherever broker text echoes it back, then truncates.
    pub fn scrub(&self, text: &str, max_bytes: usize) -> String {
        redact_text(text, max_bytes, Some(std::slice::from_ref(&self.password)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Status and body exactly as the broker returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// One authenticated GET against the broker. Implementations report network
/// failures as `BridgeError::Transport` and never discard a non-200 body.
#[async_trait]
pub trait JolokiaTransport: Send + Sync {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<RawResponse, BridgeError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    logger: Logger,
    client: Client,
    origin: HeaderValue,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(logger: Logger, origin: &str, timeout_ms: u64) -> Result<Self, ToolError> {
        let origin = HeaderValue::from_str(origin).map_err(|_| {
            ToolError::invalid_params(format!("Origin '{}' is not a valid header value", origin))
        })?;
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("http"),
            client,
            origin,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    fn headers(&self, credentials: &Credentials) -> Result<HeaderMap, BridgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, self.origin.clone());
        let mut auth = HeaderValue::from_str(&credentials.basic_auth_header())
            .map_err(|_| BridgeError::transport("Credentials cannot be sent as a header"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> BridgeError {
        if err.is_timeout() {
            return BridgeError::transport(format!(
                "HTTP request timed out after {} ms",
                self.timeout.as_millis()
            ));
        }
        BridgeError::transport(err.to_string())
    }
}

#[async_trait]
impl JolokiaTransport for HttpTransport {
    async fn get(&self, url: &str, credentials: &Credentials) -> Result<RawResponse, BridgeError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .headers(self.headers(credentials)?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        self.logger.debug(
            "jolokia response",
            Some(&serde_json::json!({
                "status": status,
                "duration_ms": started.elapsed().as_millis() as u64,
                "body_preview": credentials.scrub(&body, LOG_BODY_PREVIEW_BYTES),
            })),
        );
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_base64_of_user_colon_password() {
        let creds = Credentials::new("admin", "s3cret");
        assert_eq!(creds.basic_auth_header(), "Basic YWRtaW46czNjcmV0");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "s3cret"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn scrub_masks_echoed_password() {
        let creds = Credentials::new("admin", "s3cret-pw");
        let text = creds.scrub("login rejected for admin/s3cret-pw", 2_048);
        assert_eq!(text, "login rejected for admin/***REDACTED***");
    }

    #[test]
    fn completeness_requires_both_fields() {
        assert!(Credentials::new("a", "b").is_complete());
        assert!(!Credentials::new("", "b").is_complete());
        assert!(!Credentials::new("a", "").is_complete());
    }

    #[test]
    fn rejects_origin_with_control_characters() {
        let err = HttpTransport::new(Logger::new("test"), "bad\norigin", 1_000)
            .err()
            .expect("invalid origin");
        assert!(err.message.contains("Origin"));
    }
}
