use crate::constants::limits::LOG_STRING_MAX_BYTES;
use crate::errors::BridgeError;
use crate::jolokia::request::JolokiaRequest;
use crate::jolokia::response::normalize;
use crate::jolokia::transport::{Credentials, JolokiaTransport, RawResponse};
use crate::services::logger::Logger;
use serde_json::Value;
use std::sync::Arc;

/// Binds a transport to the broker's Jolokia base URL.
#[derive(Clone)]
pub struct JolokiaClient {
    logger: Logger,
    base_url: String,
    transport: Arc<dyn JolokiaTransport>,
}

impl JolokiaClient {
    pub fn new(
        logger: Logger,
        base_url: impl Into<String>,
        transport: Arc<dyn JolokiaTransport>,
    ) -> Self {
        Self {
            logger: logger.child("jolokia"),
            base_url: base_url.into(),
            transport,
        }
    }

    /// Refuses to touch the network unless both username and password are set.
    pub async fn dispatch(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<RawResponse, BridgeError> {
        if !credentials.is_complete() {
            return Err(BridgeError::not_authenticated());
        }
        self.transport.get(url, credentials).await
    }

    pub async fn call(
        &self,
        request: &JolokiaRequest,
        credentials: &Credentials,
    ) -> Result<Value, BridgeError> {
        let url = request.url(&self.base_url);
        self.logger.debug(
            "dispatch",
            Some(&serde_json::json!({
                "method": request.method().as_str(),
                "mbean": request.mbean_name(),
                "params": request.params(),
            })),
        );
        let raw = match self.dispatch(&url, credentials).await {
            Ok(raw) => raw,
            Err(err) => {
                if !err.is_precondition() {
                    self.logger.warn(
                        "transport failure",
                        Some(&serde_json::json!({
                            "url": url,
                            "error": credentials.scrub(err.message(), LOG_STRING_MAX_BYTES),
                        })),
                    );
                }
                return Err(err);
            }
        };
        let response = normalize(raw.status, &raw.body);
        if !response.is_success() {
            self.logger.info(
                "jolokia reported failure",
                Some(&serde_json::json!({ "url": url, "http_status": raw.status })),
            );
        }
        response.into_result()
    }
}
