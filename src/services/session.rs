use crate::errors::BridgeError;
use crate::jolokia::Credentials;
use crate::services::logger::Logger;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Holds at most one operator's credentials. Cloning shares the slot.
#[derive(Clone)]
pub struct SessionStore {
    logger: Logger,
    slot: Arc<Mutex<Option<Credentials>>>,
}

impl SessionStore {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("session"),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn current_credentials(&self) -> Option<Credentials> {
        self.slot.lock().await.clone()
    }

    pub async fn require_credentials(&self) -> Result<Credentials, BridgeError> {
        match self.current_credentials().await {
            Some(creds) if creds.is_complete() => Ok(creds),
            _ => Err(BridgeError::not_authenticated()),
        }
    }

    /// Commits `credentials` only after `verify` succeeds. The lock is not held
    /// while verifying, so a slow broker does not block other readers.
    pub async fn login<F, Fut>(
        &self,
        credentials: Credentials,
        verify: F,
    ) -> Result<Value, BridgeError>
    where
        F: FnOnce(Credentials) -> Fut,
        Fut: Future<Output = Result<Value, BridgeError>>,
    {
        let verified = verify(credentials.clone()).await;
        let value = match verified {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    "login rejected",
                    Some(&serde_json::json!({
                        "username": credentials.username,
                        "error": err.label(),
                    })),
                );
                return Err(err);
            }
        };

        let mut slot = self.slot.lock().await;
        let replaced = slot.as_ref().map(|previous| previous.username.clone());
        *slot = Some(credentials.clone());
        drop(slot);

        self.logger.info(
            "login",
            Some(&serde_json::json!({
                "username": credentials.username,
                "replaced": replaced,
            })),
        );
        Ok(value)
    }

    /// Clears the slot and returns the username that was held, if any.
    pub async fn logout(&self) -> Option<String> {
        let previous = self.slot.lock().await.take();
        let username = previous.map(|creds| creds.username);
        if let Some(name) = &username {
            self.logger
                .info("logout", Some(&serde_json::json!({ "username": name })));
        }
        username
    }
}
