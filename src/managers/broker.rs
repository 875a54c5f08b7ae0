use crate::constants::broker::{BROWSE_OPERATION, DEFAULT_ROUTING_TYPE, VERSION_ATTRIBUTE};
use crate::errors::{BridgeError, ToolError};
use crate::jolokia::mbean::{broker_object_name, queue_object_name};
use crate::jolokia::{Credentials, JolokiaClient, JolokiaRequest};
use crate::services::config::BrokerConfig;
use crate::services::logger::Logger;
use crate::services::session::SessionStore;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerAction {
    Login,
    Logout,
    GetVersion,
    BrowseQueue,
}

impl BrokerAction {
    pub const ALL: [BrokerAction; 4] = [
        BrokerAction::Login,
        BrokerAction::Logout,
        BrokerAction::GetVersion,
        BrokerAction::BrowseQueue,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            BrokerAction::Login => "login",
            BrokerAction::Logout => "logout",
            BrokerAction::GetVersion => "get_version",
            BrokerAction::BrowseQueue => "browse_queue",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.tool_name() == name)
    }
}

/// The four operator-facing broker operations. Bridge failures never escape
/// as `Err`: they are rendered into the returned text. `Err` is reserved for
/// malformed tool arguments.
pub struct BrokerManager {
    logger: Logger,
    validation: Validation,
    client: JolokiaClient,
    session: SessionStore,
    broker_name: String,
    broker_mbean: String,
}

impl BrokerManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        config: &BrokerConfig,
        client: JolokiaClient,
        session: SessionStore,
    ) -> Result<Self, ToolError> {
        let broker_mbean = broker_object_name(&config.broker_name)?;
        Ok(Self {
            logger: logger.child("broker"),
            validation,
            client,
            session,
            broker_name: config.broker_name.clone(),
            broker_mbean,
        })
    }

    async fn read_version(&self, credentials: &Credentials) -> Result<Value, BridgeError> {
        let request = JolokiaRequest::read(self.broker_mbean.clone(), VERSION_ATTRIBUTE);
        self.client.call(&request, credentials).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let credentials = Credentials::new(username, password);
        let outcome = self
            .session
            .login(credentials, |creds| async move { self.read_version(&creds).await })
            .await;
        match outcome {
            Ok(_) => format!("Successfully authenticated as user: {}", username),
            Err(err) => format!("Authentication failed: {}", err),
        }
    }

    pub async fn logout(&self) -> String {
        match self.session.logout().await {
            Some(username) => format!("Successfully logged out user: {}", username),
            None => "No active session to logout".to_string(),
        }
    }

    pub async fn get_version(&self) -> String {
        let credentials = match self.session.require_credentials().await {
            Ok(creds) => creds,
            Err(err) => return format!("Error: {}", err),
        };
        match self.read_version(&credentials).await {
            Ok(Value::String(version)) => format!("AMQ Broker Version: {}", version),
            Ok(Value::Null) => "AMQ Broker Version: Unknown".to_string(),
            Ok(other) => format!("AMQ Broker Version: {}", other),
            Err(err) => format!("Error: {}", err),
        }
    }

    /// Returns a JSON document. A queue or routing type containing `!` cannot
    /// be addressed and is reported as invalid params.
    pub async fn browse_queue(
        &self,
        queue_name: &str,
        routing_type: &str,
    ) -> Result<String, ToolError> {
        let credentials = match self.session.require_credentials().await {
            Ok(creds) => creds,
            Err(err) => return Ok(render_json(&error_body(&err), false)),
        };
        let mbean = queue_object_name(&self.broker_name, queue_name, routing_type)?;
        let request =
            JolokiaRequest::exec(mbean, BROWSE_OPERATION, std::iter::empty::<String>());

        let body = match self.client.call(&request, &credentials).await {
            Ok(Value::Array(messages)) => browse_body(queue_name, routing_type, messages),
            Ok(Value::Null) => browse_body(queue_name, routing_type, Vec::new()),
            Ok(other) => {
                self.logger.warn(
                    "unexpected browse payload",
                    Some(&serde_json::json!({ "queue": queue_name })),
                );
                return Ok(render_json(
                    &serde_json::json!({
                        "error": "Failed to browse queue",
                        "message": "Unexpected browse payload",
                        "response": other,
                    }),
                    false,
                ));
            }
            Err(err) => return Ok(render_json(&error_body(&err), false)),
        };
        Ok(render_json(&body, true))
    }

    pub async fn handle_action(
        &self,
        action: BrokerAction,
        args: Value,
    ) -> Result<Value, ToolError> {
        let text = match action {
            BrokerAction::Login => {
                let username = self.validation.ensure_string(
                    args.get("username").unwrap_or(&Value::Null),
                    "username",
                    true,
                )?;
                let password = self.validation.ensure_string(
                    args.get("password").unwrap_or(&Value::Null),
                    "password",
                    false,
                )?;
                self.login(&username, &password).await
            }
            BrokerAction::Logout => self.logout().await,
            BrokerAction::GetVersion => self.get_version().await,
            BrokerAction::BrowseQueue => {
                let queue_name = self.validation.ensure_string(
                    args.get("queue_name").unwrap_or(&Value::Null),
                    "queue_name",
                    true,
                )?;
                let routing_type = self
                    .validation
                    .ensure_optional_string(args.get("routing_type"), "routing_type", true)?
                    .unwrap_or_else(|| DEFAULT_ROUTING_TYPE.to_string());
                self.browse_queue(&queue_name, &routing_type).await?
            }
        };
        Ok(Value::String(text))
    }
}

fn browse_body(queue_name: &str, routing_type: &str, messages: Vec<Value>) -> Value {
    serde_json::json!({
        "queue": queue_name,
        "routing_type": routing_type,
        "message_count": messages.len(),
        "messages": messages,
    })
}

fn error_body(err: &BridgeError) -> Value {
    let mut body = serde_json::json!({
        "error": err.label(),
        "message": err.message(),
    });
    if let BridgeError::Declared { payload, .. } = err {
        if !payload.is_null() {
            body["response"] = payload.clone();
        }
    }
    body
}

fn render_json(value: &Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|_| "{}".to_string())
}

/// Exposes one `BrokerAction` as an MCP tool.
pub struct BrokerTool {
    manager: Arc<BrokerManager>,
    action: BrokerAction,
}

impl BrokerTool {
    pub fn new(manager: Arc<BrokerManager>, action: BrokerAction) -> Self {
        Self { manager, action }
    }
}

#[async_trait::async_trait]
impl ToolHandler for BrokerTool {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.manager.handle_action(self.action, args).await
    }
}

pub fn broker_tool_handlers(
    manager: Arc<BrokerManager>,
) -> HashMap<String, Arc<dyn ToolHandler>> {
    BrokerAction::ALL
        .into_iter()
        .map(|action| {
            let handler: Arc<dyn ToolHandler> =
                Arc::new(BrokerTool::new(manager.clone(), action));
            (action.tool_name().to_string(), handler)
        })
        .collect()
}
