use crate::errors::ToolError;
use crate::jolokia::{HttpTransport, JolokiaClient, JolokiaTransport};
use crate::managers::broker::{broker_tool_handlers, BrokerManager};
use crate::mcp::catalog::tool_catalog;
use crate::services::config::BrokerConfig;
use crate::services::logger::Logger;
use crate::services::session::SessionStore;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: Arc<BrokerConfig>,
    pub session: SessionStore,
    pub broker_manager: Arc<BrokerManager>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize(config: BrokerConfig) -> Result<Self, ToolError> {
        let logger = Logger::new("amq-jolokia");
        let transport = HttpTransport::new(
            logger.clone(),
            &config.origin,
            config.request_timeout_ms,
        )?;
        Self::with_transport(logger, config, Arc::new(transport))
    }

    pub fn with_transport(
        logger: Logger,
        config: BrokerConfig,
        transport: Arc<dyn JolokiaTransport>,
    ) -> Result<Self, ToolError> {
        let config = Arc::new(config);
        let validation = Validation::new();
        let session = SessionStore::new(logger.clone());
        let client = JolokiaClient::new(logger.clone(), config.base_url(), transport);
        let broker_manager = Arc::new(BrokerManager::new(
            logger.clone(),
            validation,
            &config,
            client,
            session.clone(),
        )?);

        let handlers = broker_tool_handlers(broker_manager.clone());
        Self::validate_tool_wiring(&handlers)?;
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));

        logger.info(
            "initialized",
            Some(&serde_json::json!({
                "base_url": config.base_url(),
                "broker_name": config.broker_name,
                "origin": config.origin,
                "timeout_ms": config.request_timeout_ms,
            })),
        );

        Ok(Self {
            logger,
            config,
            session,
            broker_manager,
            tool_executor,
        })
    }
}
