pub mod config;
pub mod logger;
pub mod session;
pub mod tool_executor;
pub mod validation;
