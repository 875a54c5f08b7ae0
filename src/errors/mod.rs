mod bridge_error;
mod mcp_error;
mod tool_error;

pub use bridge_error::BridgeError;
pub use mcp_error::{ErrorCode, McpError};
pub use tool_error::{ToolError, ToolErrorKind};
