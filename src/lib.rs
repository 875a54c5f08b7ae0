pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;
pub mod jolokia;
pub mod managers;
pub mod mcp;
pub mod services;
pub mod utils;
