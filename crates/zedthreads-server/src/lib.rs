//! MCP server exposing the Zed thread archive as tools.

pub mod config;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod state;
pub mod tools;
