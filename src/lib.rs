//! AI Bank Tool MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing mock banking tools.
//! Every tool answers from fixed fixture data; nothing is persisted.

pub mod bank;
pub mod config;
pub mod error;
pub mod mcp;

pub use config::Config;
pub use error::{BankToolError, Result};
