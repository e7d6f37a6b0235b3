//! Agri Gateway Library
//!
//! A small network gateway that exposes two external data sources - the
//! data.gov.in commodity price resource and the Exa web search API - through
//! two uniform interfaces sharing one tool registry: plain REST
//! (`POST /tools/{name}`) and MCP-style JSON-RPC (`POST /mcp`).
//!
//! # Architecture
//!
//! - **core**: Configuration, the gateway server, and the HTTP transport
//!   carrying both protocol front-ends
//! - **domains::tools**: Tool definitions, the registry, and the normalized
//!   success/failure outcome both front-ends render
//! - **upstream**: The shared outbound HTTP client
//!
//! # Example
//!
//! ```rust,no_run
//! use agri_gateway::core::{Config, GatewayServer, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = HttpTransport::new(config.transport.clone());
//!     let server = GatewayServer::new(config);
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod upstream;

// Re-export commonly used types for convenience
pub use core::{Config, GatewayServer};
pub use domains::tools::{ToolError, ToolOutcome};
