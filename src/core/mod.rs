//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the gateway:
//! configuration, server lifecycle management, and the transport layer.

pub mod config;
pub mod server;
pub mod transport;

pub use config::Config;
pub use server::GatewayServer;
pub use transport::{HttpConfig, HttpTransport};
