//! Outbound HTTP plumbing shared by all tools.

mod client;

pub use client::{RawResponse, UpstreamClient, UpstreamError};
