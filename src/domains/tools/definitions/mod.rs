//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod crop_price;
pub mod web_search;

pub use crop_price::{CropPriceParams, CropPriceTool};
pub use web_search::{WebSearchParams, WebSearchTool};
