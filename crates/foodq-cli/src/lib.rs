//! CLI library components for the food-product quality engine.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod summary;
