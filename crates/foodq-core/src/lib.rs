//! Record processing for the food-product quality engine.
//!
//! An [`Engine`] owns the schema, configuration and rule registry. It runs
//! each record through normalization, field checks and consistency rules
//! ([`processor`]) and processes whole datasets in parallel ([`pipeline`]).

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod processor;

pub use engine::Engine;
pub use error::EngineError;
pub use pipeline::CheckResult;
pub use processor::{ProcessContext, process_record};
