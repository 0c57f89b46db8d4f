//! Cross-field consistency rules.
//!
//! Every rule is a pure function over a normalized record and a read-only
//! context that yields at most one violation. The [`RuleRegistry`] runs all
//! of them; a failing rule never stops the others.

mod additives;
mod allergens;
mod category;
mod images;
mod nutrition;
mod ratios;
mod registry;

pub use category::Category;
pub use registry::{Rule, RuleFn, RuleRegistry};

use foodq_model::EngineConfig;
use foodq_standards::SchemaRegistry;

/// Read-only inputs available to every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub schema: &'a SchemaRegistry,
    pub config: &'a EngineConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(schema: &'a SchemaRegistry, config: &'a EngineConfig) -> Self {
        Self { schema, config }
    }
}
