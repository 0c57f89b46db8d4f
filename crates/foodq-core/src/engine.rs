use foodq_model::{EngineConfig, RawRecord, RecordOutcome};
use foodq_standards::{SchemaRegistry, StandardsConfig};
use foodq_validate::RuleRegistry;
use tracing::info;

use crate::error::EngineError;
use crate::processor::{ProcessContext, process_record};

/// Immutable engine state shared by every record of a run.
#[derive(Debug, Clone)]
pub struct Engine {
    schema: SchemaRegistry,
    config: EngineConfig,
    rules: RuleRegistry,
}

impl Engine {
    /// Validate `config`, then load the schema it selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the schema cannot
    /// be loaded.
    pub fn new(config: EngineConfig, standards: StandardsConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let standards = standards.with_allergen_vocabulary(config.allergen_vocabulary.clone());
        let schema = SchemaRegistry::load(&standards)?;
        info!(
            fields = schema.len(),
            fingerprint = %schema.fingerprint(),
            validation_mode = ?config.validation_mode,
            "engine ready"
        );
        Ok(Self::from_parts(schema, config, RuleRegistry::standard()))
    }

    /// Engine with the embedded schema.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(config, StandardsConfig::default())
    }

    pub fn from_parts(schema: SchemaRegistry, config: EngineConfig, rules: RuleRegistry) -> Self {
        Self {
            schema,
            config,
            rules,
        }
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn context(&self) -> ProcessContext<'_> {
        ProcessContext {
            schema: &self.schema,
            config: &self.config,
            rules: &self.rules,
        }
    }

    /// Process a single record.
    pub fn process(&self, raw: &RawRecord) -> RecordOutcome {
        process_record(raw, &self.context())
    }
}
