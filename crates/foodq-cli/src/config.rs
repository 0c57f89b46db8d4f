//! Engine configuration from a TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use foodq_model::{
    EngineConfig, MatchingMode, UnknownFieldPolicy, UnknownSentinel, ValidationMode,
};
use tracing::debug;

/// Settings given on the command line. Each one only ever moves the
/// configuration away from its file value when the flag is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub allow_duplicate_ids: bool,
    pub unknown_sentinel: Option<UnknownSentinel>,
    pub lenient_numeric: bool,
    pub strict: bool,
    pub pass_through_unknown: bool,
    pub derive_log_fields: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if self.allow_duplicate_ids {
            config.allow_duplicate_ids = true;
        }
        if let Some(sentinel) = self.unknown_sentinel {
            config.unknown_label_sentinel = sentinel;
        }
        if self.lenient_numeric {
            config.strict_numeric_parse = false;
        }
        if self.strict {
            config.validation_mode = ValidationMode::Strict;
            config.matching_mode = MatchingMode::Strict;
        }
        if self.pass_through_unknown {
            config.unknown_fields = UnknownFieldPolicy::PassThrough;
        }
        if self.derive_log_fields {
            config.derive_log_fields = true;
        }
        config
    }
}

/// Parse an engine configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(content).context("parse engine configuration")?;
    Ok(config)
}

/// Load the configuration file, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config = parse_config(&content).with_context(|| format!("in {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
