//! The loaded field schema.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use foodq_model::{CaseInsensitiveLookup, DEFAULT_ALLERGENS};
use tracing::debug;

use crate::embedded;
use crate::error::{Result, SchemaError, SchemaLookupError};
use crate::hash;
use crate::loader;
use crate::schema::{FieldDomain, FieldKind};
use crate::vocabulary::{Vocabulary, VocabularyRegistry};

/// Field every schema must declare: the record key.
pub const KEY_FIELD: &str = "product_id";

/// Configuration for loading the schema.
#[derive(Debug, Clone)]
pub struct StandardsConfig {
    /// Field table to use instead of the embedded one.
    pub fields_path: Option<PathBuf>,
    /// Canonical allergen terms to accept.
    pub allergen_vocabulary: BTreeSet<String>,
}

impl Default for StandardsConfig {
    fn default() -> Self {
        Self {
            fields_path: None,
            allergen_vocabulary: DEFAULT_ALLERGENS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl StandardsConfig {
    #[must_use]
    pub fn with_fields_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fields_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_allergen_vocabulary(mut self, allergens: BTreeSet<String>) -> Self {
        self.allergen_vocabulary = allergens;
        self
    }
}

/// Immutable field schema with its vocabularies.
///
/// Built once before any record is processed and shared read-only after.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    fields: Vec<FieldDomain>,
    names: CaseInsensitiveLookup,
    positions: HashMap<String, usize>,
    vocabularies: VocabularyRegistry,
    fingerprint: String,
}

impl SchemaRegistry {
    /// Load the schema with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a table cannot be read or parsed, or if the field
    /// table is inconsistent with itself or the vocabularies.
    pub fn load(config: &StandardsConfig) -> Result<Self> {
        let vocabularies = loader::load_vocabularies(&config.allergen_vocabulary)?;
        let registry = match &config.fields_path {
            Some(path) => {
                let content = loader::read_fields_file(path)?;
                let file = path.display().to_string();
                Self::from_csv(&content, &file, vocabularies, &config.allergen_vocabulary)?
            }
            None => Self::from_csv(
                embedded::FIELDS,
                "fields.csv",
                vocabularies,
                &config.allergen_vocabulary,
            )?,
        };
        debug!(
            fields = registry.len(),
            vocabularies = registry.vocabularies.len(),
            fingerprint = %registry.fingerprint,
            "schema loaded"
        );
        Ok(registry)
    }

    /// Load the embedded schema with the default allergen set.
    pub fn load_default() -> Result<Self> {
        Self::load(&StandardsConfig::default())
    }

    /// Assemble a registry from field table content and loaded vocabularies.
    pub fn from_csv(
        content: &str,
        file: &str,
        vocabularies: VocabularyRegistry,
        allergens: &BTreeSet<String>,
    ) -> Result<Self> {
        let fields = loader::parse_fields(content, file)?;
        Self::check_fields(&fields, &vocabularies, file)?;

        let names = CaseInsensitiveLookup::new(fields.iter().map(|field| field.name.as_str()));
        let positions = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name.clone(), index))
            .collect();

        let allergen_list = allergens.iter().cloned().collect::<Vec<_>>().join("|");
        let mut parts: Vec<&[u8]> = vec![content.as_bytes(), embedded::VOCABULARIES.as_bytes()];
        parts.extend(
            embedded::term_files()
                .iter()
                .map(|(_, content)| content.as_bytes()),
        );
        parts.push(allergen_list.as_bytes());
        let fingerprint = hash::fingerprint(parts);

        Ok(Self {
            fields,
            names,
            positions,
            vocabularies,
            fingerprint,
        })
    }

    fn check_fields(
        fields: &[FieldDomain],
        vocabularies: &VocabularyRegistry,
        file: &str,
    ) -> Result<()> {
        let mut seen = BTreeSet::new();
        for field in fields {
            if !seen.insert(field.name.to_ascii_lowercase()) {
                return Err(SchemaError::DuplicateField {
                    file: file.to_string(),
                    field: field.name.clone(),
                });
            }
            if let Some(vocabulary) = &field.vocabulary
                && !vocabularies.contains(vocabulary)
            {
                return Err(SchemaError::UnknownVocabulary {
                    field: field.name.clone(),
                    vocabulary: vocabulary.clone(),
                });
            }
        }

        for field in fields {
            let Some(source) = &field.source else {
                continue;
            };
            let source_kind = fields
                .iter()
                .find(|candidate| candidate.name.eq_ignore_ascii_case(source))
                .map(|candidate| candidate.kind);
            if source_kind != Some(FieldKind::Numeric) || field.kind != FieldKind::Numeric {
                return Err(SchemaError::InvalidField {
                    file: file.to_string(),
                    field: field.name.clone(),
                    message: format!("derivation source '{source}' must be a declared numeric field"),
                });
            }
        }

        if !seen.contains(KEY_FIELD) {
            return Err(SchemaError::MissingKeyField { field: KEY_FIELD });
        }
        Ok(())
    }

    /// Domain for `name` (case-insensitive).
    pub fn lookup(&self, name: &str) -> std::result::Result<&FieldDomain, SchemaLookupError> {
        self.get(name).ok_or_else(|| SchemaLookupError {
            field: name.trim().to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&FieldDomain> {
        let canonical = self.names.get(name)?;
        self.positions
            .get(canonical)
            .and_then(|index| self.fields.get(*index))
    }

    /// Declared spelling of `name`.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.names.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Fields in table order.
    pub fn fields(&self) -> &[FieldDomain] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn vocabularies(&self) -> &VocabularyRegistry {
        &self.vocabularies
    }

    /// Vocabulary of a multi-value field.
    pub fn vocabulary_for(&self, field: &FieldDomain) -> Option<&Vocabulary> {
        field
            .vocabulary
            .as_deref()
            .and_then(|name| self.vocabularies.get(name))
    }

    /// SHA-256 over the loaded tables and the allergen set.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
