//! Whole-record normalization against the schema.

use foodq_model::{EngineConfig, FieldValue, NormalizedRecord, RawRecord, Violation};
use foodq_standards::{FieldDomain, FieldKind, SchemaRegistry};
use tracing::trace;

use crate::error::NormalizeError;
use crate::multi_value::normalize_list;
use crate::numeric::{derive_log, parse_numeric};
use crate::text;

/// A normalized record and the values that could not be normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOutput {
    pub record: NormalizedRecord,
    /// `NOT_NUMERIC` violations; the affected fields are left missing.
    pub faults: Vec<Violation>,
}

/// Applies the schema's field domains to raw values.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    schema: &'a SchemaRegistry,
    config: &'a EngineConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(schema: &'a SchemaRegistry, config: &'a EngineConfig) -> Self {
        Self { schema, config }
    }

    /// Normalize one value for `domain`.
    pub fn normalize_field(
        &self,
        domain: &FieldDomain,
        raw: &str,
    ) -> Result<FieldValue, NormalizeError> {
        let value = match domain.kind {
            FieldKind::FreeText => text::free_text(raw),
            FieldKind::CleanedText => text::cleaned_text(raw),
            FieldKind::Categorical => text::categorical(raw),
            FieldKind::Code => text::code(raw),
            FieldKind::Binary | FieldKind::Digits => text::trimmed(raw),
            FieldKind::Opaque => text::opaque(raw),
            FieldKind::Numeric | FieldKind::Ratio => {
                parse_numeric(raw, domain.unit.as_deref(), self.config.strict_numeric_parse)?
                    .map_or(FieldValue::Missing, FieldValue::Number)
            }
            FieldKind::MultiValue => match self.schema.vocabulary_for(domain) {
                Some(vocabulary) => normalize_list(
                    raw,
                    vocabulary,
                    self.config.matching_mode,
                    self.config.fuzzy_threshold,
                ),
                None => text::free_text(raw),
            },
        };
        Ok(value)
    }

    /// Normalize every field of `raw`, keeping field order.
    ///
    /// Field names are rewritten to their declared spelling. Undeclared
    /// fields are carried through verbatim; rejecting them is up to the
    /// caller.
    pub fn normalize_record(&self, raw: &RawRecord) -> NormalizedOutput {
        let mut record = NormalizedRecord::new(raw.row);
        let mut faults = Vec::new();

        for (name, value) in &raw.fields {
            let Some(domain) = self.schema.get(name) else {
                record.insert(name.clone(), text::opaque(value));
                continue;
            };
            match self.normalize_field(domain, value) {
                Ok(normalized) => record.insert(domain.name.clone(), normalized),
                Err(err) => {
                    trace!(row = raw.row, field = %domain.name, error = %err, "normalization fault");
                    faults.push(err.to_violation(&domain.name));
                    record.insert(domain.name.clone(), FieldValue::Missing);
                }
            }
        }

        if self.config.derive_log_fields {
            self.derive_log_fields(&mut record, &faults);
        }

        NormalizedOutput { record, faults }
    }

    /// Fill each derived field whose source column the record carries.
    /// A provided derived value is never replaced; a disagreement with its
    /// source is reported by the consistency rules. Fields that failed to
    /// normalize stay unset.
    fn derive_log_fields(&self, record: &mut NormalizedRecord, faults: &[Violation]) {
        let derived: Vec<(String, FieldValue)> = self
            .schema
            .fields()
            .iter()
            .filter(|domain| {
                !record.is_present(&domain.name)
                    && !faults.iter().any(|fault| fault.scope.mentions(&domain.name))
            })
            .filter_map(|domain| {
                let source = domain.source.as_deref()?;
                record.get(source)?;
                let value = derive_log(record.number(source))
                    .map_or(FieldValue::Missing, FieldValue::Number);
                Some((domain.name.clone(), value))
            })
            .collect();
        for (name, value) in derived {
            record.insert(name, value);
        }
    }
}
