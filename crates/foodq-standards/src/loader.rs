//! CSV parsing of the field and vocabulary tables.
//!
//! # Field table
//!
//! ```text
//! Field,Group,Kind,Unit,Nullable,Allowed,Min,Max,Integer,Vocabulary,Source,Description
//! nova_group,labels,code,,yes,1;2;3;4,,,,,,NOVA food processing group
//! ```
//!
//! `Allowed` is `;`-separated. Boolean columns accept `yes`/`no`,
//! `true`/`false` and `1`/`0`; an empty cell takes the column default.
//!
//! # Vocabulary tables
//!
//! The index (`Name,Extensible,Separator,Pattern`) lists every vocabulary;
//! each term table has one `Canonical,Synonym` row per alias, with an empty
//! synonym for the bare term.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use foodq_model::ListSeparator;
use regex::Regex;
use serde::Deserialize;

use crate::embedded;
use crate::error::{Result, SchemaError};
use crate::schema::{FieldDomain, FieldKind, NumericRange};
use crate::vocabulary::{Vocabulary, VocabularyRegistry};

#[derive(Debug, Deserialize)]
struct FieldRow {
    #[serde(rename = "Field")]
    field: String,
    #[serde(rename = "Group", default)]
    group: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Unit", default)]
    unit: String,
    #[serde(rename = "Nullable", default)]
    nullable: String,
    #[serde(rename = "Allowed", default)]
    allowed: String,
    #[serde(rename = "Min", default)]
    min: String,
    #[serde(rename = "Max", default)]
    max: String,
    #[serde(rename = "Integer", default)]
    integer: String,
    #[serde(rename = "Vocabulary", default)]
    vocabulary: String,
    #[serde(rename = "Source", default)]
    source: String,
    #[serde(rename = "Description", default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct VocabularyRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Extensible", default)]
    extensible: String,
    #[serde(rename = "Separator", default)]
    separator: String,
    #[serde(rename = "Pattern", default)]
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct TermRow {
    #[serde(rename = "Canonical")]
    canonical: String,
    #[serde(rename = "Synonym", default)]
    synonym: String,
}

fn csv_reader(content: &str) -> csv::Reader<Cursor<&[u8]>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(content.as_bytes()))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn parse_flag(
    value: &str,
    default: bool,
    file: &str,
    field: &str,
    column: &'static str,
) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        _ => Err(SchemaError::InvalidValue {
            file: file.to_string(),
            field: field.to_string(),
            column,
            value: value.to_string(),
        }),
    }
}

fn parse_bound(value: &str, file: &str, field: &str, column: &'static str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(bound) if bound.is_finite() => Ok(Some(bound)),
        _ => Err(SchemaError::InvalidValue {
            file: file.to_string(),
            field: field.to_string(),
            column,
            value: value.to_string(),
        }),
    }
}

/// Parse a field table. Rows are checked individually here; cross-row and
/// vocabulary checks happen when the registry is assembled.
pub fn parse_fields(content: &str, file: &str) -> Result<Vec<FieldDomain>> {
    let mut reader = csv_reader(content);
    let mut fields = Vec::new();

    for result in reader.deserialize::<FieldRow>() {
        let row = result.map_err(|source| SchemaError::CsvRead {
            file: file.to_string(),
            source,
        })?;
        if row.field.is_empty() {
            continue;
        }
        let name = row.field;

        let kind = FieldKind::parse(&row.kind).ok_or_else(|| SchemaError::InvalidValue {
            file: file.to_string(),
            field: name.clone(),
            column: "Kind",
            value: row.kind.clone(),
        })?;

        let range = NumericRange {
            min: parse_bound(&row.min, file, &name, "Min")?,
            max: parse_bound(&row.max, file, &name, "Max")?,
            integer: parse_flag(&row.integer, false, file, &name, "Integer")?,
        };
        if let (Some(min), Some(max)) = (range.min, range.max)
            && min > max
        {
            return Err(SchemaError::InvalidField {
                file: file.to_string(),
                field: name,
                message: format!("min {min} exceeds max {max}"),
            });
        }

        let allowed: Vec<String> = row
            .allowed
            .split(';')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        if kind.has_allowed_values() && allowed.is_empty() {
            return Err(SchemaError::InvalidField {
                file: file.to_string(),
                field: name,
                message: format!("{kind} field declares no allowed values"),
            });
        }

        let vocabulary = non_empty(row.vocabulary);
        if kind == FieldKind::MultiValue && vocabulary.is_none() {
            return Err(SchemaError::InvalidField {
                file: file.to_string(),
                field: name,
                message: "multi_value field names no vocabulary".to_string(),
            });
        }

        let nullable = parse_flag(&row.nullable, true, file, &name, "Nullable")?;
        fields.push(FieldDomain {
            name,
            group: row.group,
            kind,
            unit: non_empty(row.unit),
            nullable,
            allowed,
            range,
            vocabulary,
            source: non_empty(row.source),
            description: row.description,
        });
    }

    Ok(fields)
}

/// Read a caller-supplied field table from disk.
pub fn read_fields_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_separator(value: &str, name: &str) -> Result<ListSeparator> {
    match value.to_ascii_lowercase().as_str() {
        "" | "pipe" | "|" => Ok(ListSeparator::Pipe),
        "space" | " " => Ok(ListSeparator::Space),
        _ => Err(SchemaError::InvalidValue {
            file: "vocabularies.csv".to_string(),
            field: name.to_string(),
            column: "Separator",
            value: value.to_string(),
        }),
    }
}

/// Parse the vocabulary index into empty vocabularies.
pub fn parse_vocabulary_index(content: &str, file: &str) -> Result<Vec<Vocabulary>> {
    let mut reader = csv_reader(content);
    let mut vocabularies = Vec::new();

    for result in reader.deserialize::<VocabularyRow>() {
        let row = result.map_err(|source| SchemaError::CsvRead {
            file: file.to_string(),
            source,
        })?;
        if row.name.is_empty() {
            continue;
        }
        let extensible = parse_flag(&row.extensible, false, file, &row.name, "Extensible")?;
        let separator = parse_separator(&row.separator, &row.name)?;
        let mut vocabulary = Vocabulary::new(row.name.clone(), extensible, separator);
        if !row.pattern.is_empty() {
            let pattern = Regex::new(&row.pattern).map_err(|source| SchemaError::InvalidPattern {
                name: row.name.clone(),
                source,
            })?;
            vocabulary = vocabulary.with_pattern(pattern);
        }
        vocabularies.push(vocabulary);
    }

    Ok(vocabularies)
}

/// Add the terms and synonyms of a term table to `vocabulary`.
pub fn load_terms(vocabulary: &mut Vocabulary, content: &str, file: &str) -> Result<()> {
    let mut reader = csv_reader(content);
    for result in reader.deserialize::<TermRow>() {
        let row = result.map_err(|source| SchemaError::CsvRead {
            file: file.to_string(),
            source,
        })?;
        if row.synonym.is_empty() {
            vocabulary.add_term(&row.canonical);
        } else {
            vocabulary.add_synonym(&row.synonym, &row.canonical);
        }
    }
    Ok(())
}

/// Load the embedded vocabularies, restricting the allergen table to
/// `allergens`.
pub fn load_vocabularies(allergens: &BTreeSet<String>) -> Result<VocabularyRegistry> {
    let mut registry = VocabularyRegistry::new();
    for mut vocabulary in parse_vocabulary_index(embedded::VOCABULARIES, "vocabularies.csv")? {
        if let Some((_, content)) = embedded::term_files()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&vocabulary.name))
        {
            let file = format!("{}.csv", vocabulary.name);
            load_terms(&mut vocabulary, content, &file)?;
        }
        if vocabulary.name.eq_ignore_ascii_case("allergens") {
            vocabulary.retain_terms(allergens);
        }
        registry.insert(vocabulary);
    }
    Ok(registry)
}
