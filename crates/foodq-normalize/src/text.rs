//! Text, label and code normalization.

use foodq_model::{FieldValue, format_number};

fn text_or_missing(value: String) -> FieldValue {
    if value.is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::Text(value)
    }
}

/// Free text is kept as provided; whitespace-only input is empty.
pub fn free_text(raw: &str) -> FieldValue {
    if raw.trim().is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::Text(raw.to_string())
    }
}

/// Lowercase, trim, and collapse runs of whitespace to one space and runs of
/// punctuation to the run's first character.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else if ch.is_ascii_punctuation() {
            if !out.ends_with(|last: char| last.is_ascii_punctuation()) {
                out.push(ch);
            }
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

pub fn cleaned_text(raw: &str) -> FieldValue {
    text_or_missing(clean_text(raw))
}

/// Trimmed, lowercase label.
pub fn categorical(raw: &str) -> FieldValue {
    text_or_missing(raw.trim().to_lowercase())
}

/// Integer code; any integral spelling (`3.0`, `03`, `+3`) becomes the
/// plain integer.
pub fn code(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return FieldValue::Text(value.to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            FieldValue::Text(format_number(value))
        }
        _ => text_or_missing(trimmed.to_string()),
    }
}

/// Trimmed only; binary and digit fields are judged by the validator.
pub fn trimmed(raw: &str) -> FieldValue {
    text_or_missing(raw.trim().to_string())
}

/// Passed through byte-for-byte.
pub fn opaque(raw: &str) -> FieldValue {
    text_or_missing(raw.to_string())
}
