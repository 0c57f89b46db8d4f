//! Raw and normalized product rows.

use serde::{Deserialize, Serialize};

/// One product row as read from the source, before any normalization.
///
/// Fields keep their source order. `malformed` is set by the reader when the
/// row could not be split into the declared columns; such a row is never
/// interpreted field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub fields: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    /// Build a record from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(row: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            row,
            fields: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            malformed: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Mark the row as structurally unreadable.
    #[must_use]
    pub fn with_malformed(mut self, reason: impl Into<String>) -> Self {
        self.malformed = Some(reason.into());
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Raw value for `name` (exact match).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Separator used when a multi-value field is rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSeparator {
    /// `|`, used for allergen and country tokens.
    Pipe,
    /// A single space, used for additive codes.
    Space,
}

impl ListSeparator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "|",
            Self::Space => " ",
        }
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// The source value was empty or unknown. Never replaced by a default.
    Missing,
    Text(String),
    Number(f64),
    List {
        tokens: Vec<String>,
        separator: ListSeparator,
    },
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text content, if the value is non-empty text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn tokens(&self) -> &[String] {
        match self {
            Self::List { tokens, .. } => tokens,
            _ => &[],
        }
    }

    /// Canonical text form written to the output dataset.
    pub fn render(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(value) => value.clone(),
            Self::Number(value) => format_number(*value),
            Self::List { tokens, separator } => tokens.join(separator.as_str()),
        }
    }
}

/// Formats a number in its shortest round-trip form (`5.0` renders as `5`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also folds -0 into 0.
        return "0".to_string();
    }
    format!("{value}")
}

/// A product row after normalization, in source field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub row: usize,
    pub fields: Vec<(String, FieldValue)>,
}

impl NormalizedRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            fields: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(field, _)| *field == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// True when the field exists and carries a value.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_missing())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn tokens(&self, name: &str) -> &[String] {
        self.get(name).map(FieldValue::tokens).unwrap_or(&[])
    }

    /// Render every field back to text, keeping field order.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord::from_pairs(
            self.row,
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.render())),
        )
    }
}
