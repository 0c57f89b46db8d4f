//! Token vocabularies for multi-value fields.
//!
//! A vocabulary is a table of canonical terms, each with optional synonyms
//! that normalize to it, plus an extensibility flag:
//!
//! - **Non-extensible** (allergens): a token outside the table is an invalid
//!   category.
//! - **Extensible** (countries): unknown tokens are kept as normalized.
//!
//! A vocabulary may instead (or additionally) carry a token pattern; the
//! additive vocabulary is pattern-only (`e300`, `e150d`, ...).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use foodq_model::ListSeparator;
use regex::Regex;

/// Lookup key for a term or synonym: trimmed, lowercase, single spaces.
pub fn term_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub name: String,
    /// Whether tokens outside the table are acceptable.
    pub extensible: bool,
    /// Separator used when the tokens are re-joined.
    pub separator: ListSeparator,
    pattern: Option<Regex>,
    /// Canonical terms, keyed by [`term_key`].
    terms: BTreeSet<String>,
    /// Synonym key -> canonical term.
    synonyms: BTreeMap<String, String>,
    /// Whole-word alternation over every key, built on first use.
    mention: OnceLock<Option<Regex>>,
}

impl Vocabulary {
    pub fn new(name: impl Into<String>, extensible: bool, separator: ListSeparator) -> Self {
        Self {
            name: name.into(),
            extensible,
            separator,
            pattern: None,
            terms: BTreeSet::new(),
            synonyms: BTreeMap::new(),
            mention: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn add_term(&mut self, canonical: &str) {
        let key = term_key(canonical);
        if !key.is_empty() {
            self.terms.insert(key);
            self.mention = OnceLock::new();
        }
    }

    /// Register `synonym` as an alias of `canonical`, adding the term if needed.
    pub fn add_synonym(&mut self, synonym: &str, canonical: &str) {
        let canonical = term_key(canonical);
        let synonym = term_key(synonym);
        if canonical.is_empty() {
            return;
        }
        if !synonym.is_empty() && synonym != canonical {
            self.synonyms.insert(synonym, canonical.clone());
        }
        self.terms.insert(canonical);
        self.mention = OnceLock::new();
    }

    /// Restrict the table to `keep`. Terms in `keep` that the table lacks are
    /// added without synonyms; synonyms of removed terms are dropped.
    pub fn retain_terms(&mut self, keep: &BTreeSet<String>) {
        let keep: BTreeSet<String> = keep.iter().map(|term| term_key(term)).collect();
        self.terms.retain(|term| keep.contains(term));
        self.synonyms
            .retain(|_, canonical| keep.contains(canonical.as_str()));
        self.terms.extend(keep.into_iter().filter(|term| !term.is_empty()));
        self.mention = OnceLock::new();
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every lookup key (terms and synonyms) with the canonical term it
    /// resolves to, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let terms = self.terms.iter().map(|term| (term.as_str(), term.as_str()));
        let synonyms = self
            .synonyms
            .iter()
            .map(|(synonym, canonical)| (synonym.as_str(), canonical.as_str()));
        terms.chain(synonyms)
    }

    /// Canonical term for an exact term or synonym match.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        let key = term_key(token);
        if let Some(term) = self.terms.get(&key) {
            return Some(term.as_str());
        }
        self.synonyms.get(&key).map(String::as_str)
    }

    /// Canonical terms whose term or a synonym occurs in `text` as whole
    /// words, so `Contains: skimmed milk powder` mentions `milk`. Longer
    /// keys win over keys they contain.
    pub fn mentions(&self, text: &str) -> BTreeSet<&str> {
        let Some(pattern) = self.mention_pattern() else {
            return BTreeSet::new();
        };
        let text = term_key(text);
        pattern
            .find_iter(&text)
            .filter_map(|found| self.resolve(found.as_str()))
            .collect()
    }

    fn mention_pattern(&self) -> Option<&Regex> {
        self.mention
            .get_or_init(|| {
                let mut keys: Vec<&str> = self.entries().map(|(key, _)| key).collect();
                if keys.is_empty() {
                    return None;
                }
                keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
                let alternation: Vec<String> = keys.into_iter().map(regex::escape).collect();
                Regex::new(&format!(r"\b(?:{})\b", alternation.join("|"))).ok()
            })
            .as_ref()
    }

    /// True when `token` is a canonical term or matches the token pattern.
    pub fn is_valid(&self, token: &str) -> bool {
        self.terms.contains(token)
            || self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(token))
    }
}

/// Loaded vocabularies by name.
#[derive(Debug, Clone, Default)]
pub struct VocabularyRegistry {
    vocabularies: BTreeMap<String, Vocabulary>,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vocabulary: Vocabulary) {
        self.vocabularies
            .insert(vocabulary.name.to_lowercase(), vocabulary);
    }

    pub fn get(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(&name.to_lowercase())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vocabulary> {
        self.vocabularies.get_mut(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vocabularies.contains_key(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vocabulary> {
        self.vocabularies.values()
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }
}
