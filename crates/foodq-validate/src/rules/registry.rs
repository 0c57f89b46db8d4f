//! Registry of consistency rules.

use foodq_model::{NormalizedRecord, Severity, Violation, ViolationCode};

use super::category::Category;
use super::{RuleContext, additives, allergens, images, nutrition, ratios};

/// Signature shared by all consistency rules.
pub type RuleFn = fn(&NormalizedRecord, &RuleContext<'_>) -> Option<Violation>;

/// A consistency rule and the severity its violations carry.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub code: ViolationCode,
    pub category: Category,
    pub severity: Severity,
    pub description: &'static str,
    pub check: RuleFn,
}

impl Rule {
    pub fn new(
        code: ViolationCode,
        category: Category,
        description: &'static str,
        check: RuleFn,
    ) -> Self {
        Self {
            code,
            category,
            severity: code.default_severity(),
            description,
            check,
        }
    }

    /// Evaluate the rule; the violation takes the rule's severity.
    pub fn evaluate(&self, record: &NormalizedRecord, ctx: &RuleContext<'_>) -> Option<Violation> {
        (self.check)(record, ctx).map(|violation| violation.with_severity(self.severity))
    }
}

/// Ordered set of consistency rules.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rule set.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(Rule::new(
            ViolationCode::FatInconsistent,
            Category::Nutrition,
            "saturated_fat_100g must not exceed fat_100g",
            nutrition::fat_consistency,
        ));
        registry.insert(Rule::new(
            ViolationCode::SugarsInconsistent,
            Category::Nutrition,
            "sugars_100g should not exceed carbohydrates_100g",
            nutrition::sugars_consistency,
        ));
        registry.insert(Rule::new(
            ViolationCode::LogInconsistent,
            Category::Nutrition,
            "log fields must equal the natural log of a positive source value",
            nutrition::log_consistency,
        ));
        registry.insert(Rule::new(
            ViolationCode::ImagePathMissing,
            Category::Images,
            "has_image = 1 requires image_path",
            images::image_path,
        ));
        registry.insert(Rule::new(
            ViolationCode::Image160PathMissing,
            Category::Images,
            "has_image_160 = 1 requires image_160_path",
            images::image_160_path,
        ));
        registry.insert(Rule::new(
            ViolationCode::AllergenSourceAmbiguous,
            Category::Allergens,
            "allergens_cleaned must not take tokens from traces unless allergens_combined = 1",
            allergens::source_ambiguity,
        ));
        registry.insert(Rule::new(
            ViolationCode::RatioOutOfBounds,
            Category::Ratios,
            "ratio fields must lie within their declared bounds",
            ratios::bounds,
        ));
        registry.insert(Rule::new(
            ViolationCode::AdditivesCountMismatch,
            Category::Additives,
            "additives_count should equal the number of additives_cleaned codes",
            additives::count_consistency,
        ));
        registry
    }

    /// Add a rule, replacing any rule with the same code.
    pub fn insert(&mut self, rule: Rule) {
        if let Some(slot) = self.rules.iter_mut().find(|existing| existing.code == rule.code) {
            *slot = rule;
        } else {
            self.rules.push(rule);
        }
    }

    pub fn get(&self, code: ViolationCode) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.code == code)
    }

    /// Override the severity of the rule reporting `code`.
    #[must_use]
    pub fn with_severity(mut self, code: ViolationCode, severity: Severity) -> Self {
        if let Some(rule) = self.rules.iter_mut().find(|rule| rule.code == code) {
            rule.severity = severity;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Run every rule in registration order and collect all violations.
    pub fn run(&self, record: &NormalizedRecord, ctx: &RuleContext<'_>) -> Vec<Violation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(record, ctx))
            .collect()
    }
}
