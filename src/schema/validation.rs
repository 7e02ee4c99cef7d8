//! Per-field validation rules and their evaluation.
//!
//! The core only evaluates rules and reports which ones failed; presenting
//! failures to end users is the host's job.

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::field::{FieldDef, FieldValue};

/// What a validation rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleKind {
    /// Value must be present (non-empty text, checked checkbox)
    Required,
    /// Text value must match the regular expression
    Pattern { pattern: String },
    /// Lower bound: numeric value, or text length
    Min { limit: f64 },
    /// Upper bound: numeric value, or text length
    Max { limit: f64 },
    /// Host-registered predicate, looked up by key
    Custom { key: String },
}

/// A single validation rule with the message shown on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(flatten)]
    pub kind: RuleKind,
    pub message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// One failed rule on a field.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    /// Index into the field's `validations` list
    pub rule_index: usize,
    pub message: String,
}

/// Host-registered predicates backing [`RuleKind::Custom`].
#[derive(Default)]
pub struct CustomRules {
    predicates: HashMap<String, Box<dyn Fn(&FieldValue) -> bool>>,
}

impl std::fmt::Debug for CustomRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRules")
            .field("predicates", &format!("<{} predicates>", self.predicates.len()))
            .finish()
    }
}

impl CustomRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        key: impl Into<String>,
        predicate: impl Fn(&FieldValue) -> bool + 'static,
    ) {
        self.predicates.insert(key.into(), Box::new(predicate));
    }
}

/// Checks that a rule list is well formed (compilable patterns, finite
/// bounds) without evaluating anything.
pub fn check_rules(rules: &[ValidationRule]) -> Result<(), String> {
    for rule in rules {
        match &rule.kind {
            RuleKind::Pattern { pattern } => {
                Regex::new(pattern).map_err(|e| format!("invalid pattern {pattern:?}: {e}"))?;
            }
            RuleKind::Min { limit } | RuleKind::Max { limit } => {
                if !limit.is_finite() {
                    return Err(format!("non-finite rule limit: {limit}"));
                }
            }
            RuleKind::Required | RuleKind::Custom { .. } => {}
        }
    }
    Ok(())
}

/// Evaluates all rules of a field against its current value.
///
/// Unregistered custom rules pass; they belong to a host that is not
/// present. Rules that do not apply to the value's shape pass as well.
pub fn evaluate_field(field: &FieldDef, custom: Option<&CustomRules>) -> Vec<RuleFailure> {
    let mut failures = Vec::new();
    for (rule_index, rule) in field.validations.iter().enumerate() {
        if !rule_passes(rule, &field.value, custom) {
            failures.push(RuleFailure {
                rule_index,
                message: rule.message.clone(),
            });
        }
    }
    failures
}

fn rule_passes(rule: &ValidationRule, value: &FieldValue, custom: Option<&CustomRules>) -> bool {
    match &rule.kind {
        RuleKind::Required => match value {
            FieldValue::Empty => false,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bool(checked) => *checked,
            FieldValue::Number(_) => true,
        },
        RuleKind::Pattern { pattern } => match value {
            FieldValue::Text(s) => match Regex::new(pattern) {
                Ok(re) => re.is_match(s),
                Err(e) => {
                    // malformed rules are caught at template/update
                    // validation; a stray one never fails the field
                    warn!("skipping uncompilable pattern rule {pattern:?}: {e}");
                    true
                }
            },
            _ => true,
        },
        RuleKind::Min { limit } => match value {
            FieldValue::Number(n) => n >= limit,
            FieldValue::Text(s) => s.chars().count() as f64 >= *limit,
            _ => true,
        },
        RuleKind::Max { limit } => match value {
            FieldValue::Number(n) => n <= limit,
            FieldValue::Text(s) => s.chars().count() as f64 <= *limit,
            _ => true,
        },
        RuleKind::Custom { key } => custom
            .and_then(|c| c.predicates.get(key))
            .map(|predicate| predicate(value))
            .unwrap_or(true),
    }
}
