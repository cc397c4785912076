//! Rule framework for argument validation
//!
//! A rule inspects the arguments of one call against the callee's signature
//! and either accepts them or rejects the call with an `ArgError`. Rules are
//! pure: they never run the callee and keep no state between calls.

pub mod allowed;
pub mod type_check;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};

/// Categories of argument rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Keyword argument runtime types
    Type,
    /// Keyword argument membership in an allowed list
    AllowedValues,
    /// Several rules applied in order
    Composite,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Type => write!(f, "type"),
            RuleCategory::AllowedValues => write!(f, "allowed_values"),
            RuleCategory::Composite => write!(f, "composite"),
        }
    }
}

/// Trait for implementing argument rules
pub trait ArgRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Category this rule belongs to
    fn category(&self) -> RuleCategory;

    /// Check the arguments of a call to the callable described by `signature`
    fn check(&self, signature: &Signature, args: &CallArgs) -> Result<()>;
}

/// A rejected call and the rule that rejected it
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub rule: String,
    pub category: RuleCategory,
    pub error: ArgError,
}

/// An ordered collection of rules; the first rejection wins
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn ArgRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; rules are checked in registration order
    pub fn register(&mut self, rule: Arc<dyn ArgRule>) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: impl ArgRule + 'static) -> Self {
        self.register(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn ArgRule>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check each rule in order, reporting the first one that rejects
    pub fn evaluate(
        &self,
        signature: &Signature,
        args: &CallArgs,
    ) -> std::result::Result<(), Rejection> {
        for rule in &self.rules {
            if let Err(error) = rule.check(signature, args) {
                debug!(
                    rule = rule.id(),
                    category = %rule.category(),
                    kind = error.kind(),
                    function = signature.qualname(),
                    "rule rejected call"
                );
                return Err(Rejection {
                    rule: rule.id().to_string(),
                    category: rule.category(),
                    error,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.id()))
            .finish()
    }
}

impl ArgRule for RuleSet {
    fn id(&self) -> &str {
        "rule-set"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Composite
    }

    fn check(&self, signature: &Signature, args: &CallArgs) -> Result<()> {
        self.evaluate(signature, args).map_err(|rejection| rejection.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::allowed::AllowedValuesRule;
    use crate::rules::type_check::{Annotations, TypeCheckRule, TypeSpec};
    use crate::value::TypeTag;

    fn signature() -> Signature {
        Signature::new("handle", ["method"])
    }

    #[test]
    fn test_empty_rule_set_accepts_anything() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert!(rules.check(&signature(), &CallArgs::new()).is_ok());
    }

    #[test]
    fn test_rule_set_reports_first_rejection() {
        let annotations = Annotations::builder()
            .annotate("method", TypeSpec::of(TypeTag::Str))
            .build(&signature())
            .unwrap();
        let rules = RuleSet::new()
            .with_rule(TypeCheckRule::new(annotations))
            .with_rule(AllowedValuesRule::new("method", vec!["get"]));

        let wrong_type = CallArgs::new().kwarg("method", 1);
        assert!(matches!(
            rules.check(&signature(), &wrong_type),
            Err(ArgError::TypeMismatch { .. })
        ));

        let wrong_value = CallArgs::new().kwarg("method", "put");
        assert!(matches!(
            rules.check(&signature(), &wrong_value),
            Err(ArgError::ValueNotAllowed { .. })
        ));

        assert_eq!(format!("{:?}", rules), "[\"type-check\", \"allowed-values\"]");
    }

    #[test]
    fn test_evaluate_names_rejecting_rule() {
        let annotations = Annotations::builder()
            .annotate("method", TypeSpec::of(TypeTag::Str))
            .build(&signature())
            .unwrap();
        let rules = RuleSet::new()
            .with_rule(TypeCheckRule::new(annotations))
            .with_rule(AllowedValuesRule::new("method", vec!["get"]));

        let rejection = rules
            .evaluate(&signature(), &CallArgs::new().kwarg("method", 1))
            .unwrap_err();
        assert_eq!(rejection.rule, "type-check");
        assert_eq!(rejection.category, RuleCategory::Type);

        let rejection = rules
            .evaluate(&signature(), &CallArgs::new().kwarg("method", "put"))
            .unwrap_err();
        assert_eq!(rejection.rule, "allowed-values");
        assert_eq!(rejection.category, RuleCategory::AllowedValues);
        assert_eq!(rejection.error.kind(), "value_not_allowed");

        assert!(rules
            .evaluate(&signature(), &CallArgs::new().kwarg("method", "get"))
            .is_ok());
        assert_eq!(rules.category(), RuleCategory::Composite);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(RuleCategory::Type.to_string(), "type");
        assert_eq!(RuleCategory::AllowedValues.to_string(), "allowed_values");
        assert_eq!(RuleCategory::Composite.to_string(), "composite");
    }
}
