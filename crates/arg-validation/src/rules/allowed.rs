//! Allowed-value rules
//!
//! Checks that one named keyword argument holds a value from a fixed list.
//! Comparison is exact and case-sensitive.

use tracing::debug;

use super::{ArgRule, RuleCategory};
use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};
use crate::value::ArgValue;

/// Rule restricting a keyword argument to an ordered list of allowed values
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedValuesRule {
    name: String,
    allowed: Vec<ArgValue>,
}

impl AllowedValuesRule {
    /// Create a rule for the keyword argument `name`
    ///
    /// An empty `allowed` list rejects every call that supplies the argument.
    pub fn new<I, T>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgValue>,
    {
        Self {
            name: name.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed(&self) -> &[ArgValue] {
        &self.allowed
    }

    /// Membership uses `ArgValue` equality, so values of different variants
    /// never match: `True` is not in `[1, 2, 3]` and neither is `2.0`.
    pub fn is_allowed(&self, value: &ArgValue) -> bool {
        self.allowed.contains(value)
    }

    fn allowed_list(&self) -> String {
        ArgValue::List(self.allowed.clone()).to_string()
    }
}

impl ArgRule for AllowedValuesRule {
    fn id(&self) -> &str {
        "allowed-values"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::AllowedValues
    }

    fn check(&self, signature: &Signature, args: &CallArgs) -> Result<()> {
        debug!(
            name_argument = %self.name,
            allowed_argument_values = %self.allowed_list(),
            function = signature.qualname(),
            "checking allowed values"
        );

        let value = args.get(&self.name).ok_or_else(|| ArgError::MissingArgument {
            name: self.name.clone(),
            function: signature.to_string(),
        })?;

        if !self.is_allowed(value) {
            debug!(name_argument = %self.name, value = %value, "value not allowed");
            return Err(ArgError::ValueNotAllowed {
                name: self.name.clone(),
                function: signature.to_string(),
                value: value.to_plain_string(),
                allowed: self.allowed_list(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature() -> Signature {
        Signature::new("HttpResource.handle", ["self", "method"])
    }

    fn rule() -> AllowedValuesRule {
        AllowedValuesRule::new("method", vec!["get", "post", "put", "delete"])
    }

    #[test]
    fn test_allowed_value_passes() {
        for method in ["get", "post", "put", "delete"] {
            let args = CallArgs::new().kwarg("method", method);
            assert!(rule().check(&signature(), &args).is_ok());
        }
    }

    #[test]
    fn test_case_sensitive() {
        let args = CallArgs::new().kwarg("method", "GET");
        let err = rule().check(&signature(), &args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The argument 'method' of the function HttpResource.handle('self', 'method') \
             can not be 'GET', it must be one of following: ['get', 'post', 'put', 'delete']"
        );
    }

    #[test]
    fn test_missing_argument() {
        let err = rule().check(&signature(), &CallArgs::new()).unwrap_err();
        assert!(matches!(err, ArgError::MissingArgument { ref name, .. } if name == "method"));
    }

    #[test]
    fn test_positional_value_not_consulted() {
        let args = CallArgs::new().arg("get");
        assert!(rule().check(&signature(), &args).is_err());
    }

    #[test]
    fn test_non_string_values() {
        let rule = AllowedValuesRule::new("retries", vec![1, 2, 3]);
        let sig = Signature::new("fetch", ["retries"]);
        assert!(rule.check(&sig, &CallArgs::new().kwarg("retries", 2)).is_ok());

        let err = rule
            .check(&sig, &CallArgs::new().kwarg("retries", 2.0))
            .unwrap_err();
        match err {
            ArgError::ValueNotAllowed { value, allowed, .. } => {
                assert_eq!(value, "2.0");
                assert_eq!(allowed, "[1, 2, 3]");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_membership_does_not_cross_variants() {
        let rule = AllowedValuesRule::new("retries", vec![1, 2, 3]);
        assert!(rule.is_allowed(&ArgValue::Int(1)));
        assert!(!rule.is_allowed(&ArgValue::Bool(true)));
        assert!(!rule.is_allowed(&ArgValue::Float(1.0)));
    }

    #[test]
    fn test_empty_allowed_list_rejects() {
        let rule = AllowedValuesRule::new("mode", Vec::<ArgValue>::new());
        let sig = Signature::new("run", ["mode"]);
        let err = rule.check(&sig, &CallArgs::new().kwarg("mode", "x")).unwrap_err();
        assert_eq!(err.kind(), "value_not_allowed");
    }
}
