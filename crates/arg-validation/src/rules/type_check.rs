//! Keyword argument type rules
//!
//! Each annotated parameter declares the runtime types it accepts and whether
//! it may be left out of the call entirely. Annotations are checked against
//! the callable's signature when they are built, not at call time.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use super::{ArgRule, RuleCategory};
use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};
use crate::value::TypeTag;

/// Name accepted in textual type lists for "may be omitted"
pub const ABSENT: &str = "absent";

/// Acceptable runtime types for one parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    types: Vec<TypeTag>,
    allow_absent: bool,
}

impl TypeSpec {
    /// Accept exactly one type
    pub fn of(tag: TypeTag) -> Self {
        Self::any_of([tag])
    }

    /// Accept any of the given types; duplicates are dropped, order kept
    pub fn any_of<I: IntoIterator<Item = TypeTag>>(tags: I) -> Self {
        let mut types = Vec::new();
        for tag in tags {
            if !types.contains(&tag) {
                types.push(tag);
            }
        }
        Self {
            types,
            allow_absent: false,
        }
    }

    /// Accept nothing but absence
    pub fn absent_only() -> Self {
        Self {
            types: Vec::new(),
            allow_absent: true,
        }
    }

    /// Also allow the parameter to be omitted from the call
    pub fn or_absent(mut self) -> Self {
        self.allow_absent = true;
        self
    }

    /// Parse a list of type names, where `absent` (or `undefined`) allows omission
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = Vec::new();
        let mut allow_absent = false;
        for name in names {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case(ABSENT) || name.eq_ignore_ascii_case("undefined") {
                allow_absent = true;
            } else {
                tags.push(name.parse::<TypeTag>().map_err(ArgError::invalid_definition)?);
            }
        }
        let spec = Self::any_of(tags);
        Ok(if allow_absent { spec.or_absent() } else { spec })
    }

    pub fn types(&self) -> &[TypeTag] {
        &self.types
    }

    pub fn allow_absent(&self) -> bool {
        self.allow_absent
    }

    pub fn accepts(&self, tag: TypeTag) -> bool {
        self.types.contains(&tag)
    }

    fn is_empty(&self) -> bool {
        self.types.is_empty() && !self.allow_absent
    }
}

impl From<TypeTag> for TypeSpec {
    fn from(tag: TypeTag) -> Self {
        TypeSpec::of(tag)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tag) in self.types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tag)?;
        }
        if self.allow_absent {
            if !self.types.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "<{}>", ABSENT)?;
        }
        write!(f, "]")
    }
}

/// Builder for `Annotations`
#[derive(Debug, Clone, Default)]
pub struct AnnotationsBuilder {
    entries: Vec<(String, TypeSpec)>,
}

impl AnnotationsBuilder {
    /// Annotate a parameter
    pub fn annotate(mut self, name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        self.entries.push((name.into(), spec.into()));
        self
    }

    /// Validate against the callable's signature
    pub fn build(self, signature: &Signature) -> Result<Annotations> {
        let mut seen = HashSet::new();
        for (name, spec) in &self.entries {
            if !seen.insert(name.as_str()) {
                return Err(ArgError::invalid_definition(format!(
                    "parameter '{}' of {} is annotated more than once",
                    name, signature
                )));
            }
            if !signature.has_param(name) {
                return Err(ArgError::invalid_definition(format!(
                    "annotated parameter '{}' is not a parameter of {}",
                    name, signature
                )));
            }
            if spec.is_empty() {
                return Err(ArgError::invalid_definition(format!(
                    "parameter '{}' of {} accepts no types",
                    name, signature
                )));
            }
        }
        Ok(Annotations {
            entries: self.entries,
        })
    }
}

/// Validated mapping of parameter name to accepted types, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotations {
    entries: Vec<(String, TypeSpec)>,
}

impl Annotations {
    pub fn builder() -> AnnotationsBuilder {
        AnnotationsBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeSpec)> {
        self.entries.iter().map(|(n, spec)| (n.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rule checking keyword argument types against annotations
#[derive(Debug, Clone)]
pub struct TypeCheckRule {
    annotations: Annotations,
}

impl TypeCheckRule {
    pub fn new(annotations: Annotations) -> Self {
        Self { annotations }
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl ArgRule for TypeCheckRule {
    fn id(&self) -> &str {
        "type-check"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Type
    }

    fn check(&self, signature: &Signature, args: &CallArgs) -> Result<()> {
        for (name, spec) in self.annotations.iter() {
            let value = match args.get(name) {
                Some(value) => value,
                None if spec.allow_absent() => {
                    trace!(param = name, function = signature.qualname(), "absent, skipped");
                    continue;
                }
                None => {
                    debug!(param = name, function = signature.qualname(), "missing argument");
                    return Err(ArgError::MissingArgument {
                        name: name.to_string(),
                        function: signature.to_string(),
                    });
                }
            };

            let actual = value.type_tag();
            if !spec.accepts(actual) {
                debug!(
                    param = name,
                    function = signature.qualname(),
                    expected = %spec,
                    actual = %actual,
                    "type mismatch"
                );
                return Err(ArgError::TypeMismatch {
                    name: name.to_string(),
                    function: signature.to_string(),
                    expected: spec.to_string(),
                    actual: actual.to_string(),
                });
            }
            trace!(param = name, function = signature.qualname(), "type accepted");
        }
        Ok(())
    }
}
