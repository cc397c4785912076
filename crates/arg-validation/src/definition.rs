//! Guard definitions loaded from JSON, YAML or TOML
//!
//! A definition names a callable, lists its parameters and declares the type
//! annotations and allowed-value lists that guard it:
//!
//! ```yaml
//! function: HttpResource.handle
//! params: [self, method]
//! types:
//!   - name: method
//!     accepts: [str]
//! allowed:
//!   - name_argument: method
//!     allowed_argument_values: [get, post, put, delete]
//! ```
//!
//! Allowed-value entries are passed to `ValueValidator::configure`, so their
//! own fields are type checked like any other guarded call.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};
use crate::guard::{Callable, Function, Guarded, ValueValidator};
use crate::rules::type_check::{Annotations, TypeCheckRule, TypeSpec};
use crate::rules::RuleSet;
use crate::value::ArgValue;

/// Supported definition file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
    Toml,
}

impl DefinitionFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(DefinitionFormat::Json),
            "yaml" | "yml" => Ok(DefinitionFormat::Yaml),
            "toml" => Ok(DefinitionFormat::Toml),
            _ => Err(ArgError::InvalidInput(format!(
                "Unsupported file format: {}. Supported formats: json, yaml, yml, toml",
                extension
            ))),
        }
    }
}

/// Type annotation for one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    /// Type names (`str`, `int`, ...) or `absent`
    pub accepts: Vec<String>,
}

/// Declarative description of a guarded callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardDefinition {
    /// Qualified name used in rejection messages
    pub function: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    /// Keyword arguments for the value-validator factory, one map per guard
    #[serde(default)]
    pub allowed: Vec<IndexMap<String, ArgValue>>,
}

impl GuardDefinition {
    /// Load a definition, choosing the parser from the file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DefinitionFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArgError::FileError(format!(
                "Failed to read definition file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content, format)
    }

    pub fn parse(content: &str, format: DefinitionFormat) -> Result<Self> {
        let definition = match format {
            DefinitionFormat::Json => serde_json::from_str(content)?,
            DefinitionFormat::Yaml => serde_yaml::from_str(content)?,
            DefinitionFormat::Toml => toml::from_str(content)?,
        };
        Ok(definition)
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.function.clone(), self.params.iter().cloned())
    }

    /// Build the rule set: the type rule first, then allowed-value rules in order
    pub fn build(&self) -> Result<CompiledGuard> {
        let signature = self.signature();
        let mut rules = RuleSet::new();

        if !self.types.is_empty() {
            let mut builder = Annotations::builder();
            for entry in &self.types {
                builder = builder.annotate(entry.name.clone(), TypeSpec::parse(&entry.accepts)?);
            }
            rules.register(Arc::new(TypeCheckRule::new(builder.build(&signature)?)));
        }

        for entry in &self.allowed {
            let factory_args = CallArgs {
                positional: Vec::new(),
                keyword: entry.clone(),
            };
            let validator = ValueValidator::configure(&factory_args)?;
            rules.register(Arc::new(validator.rule().clone()));
        }

        debug!(
            function = %signature,
            rules = rules.rules().len(),
            "built guard definition"
        );
        Ok(CompiledGuard { signature, rules })
    }
}

/// A definition's signature together with its rules
#[derive(Debug, Clone)]
pub struct CompiledGuard {
    signature: Signature,
    rules: RuleSet,
}

impl CompiledGuard {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Attach the rules to a body with the definition's signature
    pub fn guard<F, T>(self, body: F) -> Guarded<RuleSet, Function<F>>
    where
        F: Fn(&CallArgs) -> Result<T>,
    {
        Function::new(self.signature, body).guarded_by(self.rules)
    }
}
