//! Call arguments and callable signatures

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ArgError, Result};
use crate::value::ArgValue;

/// Declared shape of a callable: qualified name and parameter names in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    qualname: String,
    params: Vec<String>,
}

impl Signature {
    pub fn new<I, S>(qualname: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            qualname: qualname.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }
}

/// Renders as `qualname('a', 'b')`; a single parameter keeps the trailing comma
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.qualname)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ArgValue::Str(param.clone()))?;
        }
        if self.params.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Positional and keyword arguments of a single call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    #[serde(default)]
    pub positional: Vec<ArgValue>,
    /// Keyword arguments in the order they were passed
    #[serde(default)]
    pub keyword: IndexMap<String, ArgValue>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Look up a keyword argument
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.keyword.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keyword.contains_key(name)
    }

    /// Build from JSON: `kwargs` must be an object, `args` (if any) an array
    pub fn from_json(
        kwargs: serde_json::Value,
        args: Option<serde_json::Value>,
    ) -> Result<Self> {
        let keyword = match kwargs {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, ArgValue::from(v)))
                .collect(),
            other => {
                return Err(ArgError::invalid_input(format!(
                    "keyword arguments must be a JSON object, got {}",
                    other
                )))
            }
        };

        let positional = match args {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => {
                items.into_iter().map(ArgValue::from).collect()
            }
            Some(other) => {
                return Err(ArgError::invalid_input(format!(
                    "positional arguments must be a JSON array, got {}",
                    other
                )))
            }
        };

        Ok(Self { positional, keyword })
    }
}
