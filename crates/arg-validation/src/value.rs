//! Dynamic argument values and their runtime type tags
//!
//! `ArgValue` is what a caller passes for a keyword or positional argument.
//! `TypeTag` names the runtime type of a value; type matching is exact, so a
//! `bool` never satisfies `int`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dynamically typed argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ArgValue>),
    /// Keys keep insertion order
    Dict(IndexMap<String, ArgValue>),
}

impl ArgValue {
    /// Runtime type of this value
    pub fn type_tag(&self) -> TypeTag {
        match self {
            ArgValue::None => TypeTag::None,
            ArgValue::Bool(_) => TypeTag::Bool,
            ArgValue::Int(_) => TypeTag::Int,
            ArgValue::Float(_) => TypeTag::Float,
            ArgValue::Str(_) => TypeTag::Str,
            ArgValue::List(_) => TypeTag::List,
            ArgValue::Dict(_) => TypeTag::Dict,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain text form: strings unquoted, everything else as its repr
    pub fn to_plain_string(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// Shortest round-trip form; exponent notation below 1e-4 and from 1e16 up,
/// with a signed exponent of at least two digits (`1e+16`, `1.5e-05`)
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return write!(f, "nan");
    }
    if x.is_infinite() {
        return write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = x.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return write!(f, "{:?}", x);
    }

    let scientific = format!("{:e}", x);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => write!(f, "{}", scientific),
    }
}

/// Repr form: `'get'`, `['get', 'post']`, `{'k': 1}`, `None`, `True`
impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::None => write!(f, "None"),
            ArgValue::Bool(true) => write!(f, "True"),
            ArgValue::Bool(false) => write!(f, "False"),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write_float(f, *x),
            ArgValue::Str(s) => write_quoted(f, s),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgValue::Dict(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {}", value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<i32> for ArgValue {
    fn from(i: i32) -> Self {
        ArgValue::Int(i64::from(i))
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Float(x)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(items: Vec<T>) -> Self {
        ArgValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ArgValue::None)
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ArgValue::None,
            serde_json::Value::Bool(b) => ArgValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ArgValue::Int(i),
                None => ArgValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ArgValue::Str(s),
            serde_json::Value::Array(items) => {
                ArgValue::List(items.into_iter().map(ArgValue::from).collect())
            }
            serde_json::Value::Object(map) => ArgValue::Dict(
                map.into_iter()
                    .map(|(k, v)| (k, ArgValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Runtime type descriptor of an `ArgValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Dict,
}

impl TypeTag {
    /// Short lowercase name, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::None => "none",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Dict => "dict",
        }
    }

    fn class_name(&self) -> &'static str {
        match self {
            TypeTag::None => "NoneType",
            other => other.name(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.class_name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "nonetype" | "null" => Ok(TypeTag::None),
            "bool" | "boolean" => Ok(TypeTag::Bool),
            "int" | "integer" => Ok(TypeTag::Int),
            "float" => Ok(TypeTag::Float),
            "str" | "string" => Ok(TypeTag::Str),
            "list" | "array" => Ok(TypeTag::List),
            "dict" | "object" | "map" => Ok(TypeTag::Dict),
            _ => Err(format!("Unknown type: {}", s)),
        }
    }
}
