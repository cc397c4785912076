//! Error types for argument validation
//!
//! Call-time rejections (type mismatch, value not allowed, missing argument)
//! and the construction and tooling errors raised while building guards or
//! loading definitions.

use thiserror::Error;

/// Main error type for argument validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgError {
    /// Runtime type of a keyword argument is not among the accepted types
    #[error("Argument '{name}' for function {function} must be type {expected}, not {actual}")]
    TypeMismatch {
        name: String,
        function: String,
        expected: String,
        actual: String,
    },

    /// Keyword argument value is not a member of the allowed list
    #[error(
        "The argument '{name}' of the function {function} can not be '{value}', it must be one of following: {allowed}"
    )]
    ValueNotAllowed {
        name: String,
        function: String,
        value: String,
        allowed: String,
    },

    /// A keyword argument the guard needs was not supplied
    #[error("Argument '{name}' for function {function} was not supplied")]
    MissingArgument { name: String, function: String },

    /// Guard definition rejected at construction time
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Definition or argument parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ArgError {
    /// Create an invalid definition error
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        ArgError::InvalidDefinition(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ArgError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        ArgError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ArgError::ParseError(msg.into())
    }

    /// Stable identifier for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ArgError::TypeMismatch { .. } => "type_mismatch",
            ArgError::ValueNotAllowed { .. } => "value_not_allowed",
            ArgError::MissingArgument { .. } => "missing_argument",
            ArgError::InvalidDefinition(_) => "invalid_definition",
            ArgError::InvalidInput(_) => "invalid_input",
            ArgError::FileError(_) => "file_error",
            ArgError::ParseError(_) => "parse_error",
            ArgError::SerializationError(_) => "serialization_error",
        }
    }

    /// Whether this error was raised by a guard at call time
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ArgError::TypeMismatch { .. }
                | ArgError::ValueNotAllowed { .. }
                | ArgError::MissingArgument { .. }
        )
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ArgError::SerializationError(_))
    }
}

impl From<std::io::Error> for ArgError {
    fn from(err: std::io::Error) -> Self {
        ArgError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for ArgError {
    fn from(err: serde_json::Error) -> Self {
        ArgError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ArgError {
    fn from(err: serde_yaml::Error) -> Self {
        ArgError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for ArgError {
    fn from(err: toml::de::Error) -> Self {
        ArgError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for argument validation
pub type Result<T> = std::result::Result<T, ArgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = ArgError::TypeMismatch {
            name: "name".to_string(),
            function: "configure('name', 'options')".to_string(),
            expected: "[<class 'str'>]".to_string(),
            actual: "<class 'int'>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Argument 'name' for function configure('name', 'options') must be type [<class 'str'>], not <class 'int'>"
        );
    }

    #[test]
    fn test_value_not_allowed_display() {
        let err = ArgError::ValueNotAllowed {
            name: "method".to_string(),
            function: "HttpResource.handle('self', 'method')".to_string(),
            value: "GET".to_string(),
            allowed: "['get', 'post']".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The argument 'method' of the function HttpResource.handle('self', 'method') can not be 'GET', it must be one of following: ['get', 'post']"
        );
    }

    #[test]
    fn test_classification() {
        let missing = ArgError::MissingArgument {
            name: "x".to_string(),
            function: "f('x',)".to_string(),
        };
        assert!(missing.is_rejection());
        assert_eq!(missing.kind(), "missing_argument");

        assert!(!ArgError::invalid_input("bad").is_rejection());
        assert!(ArgError::file_error("gone").is_user_error());
        assert!(!ArgError::SerializationError("x".to_string()).is_user_error());
    }

    #[test]
    fn test_from_json_error() {
        let err: ArgError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, ArgError::ParseError(_)));
    }
}
