//! Demonstration callables used by the self-test

use crate::call::{CallArgs, Signature};
use crate::error::{ArgError, Result};
use crate::guard::{Callable, Function, Guarded, TypeValidator, ValueValidator};
use crate::rules::allowed::AllowedValuesRule;
use crate::rules::type_check::{Annotations, TypeCheckRule, TypeSpec};
use crate::value::{ArgValue, TypeTag};

/// HTTP methods accepted by `HttpResource::handle`
pub const HTTP_METHODS: [&str; 4] = ["get", "post", "put", "delete"];

type Body = fn(&CallArgs) -> Result<String>;

fn handle_body(args: &CallArgs) -> Result<String> {
    let method = args
        .get("method")
        .ok_or_else(|| ArgError::invalid_input("method was not supplied"))?;
    Ok(format!("A correct method is {}", method.to_plain_string()))
}

/// A resource whose `handle` method only accepts known HTTP methods
#[derive(Debug)]
pub struct HttpResource {
    handler: Guarded<AllowedValuesRule, Function<Body>>,
}

impl Default for HttpResource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResource {
    pub fn new() -> Self {
        let handle = Function::new(
            Signature::new("HttpResource.handle", ["self", "method"]),
            handle_body as Body,
        );
        Self {
            handler: ValueValidator::new("method", HTTP_METHODS).wrap(handle),
        }
    }

    /// Handle a request; `method` must be passed as a keyword argument
    pub fn handle(&self, args: &CallArgs) -> Result<String> {
        self.handler.call(args)
    }

    pub fn handle_method(&self, method: impl Into<ArgValue>) -> Result<String> {
        self.handle(&CallArgs::new().kwarg("method", method))
    }
}

fn configure_body(args: &CallArgs) -> Result<String> {
    let name = args.get("name").map(ArgValue::to_plain_string).unwrap_or_default();
    let options = match args.get("options") {
        Some(ArgValue::Dict(map)) => map.len(),
        _ => 0,
    };
    Ok(format!("configured {} with {} option(s)", name, options))
}

/// `configure(name: str, options: dict | none | absent)`
pub fn configure() -> Result<Guarded<TypeCheckRule, Function<Body>>> {
    TypeValidator::new(
        Annotations::builder()
            .annotate("name", TypeTag::Str)
            .annotate(
                "options",
                TypeSpec::any_of([TypeTag::Dict, TypeTag::None]).or_absent(),
            ),
    )
    .wrap(Function::new(
        Signature::new("configure", ["name", "options"]),
        configure_body as Body,
    ))
}
