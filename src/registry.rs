use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;
use tracing::debug;

use crate::{ErrorCode, Fault, Params, Request, Response};

/// A pure method body. Receives the bound arguments in declared order,
/// one slot per declared parameter (absent optionals bind null).
pub type Handler = fn(&[Value]) -> Result<Value, Fault>;

/// Runtime kind a supplied argument must have. Supplied values are never
/// coerced; a string is not an integer even when it looks numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A number with an integral value. Fractional numbers do not qualify.
    Integer,
    Number,
    Text,
    Bool,
    Array,
    Object,
    Any,
}

impl ParamKind {
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            ParamKind::Integer => matches!(value, Value::Number(n) if n.as_i64().is_some()),
            ParamKind::Number => matches!(value, Value::Number(_)),
            ParamKind::Text => matches!(value, Value::String(_)),
            ParamKind::Bool => matches!(value, Value::Bool(_)),
            ParamKind::Array => matches!(value, Value::Array(_)),
            ParamKind::Object => matches!(value, Value::Object(_)),
            ParamKind::Any => true,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ParamKind::Integer => "an integer",
            ParamKind::Number => "a number",
            ParamKind::Text => "a string",
            ParamKind::Bool => "a boolean",
            ParamKind::Array => "an array",
            ParamKind::Object => "an object",
            ParamKind::Any => "any value",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: &'static str,
    required: bool,
    kind: ParamKind,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: true,
            kind,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            required: false,
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    params: Vec<ParamSpec>,
    handler: Handler,
}

impl Method {
    pub fn new(params: Vec<ParamSpec>, handler: Handler) -> Self {
        Self { params, handler }
    }

    /// Binds supplied params to the declared parameter list.
    ///
    /// Positional params bind by index and named params by name; extra
    /// positions and unknown names are ignored. Absent params only bind
    /// when no declared parameter is required.
    fn bind(&self, params: &Params) -> Result<Vec<Value>, Fault> {
        let mut args = Vec::with_capacity(self.params.len());

        for (index, spec) in self.params.iter().enumerate() {
            let supplied = match params {
                Params::Array(values) => values.get(index),
                Params::Object(map) => map.get(spec.name),
                Params::Null => None,
            };

            match supplied {
                Some(value) if spec.kind.admits(value) => args.push(value.clone()),
                Some(_) => {
                    return Err(Fault::InvalidParams(Value::String(format!(
                        "\"{}\" must be {}",
                        spec.name,
                        spec.kind.describe()
                    ))));
                }
                None if spec.required => {
                    return Err(Fault::InvalidParams(Value::String(format!(
                        "missing required argument \"{}\"",
                        spec.name
                    ))));
                }
                None => args.push(Value::Null),
            }
        }

        Ok(args)
    }
}

/// Name to method mapping. Populated once at startup and read-only
/// afterwards, so it can be shared across invocations without locking.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    methods: BTreeMap<String, Method>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    pub fn register<N>(&mut self, name: N, method: Method)
    where
        N: Into<String>,
    {
        self.methods.insert(name.into(), method);
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Dispatches a validated request: lookup, bind, invoke.
    pub fn dispatch(&self, request: &Request) -> Response {
        let method = match self.methods.get(&request.method) {
            Some(method) => method,
            None => {
                debug!(method = %request.method, "method not found");

                return Response::failure(request.id.clone(), ErrorCode::MethodNotFound.into());
            }
        };

        let args = match method.bind(&request.params) {
            Ok(args) => args,
            Err(fault) => {
                debug!(method = %request.method, "params failed to bind");

                return Response::failure(request.id.clone(), fault.into());
            }
        };

        match (method.handler)(&args) {
            Ok(result) => Response::success(request.id.clone(), result),
            Err(fault) => Response::failure(request.id.clone(), fault.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use serde_json::json;

    use super::*;
    use crate::{Id, Map};

    fn two_ints() -> Method {
        Method::new(
            vec![
                ParamSpec::required("a", ParamKind::Integer),
                ParamSpec::required("b", ParamKind::Integer),
            ],
            |_| Ok(Value::Null),
        )
    }

    fn named(values: &[(&str, Value)]) -> Params {
        values
            .iter()
            .cloned()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<Map<_, _>>()
            .into()
    }

    #[test]
    fn binds_by_position() {
        let args = two_ints().bind(&Params::Array(vec![json!(1), json!(2)]));

        assert_eq!(args, Ok(vec![json!(1), json!(2)]));
    }

    #[test]
    fn binds_by_name_in_declared_order() {
        let args = two_ints().bind(&named(&[("b", json!(2)), ("a", json!(1))]));

        assert_eq!(args, Ok(vec![json!(1), json!(2)]));
    }

    #[test]
    fn extra_positions_are_ignored() {
        let args = two_ints().bind(&Params::Array(vec![json!(1), json!(2), json!(9)]));

        assert_eq!(args, Ok(vec![json!(1), json!(2)]));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let args = two_ints().bind(&named(&[
            ("a", json!(1)),
            ("b", json!(2)),
            ("c", json!(9)),
        ]));

        assert_eq!(args, Ok(vec![json!(1), json!(2)]));
    }

    #[test]
    fn missing_required_position_fails() {
        let fault = two_ints()
            .bind(&Params::Array(vec![json!(1)]))
            .expect_err("one of two required arguments is missing");

        assert_eq!(fault.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn missing_required_name_fails() {
        let fault = two_ints()
            .bind(&named(&[("a", json!(1))]))
            .expect_err("required argument \"b\" is missing");

        assert_eq!(fault.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn kind_mismatch_fails_without_coercion() {
        let fault = two_ints()
            .bind(&named(&[("a", json!("1")), ("b", json!(2))]))
            .expect_err("a numeric-looking string is not an integer");

        assert_eq!(fault.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let fault = two_ints()
            .bind(&Params::Array(vec![json!(1), json!(2.5)]))
            .expect_err("fractional numbers are rejected, not truncated");

        assert_eq!(fault.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn absent_params_require_no_required_parameters() {
        let no_params = Method::new(vec![], |_| Ok(Value::Null));

        assert_eq!(no_params.bind(&Params::Null), Ok(vec![]));

        let fault = two_ints()
            .bind(&Params::Null)
            .expect_err("absent params cannot satisfy required parameters");

        assert_eq!(fault.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn absent_optional_binds_null() {
        let method = Method::new(
            vec![
                ParamSpec::required("a", ParamKind::Integer),
                ParamSpec::optional("b", ParamKind::Integer),
            ],
            |_| Ok(Value::Null),
        );

        let args = method.bind(&Params::Array(vec![json!(1)]));

        assert_eq!(args, Ok(vec![json!(1), Value::Null]));
    }

    #[test]
    fn param_kinds_admit_exact_runtime_kinds() {
        assert!(ParamKind::Integer.admits(&json!(7)));
        assert!(!ParamKind::Integer.admits(&json!(7.5)));
        assert!(!ParamKind::Integer.admits(&json!("7")));
        assert!(ParamKind::Number.admits(&json!(7.5)));
        assert!(ParamKind::Text.admits(&json!("abc")));
        assert!(!ParamKind::Text.admits(&json!(null)));
        assert!(ParamKind::Bool.admits(&json!(false)));
        assert!(ParamKind::Array.admits(&json!([])));
        assert!(ParamKind::Object.admits(&json!({})));
        assert!(ParamKind::Any.admits(&json!(null)));
    }

    #[test]
    fn dispatch_reports_unknown_methods() {
        let registry = Registry::new();
        let request = Request {
            id: Id::Number(1),
            method: "unknown".to_string(),
            params: Params::Null,
        };

        let response = registry.dispatch(&request);
        let error = response.result.expect_err("method is not registered");

        assert_eq!(error.code, ErrorCode::MethodNotFound.code());
        assert_eq!(response.id, Id::Number(1));
    }

    #[test]
    fn registry_extends_without_touching_dispatch() {
        let mut registry = Registry::new();

        registry.register(
            "subtract",
            Method::new(
                vec![
                    ParamSpec::required("minuend", ParamKind::Integer),
                    ParamSpec::required("subtrahend", ParamKind::Integer),
                ],
                |args| match (args[0].as_i64(), args[1].as_i64()) {
                    (Some(a), Some(b)) => Ok(json!(a - b)),
                    _ => Err(Fault::invalid_params()),
                },
            ),
        );

        let request = Request {
            id: Id::Number(1),
            method: "subtract".to_string(),
            params: Params::Array(vec![json!(42), json!(23)]),
        };

        assert_eq!(registry.dispatch(&request).result, Ok(json!(19)));
    }
}
