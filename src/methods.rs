//! Built-in method set: the closed registry the processor ships with.

use alloc::vec;

use serde_json::Value;

use crate::registry::{Method, ParamKind, ParamSpec, Registry};
use crate::Fault;

pub fn noop(_args: &[Value]) -> Result<Value, Fault> {
    Ok(Value::Null)
}

pub fn add(args: &[Value]) -> Result<Value, Fault> {
    match args {
        [a, b] => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => {
                let sum = a.checked_add(b).ok_or_else(Fault::internal)?;

                Ok(Value::Number(sum.into()))
            }
            _ => Err(Fault::invalid_params()),
        },
        _ => Err(Fault::invalid_params()),
    }
}

/// Simulates a method body hitting an unexpected fault.
pub fn internal_error(_args: &[Value]) -> Result<Value, Fault> {
    Err(Fault::internal())
}

/// Simulates a method rejecting its arguments after binding.
pub fn invalid_params(_args: &[Value]) -> Result<Value, Fault> {
    Err(Fault::invalid_params())
}

pub fn registry() -> Registry {
    let mut registry = Registry::new();

    registry.register("noop", Method::new(vec![], noop));
    registry.register(
        "add",
        Method::new(
            vec![
                ParamSpec::required("a", ParamKind::Integer),
                ParamSpec::required("b", ParamKind::Integer),
            ],
            add,
        ),
    );
    registry.register("internal_error", Method::new(vec![], internal_error));
    registry.register("invalid_params", Method::new(vec![], invalid_params));

    registry
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorCode;

    #[test]
    fn registry_contains_the_builtin_set() {
        let registry = registry();

        for name in ["noop", "add", "internal_error", "invalid_params"] {
            assert!(registry.get(name).is_some(), "{name} must be registered");
        }

        assert!(registry.get("subtract").is_none());
    }

    #[test]
    fn add_sums_integers() {
        assert_eq!(add(&[json!(1), json!(2)]), Ok(json!(3)));
        assert_eq!(add(&[json!(-3), json!(2)]), Ok(json!(-1)));
    }

    #[test]
    fn add_overflow_is_an_internal_fault() {
        let fault = add(&[json!(i64::MAX), json!(1)]).expect_err("sum exceeds i64");

        assert_eq!(fault.code(), ErrorCode::InternalError);
    }

    #[test]
    fn noop_returns_null() {
        assert_eq!(noop(&[]), Ok(Value::Null));
    }
}
