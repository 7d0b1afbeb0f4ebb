use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::{fmt, iter};

use serde::Serialize;
use serde_json::{Number, Value};

use super::*;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self {
            Error::UnexpectedRequestVariant => "request must be an object",
            Error::JsonRpcVersionNotFound => "\"jsonrpc\" is missing",
            Error::InvalidJsonRpcVersion => "\"jsonrpc\" must be exactly \"2.0\"",
            Error::ExpectedMethod => "\"method\" is missing",
            Error::InvalidMethodVariant => "\"method\" must be a string",
            Error::UnexpectedIdVariant => "\"id\" must be a string, a number, or null",
            Error::UnexpectedParamsVariant => "\"params\" must be an array or an object",
        };

        f.write_str(detail)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl ErrorCode {
    pub const fn code(self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
        }
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n.into()),
            Id::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            Id::Null => Value::Null,
        }
    }
}

impl From<&Id> for Value {
    fn from(id: &Id) -> Self {
        id.clone().into()
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<f64> for Id {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl TryFrom<&Value> for Id {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(i.into()),
                None => n.as_f64().map(Id::Float).ok_or(Error::UnexpectedIdVariant),
            },
            Value::String(s) => Ok(s.clone().into()),
            Value::Null => Ok(Id::Null),
            Value::Array(_) | Value::Object(_) | Value::Bool(_) => Err(Error::UnexpectedIdVariant),
        }
    }
}

impl Id {
    /// Id to echo in the response, extracted before the envelope is
    /// validated. Illegal shapes collapse to null instead of being echoed.
    pub fn echoed(map: &Map<String, Value>) -> Self {
        map.get("id")
            .map(|value| Id::try_from(value).unwrap_or(Id::Null))
            .unwrap_or(Id::Null)
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        match params {
            Params::Array(a) => Value::Array(a),
            Params::Object(m) => Value::Object(m),
            Params::Null => Value::Null,
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(a: Vec<Value>) -> Self {
        Self::Array(a)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(m: Map<String, Value>) -> Self {
        Self::Object(m)
    }
}

impl TryFrom<&Value> for Params {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(a) => Ok(a.clone().into()),
            Value::Object(o) => Ok(o.clone().into()),

            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Err(Error::UnexpectedParamsVariant)
            }
        }
    }
}

impl TryFrom<&Value> for Request {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or(Error::UnexpectedRequestVariant)?;

        let version = map
            .get("jsonrpc")
            .ok_or(Error::JsonRpcVersionNotFound)?
            .as_str()
            .ok_or(Error::InvalidJsonRpcVersion)?;

        let method = map
            .get("method")
            .ok_or(Error::ExpectedMethod)?
            .as_str()
            .ok_or(Error::InvalidMethodVariant)?
            .to_string();

        // The id is checked before the version value so that an illegal id
        // is reported (and nulled) even when the version is wrong too.
        let id = map
            .get("id")
            .map(Id::try_from)
            .transpose()?
            .unwrap_or(Id::Null);

        if version != "2.0" {
            return Err(Error::InvalidJsonRpcVersion);
        }

        // An explicit "params": null is a scalar and therefore illegal;
        // only a genuinely absent field maps to Params::Null.
        let params = match map.get("params") {
            Some(value) => value.try_into()?,
            None => Params::Null,
        };

        Ok(Self { id, method, params })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RpcError {}

impl RpcError {
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

impl From<ErrorCode> for RpcError {
    fn from(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data: Value::Null,
        }
    }
}

impl From<&RpcError> for Value {
    fn from(re: &RpcError) -> Self {
        let map = iter::once(Some(("code".to_string(), Value::Number(re.code.into()))))
            .chain(iter::once(Some((
                "message".to_string(),
                Value::String(re.message.clone()),
            ))))
            .chain(iter::once(
                (!re.data.is_null()).then(|| ("data".to_string(), re.data.clone())),
            ))
            .flatten()
            .collect();

        Value::Object(map)
    }
}

impl From<RpcError> for Value {
    fn from(re: RpcError) -> Self {
        Value::from(&re)
    }
}

impl Serialize for RpcError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl Fault {
    pub fn invalid_params() -> Self {
        Self::InvalidParams(Value::Null)
    }

    pub fn internal() -> Self {
        Self::Internal(Value::Null)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Fault::InvalidParams(_) => ErrorCode::InvalidParams,
            Fault::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn into_detail(self) -> Value {
        match self {
            Fault::InvalidParams(detail) | Fault::Internal(detail) => detail,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().message())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Fault {}

impl From<Fault> for RpcError {
    fn from(fault: Fault) -> Self {
        let code = fault.code();

        RpcError::from(code).with_data(fault.into_detail())
    }
}

impl Response {
    pub fn success(id: Id, result: Value) -> Self {
        Self {
            id,
            result: Ok(result),
        }
    }

    pub fn failure(id: Id, error: RpcError) -> Self {
        Self {
            id,
            result: Err(error),
        }
    }
}

impl From<&Response> for Value {
    fn from(response: &Response) -> Self {
        let Response { id, result } = response;

        let result = result
            .as_ref()
            .map(|v| ("result".to_string(), v.clone()))
            .unwrap_or_else(|e| ("error".to_string(), Value::from(e)));

        let map = iter::once(("jsonrpc".to_string(), Value::String("2.0".to_string())))
            .chain(iter::once(result))
            .chain(iter::once(("id".to_string(), id.into())))
            .collect();

        Value::Object(map)
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        Value::from(&response)
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}
