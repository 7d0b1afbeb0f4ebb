#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod impls;
mod processor;
mod registry;

pub mod methods;

#[cfg(feature = "service")]
mod service;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

pub use processor::Processor;
pub use registry::{Handler, Method, ParamKind, ParamSpec, Registry};

#[cfg(feature = "service")]
pub use service::Service;

pub use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    UnexpectedRequestVariant,
    JsonRpcVersionNotFound,
    InvalidJsonRpcVersion,
    ExpectedMethod,
    InvalidMethodVariant,
    UnexpectedIdVariant,
    UnexpectedParamsVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Id {
    String(String),
    Number(i64),
    Float(f64),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Array(Vec<Value>),
    Object(Map<String, Value>),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: Id,
    pub method: String,
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: Id,
    pub result: Result<Value, RpcError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    InvalidParams(Value),
    Internal(Value),
}
