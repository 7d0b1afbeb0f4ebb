use alloc::string::{String, ToString};

use serde_json::Value;
use tracing::debug;

use crate::registry::Registry;
use crate::{methods, Error, ErrorCode, Id, Request, Response, RpcError};

/// One-shot JSON-RPC 2.0 pipeline: parse, validate the envelope, dispatch.
///
/// Every failure folds into a protocol `Failure` response; nothing escapes
/// as a panic or a crate error. Invocations share no mutable state, so one
/// processor can serve any number of callers concurrently.
#[derive(Debug, Clone)]
pub struct Processor {
    registry: Registry,
    error_detail: bool,
}

impl Processor {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            error_detail: false,
        }
    }

    /// When enabled, failure responses carry an `error.data` string
    /// describing the precise violation. Off by default: the wire format
    /// then carries only `code` and `message`.
    pub fn error_detail(mut self, enabled: bool) -> Self {
        self.error_detail = enabled;
        self
    }

    /// Processes one raw request payload into one response.
    ///
    /// The id is extracted before the envelope is validated so that every
    /// envelope error still echoes a legally-shaped caller id; an illegal
    /// id shape is reported as null.
    pub fn handle(&self, raw: &[u8]) -> Response {
        let root: Value = match serde_json::from_slice(raw) {
            Ok(root) => root,
            Err(e) => {
                debug!(error = %e, "rejecting unparseable payload");

                return self.reject(Id::Null, ErrorCode::ParseError, e.to_string());
            }
        };

        // A top-level non-object (a batch array included) never reaches
        // envelope validation; it is indistinguishable from garbage here.
        let map = match root.as_object() {
            Some(map) => map,
            None => {
                debug!("rejecting non-object payload");

                return self.reject(
                    Id::Null,
                    ErrorCode::ParseError,
                    Error::UnexpectedRequestVariant.to_string(),
                );
            }
        };

        let id = Id::echoed(map);

        let request = match Request::try_from(&root) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "rejecting invalid envelope");

                return self.reject(id, ErrorCode::InvalidRequest, e.to_string());
            }
        };

        self.finish(self.registry.dispatch(&request))
    }

    /// Processes one raw request payload into one serialized response.
    pub fn handle_raw(&self, raw: &[u8]) -> String {
        Value::from(self.handle(raw)).to_string()
    }

    fn reject(&self, id: Id, code: ErrorCode, detail: String) -> Response {
        let error = if self.error_detail {
            RpcError::from(code).with_data(Value::String(detail))
        } else {
            RpcError::from(code)
        };

        Response::failure(id, error)
    }

    fn finish(&self, mut response: Response) -> Response {
        if !self.error_detail {
            if let Err(error) = &mut response.result {
                error.data = Value::Null;
            }
        }

        response
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(methods::registry())
    }
}
