//! Successful responses returned by the dispatcher.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::descriptor::{Parameters, RequestDescriptor};
use crate::error::{NetworkError, Result};

/// Body of a request that completed with status 200, together with the
/// descriptor that produced it.
#[derive(Clone)]
pub struct Response {
    data: Option<Bytes>,
    descriptor: Option<Arc<dyn RequestDescriptor>>,
}

impl Response {
    pub fn new(data: Option<Bytes>, descriptor: Option<Arc<dyn RequestDescriptor>>) -> Self {
        Self { data, descriptor }
    }

    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    pub fn descriptor(&self) -> Option<&dyn RequestDescriptor> {
        self.descriptor.as_deref()
    }

    /// Parse the body as a JSON object.
    ///
    /// Parsed on every call. Returns `None` when there is no body, the body is
    /// not JSON, or the top-level value is not an object.
    pub fn json(&self) -> Option<Parameters> {
        let data = self.data.as_ref()?;
        match serde_json::from_slice(data) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Decode the body into `T`.
    ///
    /// `ParseFailed` when the body is missing or not JSON, `WrongStructure`
    /// when it is JSON of the wrong shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| NetworkError::parse_failed("response has no body"))?;
        let value: Value = serde_json::from_slice(data).map_err(NetworkError::parse_failed)?;
        serde_json::from_value(value).map_err(|e| NetworkError::WrongStructure {
            detail: e.to_string(),
        })
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("bytes", &self.data.as_ref().map(Bytes::len))
            .field(
                "request",
                &self
                    .descriptor
                    .as_ref()
                    .map(|d| format!("{} {}", d.method(), d.path())),
            )
            .finish()
    }
}
