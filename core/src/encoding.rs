//! Parameter encoding onto a draft request.
//!
//! # Design
//! Query parameters are flattened with bracket notation: nested objects become
//! `key[sub]=value` and arrays become repeated `key[]=value` pairs. Keys are
//! sorted at every level so a given mapping always produces the same URL.
//! Absent and empty mappings contribute nothing: no `?` and no body.

use bytes::Bytes;
use serde_json::Value;
use tracing::trace;

use crate::descriptor::Parameters;
use crate::error::{NetworkError, Result};
use crate::http::{HttpRequest, CONTENT_TYPE};

const JSON_CONTENT_TYPE: &str = "application/json";

/// How parameters are placed on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// Query string only; body parameters are ignored.
    Url,
    /// Query string plus a JSON body.
    UrlAndJson,
}

impl ParameterEncoding {
    pub fn encode(
        self,
        request: &mut HttpRequest,
        url_params: Option<&Parameters>,
        body_params: Option<&Parameters>,
    ) -> Result<()> {
        if let Some(params) = url_params.filter(|p| !p.is_empty()) {
            let pairs = query_pairs(params);
            trace!(count = pairs.len(), "appending query parameters");
            request.url.query_pairs_mut().extend_pairs(pairs);
        }

        if self == ParameterEncoding::UrlAndJson {
            if let Some(params) = body_params.filter(|p| !p.is_empty()) {
                let body = serde_json::to_vec(params).map_err(NetworkError::parse_failed)?;
                trace!(bytes = body.len(), "encoded JSON body");
                request.body = Some(Bytes::from(body));
                if request.header(CONTENT_TYPE).is_none() {
                    request
                        .headers
                        .push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
                }
            }
        }

        Ok(())
    }
}

fn query_pairs(params: &Parameters) -> Vec<(String, String)> {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    let mut pairs = Vec::new();
    for key in keys {
        push_component(key, &params[key.as_str()], &mut pairs);
    }
    pairs
}

fn push_component(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for nested in keys {
                push_component(&format!("{key}[{nested}]"), &map[nested.as_str()], pairs);
            }
        }
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                push_component(&key, item, pairs);
            }
        }
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::Null => pairs.push((key.to_string(), String::new())),
    }
}
