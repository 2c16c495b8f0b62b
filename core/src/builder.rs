//! Turns an `Operation` plus `CallArgs` into a ready-to-send `HttpRequest`.
//!
//! # Design
//! `RequestBuilder` holds the client configuration and the authenticator and
//! performs no I/O. Header layering, lowest precedence first:
//!
//! 1. generated defaults (`accept`, `user-agent`, `x-sdk-analytics`)
//! 2. configured default headers
//! 3. the authenticator's header
//! 4. `content-type` for operations with a body
//! 5. caller headers
//!
//! Path values are percent-encoded individually and substituted in the
//! operation's declaration order, so an encoded value can never be mistaken
//! for a later placeholder.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, warn};

use crate::args::{CallArgs, QueryValue};
use crate::auth::{Authenticator, NoAuth};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Headers, HttpRequest};
use crate::operation::{ApiVersion, ListStyle, Operation};

/// Everything outside the RFC 3986 unreserved set is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const USER_AGENT: &str = concat!("compute-core-rust/", env!("CARGO_PKG_VERSION"));

const SERVICE_NAME: &str = "compute";

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: ClientConfig,
    authenticator: Arc<dyn Authenticator>,
}

impl RequestBuilder {
    /// A builder without credentials. If the configuration carries a bearer
    /// token it is used as the authenticator.
    pub fn new(config: ClientConfig) -> Self {
        let authenticator: Arc<dyn Authenticator> = match &config.bearer_token {
            Some(token) => Arc::new(crate::auth::BearerToken::from(token.clone())),
            None => Arc::new(NoAuth),
        };
        Self {
            config,
            authenticator,
        }
    }

    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Arc::new(authenticator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build(&self, op: &Operation, args: &CallArgs) -> Result<HttpRequest, ApiError> {
        let path = resolve_path(op, args)?;
        let query = encode_query(op, args);
        let base = match op.api {
            ApiVersion::V2 => &self.config.url,
            ApiVersion::V1 => &self.config.legacy_url,
        };
        let url = if query.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}{path}?{query}")
        };

        let headers = self.headers(op, args)?;
        let body = encode_body(op, args)?;

        debug!(operation = op.name, method = %op.method, %url, "built request");
        Ok(HttpRequest {
            method: op.method,
            url,
            headers,
            body,
        })
    }

    fn headers(&self, op: &Operation, args: &CallArgs) -> Result<Headers, ApiError> {
        for param in op.header_params.iter().filter(|p| p.required) {
            let present = args
                .header_value(param.name)
                .is_some_and(|value| !value.is_empty());
            if !present {
                return Err(missing(op, param.name));
            }
        }

        let mut headers = Headers::new();
        headers.insert("accept".to_string(), op.accept.to_string());
        headers.insert("user-agent".to_string(), USER_AGENT.to_string());
        headers.insert(
            "x-sdk-analytics".to_string(),
            format!(
                "service_name={SERVICE_NAME};service_version={};operation_id={}",
                op.api.as_str(),
                op.name
            ),
        );
        for (name, value) in &self.config.headers {
            headers.insert(name.to_ascii_lowercase(), value.clone());
        }
        if let Some(header) = self.authenticator.contribute()? {
            headers.insert(header.name.to_string(), header.value);
        }
        if let Some(content_type) = op.body.content_type() {
            headers.insert("content-type".to_string(), content_type.to_string());
        }
        for (name, value) in &args.headers {
            headers.insert(name.clone(), value.clone());
        }

        for (name, value) in &headers {
            validate_header(name, value)?;
        }
        Ok(headers)
    }
}

fn missing(op: &Operation, argument: &str) -> ApiError {
    ApiError::MissingArgument {
        operation: op.name,
        argument: argument.to_string(),
    }
}

fn resolve_path(op: &Operation, args: &CallArgs) -> Result<String, ApiError> {
    for name in args.path.keys() {
        if !op.declares_path_param(name) {
            warn!(operation = op.name, %name, "ignoring undeclared path argument");
        }
    }

    let mut encoded = Vec::with_capacity(op.path_params.len());
    for name in op.path_params {
        let value = args
            .path_value(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| missing(op, name))?;
        encoded.push((*name, utf8_percent_encode(value, COMPONENT).to_string()));
    }

    // Walk the template once so substituted text is never rescanned.
    let mut resolved = String::with_capacity(op.path.len());
    let mut rest = op.path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        resolved.push_str(&rest[..start]);
        match encoded.iter().find(|(declared, _)| *declared == name) {
            Some((_, value)) => resolved.push_str(value),
            None => return Err(missing(op, name)),
        }
        rest = &rest[start + len + 1..];
    }
    resolved.push_str(rest);
    Ok(resolved)
}

fn encode_query(op: &Operation, args: &CallArgs) -> String {
    for name in args.query.keys() {
        if op.query_param(name).is_none() {
            warn!(operation = op.name, %name, "ignoring undeclared query argument");
        }
    }

    let mut pairs = Vec::new();
    for param in op.query_params {
        let Some(value) = args.query_value(param.name) else {
            continue;
        };
        let key = utf8_percent_encode(param.name, COMPONENT);
        match value {
            QueryValue::Single(value) => {
                pairs.push(format!("{key}={}", utf8_percent_encode(value, COMPONENT)));
            }
            QueryValue::List(values) if values.is_empty() => {}
            QueryValue::List(values) => match param.style {
                ListStyle::Comma => {
                    let joined = values
                        .iter()
                        .map(|v| utf8_percent_encode(v, COMPONENT).to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    pairs.push(format!("{key}={joined}"));
                }
                ListStyle::Repeat => {
                    for v in values {
                        pairs.push(format!("{key}={}", utf8_percent_encode(v, COMPONENT)));
                    }
                }
            },
        }
    }
    pairs.join("&")
}

fn encode_body(op: &Operation, args: &CallArgs) -> Result<Option<String>, ApiError> {
    if op.body.content_type().is_none() {
        if args.body.is_some() {
            warn!(operation = op.name, "ignoring body for operation without one");
        }
        return Ok(None);
    }
    let Some(body) = &args.body else {
        return Err(missing(op, "body"));
    };
    let body = match body {
        serde_json::Value::Object(members) => serde_json::Value::Object(
            members
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        serde_json::Value::Null => return Err(missing(op, "body")),
        other => other.clone(),
    };
    serde_json::to_string(&body)
        .map(Some)
        .map_err(ApiError::Serialization)
}

fn validate_header(name: &str, value: &str) -> Result<(), ApiError> {
    let valid_name = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if !valid_name {
        return Err(ApiError::InvalidHeader {
            name: name.to_string(),
            reason: "name is not a valid token",
        });
    }
    if value.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
        return Err(ApiError::InvalidHeader {
            name: name.to_string(),
            reason: "value contains a control character",
        });
    }
    Ok(())
}
