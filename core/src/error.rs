//! Error types for the compute API client.
//!
//! # Design
//! Every failure is returned to the immediate caller; this layer never
//! retries. `MissingArgument` and `InvalidHeader` are raised while building a
//! request, before anything reaches the transport. `Service` carries the
//! status code together with the service's structured error payload when the
//! body parses as one, and the raw body either way.

use std::error::Error as StdError;

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the request builder, the client and the pager.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required path parameter, header or body was absent or empty.
    #[error("{operation}: missing required argument `{argument}`")]
    MissingArgument {
        operation: &'static str,
        argument: String,
    },

    /// A header name or value contains characters that cannot be sent.
    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: &'static str },

    /// The transport failed to produce a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Service {
        status: u16,
        message: String,
        error: Option<ServiceErrorBody>,
        body: String,
    },

    /// The caller drove a component out of order, e.g. advanced an exhausted pager.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The credential provider could not produce its header.
    #[error("credential unavailable: {0}")]
    Credential(String),
}

impl ApiError {
    /// Build a `Service` error from a non-2xx status and its body.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        let error = serde_json::from_str::<ServiceErrorBody>(&body).ok();
        let message = error
            .as_ref()
            .and_then(ServiceErrorBody::first_message)
            .map(str::to_owned)
            .unwrap_or_else(|| body.clone());
        ApiError::Service {
            status,
            message,
            error,
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error reported by a `Transport` implementation.
///
/// Opaque to this crate: the message and optional source are surfaced to the
/// caller untouched.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Structured error payload returned by the service on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub errors: Vec<ServiceErrorItem>,
    #[serde(default)]
    pub trace: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ServiceErrorBody {
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.message.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceErrorItem {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub more_info: Option<String>,
}
