//! Static descriptions of REST endpoints.
//!
//! An `Operation` captures the whole wire shape of one endpoint: method, path
//! template, declared path/query/header parameters and the kind of body it
//! takes. Descriptors are `const` values (see `crate::operations`), so the
//! encoding rules live in one builder instead of one method per endpoint.

use crate::http::HttpMethod;

/// Which API base URL an operation is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Current API, resolved against `ClientConfig::url`.
    V2,
    /// Deprecated API, resolved against `ClientConfig::legacy_url`.
    V1,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V1 => "v1",
        }
    }
}

/// How a list-valued query parameter goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `key=a,b,c`
    Comma,
    /// `key=a&key=b&key=c`
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParam {
    pub name: &'static str,
    pub style: ListStyle,
}

impl QueryParam {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            style: ListStyle::Comma,
        }
    }

    pub const fn repeated(name: &'static str) -> Self {
        Self {
            name,
            style: ListStyle::Repeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderParam {
    pub name: &'static str,
    pub required: bool,
}

impl HeaderParam {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Request body accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    /// Required JSON body (`application/json`).
    Json,
    /// Required JSON merge patch (`application/merge-patch+json`); absent
    /// members mean "leave unchanged".
    MergePatch,
}

impl BodyKind {
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            BodyKind::None => None,
            BodyKind::Json => Some("application/json"),
            BodyKind::MergePatch => Some("application/merge-patch+json"),
        }
    }
}

/// Envelope layout of a cursor-paginated list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Key of the items array in the response body.
    pub items_key: &'static str,
}

/// Immutable definition of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation id, also reported in the analytics header.
    pub name: &'static str,
    pub api: ApiVersion,
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    /// Required path parameters, in substitution order.
    pub path_params: &'static [&'static str],
    pub query_params: &'static [QueryParam],
    pub header_params: &'static [HeaderParam],
    pub body: BodyKind,
    pub accept: &'static str,
    pub paging: Option<Paging>,
}

impl Operation {
    pub const fn new(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            name,
            api: ApiVersion::V2,
            method,
            path,
            path_params: &[],
            query_params: &[],
            header_params: &[],
            body: BodyKind::None,
            accept: "application/json",
            paging: None,
        }
    }

    pub const fn api(mut self, api: ApiVersion) -> Self {
        self.api = api;
        self
    }

    pub const fn path_params(mut self, params: &'static [&'static str]) -> Self {
        self.path_params = params;
        self
    }

    pub const fn query_params(mut self, params: &'static [QueryParam]) -> Self {
        self.query_params = params;
        self
    }

    pub const fn header_params(mut self, params: &'static [HeaderParam]) -> Self {
        self.header_params = params;
        self
    }

    pub const fn body(mut self, body: BodyKind) -> Self {
        self.body = body;
        self
    }

    pub const fn accept(mut self, accept: &'static str) -> Self {
        self.accept = accept;
        self
    }

    pub const fn paged(mut self, items_key: &'static str) -> Self {
        self.paging = Some(Paging { items_key });
        self
    }

    pub fn query_param(&self, name: &str) -> Option<&QueryParam> {
        self.query_params.iter().find(|p| p.name == name)
    }

    pub fn declares_path_param(&self, name: &str) -> bool {
        self.path_params.contains(&name)
    }
}
