//! Synchronous API client core for the compute service.
//!
//! # Overview
//! Builds `HttpRequest` values from static endpoint descriptors and interprets
//! `HttpResponse` values. The network round-trip is delegated to a
//! caller-supplied `Transport` (host-does-IO pattern), so the core is
//! deterministic and testable without a live service.
//!
//! # Design
//! - Each endpoint is an `Operation` constant in `operations`; one generic
//!   `RequestBuilder` applies the wire rules (path escaping, query encoding,
//!   header layering, body pruning) to all of them.
//! - `Pager` follows the service's opaque `start` cursor over list endpoints.
//! - Credentials are header contributors (`Authenticator`); token acquisition
//!   and refresh happen outside this crate.
//! - DTOs in `models` are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod args;
pub mod auth;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod operation;
pub mod operations;
pub mod pager;

pub use args::{CallArgs, QueryValue};
pub use auth::{Authenticator, BearerToken, NoAuth, RefreshToken};
pub use builder::RequestBuilder;
pub use client::{ApiResponse, ComputeClient};
pub use config::ClientConfig;
pub use error::{ApiError, ServiceErrorBody, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use operation::{ApiVersion, BodyKind, HeaderParam, ListStyle, Operation, QueryParam};
pub use pager::{Page, Pager, PagerState};
