//! Synchronous client driving a caller-supplied transport.
//!
//! # Design
//! `ComputeClient` pairs a `RequestBuilder` with a `Transport`. It holds no
//! mutable state: every call builds a request, sends it, and interprets the
//! response. Non-2xx statuses become `ApiError::Service`; nothing is retried.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::args::CallArgs;
use crate::auth::{Authenticator, RefreshToken};
use crate::builder::RequestBuilder;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Headers, HttpRequest, HttpResponse, Transport};
use crate::operation::Operation;
use crate::operations;
use crate::pager::{Page, Pager};

/// Typed response: status, headers and the parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<R> {
    pub status: u16,
    pub headers: Headers,
    pub result: R,
}

impl<R> ApiResponse<R> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `ETag` header, to be echoed as `If-Match` on updates.
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    pub fn into_result(self) -> R {
        self.result
    }
}

#[derive(Debug, Clone)]
pub struct ComputeClient<T> {
    builder: RequestBuilder,
    transport: T,
}

impl<T: Transport> ComputeClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            builder: RequestBuilder::new(config),
            transport,
        }
    }

    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.builder = self.builder.with_authenticator(authenticator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        self.builder.config()
    }

    pub fn build(&self, op: &Operation, args: &CallArgs) -> Result<HttpRequest, ApiError> {
        self.builder.build(op, args)
    }

    /// Send one operation and return the raw response if it is a 2xx.
    pub fn execute(&self, op: &Operation, args: &CallArgs) -> Result<HttpResponse, ApiError> {
        let request = self.builder.build(op, args)?;
        let response = self.transport.send(&request)?;
        debug!(operation = op.name, status = response.status, "received response");
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, response.body));
        }
        Ok(response)
    }

    pub fn call<R: DeserializeOwned>(
        &self,
        op: &Operation,
        args: &CallArgs,
    ) -> Result<ApiResponse<R>, ApiError> {
        let response = self.execute(op, args)?;
        let result = serde_json::from_str(&response.body).map_err(ApiError::Deserialization)?;
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            result,
        })
    }

    /// For operations that answer with an empty body (202/204 deletes).
    pub fn call_empty(&self, op: &Operation, args: &CallArgs) -> Result<ApiResponse<()>, ApiError> {
        let response = self.execute(op, args)?;
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            result: (),
        })
    }

    pub fn call_text(
        &self,
        op: &Operation,
        args: &CallArgs,
    ) -> Result<ApiResponse<String>, ApiError> {
        let response = self.execute(op, args)?;
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            result: response.body,
        })
    }

    /// A pager over a list operation. `limit` overrides any `limit` already
    /// in `args` and is sent unchanged with every page request; `start` is
    /// managed by the pager.
    pub fn pager<'a, R: DeserializeOwned>(
        &'a self,
        op: &'a Operation,
        args: CallArgs,
        limit: Option<u32>,
    ) -> Result<Pager<R, impl FnMut(Option<&str>) -> Result<Page<R>, ApiError> + 'a>, ApiError>
    {
        let Some(paging) = op.paging else {
            return Err(ApiError::IllegalState("operation is not a paginated list"));
        };
        let mut args = args;
        if let Some(limit) = limit {
            args.set_query("limit", Some(limit.to_string()));
        }
        args.set_query("start", None);

        Ok(Pager::new(move |cursor: Option<&str>| {
            args.set_query("start", cursor.map(str::to_string));
            let response = self.execute(op, &args)?;
            Page::from_response(&response, paging.items_key)
        }))
    }

    /// Fetch a project's kubeconfig from the deprecated endpoint.
    ///
    /// Either refresh-token flavor is accepted; each is sent under its own
    /// header and routed to the operation that expects it.
    #[allow(deprecated)]
    pub fn get_kubeconfig(&self, id: &str, token: &RefreshToken) -> Result<String, ApiError> {
        let op = match token {
            RefreshToken::Legacy(_) => &operations::LIST_KUBECONFIG,
            RefreshToken::Delegated(_) => &operations::GET_KUBECONFIG,
        };
        let mut args = CallArgs::new().path("id", id);
        if let Some(header) = token.contribute()? {
            args = args.header(header.name, header.value);
        }
        Ok(self.call_text(op, &args)?.result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpMethod;
    use crate::models::{AppPatch, Project};

    /// Replays canned responses and records the requests it was given.
    #[derive(Default)]
    struct Scripted {
        responses: RefCell<Vec<Result<HttpResponse, TransportError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            let mut headers = Headers::new();
            headers.insert("etag".to_string(), "W/\"7\"".to_string());
            self.responses.borrow_mut().push(Ok(HttpResponse {
                status,
                headers,
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.responses
                .borrow_mut()
                .push(Err(TransportError::new(message)));
            self
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            let mut responses = self.responses.borrow_mut();
            assert!(!responses.is_empty(), "unexpected request {request:?}");
            responses.remove(0)
        }
    }

    fn client(transport: Scripted) -> ComputeClient<Scripted> {
        ComputeClient::new(ClientConfig::new("http://svc/v2"), transport)
    }

    const PROJECT: &str = r#"{"id":"15314cc3-85b4-4338-903f-c28cdee6d005","name":"demo"}"#;

    #[test]
    fn call_parses_typed_result_and_headers() {
        let client = client(Scripted::default().reply(200, PROJECT));
        let args = CallArgs::new().path("id", "15314cc3-85b4-4338-903f-c28cdee6d005");
        let response: ApiResponse<Project> = client.call(&operations::GET_PROJECT, &args).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.etag(), Some("W/\"7\""));
        assert_eq!(response.result.name, "demo");

        let sent = &client.transport.requests.borrow()[0];
        assert_eq!(
            sent.url,
            "http://svc/v2/projects/15314cc3-85b4-4338-903f-c28cdee6d005"
        );
    }

    #[test]
    fn missing_argument_never_reaches_transport() {
        let client = client(Scripted::default());
        let err = client
            .call::<Project>(&operations::GET_PROJECT, &CallArgs::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument { .. }));
        assert!(client.transport.requests.borrow().is_empty());
    }

    #[test]
    fn non_success_status_becomes_service_error() {
        let body = r#"{"errors":[{"code":"not_found","message":"gone"}],"status_code":404}"#;
        let client = client(Scripted::default().reply(404, body));
        let err = client
            .call::<Project>(&operations::GET_PROJECT, &CallArgs::new().path("id", "x"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: gone");
    }

    #[test]
    fn transport_error_is_surfaced_unchanged() {
        let client = client(Scripted::default().fail("timed out"));
        let err = client
            .call_empty(&operations::DELETE_PROJECT, &CallArgs::new().path("id", "x"))
            .unwrap_err();
        match err {
            ApiError::Transport(inner) => assert_eq!(inner.message(), "timed out"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_json_is_a_deserialization_error() {
        let client = client(Scripted::default().reply(200, "not json"));
        let err = client
            .call::<Project>(&operations::GET_PROJECT, &CallArgs::new().path("id", "x"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn update_sends_merge_patch_with_if_match() {
        let app = r#"{"name":"web","image_reference":"icr.io/web:2"}"#;
        let client = client(Scripted::default().reply(200, app));
        let patch = AppPatch {
            image_reference: Some("icr.io/web:2".to_string()),
            ..AppPatch::default()
        };
        let args = CallArgs::new()
            .path("project_id", "p")
            .path("name", "web")
            .header("If-Match", "W/\"7\"")
            .body(&patch)
            .unwrap();
        client
            .call::<serde_json::Value>(&operations::UPDATE_APP, &args)
            .unwrap();

        let sent = &client.transport.requests.borrow()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.header("if-match"), Some("W/\"7\""));
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"image_reference": "icr.io/web:2"}));
    }

    #[test]
    fn pager_resubmits_limit_and_forwards_cursor() {
        let client = client(
            Scripted::default()
                .reply(200, r#"{"limit":1,"projects":[1],"next":{"href":"x","start":"tok/1"}}"#)
                .reply(200, r#"{"limit":1,"projects":[2]}"#),
        );
        let mut pager = client
            .pager::<u32>(&operations::LIST_PROJECTS, CallArgs::new(), Some(1))
            .unwrap();
        assert_eq!(pager.get_all().unwrap(), vec![1, 2]);

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].url, "http://svc/v2/projects?limit=1");
        assert_eq!(requests[1].url, "http://svc/v2/projects?limit=1&start=tok%2F1");
    }

    #[test]
    fn pager_keeps_caller_limit_when_none_is_given() {
        let client = client(
            Scripted::default()
                .reply(200, r#"{"limit":5,"projects":[1],"next":{"href":"x","start":"c2"}}"#)
                .reply(200, r#"{"limit":5,"projects":[2]}"#),
        );
        let args = CallArgs::new().query("limit", 5);
        let mut pager = client
            .pager::<u32>(&operations::LIST_PROJECTS, args, None)
            .unwrap();
        assert_eq!(pager.get_all().unwrap(), vec![1, 2]);

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].url, "http://svc/v2/projects?limit=5");
        assert_eq!(requests[1].url, "http://svc/v2/projects?limit=5&start=c2");
    }

    #[test]
    fn pager_limit_overrides_caller_limit() {
        let client = client(Scripted::default().reply(200, r#"{"limit":2,"projects":[]}"#));
        let args = CallArgs::new().query("limit", 5);
        let mut pager = client
            .pager::<u32>(&operations::LIST_PROJECTS, args, Some(2))
            .unwrap();
        assert!(pager.get_next().unwrap().is_empty());
        assert_eq!(
            client.transport.requests.borrow()[0].url,
            "http://svc/v2/projects?limit=2"
        );
    }

    #[test]
    fn pager_requires_a_paged_operation() {
        let client = client(Scripted::default());
        let err = client
            .pager::<Project>(&operations::GET_PROJECT, CallArgs::new(), None)
            .unwrap_err();
        assert!(matches!(err, ApiError::IllegalState(_)));
    }

    #[test]
    fn kubeconfig_routes_each_token_flavor() {
        let client = client(
            Scripted::default()
                .reply(200, "apiVersion: v1\n")
                .reply(200, "apiVersion: v1\n"),
        );
        let yaml = client
            .get_kubeconfig("p1", &RefreshToken::delegated("abc"))
            .unwrap();
        assert_eq!(yaml, "apiVersion: v1\n");
        client
            .get_kubeconfig("p1", &RefreshToken::legacy("old"))
            .unwrap();

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].header("x-delegated-refresh-token"), Some("abc"));
        assert_eq!(requests[0].header("refresh-token"), None);
        assert_eq!(requests[0].header("accept"), Some("text/plain"));
        assert_eq!(requests[1].header("refresh-token"), Some("old"));
        assert!(requests[1].url.ends_with("/api/v1/project/p1/config"));
    }
}
