//! Project and app lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the client over
//! real HTTP using ureq. Validates that request building and response parsing
//! agree with an actual server, including the deprecated kubeconfig endpoint.

mod common;

use compute_core::models::{App, AppPatch, AppPrototype, Project, ProjectPrototype};
use compute_core::{operations, ApiError, CallArgs, ClientConfig, ComputeClient, RefreshToken};

use common::{live_client, UreqTransport};

#[test]
fn project_and_app_lifecycle() {
    let client = live_client();

    // Step 1: list, should be empty.
    let mut pager = client
        .pager::<Project>(&operations::LIST_PROJECTS, CallArgs::new(), Some(10))
        .unwrap();
    assert!(pager.get_next().unwrap().is_empty(), "expected empty list");
    assert!(!pager.has_next());

    // Step 2: create a project.
    let prototype = ProjectPrototype {
        name: "integration".to_string(),
        resource_group_id: Some("rg-1".to_string()),
        tags: Vec::new(),
    };
    let args = CallArgs::new().body(&prototype).unwrap();
    let created = client
        .call::<Project>(&operations::CREATE_PROJECT, &args)
        .unwrap();
    assert_eq!(created.status, 202);
    let project = created.into_result();
    assert_eq!(project.name, "integration");
    assert_eq!(project.resource_group_id.as_deref(), Some("rg-1"));
    let project_id = project.id.to_string();

    // Step 3: get the project.
    let fetched = client
        .call::<Project>(&operations::GET_PROJECT, &CallArgs::new().path("id", &project_id))
        .unwrap()
        .into_result();
    assert_eq!(fetched, project);

    // Step 4: create an app in it.
    let app = AppPrototype {
        name: "web".to_string(),
        image_reference: "icr.io/demo/web:1".to_string(),
        scale_max_instances: Some(5),
        ..AppPrototype::default()
    };
    let args = CallArgs::new()
        .path("project_id", &project_id)
        .body(&app)
        .unwrap();
    let created = client.call::<App>(&operations::CREATE_APP, &args).unwrap();
    assert_eq!(created.status, 201);
    assert_eq!(created.result.scale_max_instances, Some(5));

    // Step 5: read it back and capture its entity tag.
    let app_args = CallArgs::new()
        .path("project_id", &project_id)
        .path("name", "web");
    let fetched = client.call::<App>(&operations::GET_APP, &app_args).unwrap();
    let etag = fetched.etag().expect("etag header").to_string();

    // Step 6: patch with the current tag; unset fields stay unchanged.
    let patch = AppPatch {
        scale_min_instances: Some(1),
        ..AppPatch::default()
    };
    let args = app_args
        .clone()
        .header("If-Match", &etag)
        .body(&patch)
        .unwrap();
    let updated = client.call::<App>(&operations::UPDATE_APP, &args).unwrap();
    assert_eq!(updated.result.scale_min_instances, Some(1));
    assert_eq!(updated.result.scale_max_instances, Some(5));
    assert_eq!(updated.result.image_reference, "icr.io/demo/web:1");
    assert_ne!(updated.etag(), Some(etag.as_str()));

    // Step 7: patching with the stale tag is refused by the service.
    let err = client
        .call::<App>(&operations::UPDATE_APP, &args)
        .unwrap_err();
    assert_eq!(err.status(), Some(412));

    // Step 8: kubeconfig with both refresh-token flavors.
    let yaml = client
        .get_kubeconfig(&project_id, &RefreshToken::delegated("delegated"))
        .unwrap();
    assert!(yaml.contains("current-context: integration"));
    let yaml = client
        .get_kubeconfig(&project_id, &RefreshToken::legacy("legacy"))
        .unwrap();
    assert!(yaml.contains(&project_id));

    // Step 9: delete the app, then the project.
    let deleted = client
        .call_empty(&operations::DELETE_APP, &app_args)
        .unwrap();
    assert_eq!(deleted.status, 202);
    let err = client.call::<App>(&operations::GET_APP, &app_args).unwrap_err();
    assert!(err.is_not_found());

    client
        .call_empty(&operations::DELETE_PROJECT, &CallArgs::new().path("id", &project_id))
        .unwrap();

    // Step 10: get after delete, structured not-found error.
    let err = client
        .call::<Project>(&operations::GET_PROJECT, &CallArgs::new().path("id", &project_id))
        .unwrap_err();
    match err {
        ApiError::Service { status, error, .. } => {
            assert_eq!(status, 404);
            let error = error.expect("structured error body");
            assert_eq!(error.errors[0].code.as_deref(), Some("not_found"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn duplicate_create_surfaces_service_error() {
    let client = live_client();
    let args = CallArgs::new()
        .body(&ProjectPrototype {
            name: "dup".to_string(),
            resource_group_id: None,
            tags: Vec::new(),
        })
        .unwrap();
    client.call::<Project>(&operations::CREATE_PROJECT, &args).unwrap();
    let err = client
        .call::<Project>(&operations::CREATE_PROJECT, &args)
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ComputeClient::new(
        ClientConfig::new(&format!("http://{addr}/v2")),
        UreqTransport::new(),
    );
    let err = client
        .call::<Project>(&operations::GET_PROJECT, &CallArgs::new().path("id", "x"))
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
