//! Endpoint catalog for the compute API.
//!
//! One `Operation` per endpoint. List operations accept `limit` and `start`
//! and declare the key of their items array so they can be driven by a
//! `Pager`.

use crate::http::HttpMethod::{Delete, Get, Patch, Post, Put};
use crate::operation::{ApiVersion, BodyKind, HeaderParam, Operation, QueryParam};

const PAGE: &[QueryParam] = &[QueryParam::new("limit"), QueryParam::new("start")];
const IF_MATCH: &[HeaderParam] = &[HeaderParam::required("If-Match")];

const PROJECT: &[&str] = &["project_id"];
const PROJECT_NAME: &[&str] = &["project_id", "name"];
const PROJECT_ID: &[&str] = &["project_id", "id"];

// Projects

pub const LIST_PROJECTS: Operation = Operation::new("list_projects", Get, "/projects")
    .query_params(PAGE)
    .paged("projects");

pub const CREATE_PROJECT: Operation =
    Operation::new("create_project", Post, "/projects").body(BodyKind::Json);

pub const GET_PROJECT: Operation =
    Operation::new("get_project", Get, "/projects/{id}").path_params(&["id"]);

pub const DELETE_PROJECT: Operation =
    Operation::new("delete_project", Delete, "/projects/{id}").path_params(&["id"]);

pub const GET_PROJECT_EGRESS_IPS: Operation = Operation::new(
    "get_project_egress_ips",
    Get,
    "/projects/{project_id}/egress_ips",
)
.path_params(PROJECT);

pub const GET_PROJECT_STATUS_DETAILS: Operation = Operation::new(
    "get_project_status_details",
    Get,
    "/projects/{project_id}/status_details",
)
.path_params(PROJECT);

// Apps

pub const LIST_APPS: Operation = Operation::new("list_apps", Get, "/projects/{project_id}/apps")
    .path_params(PROJECT)
    .query_params(PAGE)
    .paged("apps");

pub const CREATE_APP: Operation =
    Operation::new("create_app", Post, "/projects/{project_id}/apps")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_APP: Operation =
    Operation::new("get_app", Get, "/projects/{project_id}/apps/{name}").path_params(PROJECT_NAME);

pub const DELETE_APP: Operation =
    Operation::new("delete_app", Delete, "/projects/{project_id}/apps/{name}")
        .path_params(PROJECT_NAME);

pub const UPDATE_APP: Operation =
    Operation::new("update_app", Patch, "/projects/{project_id}/apps/{name}")
        .path_params(PROJECT_NAME)
        .header_params(IF_MATCH)
        .body(BodyKind::MergePatch);

pub const LIST_APP_REVISIONS: Operation = Operation::new(
    "list_app_revisions",
    Get,
    "/projects/{project_id}/apps/{app_name}/revisions",
)
.path_params(&["project_id", "app_name"])
.query_params(PAGE)
.paged("revisions");

pub const GET_APP_REVISION: Operation = Operation::new(
    "get_app_revision",
    Get,
    "/projects/{project_id}/apps/{app_name}/revisions/{name}",
)
.path_params(&["project_id", "app_name", "name"]);

pub const DELETE_APP_REVISION: Operation = Operation::new(
    "delete_app_revision",
    Delete,
    "/projects/{project_id}/apps/{app_name}/revisions/{name}",
)
.path_params(&["project_id", "app_name", "name"]);

pub const LIST_APP_INSTANCES: Operation = Operation::new(
    "list_app_instances",
    Get,
    "/projects/{project_id}/apps/{app_name}/instances",
)
.path_params(&["project_id", "app_name"])
.query_params(PAGE)
.paged("instances");

// Jobs

pub const LIST_JOBS: Operation = Operation::new("list_jobs", Get, "/projects/{project_id}/jobs")
    .path_params(PROJECT)
    .query_params(PAGE)
    .paged("jobs");

pub const CREATE_JOB: Operation =
    Operation::new("create_job", Post, "/projects/{project_id}/jobs")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_JOB: Operation =
    Operation::new("get_job", Get, "/projects/{project_id}/jobs/{name}").path_params(PROJECT_NAME);

pub const DELETE_JOB: Operation =
    Operation::new("delete_job", Delete, "/projects/{project_id}/jobs/{name}")
        .path_params(PROJECT_NAME);

pub const UPDATE_JOB: Operation =
    Operation::new("update_job", Patch, "/projects/{project_id}/jobs/{name}")
        .path_params(PROJECT_NAME)
        .header_params(IF_MATCH)
        .body(BodyKind::MergePatch);

pub const LIST_JOB_RUNS: Operation =
    Operation::new("list_job_runs", Get, "/projects/{project_id}/job_runs")
        .path_params(PROJECT)
        .query_params(&[
            QueryParam::new("job_name"),
            QueryParam::new("limit"),
            QueryParam::new("start"),
        ])
        .paged("job_runs");

pub const CREATE_JOB_RUN: Operation =
    Operation::new("create_job_run", Post, "/projects/{project_id}/job_runs")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_JOB_RUN: Operation =
    Operation::new("get_job_run", Get, "/projects/{project_id}/job_runs/{name}")
        .path_params(PROJECT_NAME);

pub const DELETE_JOB_RUN: Operation =
    Operation::new("delete_job_run", Delete, "/projects/{project_id}/job_runs/{name}")
        .path_params(PROJECT_NAME);

// Builds

pub const LIST_BUILDS: Operation =
    Operation::new("list_builds", Get, "/projects/{project_id}/builds")
        .path_params(PROJECT)
        .query_params(PAGE)
        .paged("builds");

pub const CREATE_BUILD: Operation =
    Operation::new("create_build", Post, "/projects/{project_id}/builds")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_BUILD: Operation =
    Operation::new("get_build", Get, "/projects/{project_id}/builds/{name}")
        .path_params(PROJECT_NAME);

pub const DELETE_BUILD: Operation =
    Operation::new("delete_build", Delete, "/projects/{project_id}/builds/{name}")
        .path_params(PROJECT_NAME);

pub const UPDATE_BUILD: Operation =
    Operation::new("update_build", Patch, "/projects/{project_id}/builds/{name}")
        .path_params(PROJECT_NAME)
        .header_params(IF_MATCH)
        .body(BodyKind::MergePatch);

pub const LIST_BUILD_RUNS: Operation =
    Operation::new("list_build_runs", Get, "/projects/{project_id}/build_runs")
        .path_params(PROJECT)
        .query_params(&[
            QueryParam::new("build_name"),
            QueryParam::new("limit"),
            QueryParam::new("start"),
        ])
        .paged("build_runs");

pub const CREATE_BUILD_RUN: Operation =
    Operation::new("create_build_run", Post, "/projects/{project_id}/build_runs")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_BUILD_RUN: Operation =
    Operation::new("get_build_run", Get, "/projects/{project_id}/build_runs/{name}")
        .path_params(PROJECT_NAME);

pub const DELETE_BUILD_RUN: Operation = Operation::new(
    "delete_build_run",
    Delete,
    "/projects/{project_id}/build_runs/{name}",
)
.path_params(PROJECT_NAME);

// Bindings

pub const LIST_BINDINGS: Operation =
    Operation::new("list_bindings", Get, "/projects/{project_id}/bindings")
        .path_params(PROJECT)
        .query_params(PAGE)
        .paged("bindings");

pub const CREATE_BINDING: Operation =
    Operation::new("create_binding", Post, "/projects/{project_id}/bindings")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_BINDING: Operation =
    Operation::new("get_binding", Get, "/projects/{project_id}/bindings/{id}")
        .path_params(PROJECT_ID);

pub const DELETE_BINDING: Operation =
    Operation::new("delete_binding", Delete, "/projects/{project_id}/bindings/{id}")
        .path_params(PROJECT_ID);

// Secrets

pub const LIST_SECRETS: Operation =
    Operation::new("list_secrets", Get, "/projects/{project_id}/secrets")
        .path_params(PROJECT)
        .query_params(PAGE)
        .paged("secrets");

pub const CREATE_SECRET: Operation =
    Operation::new("create_secret", Post, "/projects/{project_id}/secrets")
        .path_params(PROJECT)
        .body(BodyKind::Json);

pub const GET_SECRET: Operation =
    Operation::new("get_secret", Get, "/projects/{project_id}/secrets/{name}")
        .path_params(PROJECT_NAME);

pub const REPLACE_SECRET: Operation =
    Operation::new("replace_secret", Put, "/projects/{project_id}/secrets/{name}")
        .path_params(PROJECT_NAME)
        .header_params(IF_MATCH)
        .body(BodyKind::Json);

pub const DELETE_SECRET: Operation =
    Operation::new("delete_secret", Delete, "/projects/{project_id}/secrets/{name}")
        .path_params(PROJECT_NAME);

// Domain mappings

pub const LIST_DOMAIN_MAPPINGS: Operation = Operation::new(
    "list_domain_mappings",
    Get,
    "/projects/{project_id}/domain_mappings",
)
.path_params(PROJECT)
.query_params(PAGE)
.paged("domain_mappings");

pub const CREATE_DOMAIN_MAPPING: Operation = Operation::new(
    "create_domain_mapping",
    Post,
    "/projects/{project_id}/domain_mappings",
)
.path_params(PROJECT)
.body(BodyKind::Json);

pub const GET_DOMAIN_MAPPING: Operation = Operation::new(
    "get_domain_mapping",
    Get,
    "/projects/{project_id}/domain_mappings/{name}",
)
.path_params(PROJECT_NAME);

pub const DELETE_DOMAIN_MAPPING: Operation = Operation::new(
    "delete_domain_mapping",
    Delete,
    "/projects/{project_id}/domain_mappings/{name}",
)
.path_params(PROJECT_NAME);

pub const UPDATE_DOMAIN_MAPPING: Operation = Operation::new(
    "update_domain_mapping",
    Patch,
    "/projects/{project_id}/domain_mappings/{name}",
)
.path_params(PROJECT_NAME)
.header_params(IF_MATCH)
.body(BodyKind::MergePatch);

// Deprecated kubeconfig retrieval

/// Kubeconfig for a project, authorized by a delegated refresh token.
#[deprecated(note = "the kubeconfig endpoint is scheduled for removal")]
pub const GET_KUBECONFIG: Operation = Operation::new("get_kubeconfig", Get, "/project/{id}/config")
    .api(ApiVersion::V1)
    .path_params(&["id"])
    .header_params(&[
        HeaderParam::required("X-Delegated-Refresh-Token"),
        HeaderParam::optional("Refresh-Token"),
    ])
    .accept("text/plain");

/// Kubeconfig for a project, authorized by a legacy refresh token.
#[deprecated(note = "use GET_KUBECONFIG with a delegated refresh token")]
pub const LIST_KUBECONFIG: Operation =
    Operation::new("list_kubeconfig", Get, "/project/{id}/config")
        .api(ApiVersion::V1)
        .path_params(&["id"])
        .header_params(&[HeaderParam::required("Refresh-Token")])
        .accept("text/plain");

/// Every operation in the catalog.
#[allow(deprecated)]
pub const ALL: &[&Operation] = &[
    &LIST_PROJECTS,
    &CREATE_PROJECT,
    &GET_PROJECT,
    &DELETE_PROJECT,
    &GET_PROJECT_EGRESS_IPS,
    &GET_PROJECT_STATUS_DETAILS,
    &LIST_APPS,
    &CREATE_APP,
    &GET_APP,
    &DELETE_APP,
    &UPDATE_APP,
    &LIST_APP_REVISIONS,
    &GET_APP_REVISION,
    &DELETE_APP_REVISION,
    &LIST_APP_INSTANCES,
    &LIST_JOBS,
    &CREATE_JOB,
    &GET_JOB,
    &DELETE_JOB,
    &UPDATE_JOB,
    &LIST_JOB_RUNS,
    &CREATE_JOB_RUN,
    &GET_JOB_RUN,
    &DELETE_JOB_RUN,
    &LIST_BUILDS,
    &CREATE_BUILD,
    &GET_BUILD,
    &DELETE_BUILD,
    &UPDATE_BUILD,
    &LIST_BUILD_RUNS,
    &CREATE_BUILD_RUN,
    &GET_BUILD_RUN,
    &DELETE_BUILD_RUN,
    &LIST_BINDINGS,
    &CREATE_BINDING,
    &GET_BINDING,
    &DELETE_BINDING,
    &LIST_SECRETS,
    &CREATE_SECRET,
    &GET_SECRET,
    &REPLACE_SECRET,
    &DELETE_SECRET,
    &LIST_DOMAIN_MAPPINGS,
    &CREATE_DOMAIN_MAPPING,
    &GET_DOMAIN_MAPPING,
    &DELETE_DOMAIN_MAPPING,
    &UPDATE_DOMAIN_MAPPING,
    &GET_KUBECONFIG,
    &LIST_KUBECONFIG,
];
