//! In-memory stand-in for a slice of the compute API.
//!
//! Serves projects (cursor-paginated), apps (merge-patch updates guarded by
//! `If-Match`) and the deprecated kubeconfig endpoint, with the service's
//! error envelope on failure.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub region: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub resource_group_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub name: String,
    pub project_id: Uuid,
    pub image_reference: String,
    pub image_port: u16,
    pub scale_min_instances: u32,
    pub scale_max_instances: u32,
    pub entity_tag: String,
}

#[derive(Deserialize)]
pub struct CreateApp {
    pub name: String,
    pub image_reference: String,
    pub image_port: Option<u16>,
    pub scale_min_instances: Option<u32>,
    pub scale_max_instances: Option<u32>,
}

#[derive(Deserialize)]
pub struct PatchApp {
    pub image_reference: Option<String>,
    pub image_port: Option<u16>,
    pub scale_min_instances: Option<u32>,
    pub scale_max_instances: Option<u32>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub start: Option<String>,
}

#[derive(Default)]
pub struct Store {
    projects: Vec<Project>,
    apps: HashMap<Uuid, Vec<App>>,
    next_tag: u64,
}

impl Store {
    fn tag(&mut self) -> String {
        self.next_tag += 1;
        self.next_tag.to_string()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let v2 = Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project).delete(delete_project))
        .route("/projects/{project_id}/apps", get(list_apps).post(create_app))
        .route(
            "/projects/{project_id}/apps/{name}",
            get(get_app).patch(update_app).delete(delete_app),
        );
    let v1 = Router::new().route("/project/{id}/config", get(get_kubeconfig));
    Router::new()
        .nest("/v2", v2)
        .nest("/api/v1", v1)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock compute service listening");
    }
    axum::serve(listener, app()).await
}

/// The service's error envelope.
pub struct ApiFailure {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{"code": self.code, "message": self.message}],
            "trace": Uuid::new_v4().simple().to_string(),
            "status_code": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

/// Slice `items` for one page. The cursor is the offset of the next item,
/// rendered as an opaque token.
fn paginate<T: Clone + Serialize>(
    items: &[T],
    query: &PageQuery,
    path: &str,
    key: &str,
) -> Result<serde_json::Value, ApiFailure> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "invalid_limit",
            format!("limit must be between 1 and {MAX_LIMIT}"),
        ));
    }
    let offset = match &query.start {
        None => 0,
        Some(token) => decode_cursor(token)
            .filter(|offset| *offset <= items.len())
            .ok_or_else(|| {
                ApiFailure::new(StatusCode::BAD_REQUEST, "invalid_start", "malformed start token")
            })?,
    };

    let page: Vec<T> = items.iter().skip(offset).take(limit).cloned().collect();
    let mut body = json!({
        "limit": limit,
        "first": {"href": format!("{path}?limit={limit}")},
        key: page,
    });
    let next_offset = offset + limit;
    if next_offset < items.len() {
        let start = encode_cursor(next_offset);
        body["next"] = json!({
            "href": format!("{path}?limit={limit}&start={start}"),
            "start": start,
        });
    }
    Ok(body)
}

fn encode_cursor(offset: usize) -> String {
    format!("o{offset:08x}")
}

fn decode_cursor(token: &str) -> Option<usize> {
    token
        .strip_prefix('o')
        .and_then(|hex| usize::from_str_radix(hex, 16).ok())
}

fn with_etag(tag: &str, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("W/\"{tag}\"")) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}

// --- projects ---

async fn list_projects(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let store = db.read().await;
    paginate(&store.projects, &query, "/v2/projects", "projects").map(Json)
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>), ApiFailure> {
    let mut store = db.write().await;
    if store.projects.iter().any(|p| p.name == input.name) {
        return Err(ApiFailure::new(
            StatusCode::CONFLICT,
            "project_name_already_exists",
            format!("project '{}' already exists", input.name),
        ));
    }
    let project = Project {
        id: Uuid::new_v4(),
        name: input.name,
        region: "au-syd".to_string(),
        status: "active".to_string(),
        resource_group_id: input.resource_group_id,
    };
    store.projects.push(project.clone());
    Ok((StatusCode::ACCEPTED, Json(project)))
}

async fn get_project(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiFailure> {
    let store = db.read().await;
    store
        .projects
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("project"))
}

async fn delete_project(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    let before = store.projects.len();
    store.projects.retain(|p| p.id != id);
    if store.projects.len() == before {
        return Err(ApiFailure::not_found("project"));
    }
    store.apps.remove(&id);
    Ok(StatusCode::ACCEPTED)
}

// --- apps ---

fn project_exists(store: &Store, project_id: Uuid) -> Result<(), ApiFailure> {
    if store.projects.iter().any(|p| p.id == project_id) {
        Ok(())
    } else {
        Err(ApiFailure::not_found("project"))
    }
}

async fn list_apps(
    State(db): State<Db>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let store = db.read().await;
    project_exists(&store, project_id)?;
    let apps = store.apps.get(&project_id).map(Vec::as_slice).unwrap_or_default();
    let path = format!("/v2/projects/{project_id}/apps");
    paginate(apps, &query, &path, "apps").map(Json)
}

async fn create_app(
    State(db): State<Db>,
    Path(project_id): Path<Uuid>,
    Json(input): Json<CreateApp>,
) -> Result<Response, ApiFailure> {
    let mut store = db.write().await;
    project_exists(&store, project_id)?;
    if store
        .apps
        .get(&project_id)
        .is_some_and(|apps| apps.iter().any(|a| a.name == input.name))
    {
        return Err(ApiFailure::new(
            StatusCode::CONFLICT,
            "app_name_already_exists",
            format!("app '{}' already exists", input.name),
        ));
    }
    let tag = store.tag();
    let app = App {
        name: input.name,
        project_id,
        image_reference: input.image_reference,
        image_port: input.image_port.unwrap_or(8080),
        scale_min_instances: input.scale_min_instances.unwrap_or(0),
        scale_max_instances: input.scale_max_instances.unwrap_or(10),
        entity_tag: tag.clone(),
    };
    store.apps.entry(project_id).or_default().push(app.clone());
    Ok(with_etag(&tag, (StatusCode::CREATED, Json(app))))
}

async fn get_app(
    State(db): State<Db>,
    Path((project_id, name)): Path<(Uuid, String)>,
) -> Result<Response, ApiFailure> {
    let store = db.read().await;
    let app = store
        .apps
        .get(&project_id)
        .and_then(|apps| apps.iter().find(|a| a.name == name))
        .cloned()
        .ok_or_else(|| ApiFailure::not_found("app"))?;
    Ok(with_etag(&app.entity_tag.clone(), Json(app)))
}

async fn update_app(
    State(db): State<Db>,
    Path((project_id, name)): Path<(Uuid, String)>,
    headers: HeaderMap,
    Json(patch): Json<PatchApp>,
) -> Result<Response, ApiFailure> {
    let if_match = headers
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiFailure::new(
                StatusCode::PRECONDITION_REQUIRED,
                "if_match_required",
                "If-Match header is required",
            )
        })?
        .to_string();

    let mut store = db.write().await;
    let tag = store.tag();
    let app = store
        .apps
        .get_mut(&project_id)
        .and_then(|apps| apps.iter_mut().find(|a| a.name == name))
        .ok_or_else(|| ApiFailure::not_found("app"))?;

    let current = format!("W/\"{}\"", app.entity_tag);
    if if_match != "*" && if_match != current {
        return Err(ApiFailure::new(
            StatusCode::PRECONDITION_FAILED,
            "entity_tag_mismatch",
            "If-Match does not match the current entity tag",
        ));
    }

    if let Some(image_reference) = patch.image_reference {
        app.image_reference = image_reference;
    }
    if let Some(image_port) = patch.image_port {
        app.image_port = image_port;
    }
    if let Some(min) = patch.scale_min_instances {
        app.scale_min_instances = min;
    }
    if let Some(max) = patch.scale_max_instances {
        app.scale_max_instances = max;
    }
    app.entity_tag = tag.clone();
    Ok(with_etag(&tag, Json(app.clone())))
}

async fn delete_app(
    State(db): State<Db>,
    Path((project_id, name)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    let apps = store
        .apps
        .get_mut(&project_id)
        .ok_or_else(|| ApiFailure::not_found("app"))?;
    let before = apps.len();
    apps.retain(|a| a.name != name);
    if apps.len() == before {
        return Err(ApiFailure::not_found("app"));
    }
    Ok(StatusCode::ACCEPTED)
}

// --- deprecated kubeconfig ---

async fn get_kubeconfig(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, ApiFailure> {
    let authorized = ["x-delegated-refresh-token", "refresh-token"]
        .iter()
        .any(|name| headers.get(*name).is_some_and(|v| !v.is_empty()));
    if !authorized {
        return Err(ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "missing_refresh_token",
            "a refresh token header is required",
        ));
    }

    let store = db.read().await;
    let project = store
        .projects
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ApiFailure::not_found("project"))?;

    let kubeconfig = format!(
        "apiVersion: v1\nkind: Config\ncurrent-context: {name}\n\
         contexts:\n- name: {name}\n  context:\n    namespace: {id}\n",
        name = project.name,
        id = project.id
    );
    Ok(([(header::CONTENT_TYPE, "text/plain")], kubeconfig).into_response())
}
