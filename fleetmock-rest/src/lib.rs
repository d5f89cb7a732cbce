//! fleetmock-rest - HTTP surface of the fleetmock device-fleet fake
//!
//! Serves the managed-API subset the UI talks to:
//! - GET /api/info (also mounted as /api/v1/config) - API flavor marker
//! - GET /api/v1/zones - zone listing
//! - GET/POST /api/v1/zones/{zone}/hosts - list and create hosts
//! - DELETE /api/v1/zones/{zone}/hosts/{host} - delete a host
//! - GET /api/v1/zones/{zone}/hosts/{host}/groups - list device groups
//! - DELETE /api/v1/zones/{zone}/hosts/{host}/groups/{group} - delete a group
//! - POST /api/v1/zones/{zone}/hosts/{host}/cvds - create a device group
//! - GET /api/reset - reload the seed dataset
//!
//! Everything else falls through to a proxy for the UI dev server, and every
//! response, API or proxied, carries permissive CORS headers.

use axum::{
    extract::{Path, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fleetmock_core::{Group, HostView, Operation, StoreError};
use fleetmock_store::StoreHandle;

pub mod proxy;

/// Value reported by the info endpoints.
const API_TYPE: &str = "cloud";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    /// Base URL of the UI dev server, always with a trailing slash.
    pub ui_origin: String,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(store: StoreHandle, ui_origin: impl Into<String>) -> Self {
        let mut ui_origin = ui_origin.into();
        if !ui_origin.ends_with('/') {
            ui_origin.push('/');
        }
        AppState {
            store,
            ui_origin,
            http: reqwest::Client::new(),
        }
    }
}

/// Create host request
#[derive(Debug, Deserialize)]
pub struct CreateHostRequest {
    pub host_instance: HostInstance,
}

#[derive(Debug, Deserialize)]
pub struct HostInstance {
    pub gcp: Value,
}

/// Create group request, posted to the cvds endpoint
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub group: Group,
}

/// Info response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Zone listing response
#[derive(Debug, Serialize)]
pub struct ZoneListResponse {
    pub items: Vec<String>,
}

/// Host listing response
#[derive(Debug, Serialize)]
pub struct HostListResponse {
    pub items: Vec<HostView>,
}

/// Group listing response
#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Build the API router with the UI proxy as its fallback
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/info", get(get_info))
        .route("/api/v1/config", get(get_info))
        .route("/api/v1/zones", get(list_zones))
        .route("/api/v1/zones/{zone}/hosts", get(list_hosts).post(create_host))
        .route("/api/v1/zones/{zone}/hosts/{host}", delete(delete_host))
        .route("/api/v1/zones/{zone}/hosts/{host}/groups", get(list_groups))
        .route(
            "/api/v1/zones/{zone}/hosts/{host}/groups/{group}",
            delete(delete_group),
        )
        .route("/api/v1/zones/{zone}/hosts/{host}/cvds", post(create_group))
        .route("/api/reset", get(reset))
        .fallback(proxy::forward_to_ui)
        .layer(axum::middleware::map_response(inject_cors_headers))
        .with_state(state)
}

/// Stamp the permissive CORS headers onto every response, proxied or not.
async fn inject_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS, PUT, DELETE"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Report which API flavor this fake stands in for
async fn get_info() -> Json<InfoResponse> {
    Json(InfoResponse {
        kind: API_TYPE.to_string(),
    })
}

/// List zone names
async fn list_zones(State(state): State<AppState>) -> Result<Json<ZoneListResponse>, ApiError> {
    let items = state.store.zones().await?;
    Ok(Json(ZoneListResponse { items }))
}

/// List hosts of a zone
async fn list_hosts(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> Result<Json<HostListResponse>, ApiError> {
    let items = state.store.hosts(&zone).await?;
    Ok(Json(HostListResponse { items }))
}

/// Create a host; the host appears in listings after the create delay
async fn create_host(
    State(state): State<AppState>,
    Path(zone): Path<String>,
    Json(req): Json<CreateHostRequest>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.store.create_host(&zone, req.host_instance.gcp).await?;
    Ok(Json(operation))
}

/// Delete a host
async fn delete_host(
    State(state): State<AppState>,
    Path((zone, host)): Path<(String, String)>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.store.delete_host(&zone, &host).await?;
    Ok(Json(operation))
}

/// List device groups of a host
async fn list_groups(
    State(state): State<AppState>,
    Path((zone, host)): Path<(String, String)>,
) -> Result<Json<GroupListResponse>, ApiError> {
    let groups = state.store.groups(&zone, &host).await?;
    Ok(Json(GroupListResponse { groups }))
}

/// Delete a device group
async fn delete_group(
    State(state): State<AppState>,
    Path((zone, host, group)): Path<(String, String, String)>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.store.delete_group(&zone, &host, &group).await?;
    Ok(Json(operation))
}

/// Create a device group from the client-supplied record
async fn create_group(
    State(state): State<AppState>,
    Path((zone, host)): Path<(String, String)>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.store.create_group(&zone, &host, req.group).await?;
    Ok(Json(operation))
}

/// Reload the seed dataset
async fn reset(State(state): State<AppState>) -> Result<(), ApiError> {
    state.store.reset().await?;
    Ok(())
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Internal(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // Missing structural references surface as a bare 404, no body.
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}
