//! Route table and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use dockwarden_common::types::{ContainerId, ContainerSummary};
use dockwarden_control::ControlPlane;
use dockwarden_control::plane::NewAccount;

use crate::auth::{Authenticated, bearer_token};
use crate::body::JsonBody;
use crate::dto::{
    CreateUserRequest, CreateUserResponse, LoginRequest, LoginResponse, LogsResponse,
    MessageResponse, RebuildInfo, RebuildRequest, WhoAmI,
};
use crate::error::ApiError;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    /// The control plane requests are dispatched to.
    pub plane: Arc<ControlPlane>,
}

/// Builds the route table over `plane`.
pub fn router(plane: Arc<ControlPlane>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/containers", get(list_containers))
        .route("/containers/{id}/logs", get(logs_text))
        .route("/containers/{id}/logs_json", get(logs_json))
        .route("/containers/{id}/start", get(start).post(start))
        .route("/containers/{id}/stop", get(stop).post(stop))
        .route("/containers/rebuild/{name}", get(rebuild_info).post(rebuild))
        .route("/users", post(create_user))
        .with_state(AppState { plane })
}

/// Runs a control-plane call on the blocking pool.
async fn run_blocking<T, F>(call: F) -> Result<T, ApiError>
where
    F: FnOnce() -> dockwarden_control::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

async fn health() -> &'static str {
    "ok"
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let token = run_blocking(move || plane.login(&req.username, &req.credential)).await?;
    Ok(Json(LoginResponse {
        token: token.as_str().to_owned(),
    }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    state.plane.logout(&token);
    Ok(StatusCode::NO_CONTENT)
}

async fn me(auth: Authenticated) -> Json<WhoAmI> {
    let principal = auth.principal;
    Json(WhoAmI {
        has_role: principal.role.is_some(),
        permissions: principal.effective_role(),
        is_admin: principal.is_admin,
        username: principal.username,
    })
}

async fn list_containers(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<ContainerSummary>>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let containers = run_blocking(move || plane.list_containers(&auth.principal)).await?;
    Ok(Json(containers))
}

async fn fetch_logs(state: AppState, auth: Authenticated, id: String) -> Result<String, ApiError> {
    let plane = state.plane;
    run_blocking(move || plane.container_logs(&auth.principal, &ContainerId::new(id))).await
}

async fn logs_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Authenticated,
) -> Result<String, ApiError> {
    fetch_logs(state, auth, id).await
}

async fn logs_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Authenticated,
) -> Result<Json<LogsResponse>, ApiError> {
    let logs = fetch_logs(state, auth, id).await?;
    Ok(Json(LogsResponse { logs }))
}

async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Authenticated,
) -> Result<Json<MessageResponse>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let handle =
        run_blocking(move || plane.start_container(&auth.principal, &ContainerId::new(id))).await?;
    Ok(Json(MessageResponse {
        message: format!("container {handle} started"),
    }))
}

async fn stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Authenticated,
) -> Result<Json<MessageResponse>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let handle =
        run_blocking(move || plane.stop_container(&auth.principal, &ContainerId::new(id))).await?;
    Ok(Json(MessageResponse {
        message: format!("container {handle} stopped"),
    }))
}

async fn rebuild_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
    auth: Authenticated,
) -> Result<Json<RebuildInfo>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let lookup = name.clone();
    let last = run_blocking(move || plane.last_build_path(&auth.principal, &lookup)).await?;
    Ok(Json(RebuildInfo {
        name,
        last_path: last.map(|p| p.display().to_string()).unwrap_or_default(),
    }))
}

async fn rebuild(
    State(state): State<AppState>,
    Path(name): Path<String>,
    auth: Authenticated,
    JsonBody(req): JsonBody<RebuildRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let plane = Arc::clone(&state.plane);
    let path = PathBuf::from(req.folder_path);
    let message = format!("rebuilt image {name} from {}", path.display());
    run_blocking(move || plane.rebuild(&auth.principal, &name, &path)).await?;
    Ok(Json(MessageResponse { message }))
}

async fn create_user(
    State(state): State<AppState>,
    auth: Authenticated,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let plane = Arc::clone(&state.plane);
    let username = req.username.clone();
    let account = NewAccount {
        role: req.role(),
        username: req.username,
        credential: req.credential,
    };
    let id = run_blocking(move || plane.create_user(&auth.principal, account)).await?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse { id, username })))
}
