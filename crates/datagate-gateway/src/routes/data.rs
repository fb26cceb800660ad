//! The generic data endpoints.
//!
//! Every route under `/data/{dataType}/...` is dispatched the same way:
//! resolve the external type name through the catalog, bind a repository for
//! the request, validate parameters, execute, shape the response. Structural
//! errors are rejected with a 400/404 before any store call; store-level
//! failures come back as a success-status body carrying an error message so
//! UI layers can render them inline.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use datagate_core::{
    DynRepository, Error as CoreError, PageQuery, Registration, RelationshipManager,
};

use crate::error::AppError;
use crate::AppState;

/// Generic data routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/data/GetTypes", get(get_types))
        .route("/data/GetChildTypes", get(get_child_types))
        .route("/data/:data_type/Add", post(add))
        .route("/data/:data_type/AddChild/:id/:child_prop", post(add_child))
        .route("/data/:data_type/Find/:id", get(find))
        .route("/data/:data_type/GetAll", get(get_all))
        .route(
            "/data/:data_type/GetFieldDefinitions",
            get(get_field_definitions),
        )
        .route("/data/:data_type/GetPage", get(get_page))
        .route("/data/:data_type/GetTotal", get(get_total))
        .route("/data/:data_type/Remove/:id", post(remove))
        .route(
            "/data/:data_type/RemoveChild/:id/:child_prop/:child_id",
            post(remove_child),
        )
        .route("/data/:data_type/RemoveRange", post(remove_range))
        .route("/data/:data_type/Update", post(update))
}

/// Resolve the external type name or reject the request.
fn resolve_type<'a>(state: &'a AppState, data_type: &str) -> Result<&'a Registration, AppError> {
    state
        .catalog
        .resolve(data_type)
        .ok_or_else(|| AppError::BadRequest(format!("unknown data type {data_type:?}")))
}

/// Bind a repository for this request.
fn repository(state: &AppState, data_type: &str) -> Result<Box<dyn DynRepository>, AppError> {
    resolve_type(state, data_type)?
        .repository(&state.store)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Parse a UUID path parameter or reject the request.
fn parse_id(name: &str, value: &str) -> Result<Uuid, AppError> {
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{name} must not be empty")));
    }
    Uuid::parse_str(value)
        .map_err(|_| AppError::BadRequest(format!("{name} is not a valid identifier")))
}

/// Shape a store-level failure as an inline error body.
fn inline_error(message: &str) -> Response {
    Json(json!({ "error": message })).into_response()
}

async fn add(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    match repo.add(payload) {
        Ok(row) => Ok(Json(row).into_response()),
        Err(CoreError::Validation(msg)) => Err(AppError::BadRequest(msg)),
        Err(e) => {
            warn!(%data_type, error = %e, "add failed");
            Ok(inline_error("Item could not be saved."))
        }
    }
}

async fn add_child(
    State(state): State<AppState>,
    Path((data_type, id, child_prop)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    resolve_type(&state, &data_type)?;
    let parent_id = parse_id("id", &id)?;
    if child_prop.is_empty() {
        return Err(AppError::BadRequest("childProp must not be empty".into()));
    }

    let manager = RelationshipManager::new(&state.catalog, &state.store);
    match manager.add_child(&data_type, parent_id, &child_prop) {
        Ok(parent) => Ok(Json(parent).into_response()),
        Err(CoreError::NotFound) => Err(AppError::NotFound("item not found".into())),
        Err(CoreError::InvalidField(field)) => Err(AppError::BadRequest(format!(
            "unknown child property {field:?}"
        ))),
        Err(CoreError::UnknownType(name)) => {
            Err(AppError::BadRequest(format!("unknown data type {name:?}")))
        }
        Err(e) => {
            warn!(%data_type, %parent_id, %child_prop, error = %e, "add child failed");
            Ok(inline_error("Item could not be added."))
        }
    }
}

async fn find(
    State(state): State<AppState>,
    Path((data_type, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    let id = parse_id("id", &id)?;
    match repo.find(id) {
        Ok(Some(row)) => Ok(Json(row).into_response()),
        Ok(None) => Err(AppError::NotFound(format!("no {data_type} with id {id}"))),
        Err(e) => {
            warn!(%data_type, %id, error = %e, "find failed");
            Ok(inline_error("Item could not be accessed."))
        }
    }
}

async fn get_all(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let repo = repository(&state, &data_type)?;
    let rows = repo
        .get_all()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(rows))
}

async fn get_types(State(state): State<AppState>) -> Response {
    Json(state.catalog.menu_types()).into_response()
}

async fn get_child_types(State(state): State<AppState>) -> Response {
    Json(state.catalog.child_types()).into_response()
}

async fn get_field_definitions(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
) -> Result<Response, AppError> {
    let registration = resolve_type(&state, &data_type)?;
    let descriptors = state.introspector.describe(registration.schema());
    Ok(Json(descriptors.as_slice()).into_response())
}

/// Query parameters for `GetPage`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    descending: bool,
    #[serde(default)]
    page: usize,
    #[serde(default = "default_rows_per_page")]
    rows_per_page: usize,
}

fn default_rows_per_page() -> usize {
    25
}

async fn get_page(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    let query = PageQuery {
        search: params.search,
        sort_by: params.sort_by,
        descending: params.descending,
        page: params.page,
        rows_per_page: params.rows_per_page,
    };
    let result = repo
        .get_page(&query)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(result).into_response())
}

async fn get_total(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    let total = repo
        .get_total()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!({ "response": total })).into_response())
}

async fn remove(
    State(state): State<AppState>,
    Path((data_type, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    let id = parse_id("id", &id)?;
    match repo.remove(id) {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(e) => {
            warn!(%data_type, %id, error = %e, "remove failed");
            Ok(Json(json!({ "response": "Item could not be removed." })).into_response())
        }
    }
}

async fn remove_child(
    State(state): State<AppState>,
    Path((data_type, id, child_prop, child_id)): Path<(String, String, String, String)>,
) -> Result<Response, AppError> {
    resolve_type(&state, &data_type)?;
    let parent_id = parse_id("id", &id)?;
    if child_prop.is_empty() {
        return Err(AppError::BadRequest("childProp must not be empty".into()));
    }
    let child_id = parse_id("childId", &child_id)?;

    let manager = RelationshipManager::new(&state.catalog, &state.store);
    match manager.remove_child(&data_type, parent_id, &child_prop, child_id) {
        Ok(parent) => Ok(Json(parent).into_response()),
        Err(CoreError::NotFound) => Err(AppError::NotFound("item not found".into())),
        Err(CoreError::InvalidField(field)) => Err(AppError::BadRequest(format!(
            "unknown child property {field:?}"
        ))),
        Err(CoreError::UnknownType(name)) => {
            Err(AppError::BadRequest(format!("unknown data type {name:?}")))
        }
        Err(e) => {
            warn!(%data_type, %parent_id, %child_prop, %child_id, error = %e, "remove child failed");
            Ok(inline_error("Item could not be removed."))
        }
    }
}

async fn remove_range(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
    Json(ids): Json<Vec<String>>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    if ids.is_empty() {
        return Err(AppError::BadRequest("id list must not be empty".into()));
    }
    // The whole batch is rejected before any store call if one id fails to
    // parse.
    let ids = ids
        .iter()
        .map(|id| parse_id("id", id))
        .collect::<Result<Vec<Uuid>, AppError>>()?;

    match repo.remove_range(&ids) {
        Ok(()) => Ok(StatusCode::OK.into_response()),
        Err(e) => {
            warn!(%data_type, count = ids.len(), error = %e, "remove range failed");
            Ok(
                Json(json!({ "response": "One or more items could not be removed." }))
                    .into_response(),
            )
        }
    }
}

async fn update(
    State(state): State<AppState>,
    Path(data_type): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Response, AppError> {
    let repo = repository(&state, &data_type)?;
    match repo.update(payload) {
        Ok(row) => Ok(Json(row).into_response()),
        Err(CoreError::Validation(msg)) => Err(AppError::BadRequest(msg)),
        Err(e) => {
            warn!(%data_type, error = %e, "update failed");
            Ok(inline_error("Item could not be updated."))
        }
    }
}
