//! Request Handlers
//!
//! One handler per user operation. Each validates its inputs, delegates to
//! the [`Engine`] and maps the outcome to an HTTP status.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::engine::Engine;
use crate::error::{BridgeError, Result};
use crate::protocol::{UserPayload, UserRecord};
use crate::scan::{Page, PageRequest};

/// Engine handle shared by every handler
pub type SharedEngine = Arc<Engine>;

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        (status, format!("Error: {}", self)).into_response()
    }
}

/// Raw pagination query; values are parsed by [`PageRequest::parse`]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// `GET /init`
pub async fn init(State(engine): State<SharedEngine>) -> Result<(StatusCode, String)> {
    engine.init().await?;
    Ok((
        StatusCode::OK,
        format!("Table {} created.", engine.config().table_name),
    ))
}

/// `POST /users`
pub async fn create_user(
    State(engine): State<SharedEngine>,
    body: std::result::Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, String)> {
    let Json(payload) = body.map_err(reject_body)?;
    let record = payload.into_record()?;

    engine.create_user(&record).await?;
    Ok((StatusCode::CREATED, format!("User {} added.", record.id)))
}

/// `GET /users?page&limit`
pub async fn list_users(
    State(engine): State<SharedEngine>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page>> {
    let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;
    let page = engine.list_users(request).await?;
    Ok(Json(page))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(engine): State<SharedEngine>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>> {
    let record = engine.get_user(&id).await?;
    Ok(Json(record))
}

/// `PUT /users/{id}`
pub async fn update_user(
    State(engine): State<SharedEngine>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UserPayload>, JsonRejection>,
) -> Result<String> {
    let Json(payload) = body.map_err(reject_body)?;

    engine.update_user(&id, payload).await?;
    Ok(format!("User {} updated.", id))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(engine): State<SharedEngine>,
    Path(id): Path<String>,
) -> Result<String> {
    engine.delete_user(&id).await?;
    Ok(format!("User {} deleted.", id))
}

fn reject_body(rejection: JsonRejection) -> BridgeError {
    BridgeError::InvalidArgument(format!("invalid JSON body: {}", rejection.body_text()))
}
