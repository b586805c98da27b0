use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use log::error;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::models::ErrorResponse;
use crate::config::settings::AppConfig;
use crate::database::{DbConn, DbPool, SortColumn, SortOrder};
use crate::domain::Category;

pub mod admin;
pub mod news;
pub mod players;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

/// Handler result; the error side is already a complete response
pub type ApiResult<T> = Result<T, Response>;

pub fn bad_request(message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: Some(false),
        error: message.into(),
        details: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

pub fn not_found(message: &str) -> Response {
    let body = ErrorResponse {
        success: None,
        error: message.to_string(),
        details: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Log an unexpected failure and turn it into a 500
pub fn internal_error(message: &str, e: anyhow::Error) -> Response {
    error!("{message}: {e:#}");
    let body = ErrorResponse {
        success: None,
        error: message.to_string(),
        details: Some(format!("{e:#}")),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub fn connection(state: &AppState) -> ApiResult<DbConn> {
    state
        .pool
        .get()
        .map_err(|e| internal_error("DB Connection Error", e.into()))
}

/// Optional category query value; blank means "all"
pub fn parse_category(raw: Option<&str>) -> ApiResult<Option<Category>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Category::from_str(raw)
            .map(Some)
            .map_err(|e| bad_request(e.to_string())),
        None => Ok(None),
    }
}

pub fn parse_sort(sort_by: Option<&str>, sort_order: Option<&str>) -> (SortColumn, SortOrder) {
    let column = match sort_by {
        Some("price") => SortColumn::Price,
        Some("points") => SortColumn::Points,
        _ => SortColumn::Rank,
    };
    let order = match sort_order {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    };
    (column, order)
}

/// Rejects admin requests without the configured bearer token.
/// Admin routes are open when no token is configured.
pub async fn require_admin(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    if let Some(token) = state.config.server.admin_token.as_deref() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        if presented != Some(token) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    next.run(request).await
}
