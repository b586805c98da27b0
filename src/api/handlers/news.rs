use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::api::models::{CreateNewsRequest, MessageResponse, UpdateNewsRequest};
use crate::database::{self, News, NewNews, NewsChanges};
use super::{bad_request, connection, internal_error, not_found, ApiResult, AppState};

pub async fn list_news(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<News>>> {
    let mut conn = connection(&state)?;
    let items = database::news::list_all(&mut conn).map_err(|e| internal_error("Failed to fetch news", e))?;
    Ok(Json(items))
}

pub async fn get_news(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<News>> {
    let mut conn = connection(&state)?;
    database::news::find_by_id(&mut conn, id)
        .map_err(|e| internal_error("Failed to fetch news", e))?
        .map(Json)
        .ok_or_else(|| not_found("News not found"))
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateNewsRequest>, JsonRejection>,
) -> ApiResult<Json<News>> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let draft = NewNews {
        title: request.title,
        category: request.category,
        content: request.content,
        author: request.author,
        date: request.date.unwrap_or_else(Utc::now).naive_utc(),
        featured: request.featured.unwrap_or(false),
        tags: request.tags.unwrap_or_default(),
        image_url: request.image_url,
    };

    let mut conn = connection(&state)?;
    let created = database::news::insert(&mut conn, &draft).map_err(|e| internal_error("Failed to create news", e))?;
    info!("Created news {} ({:?})", created.id, created.title);
    Ok(Json(created))
}

pub async fn update_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateNewsRequest>, JsonRejection>,
) -> ApiResult<Json<News>> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let changes = NewsChanges {
        title: request.title,
        category: request.category,
        content: request.content,
        author: request.author,
        date: request.date.map(|date| date.naive_utc()),
        featured: request.featured,
        tags: request.tags,
        image_url: request.image_url,
    };

    let mut conn = connection(&state)?;
    database::news::update(&mut conn, id, &changes)
        .map_err(|e| internal_error("Failed to update news", e))?
        .map(Json)
        .ok_or_else(|| not_found("News not found"))
}

pub async fn delete_news(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<MessageResponse>> {
    let mut conn = connection(&state)?;
    let deleted = database::news::delete(&mut conn, id).map_err(|e| internal_error("Failed to delete news", e))?;
    if !deleted {
        return Err(not_found("News not found"));
    }

    Ok(Json(MessageResponse {
        message: "News deleted successfully".to_string(),
    }))
}

pub async fn delete_all_news(State(state): State<Arc<AppState>>) -> ApiResult<Json<MessageResponse>> {
    let mut conn = connection(&state)?;
    let deleted = database::news::delete_all(&mut conn).map_err(|e| internal_error("Failed to delete news", e))?;
    info!("Deleted {} news items", deleted);

    Ok(Json(MessageResponse {
        message: "All news deleted successfully".to_string(),
    }))
}
