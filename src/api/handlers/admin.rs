use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use log::info;
use std::sync::Arc;

use crate::api::models::{
    DataResponse, DetectionResponse, DirectImportRequest, DirectImportResponse, EnhancedParams, EnhancedResponse,
    ImportRequest, ImportResponse,
};
use crate::database::{self, Player};
use crate::domain::Category;
use crate::parsers::detect_and_parse;
use crate::services::direct_import::DirectImportService;
use crate::services::import::ImportService;
use crate::services::listing::{enhanced_listing, EnhancedQuery};
use super::{bad_request, connection, internal_error, not_found, parse_category, parse_sort, ApiResult, AppState};

const ENHANCED_DEFAULT_LIMIT: usize = 100;

/// Detect the format of pasted ranking text, or import it when a category is given
pub async fn import_enhanced(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let raw_data = request
        .raw_data
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| bad_request("Raw data is required"))?;
    let category = parse_category(request.category.as_deref())?;

    let detection = detect_and_parse(&raw_data, &state.config.import).map_err(|e| bad_request(e.to_string()))?;

    let Some(category) = category else {
        info!(
            "Detected {} format with {} players",
            detection.format.as_str(),
            detection.players_found
        );
        return Ok(Json(DetectionResponse {
            success: true,
            detection,
        })
        .into_response());
    };

    let service = ImportService::new(state.config.clone()).map_err(|e| internal_error("Failed to process import", e))?;
    let mut conn = connection(&state)?;
    let today = Local::now().date_naive();
    let report = service.import(&mut conn, &detection.data, category, today);

    Ok(Json(ImportResponse {
        success: true,
        message: report.message(),
        report,
    })
    .into_response())
}

/// Import structured singles rows keyed by BWF id
pub async fn import_players(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DirectImportRequest>, JsonRejection>,
) -> ApiResult<Json<DirectImportResponse>> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let (Some(category), Some(rows)) = (parse_category(request.category.as_deref())?, request.players) else {
        return Err(bad_request("Invalid request format"));
    };

    let service = DirectImportService::new(state.config.clone()).map_err(|e| internal_error("Failed to import players", e))?;
    let mut conn = connection(&state)?;
    let report = service.import(&mut conn, &rows, category, Local::now().date_naive());

    Ok(Json(DirectImportResponse {
        success: true,
        message: report.message(),
        processed_count: report.players.len(),
        error_count: report.errors.len(),
        players: report.players,
        errors: Some(report.errors).filter(|errors| !errors.is_empty()),
    }))
}

pub async fn list_enhanced(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EnhancedParams>,
) -> ApiResult<Json<EnhancedResponse>> {
    let category: Option<Category> = parse_category(params.category.as_deref())?;
    let (sort_by, sort_order) = parse_sort(params.sort_by.as_deref(), params.sort_order.as_deref());

    let query = EnhancedQuery {
        category,
        search: params.search,
        limit: params.limit.unwrap_or(ENHANCED_DEFAULT_LIMIT),
        sort_by,
        sort_order,
    };

    let mut conn = connection(&state)?;
    let listing = enhanced_listing(&mut conn, &query).map_err(|e| internal_error("Failed to fetch players data", e))?;

    Ok(Json(EnhancedResponse {
        success: true,
        data: listing.entries,
        stats: listing.counts,
    }))
}

pub async fn deactivate_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> ApiResult<Json<DataResponse<Player>>> {
    let mut conn = connection(&state)?;

    let deactivated = database::players::deactivate(&mut conn, player_id)
        .map_err(|e| internal_error("Failed to deactivate player", e))?;
    if !deactivated {
        return Err(not_found("Player not found"));
    }

    let player = database::players::find_by_id(&mut conn, player_id)
        .map_err(|e| internal_error("Failed to deactivate player", e))?
        .ok_or_else(|| not_found("Player not found"))?;
    info!("Deactivated player {} ({})", player.id, player.full_name);

    Ok(Json(DataResponse { success: true, data: player }))
}
