use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::{DataResponse, PlayerDetail, PlayerListItem, PlayerListParams, PlayerListResponse, RankingPoint};
use crate::database::{self, PlayerFilter, SnapshotOwner};
use crate::pagination::PageRequest;
use super::{connection, internal_error, not_found, parse_category, parse_sort, ApiResult, AppState};

const HISTORY_LENGTH: usize = 10;

pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlayerListParams>,
) -> ApiResult<Json<PlayerListResponse>> {
    let category = parse_category(params.category.as_deref())?;
    let page = PageRequest::resolve(params.limit, params.offset, &state.config.server);
    let (sort_by, sort_order) = parse_sort(params.sort_by.as_deref(), params.sort_order.as_deref());

    let filter = PlayerFilter {
        category,
        search: params.search,
        sort_by,
        sort_order,
        limit: page.limit,
        offset: page.offset,
    };

    let mut conn = connection(&state)?;
    let (rows, total) = database::players::list_players(&mut conn, &filter)
        .map_err(|e| internal_error("Failed to fetch players", e))?;

    Ok(Json(PlayerListResponse {
        success: true,
        data: rows.into_iter().map(PlayerListItem::from).collect(),
        pagination: page.info(total),
    }))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> ApiResult<Json<DataResponse<PlayerDetail>>> {
    let mut conn = connection(&state)?;

    let player = database::players::find_by_id(&mut conn, player_id)
        .map_err(|e| internal_error("Failed to fetch player", e))?
        .ok_or_else(|| not_found("Player not found"))?;

    let stats = database::stats::find_by_player(&mut conn, player.id)
        .map_err(|e| internal_error("Failed to fetch player", e))?;
    let history = database::rankings::list_history(&mut conn, SnapshotOwner::Player(player.id), HISTORY_LENGTH)
        .map_err(|e| internal_error("Failed to fetch player", e))?;

    Ok(Json(DataResponse {
        success: true,
        data: PlayerDetail {
            player,
            stats,
            ranking_history: history.into_iter().map(RankingPoint::from).collect(),
        },
    }))
}
