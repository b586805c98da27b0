use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::{Player, PlayerListRow, PlayerStats, RankingSnapshot};
use crate::domain::{DetectionResult, Gender, Category, SinglesRow};
use crate::pagination::PageInfo;
use crate::services::listing::{CategoryCounts, EnhancedEntry};
use crate::services::summary::{ImportReport, ProcessedPlayer, RowFailure};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

// Players listing

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// A player flattened with its latest snapshot and stats.
/// Missing values fall back to the defaults of an unranked player.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListItem {
    pub id: i64,
    pub bwf_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub country: String,
    pub country_code: String,
    pub category: Category,
    pub gender: Gender,
    pub profile_url: Option<String>,
    pub image_url: Option<String>,
    pub current_rank: i32,
    pub previous_rank: Option<i32>,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub tournaments_played: i32,
    pub fantasy_price: f64,
    pub fantasy_points: i64,
    pub form_rating: f64,
    pub win_rate: f64,
    pub matches_played: i32,
    pub matches_won: i32,
}

impl From<PlayerListRow> for PlayerListItem {
    fn from(row: PlayerListRow) -> Self {
        let PlayerListRow { player, latest, stats } = row;
        Self {
            id: player.id,
            bwf_id: player.bwf_id,
            first_name: player.first_name,
            last_name: player.last_name,
            full_name: player.full_name,
            country: player.country,
            country_code: player.country_code,
            category: player.category,
            gender: player.gender,
            profile_url: player.profile_url,
            image_url: player.image_url,
            current_rank: latest.as_ref().map_or(999, |r| r.rank),
            previous_rank: latest.as_ref().and_then(|r| r.previous_rank),
            rank_change: latest.as_ref().map_or(0, |r| r.rank_change),
            bwf_points: latest.as_ref().map_or(0, |r| r.bwf_points),
            tournaments_played: latest.as_ref().map_or(0, |r| r.tournaments_played),
            fantasy_price: latest.as_ref().map_or(5.0, |r| r.fantasy_price),
            fantasy_points: stats.as_ref().map_or(0, |s| s.fantasy_points),
            form_rating: stats.as_ref().map_or(5.0, |s| s.form_rating),
            win_rate: stats.as_ref().map_or(0.0, |s| s.win_rate),
            matches_played: stats.as_ref().map_or(0, |s| s.matches_played),
            matches_won: stats.as_ref().map_or(0, |s| s.matches_won),
        }
    }
}

#[derive(Serialize)]
pub struct PlayerListResponse {
    pub success: bool,
    pub data: Vec<PlayerListItem>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct RankingPoint {
    pub date: NaiveDate,
    pub rank: i32,
    pub points: i64,
    pub price: f64,
}

impl From<RankingSnapshot> for RankingPoint {
    fn from(snapshot: RankingSnapshot) -> Self {
        Self {
            date: snapshot.recorded_date,
            rank: snapshot.rank,
            points: snapshot.bwf_points,
            price: snapshot.fantasy_price,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub stats: Option<PlayerStats>,
    pub ranking_history: Vec<RankingPoint>,
}

// Admin

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Serialize)]
pub struct EnhancedResponse {
    pub success: bool,
    pub data: Vec<EnhancedEntry>,
    pub stats: CategoryCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub raw_data: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub detection: DetectionResult,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: ImportReport,
}

#[derive(Debug, Deserialize)]
pub struct DirectImportRequest {
    pub category: Option<String>,
    pub players: Option<Vec<SinglesRow>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectImportResponse {
    pub success: bool,
    pub message: String,
    pub processed_count: usize,
    pub error_count: usize,
    pub players: Vec<ProcessedPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RowFailure>>,
}

// News

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    pub title: String,
    pub category: String,
    pub content: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}
