use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{Category, Gender};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
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
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Mutable player fields written by an import
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFields {
    pub bwf_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub country: String,
    pub country_code: String,
    pub category: Category,
    pub gender: Gender,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoublesPair {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub category: Category,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
}

/// Who a ranking snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOwner {
    Player(i64),
    Pair(i64),
}

/// Dated ranking record of a player or a pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSnapshot {
    pub id: i64,
    pub owner_id: i64,
    pub rank: i32,
    pub previous_rank: Option<i32>,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub tournaments_played: i32,
    pub fantasy_price: f64,
    pub recorded_date: NaiveDate,
}

/// Values of a snapshot about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotValues {
    pub rank: i32,
    pub previous_rank: Option<i32>,
    pub rank_change: i32,
    pub bwf_points: i64,
    pub tournaments_played: i32,
    pub fantasy_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_id: i64,
    pub fantasy_points: i64,
    pub form_rating: f64,
    pub win_rate: f64,
    pub matches_played: i32,
    pub matches_won: i32,
    pub last_updated: Option<NaiveDateTime>,
}

// DTOs for joined queries
#[derive(Debug, Clone)]
pub struct PlayerWithLatest {
    pub player: Player,
    pub latest: Option<RankingSnapshot>,
}

#[derive(Debug, Clone)]
pub struct PairWithLatest {
    pub pair: DoublesPair,
    pub player1: Player,
    pub player2: Player,
    pub latest: Option<RankingSnapshot>,
}

#[derive(Debug, Clone)]
pub struct PlayerListRow {
    pub player: Player,
    pub latest: Option<RankingSnapshot>,
    pub stats: Option<PlayerStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Rank,
    Price,
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct PlayerFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDateTime,
    pub featured: bool,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub category: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDateTime,
    pub featured: bool,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

mod sql_conversions {
    use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

    use crate::domain::{Category, Gender};

    impl ToSql for Category {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(ToSqlOutput::from(self.as_str()))
        }
    }

    impl FromSql for Category {
        fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
            value
                .as_str()?
                .parse()
                .map_err(|e| FromSqlError::Other(Box::new(e)))
        }
    }

    impl ToSql for Gender {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(ToSqlOutput::from(self.as_str()))
        }
    }

    impl FromSql for Gender {
        fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
            value
                .as_str()?
                .parse()
                .map_err(|e| FromSqlError::Other(Box::new(e)))
        }
    }
}
