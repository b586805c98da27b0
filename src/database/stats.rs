use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::PlayerStats;

const STATS_COLUMNS: &str =
    "player_id, fantasy_points, form_rating, win_rate, matches_played, matches_won, last_updated";

/// Stats columns of `alias`, in [`parse_stats_at`] order
pub fn aliased_columns(alias: &str) -> String {
    STATS_COLUMNS
        .split(", ")
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_stats_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<PlayerStats> {
    Ok(PlayerStats {
        player_id: row.get(offset)?,
        fantasy_points: row.get(offset + 1)?,
        form_rating: row.get(offset + 2)?,
        win_rate: row.get(offset + 3)?,
        matches_played: row.get(offset + 4)?,
        matches_won: row.get(offset + 5)?,
        last_updated: row.get(offset + 6)?,
    })
}

pub fn parse_optional_stats_at(
    row: &rusqlite::Row,
    offset: usize,
) -> rusqlite::Result<Option<PlayerStats>> {
    let player_id: Option<i64> = row.get(offset)?;
    match player_id {
        Some(_) => parse_stats_at(row, offset).map(Some),
        None => Ok(None),
    }
}

/// Seed or refresh a player's fantasy points
pub fn upsert_fantasy_points(conn: &mut DbConn, player_id: i64, fantasy_points: i64) -> Result<PlayerStats> {
    let sql = format!(
        "INSERT INTO player_stats (player_id, fantasy_points) VALUES (?1, ?2) \
         ON CONFLICT (player_id) DO UPDATE SET fantasy_points = excluded.fantasy_points, last_updated = CURRENT_TIMESTAMP \
         RETURNING {STATS_COLUMNS}"
    );

    conn.query_row(&sql, params![player_id, fantasy_points], |row| parse_stats_at(row, 0))
        .context("Failed to upsert player stats")
}

pub fn find_by_player(conn: &mut DbConn, player_id: i64) -> Result<Option<PlayerStats>> {
    let sql = format!("SELECT {STATS_COLUMNS} FROM player_stats WHERE player_id = ?1");

    conn.query_row(&sql, params![player_id], |row| parse_stats_at(row, 0))
        .optional()
        .context("Failed to query player stats")
}
