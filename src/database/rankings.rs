use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{RankingSnapshot, SnapshotOwner, SnapshotValues};

/// Number of columns read by [`parse_snapshot_at`]
pub const SNAPSHOT_COLUMN_COUNT: usize = 9;

impl SnapshotOwner {
    fn table(&self) -> &'static str {
        match self {
            SnapshotOwner::Player(_) => "rankings",
            SnapshotOwner::Pair(_) => "doubles_rankings",
        }
    }

    fn owner_column(&self) -> &'static str {
        match self {
            SnapshotOwner::Player(_) => "player_id",
            SnapshotOwner::Pair(_) => "pair_id",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            SnapshotOwner::Player(id) | SnapshotOwner::Pair(id) => *id,
        }
    }
}

fn snapshot_columns(owner: &SnapshotOwner) -> String {
    format!(
        "id, {}, rank, previous_rank, rank_change, bwf_points, tournaments_played, fantasy_price, recorded_date",
        owner.owner_column()
    )
}

/// Write the snapshot for `date`, replacing any snapshot already recorded that day
pub fn upsert_snapshot(
    conn: &mut DbConn,
    owner: SnapshotOwner,
    recorded_date: NaiveDate,
    values: &SnapshotValues,
) -> Result<RankingSnapshot> {
    let sql = format!(
        "INSERT INTO {table} ({owner_col}, rank, previous_rank, rank_change, bwf_points, tournaments_played, fantasy_price, recorded_date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         ON CONFLICT ({owner_col}, recorded_date) DO UPDATE SET \
         rank = excluded.rank, previous_rank = excluded.previous_rank, rank_change = excluded.rank_change, \
         bwf_points = excluded.bwf_points, tournaments_played = excluded.tournaments_played, fantasy_price = excluded.fantasy_price \
         RETURNING {columns}",
        table = owner.table(),
        owner_col = owner.owner_column(),
        columns = snapshot_columns(&owner),
    );

    conn.query_row(
        &sql,
        params![
            owner.id(),
            values.rank,
            values.previous_rank,
            values.rank_change,
            values.bwf_points,
            values.tournaments_played,
            values.fantasy_price,
            recorded_date
        ],
        |row| parse_snapshot_at(row, 0),
    )
    .with_context(|| format!("Failed to upsert {} snapshot", owner.table()))
}

/// Read a snapshot starting at column `offset`
pub fn parse_snapshot_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<RankingSnapshot> {
    Ok(RankingSnapshot {
        id: row.get(offset)?,
        owner_id: row.get(offset + 1)?,
        rank: row.get(offset + 2)?,
        previous_rank: row.get(offset + 3)?,
        rank_change: row.get(offset + 4)?,
        bwf_points: row.get(offset + 5)?,
        tournaments_played: row.get(offset + 6)?,
        fantasy_price: row.get(offset + 7)?,
        recorded_date: row.get(offset + 8)?,
    })
}

/// Read an optional snapshot from a LEFT JOIN starting at column `offset`
pub fn parse_optional_snapshot_at(
    row: &rusqlite::Row,
    offset: usize,
) -> rusqlite::Result<Option<RankingSnapshot>> {
    let id: Option<i64> = row.get(offset)?;
    match id {
        Some(_) => parse_snapshot_at(row, offset).map(Some),
        None => Ok(None),
    }
}

pub fn get_latest(conn: &mut DbConn, owner: SnapshotOwner) -> Result<Option<RankingSnapshot>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY recorded_date DESC, id DESC LIMIT 1",
        snapshot_columns(&owner),
        owner.table(),
        owner.owner_column()
    );

    conn.query_row(&sql, params![owner.id()], |row| parse_snapshot_at(row, 0))
        .optional()
        .context("Failed to get latest ranking snapshot")
}

/// Most recent snapshots first
pub fn list_history(
    conn: &mut DbConn,
    owner: SnapshotOwner,
    limit: usize,
) -> Result<Vec<RankingSnapshot>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY recorded_date DESC, id DESC LIMIT ?2",
        snapshot_columns(&owner),
        owner.table(),
        owner.owner_column()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![owner.id(), limit as i64], |row| parse_snapshot_at(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_for_owner(conn: &mut DbConn, owner: SnapshotOwner) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        owner.table(),
        owner.owner_column()
    );
    conn.query_row(&sql, params![owner.id()], |row| row.get(0))
        .context("Failed to count ranking snapshots")
}

/// SQL fragment joining the latest snapshot of `owner_expr` under `alias`
pub fn latest_join(table: &str, owner_col: &str, owner_expr: &str, alias: &str) -> String {
    format!(
        "LEFT JOIN {table} {alias} ON {alias}.id = (SELECT id FROM {table} WHERE {owner_col} = {owner_expr} ORDER BY recorded_date DESC, id DESC LIMIT 1)"
    )
}

/// Snapshot columns of `alias`, in [`parse_snapshot_at`] order
pub fn aliased_columns(alias: &str, owner_col: &str) -> String {
    [
        "id",
        owner_col,
        "rank",
        "previous_rank",
        "rank_change",
        "bwf_points",
        "tournaments_played",
        "fantasy_price",
        "recorded_date",
    ]
    .iter()
    .map(|column| format!("{alias}.{column}"))
    .collect::<Vec<_>>()
    .join(", ")
}
