use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use super::connection::DbConn;
use super::models::{
    Player, PlayerFields, PlayerFilter, PlayerListRow, PlayerWithLatest, SortColumn, SortOrder,
};
use super::name_key;
use super::rankings::{self, SNAPSHOT_COLUMN_COUNT};
use super::stats;
use crate::domain::Category;

const PLAYER_COLUMNS: [&str; 14] = [
    "id",
    "bwf_id",
    "first_name",
    "last_name",
    "full_name",
    "country",
    "country_code",
    "category",
    "gender",
    "profile_url",
    "image_url",
    "is_active",
    "created_at",
    "updated_at",
];

pub const PLAYER_COLUMN_COUNT: usize = PLAYER_COLUMNS.len();

/// Player columns, optionally qualified with a table alias
pub fn player_columns(alias: Option<&str>) -> String {
    PLAYER_COLUMNS
        .iter()
        .map(|column| match alias {
            Some(alias) => format!("{alias}.{column}"),
            None => column.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_player_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(offset)?,
        bwf_id: row.get(offset + 1)?,
        first_name: row.get(offset + 2)?,
        last_name: row.get(offset + 3)?,
        full_name: row.get(offset + 4)?,
        country: row.get(offset + 5)?,
        country_code: row.get(offset + 6)?,
        category: row.get(offset + 7)?,
        gender: row.get(offset + 8)?,
        profile_url: row.get(offset + 9)?,
        image_url: row.get(offset + 10)?,
        is_active: row.get(offset + 11)?,
        created_at: row.get(offset + 12)?,
        updated_at: row.get(offset + 13)?,
    })
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    parse_player_at(row, 0)
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE id = ?1", player_columns(None));

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn find_by_bwf_id(conn: &mut DbConn, bwf_id: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE bwf_id = ?1", player_columns(None));

    conn.query_row(&sql, params![bwf_id], parse_player_row)
        .optional()
        .context("Failed to query player by bwf_id")
}

/// Case-insensitive full-name match among active players of a category.
/// Two different people sharing a name in the same category resolve to
/// the same (oldest) row.
pub fn find_active_by_name(
    conn: &mut DbConn,
    full_name: &str,
    category: Category,
) -> Result<Option<Player>> {
    let sql = format!(
        "SELECT {} FROM players WHERE name_key = ?1 AND category = ?2 AND is_active = 1 ORDER BY id LIMIT 1",
        player_columns(None)
    );

    conn.query_row(&sql, params![name_key(full_name), category], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}

pub fn insert_player(conn: &mut DbConn, fields: &PlayerFields) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (bwf_id, first_name, last_name, full_name, name_key, country, country_code, category, gender, profile_url) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING {}",
        player_columns(None)
    );

    conn.query_row(
        &sql,
        params![
            fields.bwf_id,
            fields.first_name,
            fields.last_name,
            fields.full_name,
            name_key(&fields.full_name),
            fields.country,
            fields.country_code,
            fields.category,
            fields.gender,
            fields.profile_url
        ],
        parse_player_row,
    )
    .with_context(|| format!("Failed to insert player {}", fields.full_name))
}

pub fn update_player(conn: &mut DbConn, id: i64, fields: &PlayerFields) -> Result<Player> {
    let sql = format!(
        "UPDATE players SET bwf_id = ?1, first_name = ?2, last_name = ?3, full_name = ?4, name_key = ?5, \
         country = ?6, country_code = ?7, category = ?8, gender = ?9, profile_url = ?10, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?11 RETURNING {}",
        player_columns(None)
    );

    conn.query_row(
        &sql,
        params![
            fields.bwf_id,
            fields.first_name,
            fields.last_name,
            fields.full_name,
            name_key(&fields.full_name),
            fields.country,
            fields.country_code,
            fields.category,
            fields.gender,
            fields.profile_url,
            id
        ],
        parse_player_row,
    )
    .with_context(|| format!("Failed to update player {}", fields.full_name))
}

/// Insert or overwrite the player keyed by BWF id
pub fn upsert_by_bwf_id(conn: &mut DbConn, fields: &PlayerFields) -> Result<Player> {
    match find_by_bwf_id(conn, &fields.bwf_id)? {
        Some(existing) => update_player(conn, existing.id, fields),
        None => insert_player(conn, fields),
    }
}

/// Returns false when no player has this id
pub fn deactivate(conn: &mut DbConn, id: i64) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE players SET is_active = 0, updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
            params![id],
        )
        .context("Failed to deactivate player")?;
    Ok(changed > 0)
}

pub fn with_latest(conn: &mut DbConn, player: Player) -> Result<PlayerWithLatest> {
    let latest = rankings::get_latest(conn, super::SnapshotOwner::Player(player.id))?;
    Ok(PlayerWithLatest { player, latest })
}

pub fn count_active(conn: &mut DbConn, category: Category) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM players WHERE is_active = 1 AND category = ?1",
        params![category],
        |row| row.get(0),
    )
    .context("Failed to count players")
}

struct WhereClause {
    sql: String,
    values: Vec<Value>,
}

fn build_where(category: Option<Category>, categories: &[Category], search: Option<&str>) -> WhereClause {
    let mut conditions = vec!["p.is_active = 1".to_string()];
    let mut values = Vec::new();

    if let Some(category) = category {
        values.push(Value::Text(category.as_str().to_string()));
        conditions.push(format!("p.category = ?{}", values.len()));
    } else if !categories.is_empty() {
        let placeholders: Vec<String> = categories
            .iter()
            .map(|c| {
                values.push(Value::Text(c.as_str().to_string()));
                format!("?{}", values.len())
            })
            .collect();
        conditions.push(format!("p.category IN ({})", placeholders.join(", ")));
    }

    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        values.push(Value::Text(format!("%{}%", escape_like(search))));
        let idx = values.len();
        conditions.push(format!(
            "(p.full_name LIKE ?{idx} ESCAPE '\\' OR p.country LIKE ?{idx} ESCAPE '\\')"
        ));
    }

    WhereClause {
        sql: conditions.join(" AND "),
        values,
    }
}

/// Searches match `%` and `_` literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn order_expression(sort_by: SortColumn) -> &'static str {
    match sort_by {
        SortColumn::Rank => "COALESCE(r.rank, 999)",
        SortColumn::Price => "COALESCE(r.fantasy_price, 5)",
        SortColumn::Points => "COALESCE(s.fantasy_points, 0)",
    }
}

/// One page of active players with their latest snapshot and stats,
/// plus the total number of matching players
pub fn list_players(conn: &mut DbConn, filter: &PlayerFilter) -> Result<(Vec<PlayerListRow>, usize)> {
    let clause = build_where(filter.category, &[], filter.search.as_deref());
    let direction = match filter.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    let sql = format!(
        "SELECT {player}, {ranking}, {stats} FROM players p {join_ranking} \
         LEFT JOIN player_stats s ON s.player_id = p.id \
         WHERE {condition} ORDER BY {order} {direction}, p.id ASC LIMIT {limit} OFFSET {offset}",
        player = player_columns(Some("p")),
        ranking = rankings::aliased_columns("r", "player_id"),
        stats = stats::aliased_columns("s"),
        join_ranking = rankings::latest_join("rankings", "player_id", "p.id", "r"),
        condition = clause.sql,
        order = order_expression(filter.sort_by),
        limit = filter.limit,
        offset = filter.offset,
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(clause.values.iter()), |row| {
            Ok(PlayerListRow {
                player: parse_player_at(row, 0)?,
                latest: rankings::parse_optional_snapshot_at(row, PLAYER_COLUMN_COUNT)?,
                stats: stats::parse_optional_stats_at(row, PLAYER_COLUMN_COUNT + SNAPSHOT_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players")?;

    let count_sql = format!("SELECT COUNT(*) FROM players p WHERE {}", clause.sql);
    let total: i64 = conn
        .query_row(&count_sql, params_from_iter(clause.values.iter()), |row| row.get(0))
        .context("Failed to count players")?;

    Ok((rows, total as usize))
}

/// Active players in `categories` that have at least one snapshot
pub fn list_ranked(
    conn: &mut DbConn,
    categories: &[Category],
    search: Option<&str>,
) -> Result<Vec<PlayerWithLatest>> {
    let clause = build_where(None, categories, search);
    let sql = format!(
        "SELECT {player}, {ranking} FROM players p {join_ranking} \
         WHERE {condition} AND r.id IS NOT NULL ORDER BY r.rank ASC, p.id ASC",
        player = player_columns(Some("p")),
        ranking = rankings::aliased_columns("r", "player_id"),
        join_ranking = rankings::latest_join("rankings", "player_id", "p.id", "r"),
        condition = clause.sql,
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(clause.values.iter()), |row| {
            Ok(PlayerWithLatest {
                player: parse_player_at(row, 0)?,
                latest: rankings::parse_optional_snapshot_at(row, PLAYER_COLUMN_COUNT)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list ranked players")?;

    Ok(rows)
}
