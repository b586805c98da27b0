use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use super::connection::DbConn;
use super::models::{DoublesPair, PairWithLatest, SnapshotOwner};
use super::players::{self, parse_player_at, player_columns, PLAYER_COLUMN_COUNT};
use super::{name_key, rankings};
use crate::domain::Category;

const PAIR_COLUMNS: &str = "id, player1_id, player2_id, category, is_active, created_at";
const PAIR_COLUMN_COUNT: usize = 6;

fn aliased_pair_columns(alias: &str) -> String {
    PAIR_COLUMNS
        .split(", ")
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_pair_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<DoublesPair> {
    Ok(DoublesPair {
        id: row.get(offset)?,
        player1_id: row.get(offset + 1)?,
        player2_id: row.get(offset + 2)?,
        category: row.get(offset + 3)?,
        is_active: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
    })
}

fn parse_pair_row(row: &rusqlite::Row) -> rusqlite::Result<DoublesPair> {
    parse_pair_at(row, 0)
}

/// Order two keys so that (a, b) and (b, a) compare equal
fn sorted<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if b < a { (b, a) } else { (a, b) }
}

/// Active pair of these two players in either order
pub fn find_active_by_player_ids(
    conn: &mut DbConn,
    player_a: i64,
    player_b: i64,
    category: Category,
) -> Result<Option<DoublesPair>> {
    let (low, high) = sorted(player_a, player_b);
    let sql = format!(
        "SELECT {PAIR_COLUMNS} FROM doubles_pairs \
         WHERE category = ?1 AND is_active = 1 \
         AND min(player1_id, player2_id) = ?2 AND max(player1_id, player2_id) = ?3 \
         ORDER BY id LIMIT 1"
    );

    conn.query_row(&sql, params![category, low, high], parse_pair_row)
        .optional()
        .context("Failed to query pair by player ids")
}

/// Active pair whose players carry these two names (case-insensitive, either order)
pub fn find_active_by_names(
    conn: &mut DbConn,
    name_a: &str,
    name_b: &str,
    category: Category,
) -> Result<Option<DoublesPair>> {
    let (low, high) = sorted(name_key(name_a), name_key(name_b));
    let sql = format!(
        "SELECT {columns} FROM doubles_pairs dp \
         JOIN players a ON a.id = dp.player1_id \
         JOIN players b ON b.id = dp.player2_id \
         WHERE dp.category = ?1 AND dp.is_active = 1 \
         AND min(a.name_key, b.name_key) = ?2 AND max(a.name_key, b.name_key) = ?3 \
         ORDER BY dp.id LIMIT 1",
        columns = aliased_pair_columns("dp")
    );

    conn.query_row(&sql, params![category, low, high], parse_pair_row)
        .optional()
        .context("Failed to query pair by player names")
}

pub fn insert_pair(
    conn: &mut DbConn,
    player1_id: i64,
    player2_id: i64,
    category: Category,
) -> Result<DoublesPair> {
    let sql = format!(
        "INSERT INTO doubles_pairs (player1_id, player2_id, category) VALUES (?1, ?2, ?3) RETURNING {PAIR_COLUMNS}"
    );

    conn.query_row(&sql, params![player1_id, player2_id, category], parse_pair_row)
        .context("Failed to insert doubles pair")
}

/// Load both players and the latest snapshot of a pair
pub fn with_latest(conn: &mut DbConn, pair: DoublesPair) -> Result<PairWithLatest> {
    let player1 = players::find_by_id(conn, pair.player1_id)?
        .with_context(|| format!("Pair {} references missing player {}", pair.id, pair.player1_id))?;
    let player2 = players::find_by_id(conn, pair.player2_id)?
        .with_context(|| format!("Pair {} references missing player {}", pair.id, pair.player2_id))?;
    let latest = rankings::get_latest(conn, SnapshotOwner::Pair(pair.id))?;

    Ok(PairWithLatest {
        pair,
        player1,
        player2,
        latest,
    })
}

pub fn count_active(conn: &mut DbConn, category: Category) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM doubles_pairs WHERE is_active = 1 AND category = ?1",
        params![category],
        |row| row.get(0),
    )
    .context("Failed to count pairs")
}

/// Active pairs in `categories` that have at least one snapshot
pub fn list_ranked(conn: &mut DbConn, categories: &[Category]) -> Result<Vec<PairWithLatest>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=categories.len()).map(|i| format!("?{i}")).collect();
    let values: Vec<Value> = categories
        .iter()
        .map(|c| Value::Text(c.as_str().to_string()))
        .collect();

    let sql = format!(
        "SELECT {pair}, {player1}, {player2}, {ranking} FROM doubles_pairs dp \
         JOIN players a ON a.id = dp.player1_id \
         JOIN players b ON b.id = dp.player2_id \
         {join_ranking} \
         WHERE dp.is_active = 1 AND dp.category IN ({placeholders}) AND r.id IS NOT NULL \
         ORDER BY r.rank ASC, dp.id ASC",
        pair = aliased_pair_columns("dp"),
        player1 = player_columns(Some("a")),
        player2 = player_columns(Some("b")),
        ranking = rankings::aliased_columns("r", "pair_id"),
        join_ranking = rankings::latest_join("doubles_rankings", "pair_id", "dp.id", "r"),
        placeholders = placeholders.join(", "),
    );

    let player2_offset = PAIR_COLUMN_COUNT + PLAYER_COLUMN_COUNT;
    let ranking_offset = player2_offset + PLAYER_COLUMN_COUNT;

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(PairWithLatest {
                pair: parse_pair_at(row, 0)?,
                player1: parse_player_at(row, PAIR_COLUMN_COUNT)?,
                player2: parse_player_at(row, player2_offset)?,
                latest: rankings::parse_optional_snapshot_at(row, ranking_offset)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list ranked pairs")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_connection, open_memory, PlayerFields};

    fn player(conn: &mut DbConn, bwf_id: &str, first: &str, last: &str) -> i64 {
        let fields = PlayerFields {
            bwf_id: bwf_id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            full_name: format!("{first} {last}"),
            country: "Indonesia".to_string(),
            country_code: "INA".to_string(),
            category: Category::MD,
            gender: Category::MD.gender(),
            profile_url: format!("https://x/player/{bwf_id}/p/"),
        };
        players::insert_player(conn, &fields).unwrap().id
    }

    #[test]
    fn player_id_lookup_is_symmetric() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let a = player(&mut conn, "1", "Fajar", "ALFIAN");
        let b = player(&mut conn, "2", "Muhammad Rian", "ARDIANTO");
        let pair = insert_pair(&mut conn, a, b, Category::MD).unwrap();

        let forward = find_active_by_player_ids(&mut conn, a, b, Category::MD).unwrap();
        let reverse = find_active_by_player_ids(&mut conn, b, a, Category::MD).unwrap();

        assert_eq!(forward.as_ref().map(|p| p.id), Some(pair.id));
        assert_eq!(reverse.map(|p| p.id), Some(pair.id));
        assert!(find_active_by_player_ids(&mut conn, a, b, Category::XD).unwrap().is_none());
    }

    #[test]
    fn name_lookup_is_symmetric_and_case_insensitive() {
        let pool = open_memory().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let a = player(&mut conn, "1", "Fajar", "ALFIAN");
        let b = player(&mut conn, "2", "Muhammad Rian", "ARDIANTO");
        let pair = insert_pair(&mut conn, a, b, Category::MD).unwrap();

        let found = find_active_by_names(&mut conn, "muhammad rian ardianto", "FAJAR ALFIAN", Category::MD)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, pair.id);

        let loaded = with_latest(&mut conn, found).unwrap();
        assert_eq!(loaded.player1.last_name, "ALFIAN");
        assert!(loaded.latest.is_none());
        assert_eq!(count_active(&mut conn, Category::MD).unwrap(), 1);
    }
}
